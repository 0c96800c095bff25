use std::collections::BTreeMap;

use chrono::NaiveDate;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::{
    model::{CombinedRecord, Price, Volume},
    utils::Average,
};

/// A selectable stock: ticker plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub symbol: String,
    pub company_name: Option<String>,
}

impl StockEntry {
    /// `"TCS - Tata Consultancy"`, or just the ticker when the name is unknown.
    pub fn label(&self) -> String {
        match &self.company_name {
            Some(name) => format!("{} - {}", self.symbol, name),
            None => self.symbol.clone(),
        }
    }
}

/// Unique non-null industries, ascending.
pub fn distinct_industries(table: &[CombinedRecord]) -> Vec<String> {
    table
        .iter()
        .filter_map(|r| r.industry.as_deref())
        .unique()
        .sorted()
        .map(str::to_owned)
        .collect()
}

/// One entry per symbol, ascending by symbol. The name comes from the first
/// row of that symbol.
pub fn distinct_symbols(table: &[CombinedRecord]) -> Vec<StockEntry> {
    table
        .iter()
        .unique_by(|&r| r.symbol.as_str())
        .map(|r| StockEntry {
            symbol: r.symbol.clone(),
            company_name: r.company_name.clone(),
        })
        .sorted_by(|a, b| a.symbol.cmp(&b.symbol))
        .collect()
}

/// Earliest and latest trading day in the table.
pub fn date_bounds(table: &[CombinedRecord]) -> Option<(NaiveDate, NaiveDate)> {
    match table.iter().map(|r| r.date).minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(d) => Some((d, d)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// Industry of the first row for `symbol`.
pub fn industry_of<'a>(table: &'a [CombinedRecord], symbol: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|r| r.symbol == symbol)
        .and_then(|r| r.industry.as_deref())
}

/// Total traded volume per industry, ascending by industry. Rows without an
/// industry are left out. Totals saturate at `Volume::MAX`.
pub fn industry_volume_share(table: &[CombinedRecord]) -> Vec<(String, Volume)> {
    let mut totals: BTreeMap<&str, Volume> = BTreeMap::new();

    for r in table {
        if let Some(industry) = r.industry.as_deref() {
            let total = totals.entry(industry).or_default();
            *total = total.saturating_add(r.volume());
        }
    }

    totals
        .into_iter()
        .map(|(industry, volume)| (industry.to_owned(), volume))
        .collect()
}

/// Mean close per industry, highest first.
pub fn industry_average_close(table: &[CombinedRecord]) -> Vec<(String, Price)> {
    let mut averages: BTreeMap<&str, Average> = BTreeMap::new();

    for r in table {
        if let Some(industry) = r.industry.as_deref() {
            averages.entry(industry).or_default().feed(r.close());
        }
    }

    averages
        .into_iter()
        .filter_map(|(industry, average)| Some((industry.to_owned(), average.avg()?)))
        .sorted_by(|(_, a), (_, b)| b.total_cmp(a))
        .collect()
}

/// Headline numbers for the latest row of a (filtered) series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub date: NaiveDate,
    pub close: Price,
    pub close_change: Price,
    pub volume: Volume,
    pub volume_change: i64,
    pub day_high: Price,
    pub day_low: Price,
}

impl KeyMetrics {
    /// Compares the last row with the one before it. A single row is compared
    /// with itself, giving zero changes.
    pub fn from_rows(rows: &[CombinedRecord]) -> Option<Self> {
        let latest = rows.last()?;
        let previous = rows.len().checked_sub(2).map_or(latest, |ix| &rows[ix]);

        Some(Self {
            date: latest.date,
            close: latest.close(),
            close_change: latest.close() - previous.close(),
            volume: latest.volume(),
            volume_change: volume_delta(previous.volume(), latest.volume()),
            day_high: latest.data.high,
            day_low: latest.data.low,
        })
    }
}

/// Signed `to - from`, clamped to the `i64` range.
fn volume_delta(from: Volume, to: Volume) -> i64 {
    let delta = i128::from(to) - i128::from(from);
    delta.clamp(i64::MIN.into(), i64::MAX.into()) as i64
}
