use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{error::FilterInputError, model::CombinedRecord};

/// Optional criteria, combined with logical AND. An absent criterion matches
/// every row.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub symbol: Option<String>,
    pub industry: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn with_symbol(mut self, value: impl Into<String>) -> Self {
        self.symbol = Some(value.into());
        self
    }

    pub fn with_industry(mut self, value: impl Into<String>) -> Self {
        self.industry = Some(value.into());
        self
    }

    pub fn with_start_date(mut self, value: NaiveDate) -> Self {
        self.start_date = Some(value);
        self
    }

    pub fn with_end_date(mut self, value: NaiveDate) -> Self {
        self.end_date = Some(value);
        self
    }

    pub fn with_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.with_start_date(start).with_end_date(end)
    }

    /// Reports an inverted date range. The filter itself never rejects one;
    /// it just yields whatever the inclusive predicate matches.
    pub fn check_range(&self) -> Result<(), FilterInputError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                Err(FilterInputError::InvertedRange { start, end })
            }
            _ => Ok(()),
        }
    }

    pub fn matches(&self, record: &CombinedRecord) -> bool {
        self.symbol.as_ref().map_or(true, |s| *s == record.symbol)
            && self
                .industry
                .as_ref()
                .map_or(true, |i| record.industry.as_ref() == Some(i))
            && self.start_date.map_or(true, |start| start <= record.date)
            && self.end_date.map_or(true, |end| record.date <= end)
    }
}

/// Returns the rows matching `criteria`, in table order.
pub fn filter(table: &[CombinedRecord], criteria: &FilterCriteria) -> Vec<CombinedRecord> {
    table
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}
