use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type Price = f64;

pub type Volume = u64;

#[derive(Default, Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySeriesData {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

/// One trading day of one symbol, as read from the price source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub data: DaySeriesData,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub symbol: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
}

/// A price row left-joined with the metadata of its symbol.
///
/// `company_name` and `industry` are `None` when the metadata source has no
/// row for the symbol (or the cell was empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub data: DaySeriesData,
    pub company_name: Option<String>,
    pub industry: Option<String>,
}

impl CombinedRecord {
    pub fn join(price: PriceRecord, metadata: Option<&MetadataRecord>) -> Self {
        Self {
            symbol: price.symbol,
            date: price.date,
            data: price.data,
            company_name: metadata.and_then(|m| m.company_name.clone()),
            industry: metadata.and_then(|m| m.industry.clone()),
        }
    }

    pub fn close(&self) -> Price {
        self.data.close
    }

    pub fn volume(&self) -> Volume {
        self.data.volume
    }
}
