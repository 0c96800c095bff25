use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    error::LoadError,
    model::{CombinedRecord, DaySeriesData, MetadataRecord, Price, PriceRecord, Volume},
};

pub const PRICE_COLUMNS: [&str; 7] = ["Symbol", "Date", "Open", "High", "Low", "Close", "Volume"];
pub const METADATA_COLUMNS: [&str; 3] = ["Symbol", "Company Name", "Industry"];

/// Tried in order. Numeric dates read month-first; day-first only applies when
/// the month-first reading is impossible (`13/01/2020`).
const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%m/%d/%Y", "%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y",
    "%d %b %Y",
];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

pub trait StockDataLoader {
    fn load(&self) -> Result<Vec<CombinedRecord>, LoadError>;
}

/// Reads the price history and the metadata table from two CSV files.
#[derive(Debug, Clone)]
pub struct CsvTableLoader {
    pub price_path: PathBuf,
    pub metadata_path: PathBuf,
}

impl CsvTableLoader {
    pub fn new(price_path: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            price_path: price_path.into(),
            metadata_path: metadata_path.into(),
        }
    }
}

impl StockDataLoader for CsvTableLoader {
    fn load(&self) -> Result<Vec<CombinedRecord>, LoadError> {
        load(&self.price_path, &self.metadata_path)
    }
}

/// Loads both sources and left-joins price rows to metadata on `Symbol`.
pub fn load(
    price_path: impl AsRef<Path>,
    metadata_path: impl AsRef<Path>,
) -> Result<Vec<CombinedRecord>, LoadError> {
    let prices = load_prices(price_path)?;
    let metadata = load_metadata(metadata_path)?;

    Ok(join(prices, &metadata))
}

pub fn load_prices(path: impl AsRef<Path>) -> Result<Vec<PriceRecord>, LoadError> {
    let path = path.as_ref();
    info!("Loading prices from: {}", path.display());

    let (mut reader, headers) = open_table(path)?;
    let [symbol_ix, date_ix, open_ix, high_ix, low_ix, close_ix, volume_ix] =
        column_indices(&headers, PRICE_COLUMNS, path)?;

    let mut prices = Vec::new();

    for (ix, record) in reader.records().enumerate() {
        let row = ix + 1;
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_owned(),
            source,
        })?;

        let raw_date = cell(&record, date_ix);
        let date = parse_date(raw_date).ok_or_else(|| LoadError::InvalidDate {
            path: path.to_owned(),
            row,
            value: raw_date.to_owned(),
        })?;

        let number = |index: usize, column: &'static str| -> Result<Price, LoadError> {
            let value = cell(&record, index);
            value.trim().parse().map_err(|_| LoadError::InvalidNumber {
                path: path.to_owned(),
                row,
                column,
                value: value.to_owned(),
            })
        };

        prices.push(PriceRecord {
            symbol: cell(&record, symbol_ix).to_owned(),
            date,
            data: DaySeriesData {
                open: number(open_ix, "Open")?,
                high: number(high_ix, "High")?,
                low: number(low_ix, "Low")?,
                close: number(close_ix, "Close")?,
                volume: volume(number(volume_ix, "Volume")?).ok_or_else(|| {
                    LoadError::InvalidNumber {
                        path: path.to_owned(),
                        row,
                        column: "Volume",
                        value: cell(&record, volume_ix).to_owned(),
                    }
                })?,
            },
        });
    }

    info!(
        "Loaded {} price rows from {} to {}",
        prices.len(),
        prices.iter().map(|p| p.date).min().map(|d| d.to_string()).unwrap_or_default(),
        prices.iter().map(|p| p.date).max().map(|d| d.to_string()).unwrap_or_default(),
    );

    Ok(prices)
}

pub fn load_metadata(path: impl AsRef<Path>) -> Result<Vec<MetadataRecord>, LoadError> {
    let path = path.as_ref();
    info!("Loading metadata from: {}", path.display());

    let (mut reader, headers) = open_table(path)?;
    let [symbol, company_name, industry] = column_indices(&headers, METADATA_COLUMNS, path)?;

    let mut metadata = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_owned(),
            source,
        })?;

        metadata.push(MetadataRecord {
            symbol: cell(&record, symbol).to_owned(),
            company_name: optional_cell(&record, company_name),
            industry: optional_cell(&record, industry),
        });
    }

    info!("Loaded {} metadata rows", metadata.len());

    Ok(metadata)
}

/// Left outer join on exact `Symbol` equality. Every price row is kept once, in
/// input order. When the metadata repeats a symbol the first row wins.
pub fn join(prices: Vec<PriceRecord>, metadata: &[MetadataRecord]) -> Vec<CombinedRecord> {
    let mut by_symbol: HashMap<&str, &MetadataRecord> = HashMap::with_capacity(metadata.len());

    for m in metadata {
        if by_symbol.contains_key(m.symbol.as_str()) {
            warn!("Duplicate metadata for symbol {}, keeping the first row", m.symbol);
            continue;
        }
        by_symbol.insert(m.symbol.as_str(), m);
    }

    let unmatched = prices
        .iter()
        .map(|p| p.symbol.as_str())
        .filter(|s| !by_symbol.contains_key(s))
        .unique()
        .collect_vec();

    if !unmatched.is_empty() {
        debug!("No metadata for symbols: {:?}", unmatched);
    }

    prices
        .into_iter()
        .map(|p| {
            let m = by_symbol.get(p.symbol.as_str()).copied();
            CombinedRecord::join(p, m)
        })
        .collect()
}

/// Parses a calendar date, accepting common date and datetime spellings.
/// A time part, if present, is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Truncates a parsed volume to whole shares. `None` when it is negative, not
/// finite, or does not fit a [`Volume`].
fn volume(value: Price) -> Option<Volume> {
    (value.is_finite() && value >= 0.0 && value < Volume::MAX as Price).then(|| value as Volume)
}

fn open_table(path: &Path) -> Result<(csv::Reader<File>, StringRecord), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_owned(),
            source,
        })?
        .clone();

    Ok((reader, headers))
}

fn column_indices<const N: usize>(
    headers: &StringRecord,
    columns: [&'static str; N],
    path: &Path,
) -> Result<[usize; N], LoadError> {
    let mut indices = [0; N];

    for (slot, column) in indices.iter_mut().zip(columns) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| LoadError::MissingColumn {
                path: path.to_owned(),
                column,
            })?;
    }

    Ok(indices)
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}

fn optional_cell(record: &StringRecord, index: usize) -> Option<String> {
    Some(cell(record, index).trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
