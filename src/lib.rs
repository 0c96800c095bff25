//! Data layer of a NIFTY-50 stock dashboard.
//!
//! Loads a daily price history and a per-symbol metadata table, joins them,
//! filters the result by symbol, industry and date range, and turns it into
//! chart descriptions and headline metrics. News for the selected stock comes
//! from a search API, with fixed stand-in items when the API is unreachable.
//!
//! ```no_run
//! use nifty_dashboard::{
//!     cache::TableCache,
//!     config::DashboardConfig,
//!     dashboard::{Dashboard, DashboardRequest},
//! };
//!
//! # fn main() -> eyre::Result<()> {
//! let config = DashboardConfig::default().with_env_overrides();
//! let cache = TableCache::new();
//! let dashboard = Dashboard::open(&config, &cache)?;
//!
//! let view = dashboard.view(&DashboardRequest::default().with_symbol("TCS"));
//! println!("{:?}", view.stock.map(|s| s.metrics));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cache;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod news;
pub mod utils;

pub use error::{ConfigError, FilterInputError, LoadError, NewsFetchError};
pub use filter::{filter, FilterCriteria};
pub use loader::{load, CsvTableLoader, StockDataLoader};
pub use model::{CombinedRecord, DaySeriesData, MetadataRecord, PriceRecord};
