//! Dashboard configuration.
//!
//! Read from a TOML file, then overridden from the environment. The news API
//! credential is only ever supplied this way.

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "SERPAPI_API_KEY";
pub const PRICE_PATH_ENV: &str = "NIFTY_PRICE_PATH";
pub const METADATA_PATH_ENV: &str = "NIFTY_METADATA_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub news: NewsSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_price_path")]
    pub price_path: String,
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,
}

fn default_price_path() -> String {
    "NIFTY50_all.csv".to_owned()
}

fn default_metadata_path() -> String {
    "stock_metadata.csv".to_owned()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            price_path: default_price_path(),
            metadata_path: default_metadata_path(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NewsSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_engine")]
    pub engine: String,
    /// `gl` parameter.
    #[serde(default = "default_country")]
    pub country: String,
    /// `hl` parameter.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://serpapi.com/search".to_owned()
}

fn default_engine() -> String {
    "google_news".to_owned()
}

fn default_country() -> String {
    "in".to_owned()
}

fn default_language() -> String {
    "en".to_owned()
}

fn default_max_results() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            engine: default_engine(),
            country: default_country(),
            language: default_language(),
            api_key: None,
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for NewsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsSettings")
            .field("endpoint", &self.endpoint)
            .field("engine", &self.engine)
            .field("country", &self.country)
            .field("language", &self.language)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_results", &self.max_results)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NewsSettings {
    pub fn with_api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    pub fn with_endpoint(mut self, value: impl Into<String>) -> Self {
        self.endpoint = value.into();
        self
    }
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `SERPAPI_API_KEY`, `NIFTY_PRICE_PATH` and `NIFTY_METADATA_PATH`
    /// when they are set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(API_KEY_ENV) {
            self.news.api_key = Some(key);
        }
        if let Some(path) = lookup(PRICE_PATH_ENV) {
            self.data.price_path = path;
        }
        if let Some(path) = lookup(METADATA_PATH_ENV) {
            self.data.metadata_path = path;
        }

        self
    }
}
