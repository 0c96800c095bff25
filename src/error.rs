//! Error types for loading, filtering, news lookup and configuration.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

/// Fatal failure to build the combined table. No partial table is ever returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{} row {row}: unparseable date '{value}'", .path.display())]
    InvalidDate {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("{} row {row}: column '{column}' holds non-numeric '{value}'", .path.display())]
    InvalidNumber {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl LoadError {
    /// Coarse failure class. A source that cannot be opened counts as a parse
    /// failure of that source, so every variant reports `"parse"`.
    pub fn reason(&self) -> &'static str {
        "parse"
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Csv { path, .. }
            | LoadError::MissingColumn { path, .. }
            | LoadError::InvalidDate { path, .. }
            | LoadError::InvalidNumber { path, .. } => path,
        }
    }
}

/// Advisory problem with the user's criteria. The filter still runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterInputError {
    #[error("End date must fall after start date.")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Anything that went wrong reaching the news search API.
///
/// Recovered inside [`crate::news::NewsClient`]; callers only see the message.
#[derive(Error, Debug)]
pub enum NewsFetchError {
    #[error("no news API key configured")]
    MissingApiKey,

    #[error("news request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news API answered with status {0}")]
    Status(u16),

    #[error("malformed news response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
