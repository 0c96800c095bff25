//! Stock news lookup through a search API, with an offline fallback.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{config::NewsSettings, error::NewsFetchError};

pub const PLACEHOLDER_LINK: &str = "#";
pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/100";

/// A normalized search result. Fields missing from the response stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub date: Option<String>,
    pub snippet: Option<String>,
    pub thumbnail: Option<String>,
}

/// What the caller renders: the items plus, when the lookup failed and the
/// items are stand-ins, a warning to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFeed {
    pub items: Vec<NewsItem>,
    pub warning: Option<String>,
}

impl NewsFeed {
    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}

pub struct NewsClient {
    http: reqwest::Client,
    settings: NewsSettings,
}

impl NewsClient {
    pub fn new(settings: NewsSettings) -> Result<Self, NewsFetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("nifty-dashboard/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .gzip(true)
            .build()?;

        Ok(Self { http, settings })
    }

    /// Looks up recent news for `query` (a ticker). Never fails: on any error
    /// the feed carries [`mock_news`] and a warning.
    pub async fn fetch_news(&self, query: &str) -> NewsFeed {
        match self.try_fetch(query).await {
            Ok(items) => {
                debug!("Fetched {} news items for {}", items.len(), query);
                NewsFeed {
                    items,
                    warning: None,
                }
            }
            Err(e) => {
                warn!("Failed to fetch news for {}: {}", query, e);
                NewsFeed {
                    items: mock_news(query),
                    warning: Some(format!("Failed to fetch news: {e}")),
                }
            }
        }
    }

    async fn try_fetch(&self, query: &str) -> Result<Vec<NewsItem>, NewsFetchError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(NewsFetchError::MissingApiKey)?;

        let search = format!("{query} stock news");
        let resp = self
            .http
            .get(&self.settings.endpoint)
            .query(&[
                ("engine", self.settings.engine.as_str()),
                ("q", search.as_str()),
                ("gl", self.settings.country.as_str()),
                ("hl", self.settings.language.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NewsFetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let json: Value =
            serde_json::from_str(&body).map_err(|e| NewsFetchError::Malformed(e.to_string()))?;

        normalize_response(&json, self.settings.max_results)
    }
}

/// Takes the first `limit` entries of `news_results`. A response without that
/// key has no news; one where it is not a list of objects is malformed.
pub fn normalize_response(json: &Value, limit: usize) -> Result<Vec<NewsItem>, NewsFetchError> {
    let Some(object) = json.as_object() else {
        return Err(NewsFetchError::Malformed("response is not an object".to_owned()));
    };

    let Some(results) = object.get("news_results") else {
        return Ok(Vec::new());
    };

    let results = results
        .as_array()
        .ok_or_else(|| NewsFetchError::Malformed("news_results is not a list".to_owned()))?;

    results.iter().take(limit).map(normalize_item).collect()
}

fn normalize_item(item: &Value) -> Result<NewsItem, NewsFetchError> {
    if !item.is_object() {
        return Err(NewsFetchError::Malformed(format!("unexpected news entry: {item}")));
    }

    let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_owned);

    Ok(NewsItem {
        title: text("title"),
        link: text("link"),
        // some engines nest the outlet as {"name": ..., "icon": ...}
        source: text("source").or_else(|| {
            item.get("source")
                .and_then(|s| s.get("name"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        }),
        date: text("date"),
        snippet: text("snippet"),
        thumbnail: text("thumbnail"),
    })
}

/// Fixed stand-in items, parameterized only by `query`.
pub fn mock_news(query: &str) -> Vec<NewsItem> {
    let item = |title: String, source: &str, date: &str, snippet: String| NewsItem {
        title: Some(title),
        link: Some(PLACEHOLDER_LINK.to_owned()),
        source: Some(source.to_owned()),
        date: Some(date.to_owned()),
        snippet: Some(snippet),
        thumbnail: Some(PLACEHOLDER_THUMBNAIL.to_owned()),
    };

    vec![
        item(
            format!("{query} reports strong Q3 earnings"),
            "Financial Times",
            "2 hours ago",
            format!("{query} has exceeded market expectations with a 15% rise in net profit..."),
        ),
        item(
            format!("Market analysis: Is {query} a buy right now?"),
            "Bloomberg",
            "5 hours ago",
            "Analysts are divided on the short-term outlook, but long-term fundamentals remain strong..."
                .to_owned(),
        ),
        item(
            format!("{query} announces new strategic partnership"),
            "Reuters",
            "1 day ago",
            "The company has entered into a joint venture to expand its footprint in the renewable energy sector..."
                .to_owned(),
        ),
    ]
}
