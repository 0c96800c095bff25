//! Request/response handler behind the dashboard page.
//!
//! A front end sends the current widget state as a [`DashboardRequest`] and
//! renders the returned [`DashboardView`]. News is fetched separately so a
//! slow search API never holds up the charts.

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    analysis::{
        date_bounds, distinct_industries, distinct_symbols, industry_of, KeyMetrics, StockEntry,
    },
    cache::{Table, TableCache},
    chart::{self, ChartSpec},
    config::DashboardConfig,
    filter::{filter, FilterCriteria},
    model::CombinedRecord,
    news::{NewsClient, NewsFeed},
};

/// Industry option that disables the industry restriction.
pub const ALL_INDUSTRIES: &str = "All";

#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceChartStyle {
    #[default]
    #[display(fmt = "Line")]
    Line,
    #[display(fmt = "Candlestick")]
    Candlestick,
}

/// Current state of the page controls. Anything left `None` takes its default:
/// all industries, the first listed stock, the full date range.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub industry: Option<String>,
    pub symbol: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub chart_style: PriceChartStyle,
}

impl DashboardRequest {
    pub fn with_industry(mut self, value: impl Into<String>) -> Self {
        self.industry = Some(value.into());
        self
    }

    pub fn with_symbol(mut self, value: impl Into<String>) -> Self {
        self.symbol = Some(value.into());
        self
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_chart_style(mut self, value: PriceChartStyle) -> Self {
        self.chart_style = value;
        self
    }

    fn industry_filter(&self) -> Option<&str> {
        self.industry
            .as_deref()
            .filter(|industry| *industry != ALL_INDUSTRIES)
    }
}

/// Everything shown for the selected stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPanel {
    pub symbol: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub rows: usize,
    pub metrics: Option<KeyMetrics>,
    pub price_chart: ChartSpec,
    pub volume_chart: ChartSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub industry_options: Vec<String>,
    pub selected_industry: String,
    pub stock_options: Vec<StockEntry>,
    /// Bounds for the date pickers.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub warnings: Vec<String>,
    /// `None` when the industry has no stocks.
    pub stock: Option<StockPanel>,
    pub industry_share: ChartSpec,
    pub industry_prices: ChartSpec,
}

pub struct Dashboard {
    table: Table,
    news: NewsClient,
}

impl Dashboard {
    pub fn new(table: Table, news: NewsClient) -> Self {
        Self { table, news }
    }

    /// Loads (or reuses) the table named by `config` and sets up the news
    /// client. A [`crate::error::LoadError`] inside the report means the
    /// session cannot start.
    pub fn open(config: &DashboardConfig, cache: &TableCache) -> eyre::Result<Self> {
        let table = cache.get_or_load(&config.data.price_path, &config.data.metadata_path)?;
        let news = NewsClient::new(config.news.clone())?;

        Ok(Self::new(table, news))
    }

    pub fn table(&self) -> &[CombinedRecord] {
        &self.table
    }

    pub fn view(&self, request: &DashboardRequest) -> DashboardView {
        let table = self.table();

        let mut industry_options = vec![ALL_INDUSTRIES.to_owned()];
        industry_options.extend(distinct_industries(table));

        let stock_options = match request.industry_filter() {
            Some(industry) => {
                distinct_symbols(&filter(table, &FilterCriteria::default().with_industry(industry)))
            }
            None => distinct_symbols(table),
        };

        let bounds = date_bounds(table);
        let start_date = request.start_date.or(bounds.map(|(min, _)| min));
        let end_date = request.end_date.or(bounds.map(|(_, max)| max));

        let mut warnings = Vec::new();

        let selected = request
            .symbol
            .as_deref()
            .and_then(|symbol| stock_options.iter().find(|s| s.symbol == symbol))
            .or_else(|| {
                if let Some(symbol) = &request.symbol {
                    warn!("Requested symbol {} is not listed, using the first option", symbol);
                }
                stock_options.first()
            });

        let stock = selected.map(|entry| {
            let mut criteria = FilterCriteria::default().with_symbol(&entry.symbol);
            criteria.start_date = start_date;
            criteria.end_date = end_date;

            if let Err(e) = criteria.check_range() {
                warnings.push(e.to_string());
            }

            self.stock_panel(entry, &criteria, request.chart_style)
        });

        DashboardView {
            industry_options,
            selected_industry: request
                .industry_filter()
                .unwrap_or(ALL_INDUSTRIES)
                .to_owned(),
            stock_options,
            date_bounds: bounds,
            start_date,
            end_date,
            warnings,
            stock,
            industry_share: chart::industry_share_pie(table),
            industry_prices: chart::industry_average_bars(table),
        }
    }

    fn stock_panel(
        &self,
        entry: &StockEntry,
        criteria: &FilterCriteria,
        style: PriceChartStyle,
    ) -> StockPanel {
        let rows = filter(self.table(), criteria);
        debug!("{} rows selected for {}", rows.len(), entry.symbol);

        let price_chart = match style {
            PriceChartStyle::Line => chart::price_line(&rows, &entry.symbol),
            PriceChartStyle::Candlestick => chart::candlestick(&rows, &entry.symbol),
        };

        StockPanel {
            symbol: entry.symbol.clone(),
            company_name: entry.company_name.clone(),
            industry: industry_of(self.table(), &entry.symbol).map(str::to_owned),
            rows: rows.len(),
            metrics: KeyMetrics::from_rows(&rows),
            price_chart,
            volume_chart: chart::volume_bars(&rows, &entry.symbol),
        }
    }

    /// Latest news for `symbol`; falls back to stand-in items with a warning.
    pub async fn news(&self, symbol: &str) -> NewsFeed {
        self.news.fetch_news(symbol).await
    }
}
