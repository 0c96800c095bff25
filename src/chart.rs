//! Declarative chart descriptions.
//!
//! Builders are pure: they read a table and return a [`ChartSpec`] that a
//! rendering front end (plotly or similar) can draw as-is.

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    analysis::{industry_average_close, industry_volume_share},
    model::{CombinedRecord, Price},
};

pub const DARK_TEMPLATE: &str = "plotly_dark";
pub const PRICE_AXIS: &str = "Price (INR)";

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[display(fmt = "line")]
    Line,
    #[display(fmt = "candlestick")]
    Candlestick,
    #[display(fmt = "bar")]
    Bar,
    #[display(fmt = "pie")]
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Line {
        x: Vec<NaiveDate>,
        y: Vec<Price>,
    },
    Candlestick {
        x: Vec<NaiveDate>,
        open: Vec<Price>,
        high: Vec<Price>,
        low: Vec<Price>,
        close: Vec<Price>,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

impl Trace {
    pub fn len(&self) -> usize {
        match self {
            Trace::Line { x, .. } | Trace::Candlestick { x, .. } => x.len(),
            Trace::Bar { x, .. } => x.len(),
            Trace::Pie { labels, .. } => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub template: String,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    pub hover_mode: Option<String>,
    pub range_slider: bool,
    pub x_tick_angle: Option<i32>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            template: DARK_TEMPLATE.to_owned(),
            x_axis_title: None,
            y_axis_title: None,
            hover_mode: None,
            range_slider: true,
            x_tick_angle: None,
        }
    }
}

impl Layout {
    fn with_axes(mut self, x: &str, y: &str) -> Self {
        self.x_axis_title = Some(x.to_owned());
        self.y_axis_title = Some(y.to_owned());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    /// True when there is nothing to draw; front ends show a notice instead.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(Trace::is_empty)
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

fn dates(rows: &[CombinedRecord]) -> Vec<NaiveDate> {
    rows.iter().map(|r| r.date).collect()
}

pub fn price_line(rows: &[CombinedRecord], symbol: &str) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: format!("{symbol} Stock Price History"),
        traces: vec![Trace::Line {
            x: dates(rows),
            y: rows.iter().map(|r| r.close()).collect(),
        }],
        layout: Layout {
            hover_mode: Some("x unified".to_owned()),
            ..Layout::default().with_axes("Date", PRICE_AXIS)
        },
    }
}

pub fn candlestick(rows: &[CombinedRecord], symbol: &str) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Candlestick,
        title: format!("{symbol} Candlestick Chart"),
        traces: vec![Trace::Candlestick {
            x: dates(rows),
            open: rows.iter().map(|r| r.data.open).collect(),
            high: rows.iter().map(|r| r.data.high).collect(),
            low: rows.iter().map(|r| r.data.low).collect(),
            close: rows.iter().map(|r| r.data.close).collect(),
        }],
        layout: Layout {
            range_slider: false,
            ..Layout::default().with_axes("Date", PRICE_AXIS)
        },
    }
}

pub fn volume_bars(rows: &[CombinedRecord], symbol: &str) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: format!("{symbol} Trading Volume"),
        traces: vec![Trace::Bar {
            x: rows.iter().map(|r| r.date.to_string()).collect(),
            y: rows.iter().map(|r| r.volume() as f64).collect(),
        }],
        layout: Layout::default().with_axes("Date", "Volume"),
    }
}

/// Share of total traded volume per industry.
pub fn industry_share_pie(table: &[CombinedRecord]) -> ChartSpec {
    let (labels, values) = industry_volume_share(table)
        .into_iter()
        .map(|(industry, volume)| (industry, volume as f64))
        .unzip();

    ChartSpec {
        kind: ChartKind::Pie,
        title: "Market Share by Industry (Volume)".to_owned(),
        traces: vec![Trace::Pie { labels, values }],
        layout: Layout::default(),
    }
}

/// Average close per industry, highest first.
pub fn industry_average_bars(table: &[CombinedRecord]) -> ChartSpec {
    let (x, y) = industry_average_close(table).into_iter().unzip();

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Average Stock Price by Industry".to_owned(),
        traces: vec![Trace::Bar { x, y }],
        layout: Layout {
            x_tick_angle: Some(-45),
            ..Layout::default().with_axes("Industry", "Avg Price (INR)")
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        candlestick, industry_average_bars, industry_share_pie, price_line, volume_bars, ChartKind,
        Trace,
    };
    use crate::model::{CombinedRecord, DaySeriesData};

    fn record(symbol: &str, industry: &str, d: u32, close: f64, volume: u64) -> CombinedRecord {
        CombinedRecord {
            symbol: symbol.to_owned(),
            date: NaiveDate::from_ymd_opt(2020, 6, d).unwrap(),
            data: DaySeriesData {
                open: close - 1.0,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume,
            },
            company_name: None,
            industry: Some(industry.to_owned()),
        }
    }

    fn rows() -> Vec<CombinedRecord> {
        vec![
            record("TCS", "IT", 1, 100.0, 10),
            record("TCS", "IT", 2, 105.0, 20),
            record("ONGC", "ENERGY", 2, 300.0, 5),
        ]
    }

    #[test]
    fn unittest_price_charts() {
        let tcs = &rows()[..2];

        let line = price_line(tcs, "TCS");
        assert_eq!(line.kind, ChartKind::Line);
        assert_eq!(line.title, "TCS Stock Price History");
        assert_eq!(line.layout.hover_mode.as_deref(), Some("x unified"));
        assert_eq!(line.layout.y_axis_title.as_deref(), Some("Price (INR)"));
        match &line.traces[0] {
            Trace::Line { y, .. } => assert_eq!(y, &vec![100.0, 105.0]),
            other => panic!("unexpected trace: {other:?}"),
        }

        let candles = candlestick(tcs, "TCS");
        assert_eq!(candles.title, "TCS Candlestick Chart");
        assert!(!candles.layout.range_slider);
        assert_eq!(candles.traces[0].len(), 2);

        let volume = volume_bars(tcs, "TCS");
        assert_eq!(volume.title, "TCS Trading Volume");
        match &volume.traces[0] {
            Trace::Bar { x, y } => {
                assert_eq!(x, &vec!["2020-06-01".to_owned(), "2020-06-02".to_owned()]);
                assert_eq!(y, &vec![10.0, 20.0]);
            }
            other => panic!("unexpected trace: {other:?}"),
        }
    }

    #[test]
    fn unittest_industry_charts() {
        let pie = industry_share_pie(&rows());
        assert_eq!(pie.kind.to_string(), "pie");
        assert_eq!(
            pie.traces[0],
            Trace::Pie {
                labels: vec!["ENERGY".to_owned(), "IT".to_owned()],
                values: vec![5.0, 30.0],
            }
        );

        let bars = industry_average_bars(&rows());
        assert_eq!(bars.layout.x_tick_angle, Some(-45));
        assert_eq!(
            bars.traces[0],
            Trace::Bar {
                x: vec!["ENERGY".to_owned(), "IT".to_owned()],
                y: vec![300.0, 102.5],
            }
        );
    }

    #[test]
    fn unittest_empty_rows_give_empty_chart() -> eyre::Result<()> {
        let chart = price_line(&[], "TCS");

        assert!(chart.is_empty());
        assert_eq!(chart.to_json()?["traces"][0]["type"], "line");

        Ok(())
    }
}
