//! Chart renderers for the sales dashboard
//!
//! Every renderer is a pure function from a table view plus parameters to a
//! chart artifact. Artifacts are plain data: the server turns them into
//! ECharts options for the browser, and tests inspect them directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod echarts;
mod format;
mod render;

pub use format::*;
pub use render::{category_bar, category_color, top_n, top_n_bar, trend_with_peak};

/// Line and bar color for ordinary entries
pub const BASE_COLOR: &str = "#87CEEB";
/// Peak marker and rank-one bar color
pub const HIGHLIGHT_COLOR: &str = "#FF5733";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("no rows to plot")]
    EmptyInput,

    #[error("value for '{label}' is not a finite number")]
    NonFiniteValue { label: String },

    #[error("top-N limit must be at least 1")]
    ZeroLimit,
}

/// Labels and formatting for a trend chart.
#[derive(Debug, Clone)]
pub struct TrendParams {
    pub title: String,
    pub y_label: String,
    pub series_label: String,
    pub peak_label: String,
    pub format: ValueFormat,
}

/// Labels, size and formatting for a horizontal bar chart.
#[derive(Debug, Clone)]
pub struct BarParams {
    pub title: String,
    pub x_label: String,
    pub limit: usize,
    pub format: ValueFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

/// A connected line over periods with the maximum point highlighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub title: String,
    pub y_label: String,
    pub series_label: String,
    pub peak_label: String,
    pub format: ValueFormat,
    pub points: Vec<TrendPoint>,
    /// Index into `points` of the first maximum
    pub peak_index: usize,
}

impl TrendChart {
    pub fn peak(&self) -> &TrendPoint {
        &self.points[self.peak_index]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: String,
    /// Formatted value drawn at the end of the bar
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Horizontal bars, ranked top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub format: ValueFormat,
    pub bars: Vec<Bar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Trend(TrendChart),
    Bar(BarChart),
}

impl Chart {
    pub fn format(&self) -> ValueFormat {
        match self {
            Chart::Trend(chart) => chart.format,
            Chart::Bar(chart) => chart.format,
        }
    }

    /// Legend entries drawn outside the plot, if any
    pub fn legend(&self) -> &[LegendEntry] {
        match self {
            Chart::Trend(_) => &[],
            Chart::Bar(chart) => &chart.legend,
        }
    }
}

impl From<TrendChart> for Chart {
    fn from(chart: TrendChart) -> Self {
        Chart::Trend(chart)
    }
}

impl From<BarChart> for Chart {
    fn from(chart: BarChart) -> Self {
        Chart::Bar(chart)
    }
}
