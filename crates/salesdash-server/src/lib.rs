//! Sales dashboard server
//!
//! Loads the four summary tables once at startup and serves the dashboard
//! page, its JSON form, health and metrics over HTTP.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod page;
pub mod panels;
pub mod routes;

pub use config::{Config, ConfigError};
pub use metrics::Metrics;
pub use panels::{render, ChartOutcome, ChartSlot, Panel, PanelKind, PanelSet};
pub use routes::{router, AppState};
