//! # econdash
//!
//! Economic indicators dashboard - a terminal client for a REST backend that
//! serves currency rates, inflation units and similar indicators.
//!
//! ## Features
//!
//! - **Typed API client**: every backend endpoint behind one `reqwest` client
//! - **Dashboard controller**: startup health check, initial load, selection
//!   and period changes, with stale responses discarded
//! - **Pluggable views**: view models plus a [`view::DashboardView`] trait;
//!   [`view::TerminalView`] renders to any writer
//! - **Text charts**: line charts on a character grid, oldest value first
//!
//! ## Modules
//!
//! - [`api`]: REST client and DTOs
//! - [`chart`]: Chart renderer and surfaces
//! - [`controller`]: Dashboard state machine
//! - [`view`]: View models and rendering targets
//! - [`session`]: Interactive command loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use econdash::{
//!     ClientConfig, DashboardConfig, DashboardController, IndicatorClient, TerminalView,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IndicatorClient::new(ClientConfig::new("http://localhost:5000/api"))?;
//!     let config = DashboardConfig::default();
//!     let view = TerminalView::new(std::io::stdout(), config.chart_width, config.chart_height);
//!
//!     let mut dashboard = DashboardController::new(Arc::new(client), view, &config);
//!     dashboard.start().await?;
//!     dashboard.load_indicator_chart("dolar").await;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod controller;
pub mod format;
pub mod logging;
pub mod session;
pub mod view;

// Re-export top-level types for convenience
pub use api::{
    ClientConfig, ClientError, HealthStatus, HistoryPoint, HistoryResponse, Indicator,
    IndicatorClient, IndicatorSource, LatestStats,
};

pub use chart::{ChartError, ChartRenderer, ChartSeries, ChartStyle, ChartSurface, TextSurface};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, LoadedConfig, LoggingConfig};

pub use controller::{
    ChartOutcome, ChartRequest, ChartStatus, DashboardController, DashboardError, DashboardState,
};

pub use view::{ChartPanel, DashboardModel, DashboardView, PageState, TerminalView};
