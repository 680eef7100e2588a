//! Indicators REST API
//!
//! Client side of the indicators backend.
//!
//! # Endpoints
//!
//! - `GET /indicators` - All indicators with their latest value
//! - `GET /indicators/{code}` - One indicator
//! - `GET /indicators/{code}/history?days=N[&limit=M]` - Values, newest-first
//! - `GET /stats/latest` - Latest value of every indicator
//! - `GET /health` - Backend liveness
//!
//! # Example
//!
//! ```rust,no_run
//! use econdash::api::{ClientConfig, IndicatorClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IndicatorClient::new(ClientConfig::new("http://localhost:5000/api"))?;
//!
//!     client.check_backend_health().await?;
//!     for indicator in client.fetch_indicators().await? {
//!         println!("{}: {:?}", indicator.code, indicator.latest_value);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod dto;
pub mod error;

pub use client::{ClientConfig, IndicatorClient, IndicatorSource, DEFAULT_API_BASE};
pub use dto::{
    HealthStatus, HistoryPoint, HistoryResponse, Indicator, IndicatorRef, LatestStats,
    LatestValue,
};
pub use error::ClientError;
