//! Indicators REST API Client
//!
//! HTTP client for the indicators backend. Every call is a plain GET that
//! either yields the decoded payload or a [`ClientError`]; nothing is retried
//! and nothing is cached.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{ErrorBody, HealthStatus, HistoryResponse, Indicator, LatestStats};
use super::error::ClientError;

/// Default backend base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Configuration for the indicators client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// Read-only source of indicator data
///
/// The controller only talks to the backend through this trait so it can be
/// driven by a fixture in tests.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Base URL shown to the user when the backend is unreachable
    fn base_url(&self) -> &str;

    async fn health(&self) -> Result<HealthStatus, ClientError>;

    async fn indicators(&self) -> Result<Vec<Indicator>, ClientError>;

    async fn history(&self, code: &str, days: u32) -> Result<HistoryResponse, ClientError>;
}

/// Indicators REST API client
pub struct IndicatorClient {
    client: Client,
    config: ClientConfig,
}

impl IndicatorClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let config = ClientConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET /indicators
    ///
    /// All indicators with their latest value.
    pub async fn fetch_indicators(&self) -> Result<Vec<Indicator>, ClientError> {
        self.get_json("/indicators", &[], "indicators").await
    }

    /// GET /indicators/{code}
    pub async fn fetch_indicator(&self, code: &str) -> Result<Indicator, ClientError> {
        let path = format!("/indicators/{}", urlencoding::encode(code));
        self.get_json(&path, &[], code).await
    }

    /// GET /indicators/{code}/history?days={days}
    ///
    /// Values come back newest-first.
    pub async fn fetch_indicator_history(
        &self,
        code: &str,
        days: u32,
    ) -> Result<HistoryResponse, ClientError> {
        self.history_request(code, days, None).await
    }

    /// GET /indicators/{code}/history?days={days}&limit={limit}
    pub async fn fetch_indicator_history_limited(
        &self,
        code: &str,
        days: u32,
        limit: u32,
    ) -> Result<HistoryResponse, ClientError> {
        self.history_request(code, days, Some(limit)).await
    }

    /// GET /stats/latest
    pub async fn fetch_latest_stats(&self) -> Result<LatestStats, ClientError> {
        self.get_json("/stats/latest", &[], "latest stats").await
    }

    /// GET /health
    pub async fn check_backend_health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json("/health", &[], "health").await
    }

    async fn history_request(
        &self,
        code: &str,
        days: u32,
        limit: Option<u32>,
    ) -> Result<HistoryResponse, ClientError> {
        let path = format!("/indicators/{}/history", urlencoding::encode(code));
        let mut query = vec![("days", days.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        self.get_json(&path, &query, code).await
    }

    /// Issue a GET and decode the JSON body, logging any failure
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, ClientError> {
        let result = self.send_get(path, query).await;

        if let Err(e) = &result {
            tracing::error!(target_path = %path, error = %e, "Error fetching {}", what);
        }

        result
    }

    async fn send_get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(url = %url, ?query, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| {
                    if text.trim().is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        text
                    }
                });

            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(ClientError::from_transport)
    }
}

#[async_trait]
impl IndicatorSource for IndicatorClient {
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.check_backend_health().await
    }

    async fn indicators(&self) -> Result<Vec<Indicator>, ClientError> {
        self.fetch_indicators().await
    }

    async fn history(&self, code: &str, days: u32) -> Result<HistoryResponse, ClientError> {
        self.fetch_indicator_history(code, days).await
    }
}
