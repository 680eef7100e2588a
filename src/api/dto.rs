//! Data Transfer Objects
//!
//! Response types for the indicators backend.
//! These types are deserialized from the backend's JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// INDICATOR DTOs
// ============================================

/// An economic indicator with its most recent value
///
/// Returned by `GET /indicators` (as an array) and `GET /indicators/{code}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Indicator {
    /// Backend row id (not used for identity)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Indicator code, e.g. "dolar" or "uf"
    pub code: String,
    /// Display name
    pub name: String,
    /// Most recent value, if the indicator has any
    #[serde(default)]
    pub latest_value: Option<f64>,
    /// Date of the most recent value
    #[serde(default)]
    pub latest_date: Option<NaiveDate>,
    /// Unit: "CLP", "USD", "%"...
    #[serde(default)]
    pub unit: Option<String>,
}

impl Indicator {
    /// Create an indicator without a value
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            latest_value: None,
            latest_date: None,
            unit: None,
        }
    }

    /// Set the unit
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the latest value and its date
    pub fn latest(mut self, value: f64, date: NaiveDate) -> Self {
        self.latest_value = Some(value);
        self.latest_date = Some(date);
        self
    }
}

/// Indicator header embedded in a history response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndicatorRef {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
}

// ============================================
// HISTORY DTOs
// ============================================

/// A single historical value
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Response of `GET /indicators/{code}/history`
///
/// `values` are ordered newest-first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryResponse {
    pub indicator: IndicatorRef,
    #[serde(default)]
    pub values: Vec<HistoryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl HistoryResponse {
    /// True when the backend returned no values for the window
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================
// STATS / HEALTH DTOs
// ============================================

/// Latest value of one indicator in the stats payload
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LatestValue {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub value: f64,
    pub date: NaiveDate,
}

/// Response of `GET /stats/latest`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LatestStats {
    /// Server-side generation time (ISO 8601, no timezone)
    pub timestamp: String,
    #[serde(default)]
    pub indicators: Vec<LatestValue>,
    #[serde(default)]
    pub count: usize,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthStatus {
    /// "healthy" or "unhealthy"
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Error body returned by the backend on 4xx/5xx
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
