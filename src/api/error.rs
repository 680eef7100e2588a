//! Client Error Types
//!
//! Every failure talking to the indicators backend collapses into
//! [`ClientError`]; callers only need the message to show the user.

use thiserror::Error;

/// Errors that can occur when calling the indicators backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Backend not reachable (connection refused, DNS, ...)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Non-success HTTP status
    #[error("HTTP error {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the JSON we expected
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Any other transport error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClientError {
    /// Classify a reqwest error the same way for every endpoint
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable(e.to_string())
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Request(e)
        }
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 404 responses
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ClientError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 500: boom");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found() {
        let err = ClientError::Status {
            status: 404,
            message: "Indicador no encontrado".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(ClientError::Timeout.status(), None);
    }
}
