//! Error types for wayback-cdx
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! End of a record sequence is never an error: the engine reports it as
//! `Ok(None)`.

use thiserror::Error;

/// The main error type for wayback-cdx
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Parameter Errors
    // ============================================================================
    #[error("Invalid value '{value}' for parameter '{name}', expected one of: {allowed}")]
    InvalidParameter {
        name: String,
        value: String,
        allowed: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Malformed CDX response: {message}")]
    MalformedResponse { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.into(),
            allowed: allowed.join(", "),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Failure while talking to the server (network, status, timeout)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::Timeout { .. } | Error::InvalidUrl(_)
        )
    }

    /// The server answered but the body could not be understood
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::MalformedResponse { .. } | Error::JsonParse(_) | Error::Arrow(_)
        )
    }
}

/// Result type alias for wayback-cdx
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_parameter("matchType", "invalid", &["exact", "prefix"]);
        assert_eq!(
            err.to_string(),
            "Invalid value 'invalid' for parameter 'matchType', expected one of: exact, prefix"
        );

        let err = Error::config("missing url");
        assert_eq!(err.to_string(), "Configuration error: missing url");

        let err = Error::http_status(503, "busy");
        assert_eq!(err.to_string(), "HTTP 503: busy");

        let err = Error::malformed("row 2 has 1 columns, header has 3");
        assert_eq!(
            err.to_string(),
            "Malformed CDX response: row 2 has 1 columns, header has 3"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::http_status(500, "").is_transport());
        assert!(Error::Timeout { timeout_ms: 10 }.is_transport());
        assert!(!Error::http_status(500, "").is_malformed());

        assert!(Error::malformed("bad").is_malformed());
        assert!(!Error::malformed("bad").is_transport());

        let err = Error::invalid_parameter("output", "csv", &["json"]);
        assert!(!err.is_transport());
        assert!(!err.is_malformed());
    }
}
