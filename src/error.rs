//! Error types for the dashboard core
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Data-shape problems never surface here; only configuration, network
//! and auth failures do.

use thiserror::Error;

/// The main error type for the dashboard core
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // Aggregation Errors
    // ============================================================================
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("Screen '{screen}' not found")]
    ScreenNotFound { screen: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    /// Failures at the process edge (binding, serving), with their cause chain
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// A paged fetch aborted part-way through.
///
/// The records fetched before the failure are still handed back to the
/// caller alongside this error; `partial_count` says how many there were.
#[derive(Error, Debug)]
#[error("aggregation aborted after {pages_fetched} page(s) with {partial_count} record(s): {source}")]
pub struct AggregationError {
    /// Pages that were fetched successfully before the failure
    pub pages_fetched: u32,
    /// Records accumulated before the failure
    pub partial_count: usize,
    /// The request failure that stopped the loop
    #[source]
    pub source: Box<Error>,
}

impl AggregationError {
    /// Create an aggregation error wrapping a request failure
    pub fn new(pages_fetched: u32, partial_count: usize, source: Error) -> Self {
        Self {
            pages_fetched,
            partial_count,
            source: Box::new(source),
        }
    }

    /// HTTP status of the underlying failure, if it was a status error
    pub fn status(&self) -> Option<u16> {
        match self.source.as_ref() {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            message: message.into(),
        }
    }

    /// Create a screen-not-found error
    pub fn screen_not_found(screen: impl Into<String>) -> Self {
        Self::ScreenNotFound {
            screen: screen.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Error::HttpStatus { status, message } => {
                if message.is_empty() {
                    format!("Request failed with status {status}")
                } else {
                    message.clone()
                }
            }
            Error::Aggregation(e) => e.source.user_message(),
            Error::Timeout { .. } | Error::Http(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the dashboard core
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("base_url");
        assert_eq!(err.to_string(), "Missing required config field: base_url");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(401, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_aggregation_error_carries_partial_count() {
        let err = AggregationError::new(1, 9, Error::http_status(503, "Service unavailable"));
        assert_eq!(err.partial_count, 9);
        assert_eq!(err.pages_fetched, 1);
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("9 record(s)"));

        let wrapped: Error = err.into();
        assert_eq!(wrapped.user_message(), "Service unavailable");
    }

    #[test]
    fn test_user_message_fallback() {
        let err = Error::Timeout { timeout_ms: 10_000 };
        assert_eq!(
            err.user_message(),
            "Something went wrong. Please try again."
        );
        let err = Error::http_status(500, "");
        assert_eq!(err.user_message(), "Request failed with status 500");
    }

    #[test]
    fn test_anyhow_passthrough() {
        let err: Error = anyhow::anyhow!("listener closed").into();
        assert_eq!(err.to_string(), "listener closed");

        let err: Error = anyhow::Context::context(
            Err::<(), _>(std::io::Error::other("address in use")),
            "Failed to bind to port 8080",
        )
        .unwrap_err()
        .into();
        assert_eq!(
            err.to_string(),
            "Failed to bind to port 8080: address in use"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
