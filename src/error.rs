//! Error types for the Klarna client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for client operations
pub type KlarnaResult<T> = Result<T, KlarnaError>;

/// Klarna client error types
#[derive(Debug, Error)]
pub enum KlarnaError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Klarna answered with a non-2xx status
    #[error("Klarna API error {status}: {}", .error_code.as_deref().unwrap_or("UNKNOWN"))]
    Api {
        /// HTTP status code
        status: StatusCode,
        /// Klarna error code (e.g. `NOT_FOUND`)
        error_code: Option<String>,
        /// Human readable messages from Klarna
        error_messages: Vec<String>,
        /// Correlation ID for Klarna support
        correlation_id: Option<String>,
        /// Raw response body
        body: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is not a JSON object
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local rate limit exceeded
    #[error("Rate limit exceeded: {requests_per_second} requests/sec, burst {burst_size}")]
    RateLimitExceeded {
        /// Configured requests per second
        requests_per_second: u32,
        /// Configured burst capacity
        burst_size: u32,
    },
}

impl KlarnaError {
    /// Check if error is retryable
    ///
    /// The client itself never retries; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            KlarnaError::Http(_) | KlarnaError::RateLimitExceeded { .. } => true,
            KlarnaError::Api { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            KlarnaError::Api { status, .. } => Some(*status),
            KlarnaError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Check if error is due to rate limiting
    pub fn is_rate_limit(&self) -> bool {
        match self {
            KlarnaError::RateLimitExceeded { .. } => true,
            KlarnaError::Api { status, .. } => *status == StatusCode::TOO_MANY_REQUESTS,
            _ => false,
        }
    }
}
