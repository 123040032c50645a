//! HTTP transport errors.

use thiserror::Error;

/// Errors from the HTTP transport layer.
///
/// Any non-success status from either endpoint ends up here, next to the
/// network-level failures reported by `reqwest`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: u16,
        /// Response body text, or the status reason when the body is unreadable.
        message: String,
    },

    /// No response arrived within the configured timeout.
    #[error("Request timeout after {duration_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        duration_ms: u64,
    },

    /// Reading the event stream body failed part way through.
    #[error("Failed to read event stream: {0}")]
    StreamRead(#[source] std::io::Error),
}

impl ClientError {
    /// Returns `true` if this error is retryable.
    ///
    /// Timeouts and dropped streams are retryable, as are 5xx and 429
    /// responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::StreamRead(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
        }
    }

    /// Returns the HTTP status code if one is known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
