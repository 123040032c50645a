//! Top-level runtime error type.

use super::{ClientError, ConfigError, ValidationError};
use thiserror::Error;

/// Top-level error type for all runtime calls.
///
/// ## Examples
///
/// ```rust,ignore
/// use baml::RuntimeError;
///
/// fn handle_error(err: RuntimeError) {
///     match err {
///         RuntimeError::InvalidInput { reason } => eprintln!("Bad call: {reason}"),
///         RuntimeError::Client(e) => eprintln!("Transport error: {e}"),
///         RuntimeError::Validation(e) => eprintln!("Bad payload: {e}"),
///         RuntimeError::Config(e) => eprintln!("Configuration error: {e}"),
///         RuntimeError::Cancelled { function } => eprintln!("{function} cancelled"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The call was rejected before any network activity.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// Runtime configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transport errors (network, non-success status, timeout).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Payload errors (malformed JSON, null results).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller cancelled the call.
    #[error("Call to `{function}` was cancelled")]
    Cancelled {
        /// Name of the function whose call was cancelled.
        function: String,
    },
}

impl RuntimeError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn cancelled(function: impl Into<String>) -> Self {
        Self::Cancelled {
            function: function.into(),
        }
    }

    /// Returns `true` if the caller cancelled the call.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns `true` for transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Client(_))
    }

    /// Returns `true` for decoding failures, including null results.
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Validation(e) if e.is_parse_error())
    }

    /// Returns `true` if the call was rejected before any request was made.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
