//! Request encoding and response decoding errors.

use thiserror::Error;

/// Errors while turning payloads into or out of JSON.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The response body (or a streamed chunk) is not valid JSON for the
    /// expected result type.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The request parameters could not be serialized.
    #[error("Failed to encode request parameters: {0}")]
    RequestEncoding(#[source] serde_json::Error),

    /// The execution engine answered with `null` where a result was expected.
    #[error("Function `{function}` returned a null result")]
    NullResult {
        /// Name of the function that was called.
        function: String,
    },
}

impl ValidationError {
    /// Returns `true` if the response payload could not be decoded.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::JsonParse(_) | Self::NullResult { .. })
    }
}
