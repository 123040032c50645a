//! Runtime configuration errors.

use thiserror::Error;

/// Errors in runtime configuration, typically raised while building a
/// [`BamlRuntime`](crate::BamlRuntime).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required environment variable is not set.
    #[error("Missing environment variable: {var}")]
    MissingEnv {
        /// The variable name that was checked.
        var: &'static str,
    },

    /// The timeout value could not be parsed as whole seconds.
    #[error("Invalid timeout '{value}': expected whole seconds")]
    InvalidTimeout {
        /// The rejected value.
        value: String,
    },

    /// A default header name or value is not valid HTTP.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader {
        /// The header name as given.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigError {
    /// Creates a missing environment variable error.
    pub fn missing_env(var: &'static str) -> Self {
        Self::MissingEnv { var }
    }
}
