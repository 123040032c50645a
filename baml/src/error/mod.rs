//! Layered error types for the runtime client.
//!
//! The error hierarchy mirrors the failure modes of a remote function call:
//! - [`RuntimeError`] - Top-level error returned by every call
//! - [`ClientError`] - Transport failures (network, status codes, timeouts)
//! - [`ValidationError`] - Payload encoding and decoding failures
//! - [`ConfigError`] - Runtime configuration errors

mod client_error;
mod config_error;
mod runtime_error;
mod validation_error;

pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use runtime_error::RuntimeError;
pub use validation_error::ValidationError;
