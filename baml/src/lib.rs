//! Runtime client for generated BAML function clients.
//!
//! Generated code calls into [`BamlRuntime`], which forwards each function
//! call to a remote execution engine over HTTP and decodes the result. The
//! crate also defines the [`BamlFunction`] trait implemented by generated
//! parameter structs.
//!
//! ## Features
//!
//! - **Blocking and streaming calls**: one JSON POST per call, or a
//!   Server-Sent-Events stream of partial results
//! - **Cooperative cancellation**: every call accepts a [`CancellationToken`]
//! - **Layered error handling**: transport, payload, configuration and
//!   cancellation failures are distinct [`RuntimeError`] variants
//! - **Tracing**: each request runs in a client span carrying the function
//!   name, URL and status code
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use baml::BamlRuntimeBuilder;
//!
//! let runtime = Arc::new(BamlRuntimeBuilder::from_env()?.build()?);
//! let client = my_app::baml_client::BamlClient::from_shared(runtime);
//! ```

pub mod client;
pub mod error;
pub mod function;

// Re-exports for convenience
pub use client::{BamlRuntime, BamlRuntimeBuilder, BamlStream};
pub use error::{ClientError, ConfigError, RuntimeError, ValidationError};
pub use function::BamlFunction;
pub use tokio_util::sync::CancellationToken;
