//! HTTP client for the execution engine.
//!
//! [`BamlRuntime`] sends two kinds of request:
//!
//! - **Blocking** calls POST `{"functionName", "parameters"}` to the call
//!   endpoint and decode the JSON body as the result.
//! - **Streaming** calls add `"stream": true`, POST to the stream endpoint and
//!   decode each `data:` line of the Server-Sent-Events body until
//!   `data: [DONE]`.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use baml::{BamlRuntime, CancellationToken};
//!
//! let runtime = BamlRuntime::with_base_url("http://localhost:2024")?
//!     .api_key("sk-xxx")
//!     .build()?;
//!
//! let token = CancellationToken::new();
//! let answer: String = runtime
//!     .call("Answer", &serde_json::json!({ "question": "why?" }), Some(&token))
//!     .await?;
//! ```

mod cancel;
mod envelope;
mod executor;
mod sse;
mod stream;

pub use executor::{BamlRuntime, BamlRuntimeBuilder};
pub use stream::BamlStream;
