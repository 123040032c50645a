//! Runtime configuration and the blocking call.
//!
//! This module provides [`BamlRuntime`], the HTTP client that forwards
//! function calls to the execution engine, and its builder.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{Span, debug, instrument, warn};
use url::Url;

use super::cancel::with_cancel;
use super::envelope::{CallEnvelope, decode_result, validate_function_name};
use crate::error::{ClientError, ConfigError, RuntimeError};
use crate::function::BamlFunction;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_CALL_URL: &str = "BAML_CALL_URL";
const ENV_STREAM_URL: &str = "BAML_STREAM_URL";
const ENV_API_KEY: &str = "BAML_API_KEY";
const ENV_TIMEOUT_SECS: &str = "BAML_TIMEOUT_SECS";

/// Builder for configuring a [`BamlRuntime`].
#[derive(Debug)]
pub struct BamlRuntimeBuilder {
    call_url: String,
    stream_url: String,
    api_key: Option<String>,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl BamlRuntimeBuilder {
    fn new(call_url: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            call_url: call_url.into(),
            stream_url: stream_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }

    /// Creates a builder from `BAML_*` environment variables.
    ///
    /// | Variable | Required | Meaning |
    /// |----------|----------|---------|
    /// | `BAML_CALL_URL` | yes | Blocking endpoint |
    /// | `BAML_STREAM_URL` | yes | Streaming endpoint |
    /// | `BAML_API_KEY` | no | Bearer credential |
    /// | `BAML_TIMEOUT_SECS` | no | Timeout in whole seconds |
    ///
    /// ## Errors
    ///
    /// Returns an error if a required variable is missing or the timeout is
    /// not a whole number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let call_url = lookup(ENV_CALL_URL).ok_or(ConfigError::missing_env(ENV_CALL_URL))?;
        let stream_url = lookup(ENV_STREAM_URL).ok_or(ConfigError::missing_env(ENV_STREAM_URL))?;

        let mut builder = Self::new(call_url, stream_url);
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            builder = builder.api_key(key);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder)
    }

    /// Sets the bearer credential sent with every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the request timeout.
    ///
    /// Blocking calls must finish the whole exchange within this window.
    /// Streaming calls only need to receive the response head in time; the
    /// body may take as long as the server keeps sending.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// use std::time::Duration;
    ///
    /// let runtime = BamlRuntime::builder(call_url, stream_url)
    ///     .timeout(Duration::from_secs(120))
    ///     .build()?;
    /// ```
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidHeader {
            name: name.as_ref().to_string(),
            message,
        };
        let header_name = HeaderName::try_from(name.as_ref())
            .map_err(|e| invalid(format!("invalid header name: {e}")))?;
        let header_value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| invalid(format!("invalid header value: {e}")))?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Builds the [`BamlRuntime`].
    ///
    /// ## Errors
    ///
    /// Returns an error if either endpoint is not a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn build(self) -> Result<BamlRuntime, ConfigError> {
        let call_url = Url::parse(&self.call_url)?;
        let stream_url = Url::parse(&self.stream_url)?;

        let client = reqwest::Client::builder()
            .default_headers(self.default_headers)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ConfigError::HttpClient)?;

        debug!(
            call_url = %call_url,
            stream_url = %stream_url,
            timeout_ms = duration_ms(self.timeout),
            "built runtime client"
        );

        Ok(BamlRuntime {
            client,
            call_url,
            stream_url,
            api_key: self.api_key,
            timeout: self.timeout,
        })
    }
}

/// Async client for the execution engine.
///
/// One runtime owns one pooled `reqwest::Client` for its whole lifetime and
/// holds no other mutable state, so it can be shared behind an `Arc` and
/// used from many tasks at once.
///
/// ## Examples
///
/// ```rust,ignore
/// use baml::BamlRuntime;
///
/// let runtime = BamlRuntime::builder(
///     "http://localhost:2024/call",
///     "http://localhost:2024/stream",
/// )
/// .api_key("sk-xxx")
/// .build()?;
///
/// let summary: String = runtime
///     .call("Summarize", &serde_json::json!({ "text": "..." }), None)
///     .await?;
/// ```
pub struct BamlRuntime {
    client: reqwest::Client,
    call_url: Url,
    pub(super) stream_url: Url,
    api_key: Option<String>,
    pub(super) timeout: Duration,
}

impl fmt::Debug for BamlRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BamlRuntime")
            .field("call_url", &self.call_url.as_str())
            .field("stream_url", &self.stream_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BamlRuntime {
    /// Creates a new builder for the given blocking and streaming endpoints.
    pub fn builder(call_url: impl Into<String>, stream_url: impl Into<String>) -> BamlRuntimeBuilder {
        BamlRuntimeBuilder::new(call_url, stream_url)
    }

    /// Creates a builder whose endpoints are `<base>/call` and `<base>/stream`.
    ///
    /// ## Examples
    ///
    /// ```
    /// let runtime = baml::BamlRuntime::with_base_url("http://localhost:2024/v1")
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(runtime.call_url().as_str(), "http://localhost:2024/v1/call");
    /// assert_eq!(runtime.stream_url().as_str(), "http://localhost:2024/v1/stream");
    /// ```
    ///
    /// ## Errors
    ///
    /// Returns an error if `base` is not a valid URL.
    pub fn with_base_url(base: &str) -> Result<BamlRuntimeBuilder, ConfigError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let call_url = base.join("call")?;
        let stream_url = base.join("stream")?;
        Ok(BamlRuntimeBuilder::new(call_url, stream_url))
    }

    /// Creates a runtime with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if either endpoint is invalid.
    pub fn new(call_url: impl Into<String>, stream_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder(call_url, stream_url).build()
    }

    /// Returns the blocking endpoint.
    pub fn call_url(&self) -> &Url {
        &self.call_url
    }

    /// Returns the streaming endpoint.
    pub fn stream_url(&self) -> &Url {
        &self.stream_url
    }

    /// Returns the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Calls a remote function and waits for its complete result.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - `function_name` is empty (no request is made)
    /// - the exchange fails, times out or returns a non-success status
    /// - the body is not valid JSON for `T`, or is `null`
    /// - `cancel` fires before the exchange completes
    pub async fn call<P, T>(
        &self,
        function_name: &str,
        parameters: &P,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, RuntimeError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        self.execute_call(function_name, None, parameters, cancel).await
    }

    /// Calls the function described by a generated parameter struct.
    ///
    /// Behaves like [`call`](Self::call) and also records the declared
    /// backend as `baml.client` on the request span.
    pub async fn call_function<F>(
        &self,
        parameters: &F,
        cancel: Option<&CancellationToken>,
    ) -> Result<F::Output, RuntimeError>
    where
        F: BamlFunction,
    {
        self.execute_call(F::NAME, F::CLIENT, parameters, cancel).await
    }

    #[instrument(
        name = "baml_call",
        skip_all,
        fields(
            baml.function = %function_name,
            baml.client = client,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn execute_call<P, T>(
        &self,
        function_name: &str,
        client: Option<&str>,
        parameters: &P,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, RuntimeError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        validate_function_name(function_name)?;
        let body = CallEnvelope::call(function_name, parameters).encode()?;

        Span::current().record("http.url", self.call_url.as_str());

        let exchange = async {
            let response = self
                .post(&self.call_url, body)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;
            let response = check_status(response).await?;
            let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
            decode_result(function_name, &bytes)
        };

        with_cancel(cancel, function_name, self.with_timeout(exchange)).await
    }

    pub(super) fn post(&self, url: &Url, body: Vec<u8>) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    pub(super) fn post_stream(&self, body: Vec<u8>) -> reqwest::RequestBuilder {
        self.post(&self.stream_url, body)
            .header(ACCEPT, "text/event-stream")
    }

    /// Bounds `fut` by the configured timeout.
    pub(super) async fn with_timeout<T, Fut>(&self, fut: Fut) -> Result<T, RuntimeError>
    where
        Fut: Future<Output = Result<T, RuntimeError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error()),
        }
    }

    pub(super) fn transport_error(&self, err: reqwest::Error) -> RuntimeError {
        if err.is_timeout() {
            self.timeout_error()
        } else {
            ClientError::Request(err).into()
        }
    }

    fn timeout_error(&self) -> RuntimeError {
        Span::current().record("otel.status_code", "ERROR");
        ClientError::Timeout {
            duration_ms: duration_ms(self.timeout),
        }
        .into()
    }
}

/// Turns a non-success response into [`ClientError::HttpStatus`], recording
/// the outcome on the current span.
pub(super) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, RuntimeError> {
    let status = response.status();
    let status_code = status.as_u16();
    Span::current().record("http.status_code", status_code);

    if status.is_success() {
        Span::current().record("otel.status_code", "OK");
        return Ok(response);
    }

    let otel_status = if status.is_server_error() {
        "ERROR"
    } else {
        "UNSET"
    };
    Span::current().record("otel.status_code", otel_status);

    let message = match response.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => status.to_string(),
    };
    warn!(status = status_code, "execution engine returned an error status");

    Err(ClientError::HttpStatus {
        status: status_code,
        message,
    }
    .into())
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
