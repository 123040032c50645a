//! Streaming calls over Server-Sent-Events.

use std::io;

use async_stream::try_stream;
use futures::TryStreamExt;
use futures::stream::BoxStream;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, info_span, trace};

use super::cancel::{ensure_active, with_cancel};
use super::envelope::{CallEnvelope, validate_function_name};
use super::executor::{BamlRuntime, check_status};
use super::sse::{SseLine, classify_line};
use crate::error::{ClientError, RuntimeError, ValidationError};
use crate::function::BamlFunction;

/// Lazy, finite sequence of partial results.
///
/// The stream ends when the server sends `data: [DONE]` or closes the body.
/// It cannot be restarted; call again for a fresh sequence.
pub type BamlStream<'a, T> = BoxStream<'a, Result<T, RuntimeError>>;

impl BamlRuntime {
    /// Calls a remote function and yields its partial results as they arrive.
    ///
    /// Nothing is sent until the stream is first polled. Validation and
    /// transport failures surface as the first item, after which the stream
    /// ends. Cancelling `cancel` makes the next poll yield
    /// [`RuntimeError::Cancelled`]; items yielded before that stay valid.
    ///
    /// The connection is owned by the stream and released when it is
    /// exhausted, fails, is cancelled or is dropped.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// use futures::StreamExt;
    ///
    /// let mut parts = runtime.stream::<_, String>("Story", &params, None);
    /// while let Some(part) = parts.next().await {
    ///     println!("{}", part?);
    /// }
    /// ```
    pub fn stream<'a, P, T>(
        &'a self,
        function_name: &str,
        parameters: &P,
        cancel: Option<CancellationToken>,
    ) -> BamlStream<'a, T>
    where
        P: Serialize,
        T: DeserializeOwned + Send + 'a,
    {
        let span = stream_span(function_name, None);
        self.open_event_stream(function_name, parameters, cancel, span)
    }

    /// Streams the function described by a generated parameter struct.
    pub fn stream_function<F>(
        &self,
        parameters: &F,
        cancel: Option<CancellationToken>,
    ) -> BamlStream<'_, F::Output>
    where
        F: BamlFunction,
    {
        let span = stream_span(F::NAME, F::CLIENT);
        self.open_event_stream(F::NAME, parameters, cancel, span)
    }

    fn open_event_stream<'a, P, T>(
        &'a self,
        function_name: &str,
        parameters: &P,
        cancel: Option<CancellationToken>,
        span: Span,
    ) -> BamlStream<'a, T>
    where
        P: Serialize,
        T: DeserializeOwned + Send + 'a,
    {
        // Encode eagerly so the stream does not borrow the parameters.
        let prepared = validate_function_name(function_name)
            .and_then(|()| CallEnvelope::stream(function_name, parameters).encode());
        self.event_stream(
            prepared,
            function_name.to_string(),
            cancel.unwrap_or_default(),
            span,
        )
    }

    fn event_stream<'a, T>(
        &'a self,
        prepared: Result<Vec<u8>, RuntimeError>,
        function: String,
        token: CancellationToken,
        span: Span,
    ) -> BamlStream<'a, T>
    where
        T: DeserializeOwned + Send + 'a,
    {
        Box::pin(try_stream! {
            let body = prepared?;
            ensure_active(&token, &function)?;

            let response = with_cancel(
                Some(&token),
                &function,
                self.send_stream_request(body).instrument(span.clone()),
            )
            .await?;

            let reader = StreamReader::new(Box::pin(
                response.bytes_stream().map_err(io::Error::other),
            ));
            let mut lines = reader.lines();
            let mut yielded = 0usize;

            loop {
                ensure_active(&token, &function)?;

                let next = with_cancel(Some(&token), &function, async {
                    lines
                        .next_line()
                        .await
                        .map_err(|e| RuntimeError::from(ClientError::StreamRead(e)))
                })
                .await?;

                let Some(line) = next else {
                    span.in_scope(|| {
                        debug!(items = yielded, "event stream closed without [DONE] sentinel");
                    });
                    break;
                };

                match classify_line(&line) {
                    SseLine::Skip => continue,
                    SseLine::Done => {
                        span.in_scope(|| debug!(items = yielded, "event stream completed"));
                        break;
                    }
                    SseLine::Data(payload) => {
                        let value: serde_json::Value =
                            serde_json::from_str(payload).map_err(ValidationError::JsonParse)?;
                        if value.is_null() {
                            span.in_scope(|| trace!("skipping null partial result"));
                            continue;
                        }
                        let item: T =
                            serde_json::from_value(value).map_err(ValidationError::JsonParse)?;
                        yielded += 1;
                        yield item;
                    }
                }
            }
        })
    }

    /// Sends the streaming request. Only the response head is bounded by the
    /// timeout.
    async fn send_stream_request(&self, body: Vec<u8>) -> Result<reqwest::Response, RuntimeError> {
        Span::current().record("http.url", self.stream_url.as_str());
        let response = self
            .with_timeout(async {
                self.post_stream(body)
                    .send()
                    .await
                    .map_err(|e| self.transport_error(e))
            })
            .await?;
        check_status(response).await
    }
}

fn stream_span(function_name: &str, client: Option<&str>) -> Span {
    info_span!(
        "baml_stream",
        baml.function = %function_name,
        baml.client = client,
        http.url = tracing::field::Empty,
        http.status_code = tracing::field::Empty,
        otel.kind = "client",
        otel.status_code = tracing::field::Empty,
    )
}
