use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{EventDecoder, StreamCallbacks, StreamError, StreamEvent};

pub type StreamFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Raw byte deliveries from an open streaming connection, in arrival order.
pub type BoxedByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, StreamError>> + Send>>;

/// One streaming request: endpoint, JSON payload, optional bearer token.
#[derive(Clone, PartialEq)]
pub struct StreamRequest {
    pub url: String,
    pub body: Value,
    pub bearer_token: Option<String>,
}

impl StreamRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            body,
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for StreamRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRequest")
            .field("url", &self.url)
            .field("body", &self.body)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Opens a long-lived chunked connection for one streaming request.
pub trait StreamTransport: Send + Sync {
    fn open<'a>(
        &'a self,
        request: StreamRequest,
    ) -> StreamFuture<'a, Result<BoxedByteStream, StreamError>>;
}

#[derive(Debug, Clone)]
pub struct HttpStreamTransport {
    client: Client,
}

impl HttpStreamTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn parse_error(response: Response) -> StreamError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("stream request failed with status {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StreamError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => StreamError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                StreamError::timeout(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                StreamError::invalid_request(message)
            }
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                StreamError::unavailable(message)
            }
            _ => StreamError::connection(message),
        }
    }
}

impl StreamTransport for HttpStreamTransport {
    fn open<'a>(
        &'a self,
        request: StreamRequest,
    ) -> StreamFuture<'a, Result<BoxedByteStream, StreamError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .post(&request.url)
                .header(ACCEPT, "text/event-stream")
                .header(CACHE_CONTROL, "no-cache")
                .json(&request.body);

            if let Some(token) = &request.bearer_token {
                builder = builder.bearer_auth(token);
            }

            let response = builder.send().await.map_err(|err| {
                if err.is_timeout() {
                    StreamError::timeout(err.to_string())
                } else {
                    StreamError::connection(err.to_string())
                }
            })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            let bytes = response.bytes_stream().map(|item| {
                item.map(|chunk| chunk.to_vec())
                    .map_err(|err| StreamError::connection(err.to_string()))
            });

            Ok(Box::pin(bytes) as BoxedByteStream)
        })
    }
}

/// Scripted byte deliveries for exercising the consumer without a network
/// connection.
#[derive(Debug)]
pub struct VecByteStream {
    chunks: VecDeque<Result<Vec<u8>, StreamError>>,
}

impl VecByteStream {
    pub fn new(chunks: Vec<Result<Vec<u8>, StreamError>>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }
}

impl Stream for VecByteStream {
    type Item = Result<Vec<u8>, StreamError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Vec<u8>, StreamError>>> {
        Poll::Ready(self.chunks.pop_front())
    }
}

/// Drives one streaming request to settlement, dispatching decoded events
/// to the caller's handlers.
pub struct StreamConsumer {
    transport: Arc<dyn StreamTransport>,
}

impl StreamConsumer {
    pub fn new(transport: Arc<dyn StreamTransport>) -> Self {
        Self { transport }
    }

    pub fn over_http(client: Client) -> Self {
        Self::new(Arc::new(HttpStreamTransport::new(client)))
    }

    /// Runs one stream to settlement. Settles exactly once:
    ///
    /// - in-band `done` → `on_done`, then `Ok(())`; remaining connection
    ///   output is ignored.
    /// - in-band `error` → `on_error`, then `Err` with kind `Producer`.
    /// - transport failure → `Err` without invoking `on_error` (that
    ///   handler is reserved for producer error events).
    /// - cancellation → `Ok(())` with no further handler calls; a cancelled
    ///   run never invokes `on_done` or `on_error`, and callers distinguish
    ///   it by checking the token they passed in.
    /// - end-of-stream without a terminal event → the trailing partial line
    ///   is decoded, then `Ok(())`. This is a leniency for producers that
    ///   close without a `done`; callers fall back to the concatenated
    ///   chunk text.
    ///
    /// The token is raced against chunk arrival and polled again before
    /// each dispatched event, so an abort neither waits for the next chunk
    /// boundary nor lets a buffered burst keep firing handlers. No timeout
    /// is imposed here; callers layer one through the same token.
    pub async fn run(
        &self,
        request: StreamRequest,
        mut callbacks: StreamCallbacks,
        cancel: &CancellationToken,
    ) -> Result<(), StreamError> {
        if cancel.is_cancelled() {
            return Ok(());
        }

        let mut chunks = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            opened = self.transport.open(request) => opened?,
        };

        let mut decoder = EventDecoder::new();

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                next = chunks.next() => next,
            };

            let Some(delivery) = next else { break };
            let bytes = delivery?;

            if let Some(settled) = dispatch_batch(decoder.feed(&bytes), &mut callbacks, cancel) {
                return settled;
            }
        }

        if let Some(event) = decoder.finish() {
            if let Some(settled) = dispatch_batch(vec![event], &mut callbacks, cancel) {
                return settled;
            }
        }

        Ok(())
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Dispatches one decoded batch in stream order. Returns `Some` when the
/// run settles: a terminal event or a mid-batch cancellation.
fn dispatch_batch(
    events: Vec<StreamEvent>,
    callbacks: &mut StreamCallbacks,
    cancel: &CancellationToken,
) -> Option<Result<(), StreamError>> {
    for event in events {
        if cancel.is_cancelled() {
            return Some(Ok(()));
        }

        callbacks.dispatch(&event);
        match event {
            StreamEvent::Done(_) => return Some(Ok(())),
            StreamEvent::Error(message) => return Some(Err(StreamError::producer(message))),
            StreamEvent::Start | StreamEvent::Chunk(_) => {}
        }
    }

    None
}
