use std::sync::{Arc, Mutex};

use mstream::prelude::*;
use serde_json::json;

#[derive(Debug)]
struct ScriptedTransport {
    chunks: Vec<Result<Vec<u8>, StreamError>>,
}

impl ScriptedTransport {
    fn new(chunks: Vec<Result<Vec<u8>, StreamError>>) -> Arc<Self> {
        Arc::new(Self { chunks })
    }

    fn from_lines(lines: &[&str]) -> Arc<Self> {
        Self::new(lines.iter().map(|line| Ok(line.as_bytes().to_vec())).collect())
    }
}

impl StreamTransport for ScriptedTransport {
    fn open<'a>(
        &'a self,
        _request: StreamRequest,
    ) -> StreamFuture<'a, Result<BoxedByteStream, StreamError>> {
        Box::pin(async move {
            Ok(Box::pin(VecByteStream::new(self.chunks.clone())) as BoxedByteStream)
        })
    }
}

#[derive(Debug, Default)]
struct CallbackLog {
    entries: Mutex<Vec<String>>,
}

impl CallbackLog {
    fn push(&self, entry: impl Into<String>) {
        self.entries.lock().expect("log lock").push(entry.into());
    }

    fn snapshot(&self) -> Vec<String> {
        self.entries.lock().expect("log lock").clone()
    }
}

fn logging_callbacks(log: &Arc<CallbackLog>) -> StreamCallbacks {
    StreamCallbacks::new()
        .on_start({
            let log = Arc::clone(log);
            move || log.push("start")
        })
        .on_chunk({
            let log = Arc::clone(log);
            move |content| log.push(format!("chunk:{content}"))
        })
        .on_done({
            let log = Arc::clone(log);
            move |metadata| {
                log.push(format!(
                    "done:{}",
                    serde_json::to_string(metadata).expect("metadata serializes")
                ))
            }
        })
        .on_error({
            let log = Arc::clone(log);
            move |message| log.push(format!("error:{message}"))
        })
}

fn request() -> StreamRequest {
    StreamRequest::new("https://backend.test/v1/edit-code", json!({"code": "fn main() {}"}))
}

#[tokio::test]
async fn full_stream_dispatches_callbacks_in_order() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"start\"}\n",
        "data: {\"type\":\"chunk\",\"content\":\"Hello\"}\n",
        "data: {\"type\":\"chunk\",\"content\":\", world\"}\n",
        "data: {\"type\":\"done\",\"lines\":2}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    let result = consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await;

    assert!(result.is_ok());
    assert_eq!(
        log.snapshot(),
        vec![
            "start",
            "chunk:Hello",
            "chunk:, world",
            "done:{\"lines\":2}",
        ]
    );
}

#[tokio::test]
async fn event_split_across_deliveries_parses_identically() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"typ",
        "e\":\"chunk\",\"content\":\"X\"}\n",
        "data: {\"type\":\"done\"}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await
        .expect("split delivery should still settle cleanly");

    assert_eq!(log.snapshot(), vec!["chunk:X", "done:{}"]);
}

#[tokio::test]
async fn malformed_line_is_skipped_without_interrupting_the_stream() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"a\"}\n",
        "data: not-json\n",
        "data: {\"type\":\"chunk\",\"content\":\"b\"}\n",
        "data: {\"type\":\"done\"}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await
        .expect("noise line must not abort the stream");

    assert_eq!(log.snapshot(), vec!["chunk:a", "chunk:b", "done:{}"]);
}

#[tokio::test]
async fn bytes_after_the_terminal_event_fire_no_callbacks() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"kept\"}\n",
        "data: {\"type\":\"done\"}\n",
        "data: {\"type\":\"chunk\",\"content\":\"late\"}\n",
        "data: {\"type\":\"error\",\"message\":\"late failure\"}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    let result = consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await;

    assert!(result.is_ok());
    assert_eq!(log.snapshot(), vec!["chunk:kept", "done:{}"]);
}

#[tokio::test]
async fn in_band_error_invokes_on_error_and_fails_the_run() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"partial\"}\n",
        "data: {\"type\":\"error\",\"message\":\"model overloaded\"}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    let error = consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await
        .expect_err("producer error must fail the run");

    assert_eq!(error.kind, StreamErrorKind::Producer);
    assert_eq!(error.message, "model overloaded");
    assert_eq!(log.snapshot(), vec!["chunk:partial", "error:model overloaded"]);
}

#[tokio::test]
async fn pre_cancelled_run_fires_no_callbacks() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"never\"}\n",
        "data: {\"type\":\"done\"}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = consumer.run(request(), logging_callbacks(&log), &cancel).await;

    assert!(result.is_ok());
    assert!(log.snapshot().is_empty());
}

#[tokio::test]
async fn cancelling_mid_burst_stops_further_callbacks() {
    // Everything arrives in a single delivery; the token fires from inside
    // the second chunk handler, so the done event buffered right behind it
    // must never be dispatched.
    let transport = ScriptedTransport::from_lines(&[concat!(
        "data: {\"type\":\"chunk\",\"content\":\"one\"}\n",
        "data: {\"type\":\"chunk\",\"content\":\"two\"}\n",
        "data: {\"type\":\"chunk\",\"content\":\"three\"}\n",
        "data: {\"type\":\"done\"}\n",
    )]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());
    let cancel = CancellationToken::new();

    let callbacks = StreamCallbacks::new()
        .on_chunk({
            let log = Arc::clone(&log);
            let cancel = cancel.clone();
            move |content| {
                log.push(format!("chunk:{content}"));
                if content == "two" {
                    cancel.cancel();
                }
            }
        })
        .on_done({
            let log = Arc::clone(&log);
            move |_| log.push("done")
        })
        .on_error({
            let log = Arc::clone(&log);
            move |message| log.push(format!("error:{message}"))
        });

    let result = consumer.run(request(), callbacks, &cancel).await;

    assert!(result.is_ok());
    assert!(cancel.is_cancelled());
    assert_eq!(log.snapshot(), vec!["chunk:one", "chunk:two"]);
}

#[tokio::test]
async fn stream_closing_without_terminal_event_resolves_successfully() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"partial\"}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    let result = consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await;

    assert!(result.is_ok());
    assert_eq!(log.snapshot(), vec!["chunk:partial"]);
}

#[tokio::test]
async fn trailing_line_without_newline_is_flushed_at_end_of_stream() {
    let transport =
        ScriptedTransport::from_lines(&["data: {\"type\":\"chunk\",\"content\":\"tail\"}"]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await
        .expect("flushed tail should settle cleanly");

    assert_eq!(log.snapshot(), vec!["chunk:tail"]);
}

#[tokio::test]
async fn trailing_terminal_line_without_newline_still_settles_the_run() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"body\"}\n",
        "data: {\"type\":\"done\",\"lines\":1}",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await
        .expect("trailing done should settle cleanly");

    assert_eq!(log.snapshot(), vec!["chunk:body", "done:{\"lines\":1}"]);
}

#[tokio::test]
async fn concurrent_runs_are_fully_independent() {
    let first = StreamConsumer::new(ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"alpha\"}\n",
        "data: {\"type\":\"done\"}\n",
    ]));
    let second = StreamConsumer::new(ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"beta\"}\n",
        "data: {\"type\":\"done\"}\n",
    ]));

    let first_log = Arc::new(CallbackLog::default());
    let second_log = Arc::new(CallbackLog::default());

    let first_token = CancellationToken::new();
    let second_token = CancellationToken::new();
    let (first_result, second_result) = tokio::join!(
        first.run(request(), logging_callbacks(&first_log), &first_token),
        second.run(request(), logging_callbacks(&second_log), &second_token),
    );

    assert!(first_result.is_ok());
    assert!(second_result.is_ok());
    assert_eq!(first_log.snapshot(), vec!["chunk:alpha", "done:{}"]);
    assert_eq!(second_log.snapshot(), vec!["chunk:beta", "done:{}"]);
}

#[tokio::test]
async fn empty_chunk_content_still_invokes_the_handler() {
    let transport = ScriptedTransport::from_lines(&[
        "data: {\"type\":\"chunk\",\"content\":\"\"}\n",
        "data: {\"type\":\"done\"}\n",
    ]);
    let consumer = StreamConsumer::new(transport);
    let log = Arc::new(CallbackLog::default());

    consumer
        .run(request(), logging_callbacks(&log), &CancellationToken::new())
        .await
        .expect("empty chunk should settle cleanly");

    assert_eq!(log.snapshot(), vec!["chunk:", "done:{}"]);
}
