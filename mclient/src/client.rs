//! Backend client that drives operations over the streaming consumer.

use std::sync::{Arc, Mutex};

use mstream::{CancellationToken, StreamCallbacks, StreamConsumer, StreamRequest};
use serde_json::{Map, Value};

use crate::{
    ClientError, NoopProgressReporter, OperationKind, OperationOutcome, OperationRequest,
    ProgressEstimator, ProgressReporter,
};

/// Client for one murmur backend instance.
///
/// Each `execute` call owns its own connection and accumulators, so
/// independent operations may run concurrently against the same client.
pub struct BackendClient {
    consumer: StreamConsumer,
    base_url: String,
    api_token: Option<String>,
    reporter: Arc<dyn ProgressReporter>,
}

impl BackendClient {
    pub fn new(consumer: StreamConsumer, base_url: impl Into<String>) -> Self {
        Self {
            consumer,
            base_url: base_url.into(),
            api_token: None,
            reporter: Arc::new(NoopProgressReporter),
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Runs one operation to settlement and reconstructs its result.
    ///
    /// The returned text is the concatenation of streamed chunks in arrival
    /// order; metadata is present only when the producer sent a `done`
    /// event. A cancelled run returns `Ok` with whatever had accumulated;
    /// callers distinguish cancellation by checking their token.
    pub async fn execute(
        &self,
        request: OperationRequest,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, ClientError> {
        request.validate()?;

        let kind = request.kind;
        let text = Arc::new(Mutex::new(String::new()));
        let metadata = Arc::new(Mutex::new(None::<Map<String, Value>>));
        let estimator = Arc::new(Mutex::new(ProgressEstimator::for_input_len(
            request.code.len(),
        )));

        let mut stream_request =
            StreamRequest::new(self.endpoint(kind.endpoint_path()), request.to_payload());
        if let Some(token) = &self.api_token {
            stream_request = stream_request.with_bearer_token(token.clone());
        }

        let callbacks = StreamCallbacks::new()
            .on_start({
                let reporter = Arc::clone(&self.reporter);
                move || reporter.on_operation_start(kind)
            })
            .on_chunk({
                let reporter = Arc::clone(&self.reporter);
                let text = Arc::clone(&text);
                let estimator = Arc::clone(&estimator);
                move |content| {
                    if let Ok(mut text) = text.lock() {
                        text.push_str(content);
                    }

                    if let Ok(mut estimator) = estimator.lock() {
                        let percent = estimator.record(content.len());
                        reporter.on_progress(kind, percent, estimator.chars_seen());
                    }
                }
            })
            .on_done({
                let reporter = Arc::clone(&self.reporter);
                let metadata = Arc::clone(&metadata);
                move |map| {
                    if let Ok(mut metadata) = metadata.lock() {
                        *metadata = Some(map.clone());
                    }

                    reporter.on_operation_done(kind, map);
                }
            })
            .on_error({
                let reporter = Arc::clone(&self.reporter);
                move |message| reporter.on_operation_error(kind, message)
            });

        self.consumer.run(stream_request, callbacks, cancel).await?;

        let text = text
            .lock()
            .map_err(|_| ClientError::stream("result accumulator lock poisoned"))?
            .clone();
        let metadata = metadata
            .lock()
            .map_err(|_| ClientError::stream("metadata accumulator lock poisoned"))?
            .take();

        Ok(OperationOutcome { text, metadata })
    }

    pub async fn edit_code(
        &self,
        code: impl Into<String>,
        language: impl Into<String>,
        instruction: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, ClientError> {
        let request = OperationRequest::new(OperationKind::EditCode, code, language)
            .with_instruction(instruction);
        self.execute(request, cancel).await
    }

    pub async fn generate_tests(
        &self,
        code: impl Into<String>,
        language: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, ClientError> {
        self.execute(
            OperationRequest::new(OperationKind::GenerateTests, code, language),
            cancel,
        )
        .await
    }

    pub async fn generate_docs(
        &self,
        code: impl Into<String>,
        language: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, ClientError> {
        self.execute(
            OperationRequest::new(OperationKind::GenerateDocs, code, language),
            cancel,
        )
        .await
    }

    pub async fn suggest_refactors(
        &self,
        code: impl Into<String>,
        language: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, ClientError> {
        self.execute(
            OperationRequest::new(OperationKind::SuggestRefactors, code, language),
            cancel,
        )
        .await
    }

    pub async fn review_code(
        &self,
        code: impl Into<String>,
        language: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<OperationOutcome, ClientError> {
        self.execute(
            OperationRequest::new(OperationKind::ReviewCode, code, language),
            cancel,
        )
        .await
    }
}
