//! Tracing-based progress reporter for backend operations.
//!
//! ```rust
//! use mclient::ProgressReporter;
//! use mobserve::TracingProgressReporter;
//!
//! fn accepts_reporter(_reporter: &dyn ProgressReporter) {}
//!
//! let reporter = TracingProgressReporter;
//! accepts_reporter(&reporter);
//! ```

use mclient::{OperationKind, ProgressReporter};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressReporter;

impl ProgressReporter for TracingProgressReporter {
    fn on_operation_start(&self, kind: OperationKind) {
        tracing::info!(phase = "operation", event = "start", operation = %kind);
    }

    fn on_progress(&self, kind: OperationKind, percent: u8, chars_seen: usize) {
        tracing::debug!(
            phase = "operation",
            event = "progress",
            operation = %kind,
            percent,
            chars_seen
        );
    }

    fn on_operation_done(&self, kind: OperationKind, metadata: &Map<String, Value>) {
        tracing::info!(
            phase = "operation",
            event = "done",
            operation = %kind,
            metadata_keys = metadata.len()
        );
    }

    fn on_operation_error(&self, kind: OperationKind, message: &str) {
        tracing::error!(
            phase = "operation",
            event = "error",
            operation = %kind,
            error = message
        );
    }
}
