//! Metrics-based progress reporter for backend operations.
//!
//! ```rust
//! use mclient::ProgressReporter;
//! use mobserve::MetricsProgressReporter;
//!
//! fn accepts_reporter(_reporter: &dyn ProgressReporter) {}
//!
//! let reporter = MetricsProgressReporter;
//! accepts_reporter(&reporter);
//! ```

use mclient::{OperationKind, ProgressReporter};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsProgressReporter;

impl ProgressReporter for MetricsProgressReporter {
    fn on_operation_start(&self, kind: OperationKind) {
        metrics::counter!(
            "murmur_operation_start_total",
            "operation" => kind.to_string()
        )
        .increment(1);
    }

    fn on_progress(&self, kind: OperationKind, percent: u8, _chars_seen: usize) {
        metrics::histogram!(
            "murmur_operation_progress_percent",
            "operation" => kind.to_string()
        )
        .record(f64::from(percent));
    }

    fn on_operation_done(&self, kind: OperationKind, metadata: &Map<String, Value>) {
        metrics::counter!(
            "murmur_operation_done_total",
            "operation" => kind.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "murmur_operation_metadata_keys",
            "operation" => kind.to_string()
        )
        .record(metadata.len() as f64);
    }

    fn on_operation_error(&self, kind: OperationKind, _message: &str) {
        metrics::counter!(
            "murmur_operation_error_total",
            "operation" => kind.to_string()
        )
        .increment(1);
    }
}
