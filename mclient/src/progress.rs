//! Progress reporting contract and the chunk-count heuristic behind it.
//!
//! ```rust
//! use mclient::ProgressEstimator;
//!
//! let mut estimator = ProgressEstimator::for_input_len(1000);
//! assert_eq!(estimator.record(250), 25);
//! assert_eq!(estimator.record(250), 50);
//! ```

use serde_json::{Map, Value};

use crate::OperationKind;

/// Observer for operation lifecycle and streaming progress.
///
/// Implementations must tolerate zero, one, or many `on_progress` calls per
/// run and a metadata object that may be empty or partial. A cancelled run
/// ends without a `done` or `error` call.
pub trait ProgressReporter: Send + Sync {
    fn on_operation_start(&self, _kind: OperationKind) {}

    fn on_progress(&self, _kind: OperationKind, _percent: u8, _chars_seen: usize) {}

    fn on_operation_done(&self, _kind: OperationKind, _metadata: &Map<String, Value>) {}

    fn on_operation_error(&self, _kind: OperationKind, _message: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressReporter;

impl ProgressReporter for NoopProgressReporter {}

/// Floor for the expected output size, so tiny inputs do not leap to the
/// cap on their first chunk.
const MIN_EXPECTED_CHARS: usize = 256;

/// Estimates completion from accumulated output length.
///
/// The expectation is derived from the input size, so the percentage is a
/// display heuristic, never exact, and stays below 100 until the stream
/// settles.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEstimator {
    expected_chars: usize,
    seen_chars: usize,
}

impl ProgressEstimator {
    pub fn for_input_len(input_len: usize) -> Self {
        Self {
            expected_chars: input_len.max(MIN_EXPECTED_CHARS),
            seen_chars: 0,
        }
    }

    pub fn record(&mut self, chunk_len: usize) -> u8 {
        self.seen_chars += chunk_len;
        let percent = self.seen_chars * 100 / self.expected_chars;
        percent.min(99) as u8
    }

    pub fn chars_seen(&self) -> usize {
        self.seen_chars
    }
}
