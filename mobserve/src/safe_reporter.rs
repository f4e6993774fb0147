use std::panic::{AssertUnwindSafe, catch_unwind};

use mclient::{OperationKind, ProgressReporter};
use serde_json::{Map, Value};

/// Panic-isolating wrapper: a misbehaving reporter must never break the
/// stream run that is driving it.
pub struct SafeProgressReporter<R> {
    inner: R,
}

impl<R> SafeProgressReporter<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R> ProgressReporter for SafeProgressReporter<R>
where
    R: ProgressReporter,
{
    fn on_operation_start(&self, kind: OperationKind) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_operation_start(kind)));
    }

    fn on_progress(&self, kind: OperationKind, percent: u8, chars_seen: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_progress(kind, percent, chars_seen)
        }));
    }

    fn on_operation_done(&self, kind: OperationKind, metadata: &Map<String, Value>) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_operation_done(kind, metadata)
        }));
    }

    fn on_operation_error(&self, kind: OperationKind, message: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_operation_error(kind, message)
        }));
    }
}
