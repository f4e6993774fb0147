//! Production-friendly progress reporters for murmur backend operations.
//!
//! ```rust
//! use mobserve::{MetricsProgressReporter, SafeProgressReporter, TracingProgressReporter};
//!
//! let _reporter = SafeProgressReporter::new(TracingProgressReporter);
//! let _metrics = MetricsProgressReporter;
//! ```

mod metrics_reporter;
mod safe_reporter;
mod tracing_reporter;

pub use metrics_reporter::MetricsProgressReporter;
pub use safe_reporter::SafeProgressReporter;
pub use tracing_reporter::TracingProgressReporter;

pub mod prelude {
    pub use crate::{MetricsProgressReporter, SafeProgressReporter, TracingProgressReporter};
}
