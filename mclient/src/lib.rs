//! Operation client for the murmur AI backend.
//!
//! Wraps the streaming consumer with the five long-running backend
//! operations, accumulating chunk text into a final result and reporting
//! heuristic progress while the stream is live.
//!
//! ```rust
//! use mclient::{OperationKind, OperationRequest};
//!
//! let request = OperationRequest::new(OperationKind::EditCode, "fn main() {}", "rust")
//!     .with_instruction("add a greeting");
//! assert!(request.validate().is_ok());
//! assert_eq!(OperationKind::EditCode.endpoint_path(), "v1/edit-code");
//! ```

mod client;
mod error;
mod operations;
mod progress;
mod types;

pub use client::BackendClient;
pub use error::{ClientError, ClientErrorKind};
pub use operations::OperationKind;
pub use progress::{NoopProgressReporter, ProgressEstimator, ProgressReporter};
pub use types::{OperationOutcome, OperationRequest};

pub mod prelude {
    pub use crate::{
        BackendClient, ClientError, ClientErrorKind, NoopProgressReporter, OperationKind,
        OperationOutcome, OperationRequest, ProgressEstimator, ProgressReporter,
    };
    pub use mstream::CancellationToken;
}
