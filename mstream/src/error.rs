//! Stream error kinds and error value helpers.
//!
//! ```rust
//! use mstream::StreamError;
//!
//! let producer = StreamError::producer("model refused the request");
//! assert!(!producer.retryable);
//!
//! let connection = StreamError::connection("connection reset");
//! assert!(connection.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamErrorKind {
    Authentication,
    InvalidRequest,
    RateLimited,
    Timeout,
    /// The transport connection could not be established or maintained.
    Connection,
    Unavailable,
    /// An in-band error event sent by the producer.
    Producer,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamError {
    pub kind: StreamErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl StreamError {
    pub fn new(kind: StreamErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::Authentication, message, false)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::InvalidRequest, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::RateLimited, message, true)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::Timeout, message, true)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::Connection, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::Unavailable, message, true)
    }

    pub fn producer(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::Producer, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StreamErrorKind::Other, message, false)
    }
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for StreamError {}
