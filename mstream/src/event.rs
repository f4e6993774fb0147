//! Stream event union and its wire decoding.
//!
//! ```rust
//! use mstream::StreamEvent;
//!
//! let event = StreamEvent::decode(r#"{"type":"chunk","content":"hi"}"#).expect("valid payload");
//! assert_eq!(event, StreamEvent::Chunk("hi".into()));
//! assert!(!event.is_terminal());
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

/// A single decoded producer event.
///
/// Invariants for consumers:
/// - Events arrive in source order; `Chunk` contents are meaningful only
///   when concatenated in that order.
/// - `Done` and `Error` are terminal: at most one is honored per stream and
///   nothing is decoded after it.
/// - `Done` metadata is opaque side information (diff text, line counts,
///   summary statistics) and may be empty; it supplements the concatenated
///   chunk text, never replaces it.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Start,
    Chunk(String),
    Done(Map<String, Value>),
    Error(String),
}

impl StreamEvent {
    /// Decodes one framed JSON payload. `None` means the payload is noise
    /// (invalid JSON, missing or unknown `type`) and must be skipped.
    pub fn decode(payload: &str) -> Option<Self> {
        serde_json::from_str::<WireEvent>(payload)
            .ok()
            .map(Self::from)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Error(_))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireEvent {
    Start,
    Chunk {
        #[serde(default)]
        content: String,
    },
    Done {
        #[serde(flatten)]
        metadata: Map<String, Value>,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

impl From<WireEvent> for StreamEvent {
    fn from(value: WireEvent) -> Self {
        match value {
            WireEvent::Start => Self::Start,
            WireEvent::Chunk { content } => Self::Chunk(content),
            WireEvent::Done { mut metadata } => {
                // serde leaves the tag key visible to the flattened map.
                metadata.remove("type");
                Self::Done(metadata)
            }
            WireEvent::Error { message } => Self::Error(message),
        }
    }
}
