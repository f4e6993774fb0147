//! Streaming response consumer for long-running murmur backend operations.
//!
//! The backend emits results as a line-oriented event stream (`data: {...}`
//! lines over a chunked HTTP response). This crate reassembles events out of
//! arbitrarily-sized byte deliveries, dispatches them to caller-supplied
//! handlers, and settles exactly once per run — on a terminal event, a
//! transport failure, cancellation, or end-of-stream.
//!
//! ```rust
//! use mstream::{EventDecoder, StreamEvent};
//!
//! let mut decoder = EventDecoder::new();
//! let events = decoder.feed(b"data: {\"type\":\"chunk\",\"content\":\"hi\"}\n");
//! assert_eq!(events, vec![StreamEvent::Chunk("hi".into())]);
//! ```

mod callbacks;
mod consumer;
mod decoder;
mod error;
mod event;

pub use callbacks::StreamCallbacks;
pub use consumer::{
    BoxedByteStream, HttpStreamTransport, StreamConsumer, StreamFuture, StreamRequest,
    StreamTransport, VecByteStream,
};
pub use decoder::EventDecoder;
pub use error::{StreamError, StreamErrorKind};
pub use event::StreamEvent;

pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    pub use crate::{
        BoxedByteStream, CancellationToken, EventDecoder, HttpStreamTransport, StreamCallbacks,
        StreamConsumer, StreamError, StreamErrorKind, StreamEvent, StreamFuture, StreamRequest,
        StreamTransport, VecByteStream,
    };
}
