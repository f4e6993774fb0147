//! Optional per-event handlers dispatched by the stream consumer.
//!
//! ```rust
//! use mstream::StreamCallbacks;
//!
//! let _callbacks = StreamCallbacks::new()
//!     .on_start(|| println!("producing"))
//!     .on_chunk(|content| print!("{content}"));
//! ```

use serde_json::{Map, Value};

use crate::StreamEvent;

type StartHandler = Box<dyn FnMut() + Send>;
type ChunkHandler = Box<dyn FnMut(&str) + Send>;
type DoneHandler = Box<dyn FnMut(&Map<String, Value>) + Send>;
type ErrorHandler = Box<dyn FnMut(&str) + Send>;

/// Bag of optional event handlers for one run.
///
/// An absent handler drops its event kind silently. In-band error events
/// still fail the run whether or not an `on_error` handler is installed.
/// Handlers fire strictly in stream order, and `on_chunk` content is
/// meaningful only when concatenated in invocation order.
#[derive(Default)]
pub struct StreamCallbacks {
    on_start: Option<StartHandler>,
    on_chunk: Option<ChunkHandler>,
    on_done: Option<DoneHandler>,
    on_error: Option<ErrorHandler>,
}

impl StreamCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, handler: impl FnMut() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(handler));
        self
    }

    pub fn on_chunk(mut self, handler: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_chunk = Some(Box::new(handler));
        self
    }

    pub fn on_done(mut self, handler: impl FnMut(&Map<String, Value>) + Send + 'static) -> Self {
        self.on_done = Some(Box::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub(crate) fn dispatch(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Start => {
                if let Some(handler) = self.on_start.as_mut() {
                    handler();
                }
            }
            StreamEvent::Chunk(content) => {
                if let Some(handler) = self.on_chunk.as_mut() {
                    handler(content);
                }
            }
            StreamEvent::Done(metadata) => {
                if let Some(handler) = self.on_done.as_mut() {
                    handler(metadata);
                }
            }
            StreamEvent::Error(message) => {
                if let Some(handler) = self.on_error.as_mut() {
                    handler(message);
                }
            }
        }
    }
}

impl std::fmt::Debug for StreamCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_chunk", &self.on_chunk.is_some())
            .field("on_done", &self.on_done.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
