//! Incremental event framing over arbitrarily-sized byte deliveries.
//!
//! ```rust
//! use mstream::{EventDecoder, StreamEvent};
//!
//! let mut decoder = EventDecoder::new();
//! assert!(decoder.feed(b"data: {\"typ").is_empty());
//!
//! let events = decoder.feed(b"e\":\"chunk\",\"content\":\"X\"}\n");
//! assert_eq!(events, vec![StreamEvent::Chunk("X".into())]);
//! ```

use crate::StreamEvent;

const DATA_PREFIX: &str = "data:";

/// Reassembles framed events out of a raw byte stream.
///
/// The buffer holds the trailing incomplete line between deliveries and is
/// owned by exactly one in-flight run. Lines are split on `\n` only, so a
/// delivery boundary may fall mid-codepoint or mid-payload. Lines without
/// the `data:` prefix and payloads that fail to decode are skipped. After a
/// terminal event the decoder is finished and ignores all further input.
#[derive(Debug, Default)]
pub struct EventDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feeds one delivery of bytes; returns every event completed by it, in
    /// stream order. A terminal event is always last in the returned batch.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        self.buffer.extend_from_slice(bytes);
        while let Some(newline_index) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line = self.buffer.drain(..=newline_index).collect::<Vec<u8>>();
            if self.decode_line(&line, &mut events) {
                break;
            }
        }

        events
    }

    /// Flushes the trailing unterminated line at end-of-stream, in case the
    /// producer omitted the final `\n`.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if self.finished {
            self.buffer.clear();
            return None;
        }

        let line = std::mem::take(&mut self.buffer);
        let mut events = Vec::new();
        self.decode_line(&line, &mut events);
        events.pop()
    }

    fn decode_line(&mut self, line: &[u8], events: &mut Vec<StreamEvent>) -> bool {
        let Ok(text) = std::str::from_utf8(line) else {
            tracing::debug!(event = "line_skipped", reason = "invalid_utf8");
            return false;
        };

        let text = text.trim();
        if !text.starts_with(DATA_PREFIX) {
            return false;
        }

        let payload = text.trim_start_matches(DATA_PREFIX).trim();
        match StreamEvent::decode(payload) {
            Some(event) => {
                let terminal = event.is_terminal();
                self.finished = terminal;
                events.push(event);
                terminal
            }
            None => {
                tracing::debug!(event = "line_skipped", reason = "malformed_payload");
                false
            }
        }
    }
}
