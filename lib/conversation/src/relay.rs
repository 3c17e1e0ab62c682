//! Reply relay.
//!
//! Turns a completion into transport-sized segments and folds the full reply
//! back into the session history. Lengths are counted in `char`s, so a chunk
//! boundary never falls inside a multi-byte character.

use crate::session::UserSession;
use serde::{Deserialize, Serialize};

/// Telegram's hard limit for a single text message.
pub const TRANSPORT_MESSAGE_LIMIT: usize = 4096;

/// Default segment size, kept just under the transport limit.
pub const DEFAULT_MAX_SEGMENT_CHARS: usize = 4090;

/// How an over-long reply is cut into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Maximal fixed-size chunks; every segment but the last is exactly full.
    #[default]
    Fixed,
    /// Prefer ending a segment at a paragraph, line, sentence or word break.
    WordBoundary,
}

/// One chunk of a reply, delivered as one transport message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundSegment {
    /// Segment text.
    pub text: String,
}

impl OutboundSegment {
    /// Returns the segment length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Splits replies and records them in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRelay {
    max_segment_chars: usize,
    mode: SplitMode,
}

impl ResponseRelay {
    /// Creates a relay producing segments of at most `max_segment_chars`.
    ///
    /// The size is clamped to `1..=TRANSPORT_MESSAGE_LIMIT`.
    #[must_use]
    pub fn new(max_segment_chars: usize) -> Self {
        Self {
            max_segment_chars: max_segment_chars.clamp(1, TRANSPORT_MESSAGE_LIMIT),
            mode: SplitMode::Fixed,
        }
    }

    /// Sets the split mode.
    #[must_use]
    pub fn with_mode(mut self, mode: SplitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the maximum segment size in characters.
    #[must_use]
    pub fn max_segment_chars(&self) -> usize {
        self.max_segment_chars
    }

    /// Splits a reply into ordered segments without overlap or loss.
    #[must_use]
    pub fn segments(&self, reply: &str) -> Vec<OutboundSegment> {
        if reply.chars().count() <= self.max_segment_chars {
            return vec![OutboundSegment {
                text: reply.to_string(),
            }];
        }

        let mut segments = Vec::new();
        let mut rest = reply;

        while !rest.is_empty() {
            let end = byte_offset_of_char(rest, self.max_segment_chars);
            let cut = match self.mode {
                SplitMode::Fixed => end,
                SplitMode::WordBoundary if end == rest.len() => end,
                SplitMode::WordBoundary => preferred_break(&rest[..end]).unwrap_or(end),
            };

            let (chunk, tail) = rest.split_at(cut);
            segments.push(OutboundSegment {
                text: chunk.to_string(),
            });
            rest = tail;
        }

        segments
    }

    /// Splits the reply, then stores the whole, unsplit reply as an
    /// assistant turn.
    pub fn relay(&self, session: &mut UserSession, reply: &str) -> Vec<OutboundSegment> {
        let segments = self.segments(reply);
        session.push_assistant_turn(reply);
        segments
    }
}

impl Default for ResponseRelay {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEGMENT_CHARS)
    }
}

/// Byte offset of the `n`th char, or the string length if it is shorter.
fn byte_offset_of_char(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}

/// Finds the latest natural break in `chunk`, returning the byte offset just
/// after the separator so the separator stays with the earlier segment.
fn preferred_break(chunk: &str) -> Option<usize> {
    ["\n\n", "\n", ". ", " "]
        .iter()
        .filter_map(|sep| chunk.rfind(sep).map(|pos| pos + sep.len()))
        .max()
}
