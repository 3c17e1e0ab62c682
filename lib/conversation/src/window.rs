//! Conversation windowing.
//!
//! Stored history grows without bound; only the slice sent upstream is
//! capped, which bounds the token cost of each completion request.

use crate::message::Turn;

/// Default number of turns sent with each request.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Selects the most recent turns of a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationWindow {
    size: usize,
}

impl ConversationWindow {
    /// Creates a window of `size` turns. A size of zero is raised to one so
    /// the current user turn is always sent.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// Returns the window size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the last `size` turns, or the whole history if it is shorter.
    #[must_use]
    pub fn view<'a>(&self, history: &'a [Turn]) -> &'a [Turn] {
        let start = history.len().saturating_sub(self.size);
        &history[start..]
    }
}

impl Default for ConversationWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
