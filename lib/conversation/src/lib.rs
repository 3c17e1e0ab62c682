//! Conversation core for litbot.
//!
//! This crate provides:
//!
//! - **Session Store**: per-user history, favorites and usage stats
//! - **Conversation Window**: the bounded slice of history sent upstream
//! - **Response Relay**: transport-sized reply segments and history fold-back

pub mod message;
pub mod relay;
pub mod session;
pub mod store;
pub mod window;

pub use message::Turn;
pub use relay::{
    DEFAULT_MAX_SEGMENT_CHARS, OutboundSegment, ResponseRelay, SplitMode, TRANSPORT_MESSAGE_LIMIT,
};
pub use session::{Favorites, UsageStats, UserSession};
pub use store::{InMemorySessionStore, SessionStore};
pub use window::{ConversationWindow, DEFAULT_WINDOW_SIZE};
