//! Strongly-typed ID types for chat-platform entities.
//!
//! Telegram identifies users and chats with signed 64-bit integers. Wrapping
//! them keeps a chat id from being passed where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a strongly-typed ID wrapper around a platform integer id.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an ID from the platform's raw integer id.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw integer id as used on the wire.
            #[must_use]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a chat-platform user; the session key.
    UserId,
    "usr"
);

define_id!(
    /// Identifier of the chat a reply is delivered to.
    ChatId,
    "chat"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display_format() {
        let id = UserId::new(42);
        assert_eq!(id.to_string(), "usr_42");
    }

    #[test]
    fn chat_id_keeps_negative_group_ids() {
        let id = ChatId::new(-100_123);
        assert_eq!(id.to_string(), "chat_-100123");
        assert_eq!(id.get(), -100_123);
    }

    #[test]
    fn id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&ChatId::new(99)).expect("serialize");
        assert_eq!(json, "99");
        let parsed: ChatId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, ChatId::new(99));
    }
}
