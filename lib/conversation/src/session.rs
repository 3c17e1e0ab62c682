//! Per-user conversation sessions.
//!
//! A session aggregates the user's stored history, favorited topics and
//! usage counters. Sessions live in a [`SessionStore`](crate::SessionStore)
//! for the lifetime of the process.

use crate::message::Turn;
use chrono::{DateTime, Utc};
use litbot_core::UserId;
use serde::{Deserialize, Serialize};

/// Usage counters for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Inbound user text messages, counted before the completion call.
    pub message_count: u64,
    /// When the session was first created.
    pub joined_at: DateTime<Utc>,
    /// When the session was last touched through the store.
    pub last_active_at: DateTime<Utc>,
}

impl UsageStats {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            message_count: 0,
            joined_at: now,
            last_active_at: now,
        }
    }
}

/// Favorited writers or topics, deduplicated, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    /// Adds a topic unless an equal one is already present.
    ///
    /// Returns true if the topic was added.
    pub fn add(&mut self, topic: impl Into<String>) -> bool {
        let topic = topic.into();
        if self.contains(&topic) {
            return false;
        }
        self.0.push(topic);
        true
    }

    /// Returns true if the topic is already a favorite.
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.0.iter().any(|t| t == topic)
    }

    /// Returns the number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates favorites in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A user's conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    /// The user who owns this session.
    pub user_id: UserId,
    /// Every stored turn, oldest first.
    pub history: Vec<Turn>,
    /// Favorited topics.
    pub favorites: Favorites,
    /// Usage counters.
    pub stats: UsageStats,
}

impl UserSession {
    /// Creates an empty session for a user.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            history: Vec::new(),
            favorites: Favorites::default(),
            stats: UsageStats::new(),
        }
    }

    /// Records an inbound user message.
    ///
    /// Counts the message as an attempt; the count is never rolled back if the
    /// completion call later fails.
    pub fn push_user_turn(&mut self, text: impl Into<String>) {
        self.stats.message_count += 1;
        self.history.push(Turn::user(text));
    }

    /// Records a reply from the model.
    pub fn push_assistant_turn(&mut self, text: impl Into<String>) {
        self.history.push(Turn::assistant(text));
    }

    /// Drops the stored history, keeping favorites and stats.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Returns the most recent user turn, if any.
    #[must_use]
    pub fn last_user_turn(&self) -> Option<&Turn> {
        self.history.iter().rev().find(|t| t.is_user())
    }

    pub(crate) fn touch(&mut self) {
        self.stats.last_active_at = Utc::now();
    }

    /// Returns true if the session was not touched since `cutoff`.
    #[must_use]
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.stats.last_active_at < cutoff
    }
}
