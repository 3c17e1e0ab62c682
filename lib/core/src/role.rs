//! Conversation roles and supported languages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The originator of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human talking to the bot.
    User,
    /// The completion model.
    Assistant,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the persona and of every user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Russian.
    #[default]
    Ru,
    /// English.
    En,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).expect("serialize"), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).expect("serialize"),
            "\"assistant\""
        );
    }

    #[test]
    fn language_defaults_to_russian() {
        assert_eq!(Language::default(), Language::Ru);
        let parsed: Language = serde_json::from_str("\"en\"").expect("deserialize");
        assert_eq!(parsed, Language::En);
    }
}
