//! Inbound event classification.
//!
//! Raw updates are reduced to the three things the bot reacts to: plain
//! text, slash commands and inline button presses.

use crate::types::Update;
use litbot_core::{ChatId, UserId};

/// A chat event the bot handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A plain text message.
    Text {
        user_id: UserId,
        chat_id: ChatId,
        text: String,
    },
    /// A `/command`; arguments and `@botname` suffixes are dropped.
    Command {
        user_id: UserId,
        chat_id: ChatId,
        name: String,
    },
    /// An inline button press.
    Callback {
        callback_id: String,
        user_id: UserId,
        chat_id: Option<ChatId>,
        data: String,
    },
}

impl InboundEvent {
    /// Returns the user the event came from.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Text { user_id, .. }
            | Self::Command { user_id, .. }
            | Self::Callback { user_id, .. } => *user_id,
        }
    }
}

/// Extracts the lowercase command name from `/name@bot args`.
fn command_name(text: &str) -> Option<String> {
    let rest = text.strip_prefix('/')?;
    let token = rest.split_whitespace().next().unwrap_or("");
    let name = token.split('@').next().unwrap_or("");
    (!name.is_empty()).then(|| name.to_lowercase())
}

impl Update {
    /// Classifies the update, or returns `None` for anything the bot ignores
    /// (non-text messages, messages without a sender, bare callbacks).
    #[must_use]
    pub fn into_event(self) -> Option<InboundEvent> {
        if let Some(query) = self.callback_query {
            return Some(InboundEvent::Callback {
                callback_id: query.id,
                user_id: UserId::new(query.from.id),
                chat_id: query.message.map(|m| ChatId::new(m.chat.id)),
                data: query.data?,
            });
        }

        let message = self.message?;
        let user_id = UserId::new(message.from?.id);
        let chat_id = ChatId::new(message.chat.id);
        let text = message.text?;

        match command_name(&text) {
            Some(name) => Some(InboundEvent::Command {
                user_id,
                chat_id,
                name,
            }),
            None => Some(InboundEvent::Text {
                user_id,
                chat_id,
                text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_update(text: Option<&str>) -> Update {
        serde_json::from_value(json!({
            "update_id": 1,
            "message": {
                "message_id": 3,
                "from": {"id": 7, "first_name": "Ivan"},
                "chat": {"id": 70},
                "text": text
            }
        }))
        .expect("decode")
    }

    #[test]
    fn plain_text_becomes_text_event() {
        let event = message_update(Some("Who was Gogol?")).into_event();
        assert_eq!(
            event,
            Some(InboundEvent::Text {
                user_id: UserId::new(7),
                chat_id: ChatId::new(70),
                text: "Who was Gogol?".to_string(),
            })
        );
    }

    #[test]
    fn slash_text_becomes_command_event() {
        let event = message_update(Some("/Stats@litbot extra args")).into_event();
        assert_eq!(
            event,
            Some(InboundEvent::Command {
                user_id: UserId::new(7),
                chat_id: ChatId::new(70),
                name: "stats".to_string(),
            })
        );
    }

    #[test]
    fn bare_slash_is_plain_text() {
        let event = message_update(Some("/")).into_event();
        assert!(matches!(event, Some(InboundEvent::Text { .. })));
    }

    #[test]
    fn non_text_message_is_ignored() {
        assert_eq!(message_update(None).into_event(), None);
    }

    #[test]
    fn callback_query_becomes_callback_event() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 2,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 7, "first_name": "Ivan"},
                "message": {"message_id": 9, "chat": {"id": 70}},
                "data": "fav:add"
            }
        }))
        .expect("decode");

        let event = update.into_event().expect("event");
        assert_eq!(event.user_id(), UserId::new(7));
        assert_eq!(
            event,
            InboundEvent::Callback {
                callback_id: "cb-1".to_string(),
                user_id: UserId::new(7),
                chat_id: Some(ChatId::new(70)),
                data: "fav:add".to_string(),
            }
        );
    }
}
