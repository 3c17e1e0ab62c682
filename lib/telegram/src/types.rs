//! Bot API wire types.
//!
//! Only the fields the bot reads or writes are modelled; serde ignores the
//! rest.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Method result on success.
    pub result: Option<T>,
    /// Human-readable error on failure.
    pub description: Option<String>,
}

/// One incoming update from `getUpdates`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    /// Monotonic update identifier, used as the polling offset.
    pub update_id: i64,
    /// New incoming message.
    pub message: Option<Message>,
    /// Inline button press.
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    /// Message identifier within the chat.
    pub message_id: i64,
    /// Sender; absent for channel posts.
    pub from: Option<User>,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Text of a text message.
    pub text: Option<String>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,
    /// True for bots.
    #[serde(default)]
    pub is_bot: bool,
    /// User's first name.
    #[serde(default)]
    pub first_name: String,
    /// User's username, if set.
    pub username: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,
}

/// A press of an inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallbackQuery {
    /// Query identifier, answered with `answerCallbackQuery`.
    pub id: String,
    /// Who pressed the button.
    pub from: User,
    /// Message the button was attached to.
    pub message: Option<Message>,
    /// The button's callback data.
    pub data: Option<String>,
}

/// Text formatting mode for outgoing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    /// Legacy Markdown.
    Markdown,
    /// MarkdownV2.
    MarkdownV2,
    /// HTML.
    #[serde(rename = "HTML")]
    Html,
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
    /// Button label.
    pub text: String,
    /// Data sent back in the callback query (at most 64 bytes).
    pub callback_data: String,
}

impl InlineButton {
    /// Creates a callback button.
    #[must_use]
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Inline keyboard attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
    /// Button rows.
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Creates a keyboard with one row holding one button.
    #[must_use]
    pub fn single(button: InlineButton) -> Self {
        Self {
            inline_keyboard: vec![vec![button]],
        }
    }
}

/// Body of `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboard>,
}

/// Body of `getUpdates`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: [&'static str; 2],
}

/// Body of `sendChatAction`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendChatAction {
    pub chat_id: i64,
    pub action: &'static str,
}

/// Body of `answerCallbackQuery`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_with_text_message_decodes() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "from": {"id": 42, "is_bot": false, "first_name": "Anna"},
                "chat": {"id": 42, "type": "private"},
                "text": "Tell me about Chekhov"
            }
        }))
        .expect("decode");

        let message = update.message.expect("message present");
        assert_eq!(message.from.map(|u| u.id), Some(42));
        assert_eq!(message.text.as_deref(), Some("Tell me about Chekhov"));
    }

    #[test]
    fn keyboard_serializes_as_bot_api_markup() {
        let keyboard = InlineKeyboard::single(InlineButton::new("⭐", "fav:add"));
        let json = serde_json::to_value(&keyboard).expect("serialize");
        assert_eq!(
            json,
            json!({"inline_keyboard": [[{"text": "⭐", "callback_data": "fav:add"}]]})
        );
    }

    #[test]
    fn send_message_omits_unset_options() {
        let body = SendMessage {
            chat_id: 5,
            text: "hi",
            parse_mode: None,
            reply_markup: None,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json, json!({"chat_id": 5, "text": "hi"}));

        let html = serde_json::to_value(ParseMode::Html).expect("serialize");
        assert_eq!(html, json!("HTML"));
    }
}
