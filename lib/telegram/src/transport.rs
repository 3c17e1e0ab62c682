//! Outbound transport abstraction.

use crate::error::TransportError;
use crate::types::{InlineKeyboard, ParseMode};
use async_trait::async_trait;
use litbot_core::ChatId;
use rootcause::prelude::Report;

/// Per-message delivery options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Formatting mode; plain text when unset.
    pub parse_mode: Option<ParseMode>,
    /// Inline buttons shown under the message.
    pub keyboard: Option<InlineKeyboard>,
}

impl SendOptions {
    /// Plain text without buttons.
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    /// Attaches an inline keyboard.
    #[must_use]
    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Sets the formatting mode.
    #[must_use]
    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = Some(parse_mode);
        self
    }
}

/// Delivers bot output to a chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends one text message.
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        options: &SendOptions,
    ) -> Result<(), Report<TransportError>>;

    /// Shows the "typing" indicator.
    async fn send_typing(&self, chat_id: ChatId) -> Result<(), Report<TransportError>>;

    /// Acknowledges an inline button press, optionally with a toast text.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), Report<TransportError>>;
}
