//! Telegram Bot API client.
//!
//! Long-polls `getUpdates` for inbound events and implements
//! [`ChatTransport`] over `sendMessage`, `sendChatAction` and
//! `answerCallbackQuery`.

use crate::error::TransportError;
use crate::transport::{ChatTransport, SendOptions};
use crate::types::{
    AnswerCallbackQuery, ApiResponse, GetUpdates, SendChatAction, SendMessage, Update, User,
};
use async_trait::async_trait;
use litbot_core::ChatId;
use rootcause::prelude::Report;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default Bot API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Extra time the HTTP client waits beyond the long-poll timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// A bot token that never appears in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BotToken(String);

impl BotToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(***)")
    }
}

/// Bot API client.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    api_base: String,
    token: BotToken,
    client: reqwest::Client,
}

impl TelegramClient {
    /// Creates a client whose HTTP timeout covers a long poll of
    /// `poll_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        token: BotToken,
        poll_timeout: Duration,
    ) -> Result<Self, Report<TransportError>> {
        let client = reqwest::Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .build()
            .map_err(|e| TransportError::RequestFailed {
                method: "client".to_string(),
                details: e.to_string(),
            })?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token.0)
    }

    /// Calls a Bot API method and unwraps its result.
    async fn call<P, T>(&self, method: &str, payload: &P) -> Result<T, Report<TransportError>>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request_failed = |e: reqwest::Error| TransportError::RequestFailed {
            method: method.to_string(),
            // Errors can embed the request URL, which carries the token.
            details: e.without_url().to_string(),
        };

        let response = self
            .client
            .post(self.api_url(method))
            .json(payload)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(request_failed)?;

        let envelope: ApiResponse<T> =
            serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
                method: method.to_string(),
                details: e.to_string(),
            })?;

        if !envelope.ok {
            return Err(TransportError::Api {
                method: method.to_string(),
                status,
                description: envelope.description.unwrap_or_default(),
            }
            .into());
        }

        envelope.result.ok_or_else(|| {
            TransportError::Decode {
                method: method.to_string(),
                details: "missing result".to_string(),
            }
            .into()
        })
    }

    /// Verifies the token and returns the bot's own user.
    pub async fn get_me(&self) -> Result<User, Report<TransportError>> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-polls for updates after `offset`.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<Vec<Update>, Report<TransportError>> {
        let payload = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: ["message", "callback_query"],
        };
        self.call("getUpdates", &payload).await
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    #[instrument(skip(self, text, options), fields(chat_id = %chat_id, chars = text.chars().count()))]
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        options: &SendOptions,
    ) -> Result<(), Report<TransportError>> {
        let payload = SendMessage {
            chat_id: chat_id.get(),
            text,
            parse_mode: options.parse_mode,
            reply_markup: options.keyboard.as_ref(),
        };
        let _sent: serde_json::Value = self.call("sendMessage", &payload).await?;
        debug!("message sent");
        Ok(())
    }

    async fn send_typing(&self, chat_id: ChatId) -> Result<(), Report<TransportError>> {
        let payload = SendChatAction {
            chat_id: chat_id.get(),
            action: "typing",
        };
        let _ok: bool = self.call("sendChatAction", &payload).await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), Report<TransportError>> {
        let payload = AnswerCallbackQuery {
            callback_query_id: callback_id,
            text,
        };
        let _ok: bool = self.call("answerCallbackQuery", &payload).await?;
        Ok(())
    }
}

/// Tracks the `getUpdates` offset across polls.
#[derive(Debug)]
pub struct UpdatePoller {
    client: TelegramClient,
    offset: i64,
    timeout: Duration,
}

impl UpdatePoller {
    /// Creates a poller starting from the oldest pending update.
    #[must_use]
    pub fn new(client: TelegramClient, timeout: Duration) -> Self {
        Self {
            client,
            offset: 0,
            timeout,
        }
    }

    /// Returns the offset the next poll will use.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Fetches the next batch and acknowledges it by advancing the offset.
    pub async fn next_batch(&mut self) -> Result<Vec<Update>, Report<TransportError>> {
        let updates = self.client.get_updates(self.offset, self.timeout).await?;
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset = last + 1;
        }
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InlineButton, InlineKeyboard};
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TelegramClient {
        TelegramClient::new(server.uri(), BotToken::new("123:ABC"), Duration::from_secs(1))
            .expect("client builds")
    }

    #[test]
    fn api_url_embeds_token() {
        let client = TelegramClient::new(
            "https://api.telegram.org/",
            BotToken::new("123:ABC"),
            Duration::from_secs(30),
        )
        .expect("client builds");
        assert_eq!(
            client.api_url("getMe"),
            "https://api.telegram.org/bot123:ABC/getMe"
        );
    }

    #[test]
    fn token_is_redacted_in_debug() {
        let rendered = format!("{:?}", BotToken::new("123:SECRET"));
        assert!(!rendered.contains("SECRET"));
    }

    #[tokio::test]
    async fn poller_advances_offset_past_last_update() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/getUpdates"))
            .and(body_partial_json(json!({"offset": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    {"update_id": 41, "message": {"message_id": 1, "from": {"id": 5}, "chat": {"id": 5}, "text": "hi"}},
                    {"update_id": 42, "callback_query": {"id": "q", "from": {"id": 5}, "data": "fav:add"}}
                ]
            })))
            .mount(&server)
            .await;

        let mut poller = UpdatePoller::new(client(&server), Duration::from_secs(1));
        let updates = poller.next_batch().await.expect("poll succeeds");

        assert_eq!(updates.len(), 2);
        assert_eq!(poller.offset(), 43);
    }

    #[tokio::test]
    async fn empty_poll_keeps_offset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/getUpdates"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": []})),
            )
            .mount(&server)
            .await;

        let mut poller = UpdatePoller::new(client(&server), Duration::from_secs(1));
        assert!(poller.next_batch().await.expect("poll succeeds").is_empty());
        assert_eq!(poller.offset(), 0);
    }

    #[tokio::test]
    async fn send_text_posts_message_with_keyboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_json(json!({
                "chat_id": 77,
                "text": "Chekhov wrote plays.",
                "reply_markup": {"inline_keyboard": [[{"text": "⭐", "callback_data": "fav:add"}]]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 1, "chat": {"id": 77}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options =
            SendOptions::plain().with_keyboard(InlineKeyboard::single(InlineButton::new("⭐", "fav:add")));
        client(&server)
            .send_text(ChatId::new(77), "Chekhov wrote plays.", &options)
            .await
            .expect("send succeeds");
    }

    #[tokio::test]
    async fn api_rejection_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendChatAction"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .send_typing(ChatId::new(1))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("blocked by the user"));
    }
}
