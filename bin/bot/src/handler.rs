//! Inbound event handling.
//!
//! [`Bot`] ties the session store, the completion backend and the chat
//! transport together. Every event is handled independently; the store's
//! per-user lock is the only synchronization, and it is never held across
//! the completion call.

use crate::command::Command;
use crate::config::{BotConfig, FeatureFlags};
use crate::texts::Texts;
use litbot_ai::{
    ChatMessage, CompletionBackend, CompletionRequest, SamplingConfig, system_instruction,
};
use litbot_conversation::{
    ConversationWindow, OutboundSegment, ResponseRelay, SessionStore, UserSession,
};
use litbot_core::{ChatId, UserId};
use litbot_telegram::{ChatTransport, InboundEvent, InlineButton, InlineKeyboard, SendOptions};
use tracing::{debug, info, instrument, warn};

/// Callback data of the "add to favorites" button.
pub const FAVORITE_ADD: &str = "fav:add";

/// Longest favorite topic, in characters.
const MAX_FAVORITE_CHARS: usize = 100;

/// Everything the handler needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// System instruction sent with every request.
    pub persona: &'static str,
    /// Sampling options for every request.
    pub sampling: SamplingConfig,
    /// History window.
    pub window: ConversationWindow,
    /// Reply splitter.
    pub relay: ResponseRelay,
    /// Optional commands.
    pub features: FeatureFlags,
    /// User-facing texts.
    pub texts: &'static Texts,
}

impl HandlerSettings {
    /// Resolves handler settings from the bot configuration.
    #[must_use]
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            persona: system_instruction(config.language),
            sampling: config.sampling(),
            window: config.window(),
            relay: config.relay(),
            features: config.features,
            texts: Texts::for_language(config.language),
        }
    }
}

/// Result of pressing the favorite button.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FavoriteOutcome {
    Added,
    AlreadyPresent,
    NothingToAdd,
}

/// Adds the user's latest question to their favorites.
fn favorite_last_question(session: &mut UserSession) -> FavoriteOutcome {
    let Some(turn) = session.last_user_turn() else {
        return FavoriteOutcome::NothingToAdd;
    };

    let topic: String = turn.content.trim().chars().take(MAX_FAVORITE_CHARS).collect();
    if topic.is_empty() {
        return FavoriteOutcome::NothingToAdd;
    }

    if session.favorites.add(topic) {
        FavoriteOutcome::Added
    } else {
        FavoriteOutcome::AlreadyPresent
    }
}

/// The message handler.
#[derive(Debug)]
pub struct Bot<S, B, T> {
    store: S,
    backend: B,
    transport: T,
    settings: HandlerSettings,
}

impl<S, B, T> Bot<S, B, T>
where
    S: SessionStore,
    B: CompletionBackend,
    T: ChatTransport,
{
    /// Creates a handler.
    #[must_use]
    pub fn new(store: S, backend: B, transport: T, settings: HandlerSettings) -> Self {
        Self {
            store,
            backend,
            transport,
            settings,
        }
    }

    /// Returns the session store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles one inbound event to completion.
    ///
    /// Failures are logged and, where the user is waiting for an answer,
    /// reported to them; nothing is propagated.
    #[instrument(skip_all, fields(user_id = %event.user_id()))]
    pub async fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::Text {
                user_id,
                chat_id,
                text,
            } => self.handle_text(user_id, chat_id, text).await,
            InboundEvent::Command {
                user_id,
                chat_id,
                name,
            } => {
                self.handle_command(user_id, chat_id, Command::parse(&name))
                    .await;
            }
            InboundEvent::Callback {
                callback_id,
                user_id,
                data,
                ..
            } => self.handle_callback(user_id, &callback_id, &data).await,
        }
    }

    /// Answers a plain text message with a model reply.
    pub async fn handle_text(&self, user_id: UserId, chat_id: ChatId, text: String) {
        let settings = &self.settings;
        let messages: Vec<ChatMessage> = self
            .store
            .update(user_id, move |session| {
                session.push_user_turn(text);
                settings
                    .window
                    .view(&session.history)
                    .iter()
                    .map(|turn| ChatMessage::new(turn.role, turn.content.clone()))
                    .collect()
            })
            .await;

        if let Err(report) = self.transport.send_typing(chat_id).await {
            debug!(%chat_id, error = %report, "typing indicator failed");
        }

        let request = CompletionRequest::build(settings.persona, messages, &settings.sampling);

        let response = match self.backend.complete(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%user_id, error = %err, "completion failed");
                let apology = settings.texts.apology(err.apology());
                self.send(chat_id, apology, &SendOptions::plain()).await;
                return;
            }
        };

        let relay = settings.relay;
        let segments = self
            .store
            .update(user_id, move |session| {
                relay.relay(session, &response.content)
            })
            .await;

        info!(%user_id, segments = segments.len(), "relaying reply");
        self.deliver(chat_id, &segments).await;
    }

    /// Sends segments in order; the last one carries the favorite button.
    async fn deliver(&self, chat_id: ChatId, segments: &[OutboundSegment]) {
        let last = segments.len().saturating_sub(1);
        for (index, segment) in segments.iter().enumerate() {
            let options = if index == last && self.settings.features.favorites {
                SendOptions::plain().with_keyboard(InlineKeyboard::single(InlineButton::new(
                    self.settings.texts.favorite_button,
                    FAVORITE_ADD,
                )))
            } else {
                SendOptions::plain()
            };

            if !self.send(chat_id, &segment.text, &options).await {
                // Never deliver a segment after a gap.
                break;
            }
        }
    }

    async fn handle_command(&self, user_id: UserId, chat_id: ChatId, command: Command) {
        let texts = self.settings.texts;
        let features = self.settings.features;

        let reply = match command {
            Command::Start => {
                self.store.get_or_create(user_id).await;
                texts.greeting(features)
            }
            Command::Clear => {
                self.store.clear(user_id).await;
                info!(%user_id, "history cleared");
                texts.cleared.to_string()
            }
            Command::Help => texts.help(features),
            Command::Stats if features.stats => {
                let session = self.store.get_or_create(user_id).await;
                texts.stats(
                    &session.stats,
                    session.history.len(),
                    session.favorites.len(),
                )
            }
            Command::Favorites if features.favorites => {
                let session = self.store.get_or_create(user_id).await;
                texts.favorites(&session.favorites)
            }
            Command::Stats | Command::Favorites | Command::Unknown(_) => {
                debug!(%user_id, ?command, "unavailable command");
                texts.unknown_command.to_string()
            }
        };

        self.send(chat_id, &reply, &SendOptions::plain()).await;
    }

    async fn handle_callback(&self, user_id: UserId, callback_id: &str, data: &str) {
        let texts = self.settings.texts;

        let toast = if data == FAVORITE_ADD && self.settings.features.favorites {
            let outcome = self.store.update(user_id, favorite_last_question).await;
            debug!(%user_id, ?outcome, "favorite button pressed");
            Some(match outcome {
                FavoriteOutcome::Added => texts.favorite_added,
                FavoriteOutcome::AlreadyPresent => texts.favorite_exists,
                FavoriteOutcome::NothingToAdd => texts.favorite_nothing,
            })
        } else {
            debug!(%user_id, data, "ignoring callback");
            None
        };

        if let Err(report) = self.transport.answer_callback(callback_id, toast).await {
            warn!(%user_id, error = %report, "failed to answer callback");
        }
    }

    /// Sends one message, logging a failure. Returns true on success.
    async fn send(&self, chat_id: ChatId, text: &str, options: &SendOptions) -> bool {
        match self.transport.send_text(chat_id, text, options).await {
            Ok(()) => true,
            Err(report) => {
                warn!(%chat_id, error = %report, "failed to deliver message");
                false
            }
        }
    }
}
