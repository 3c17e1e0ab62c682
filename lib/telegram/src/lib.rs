//! Telegram transport for litbot.
//!
//! This crate provides:
//!
//! - **Bot API client**: long polling and message delivery over HTTPS
//! - **Chat Transport**: the delivery trait the message handler depends on
//! - **Inbound events**: updates classified into text, commands and callbacks

pub mod client;
pub mod error;
pub mod event;
pub mod transport;
pub mod types;

pub use client::{BotToken, DEFAULT_API_BASE, TelegramClient, UpdatePoller};
pub use error::TransportError;
pub use event::InboundEvent;
pub use transport::{ChatTransport, SendOptions};
pub use types::{InlineButton, InlineKeyboard, ParseMode, Update};
