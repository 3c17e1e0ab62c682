//! Literary assistant bot.
//!
//! This crate wires the conversation core, the completion backend and the
//! Telegram transport into a running bot:
//!
//! - **Configuration**: environment-driven settings with validation
//! - **Commands**: `/start`, `/clear`, `/help`, `/stats`, `/favorites`
//! - **Handler**: the per-event flow from inbound text to relayed reply
//! - **Polling**: the update loop with error backoff and shutdown

pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod poll;
pub mod texts;

pub use command::Command;
pub use config::{BotConfig, FeatureFlags};
pub use error::ConfigError;
pub use handler::{Bot, FAVORITE_ADD, HandlerSettings};
pub use poll::LiveBot;
pub use texts::Texts;
