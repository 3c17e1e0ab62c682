//! Core domain types and utilities for litbot.
//!
//! This crate provides the foundational types and error handling shared by
//! the conversation core, the completion client and the chat transport.

pub mod error;
pub mod id;
pub mod role;

pub use error::Result;
pub use id::{ChatId, UserId};
pub use role::{Language, Role};
