//! Completion primitives for litbot.
//!
//! This crate provides:
//!
//! - **Request Builder**: persona + windowed history + sampling options
//! - **Completion Backend**: the trait the message handler calls
//! - **OpenRouter**: the HTTP backend used in production

pub mod backend;
pub mod error;
pub mod openrouter;
pub mod persona;

pub use backend::{
    ChatMessage, CompletionBackend, CompletionRequest, CompletionResponse, DEFAULT_MODEL,
    SamplingConfig,
};
pub use error::{Apology, CompletionError};
pub use openrouter::{ApiKey, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, OpenRouterBackend, OpenRouterConfig};
pub use persona::system_instruction;
