//! Completion backend abstraction.
//!
//! Defines the request payload sent to an OpenAI-compatible chat completion
//! endpoint and the trait every backend implements.

use crate::error::CompletionError;
use async_trait::async_trait;
use litbot_core::Role;
use serde::{Deserialize, Serialize};

/// Default model requested from the completion API.
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Sampling options resolved once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature for sampling (0.0 - 1.0).
    pub temperature: f32,
    /// Nucleus sampling cut-off (0.0 - 1.0).
    pub top_p: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

/// A message in the request's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a message.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The JSON body posted to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Windowed conversation, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Persona instruction.
    pub system: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cut-off.
    pub top_p: f32,
}

impl CompletionRequest {
    /// Assembles a request from the persona, the windowed history and the
    /// sampling options. Performs no validation of message content.
    #[must_use]
    pub fn build(
        system: &str,
        messages: impl IntoIterator<Item = ChatMessage>,
        sampling: &SamplingConfig,
    ) -> Self {
        Self {
            model: sampling.model.clone(),
            messages: messages.into_iter().collect(),
            system: system.to_string(),
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
        }
    }
}

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// The reply text.
    pub content: String,
}

/// Trait for completion backends.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Sends one request and waits for the reply. Never retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the call times out, the endpoint rejects the
    /// request, or the response cannot be understood.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
}
