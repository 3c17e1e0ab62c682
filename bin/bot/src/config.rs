//! Centralized bot configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested sections (`COMPLETION__MODEL`, `FEATURES__STATS`, ...).
//! The two secrets are required; everything else has a default.

use crate::error::ConfigError;
use litbot_ai::{ApiKey, OpenRouterConfig, SamplingConfig};
use litbot_conversation::{ConversationWindow, ResponseRelay, SplitMode};
use litbot_core::{Language, Result};
use litbot_telegram::BotToken;
use serde::Deserialize;
use std::time::Duration;

const API_KEY_VAR: &str = "OPEN_ROUTER_API_KEY";
const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Configuration as read from the environment, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    open_router_api_key: Option<String>,
    telegram_bot_token: Option<String>,
    #[serde(default)]
    bot_language: Language,
    #[serde(default)]
    completion: CompletionSettings,
    #[serde(default)]
    conversation: ConversationSettings,
    #[serde(default)]
    features: FeatureFlags,
    #[serde(default)]
    telegram: TelegramSettings,
}

/// Validated bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// OpenRouter API key.
    pub api_key: ApiKey,
    /// Telegram bot token.
    pub bot_token: BotToken,
    /// Language of the persona and all user-facing texts.
    pub language: Language,
    /// Completion API settings.
    pub completion: CompletionSettings,
    /// History window and reply splitting.
    pub conversation: ConversationSettings,
    /// Optional commands.
    pub features: FeatureFlags,
    /// Bot API settings.
    pub telegram: TelegramSettings,
}

/// Completion API settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionSettings {
    /// Chat completions URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature, 0.0 to 1.0.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cut-off, 0.0 to 1.0.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Bound on a single completion call, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    litbot_ai::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    litbot_ai::DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// History window and reply splitting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationSettings {
    /// Most recent turns sent with each request.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Longest outbound message, in characters.
    #[serde(default = "default_max_segment_chars")]
    pub max_segment_chars: usize,

    /// How long replies are cut.
    #[serde(default)]
    pub split_mode: SplitMode,

    /// Sessions idle this long are dropped. Unset keeps them forever.
    #[serde(default)]
    pub idle_ttl_minutes: Option<u64>,

    /// Interval between idle sweeps, in seconds.
    #[serde(default = "default_eviction_interval_seconds")]
    pub eviction_interval_seconds: u64,
}

fn default_window_size() -> usize {
    litbot_conversation::DEFAULT_WINDOW_SIZE
}

fn default_max_segment_chars() -> usize {
    litbot_conversation::DEFAULT_MAX_SEGMENT_CHARS
}

fn default_eviction_interval_seconds() -> u64 {
    300
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            max_segment_chars: default_max_segment_chars(),
            split_mode: SplitMode::default(),
            idle_ttl_minutes: None,
            eviction_interval_seconds: default_eviction_interval_seconds(),
        }
    }
}

/// Optional commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeatureFlags {
    /// Enables `/stats`.
    #[serde(default = "default_enabled")]
    pub stats: bool,

    /// Enables `/favorites` and the favorite button.
    #[serde(default = "default_enabled")]
    pub favorites: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            stats: default_enabled(),
            favorites: default_enabled(),
        }
    }
}

/// Bot API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramSettings {
    /// Bot API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Long-poll duration, in seconds.
    #[serde(default = "default_poll_timeout_seconds")]
    pub poll_timeout_seconds: u64,

    /// Pause after a failed poll, in seconds.
    #[serde(default = "default_error_backoff_seconds")]
    pub error_backoff_seconds: u64,
}

fn default_api_base() -> String {
    litbot_telegram::DEFAULT_API_BASE.to_string()
}

fn default_poll_timeout_seconds() -> u64 {
    30
}

fn default_error_backoff_seconds() -> u64 {
    5
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_timeout_seconds: default_poll_timeout_seconds(),
            error_backoff_seconds: default_error_backoff_seconds(),
        }
    }
}

impl TelegramSettings {
    /// Long-poll duration.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_seconds)
    }

    /// Pause after a failed poll.
    #[must_use]
    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_seconds)
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing { name }.into()),
    }
}

fn check_unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not within 0.0..=1.0"),
        }
        .into())
    }
}

fn check_positive(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero".to_string(),
        }
        .into())
    }
}

impl BotConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a secret is missing or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::default())
    }

    /// Loads configuration from the given environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if a secret is missing or a value is invalid.
    pub fn from_source(environment: config::Environment) -> Result<Self, ConfigError> {
        let load_failed = |e: config::ConfigError| ConfigError::Load {
            details: e.to_string(),
        };

        let raw: RawConfig = config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()
            .map_err(load_failed)?
            .try_deserialize()
            .map_err(load_failed)?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let api_key = required(raw.open_router_api_key, API_KEY_VAR)?;
        let bot_token = required(raw.telegram_bot_token, BOT_TOKEN_VAR)?;

        let completion = &raw.completion;
        if completion.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "completion.endpoint",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        check_unit_interval("completion.temperature", completion.temperature)?;
        check_unit_interval("completion.top_p", completion.top_p)?;
        check_positive("completion.max_tokens", u64::from(completion.max_tokens))?;
        check_positive("completion.timeout_seconds", completion.timeout_seconds)?;

        let conversation = &raw.conversation;
        check_positive("conversation.window_size", conversation.window_size as u64)?;
        if !(1..=litbot_conversation::TRANSPORT_MESSAGE_LIMIT)
            .contains(&conversation.max_segment_chars)
        {
            return Err(ConfigError::Invalid {
                field: "conversation.max_segment_chars",
                reason: format!(
                    "{} is not within 1..={}",
                    conversation.max_segment_chars,
                    litbot_conversation::TRANSPORT_MESSAGE_LIMIT
                ),
            }
            .into());
        }
        if let Some(ttl) = conversation.idle_ttl_minutes {
            check_positive("conversation.idle_ttl_minutes", ttl)?;
            check_positive(
                "conversation.eviction_interval_seconds",
                conversation.eviction_interval_seconds,
            )?;
        }

        Ok(Self {
            api_key: ApiKey::new(api_key),
            bot_token: BotToken::new(bot_token),
            language: raw.bot_language,
            completion: raw.completion,
            conversation: raw.conversation,
            features: raw.features,
            telegram: raw.telegram,
        })
    }

    /// Sampling options for every request.
    #[must_use]
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            model: self.completion.model.clone(),
            max_tokens: self.completion.max_tokens,
            temperature: self.completion.temperature,
            top_p: self.completion.top_p,
        }
    }

    /// OpenRouter backend settings.
    #[must_use]
    pub fn openrouter(&self) -> OpenRouterConfig {
        OpenRouterConfig::new(self.api_key.clone())
            .with_endpoint(self.completion.endpoint.clone())
            .with_timeout(Duration::from_secs(self.completion.timeout_seconds))
    }

    /// History window.
    #[must_use]
    pub fn window(&self) -> ConversationWindow {
        ConversationWindow::new(self.conversation.window_size)
    }

    /// Reply splitter.
    #[must_use]
    pub fn relay(&self) -> ResponseRelay {
        ResponseRelay::new(self.conversation.max_segment_chars)
            .with_mode(self.conversation.split_mode)
    }

    /// Idle session lifetime, if eviction is enabled.
    #[must_use]
    pub fn idle_ttl(&self) -> Option<chrono::Duration> {
        self.conversation
            .idle_ttl_minutes
            .and_then(|minutes| i64::try_from(minutes).ok())
            .map(chrono::Duration::minutes)
    }

    /// Interval between idle sweeps.
    #[must_use]
    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.conversation.eviction_interval_seconds)
    }
}
