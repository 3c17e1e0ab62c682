//! Startup error types.
//!
//! Any of these aborts the process before the bot starts polling.

use std::fmt;

/// Errors from loading and validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized.
    Load { details: String },
    /// A required variable is absent or empty.
    Missing { name: &'static str },
    /// A value is out of its allowed range.
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { details } => write!(f, "failed to load configuration: {details}"),
            Self::Missing { name } => {
                write!(f, "required environment variable {name} is not set")
            }
            Self::Invalid { field, reason } => {
                write!(f, "invalid configuration value for {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
