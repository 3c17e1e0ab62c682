//! Error types for the Telegram transport.
//!
//! Client methods return `Report<TransportError>`; callers log delivery
//! failures and move on.

use std::fmt;

/// Errors from Bot API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The HTTP request could not be completed.
    RequestFailed { method: String, details: String },
    /// The Bot API answered with `ok: false`.
    Api {
        method: String,
        status: u16,
        description: String,
    },
    /// The response body could not be decoded.
    Decode { method: String, details: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { method, details } => {
                write!(f, "telegram {method} request failed: {details}")
            }
            Self::Api {
                method,
                status,
                description,
            } => write!(f, "telegram {method} rejected ({status}): {description}"),
            Self::Decode { method, details } => {
                write!(f, "telegram {method} response could not be decoded: {details}")
            }
        }
    }
}

impl std::error::Error for TransportError {}
