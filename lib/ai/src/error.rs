//! Error types for the AI crate.
//!
//! The backend returns a plain `CompletionError` so callers can classify the
//! failure; process-level code wraps it in a rootcause report when it needs
//! to propagate further.

use std::fmt;

/// Errors from a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// No response within the configured timeout.
    Timeout,
    /// The endpoint rejected the request or could not be reached.
    RequestFailed {
        /// HTTP status, if a response was received.
        status: Option<u16>,
        reason: String,
    },
    /// The response body did not contain a reply.
    MalformedResponse { reason: String },
    /// Anything else, e.g. the HTTP client could not be built.
    Unexpected { reason: String },
}

/// Which apology the user is shown when a completion fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apology {
    /// The completion API did not answer in time.
    Timeout,
    /// The completion API refused the request or was unreachable.
    Request,
    /// Any other failure.
    Generic,
}

impl CompletionError {
    /// Maps the failure to the user-visible apology.
    #[must_use]
    pub fn apology(&self) -> Apology {
        match self {
            Self::Timeout => Apology::Timeout,
            Self::RequestFailed { .. } => Apology::Request,
            Self::MalformedResponse { .. } | Self::Unexpected { .. } => Apology::Generic,
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "completion request timed out"),
            Self::RequestFailed {
                status: Some(status),
                reason,
            } => write!(f, "completion request failed with status {status}: {reason}"),
            Self::RequestFailed {
                status: None,
                reason,
            } => write!(f, "completion request failed: {reason}"),
            Self::MalformedResponse { reason } => {
                write!(f, "malformed completion response: {reason}")
            }
            Self::Unexpected { reason } => write!(f, "unexpected completion failure: {reason}"),
        }
    }
}

impl std::error::Error for CompletionError {}
