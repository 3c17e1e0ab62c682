//! Shared error plumbing.
//!
//! Crates keep their own error enums (`CompletionError`, `TransportError`,
//! `ConfigError`); edges that propagate failures wrap them in a rootcause
//! [`Report`] through this alias.

use rootcause::Report;

/// Result whose error is a rootcause report over the context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
