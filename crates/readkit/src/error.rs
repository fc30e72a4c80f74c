//! Error types for Readkit
//!
//! This module provides error types for the read pipeline with the following design goals:
//! - Human-readable error messages that can be shown to end users as-is
//! - No leakage of sensitive information (blocked hosts, credentials, upstream bodies)
//! - Clear categorization for programmatic handling via [`ErrorKind`]

use serde::Serialize;
use thiserror::Error;

use crate::policy::BlockReason;

/// Result type alias using Readkit's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Readkit error types.
///
/// Every failure leaving the validator or the fetcher is one of these
/// variants. None of them carries partial content.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is empty, malformed, uses a disallowed scheme, or carries
    /// credentials. Always raised locally, before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The target host is rejected by the network policy.
    ///
    /// The message names the rule, never the host, so error text and logs
    /// don't echo internal addresses back.
    #[error("blocked target: this address is not allowed ({0})")]
    BlockedTarget(BlockReason),

    /// The extraction service answered with a non-success status.
    #[error("upstream error: fetch failed with status {status}")]
    Upstream { status: u16 },

    /// The response is larger than the configured ceiling.
    #[error("response too large: {size} bytes (max: {limit} bytes)")]
    ResponseTooLarge { size: u64, limit: u64 },

    /// No complete response arrived within the timeout. The request was aborted.
    #[error("timeout: no response within {0:?}, please try again later")]
    Timeout(std::time::Duration),

    /// DNS, connection or TLS failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The fetcher could not be built from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Category of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    BlockedTarget,
    Upstream,
    ResponseTooLarge,
    Timeout,
    Transport,
    Config,
}

impl Error {
    /// Create an invalid-input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::BlockedTarget(_) => ErrorKind::BlockedTarget,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::ResponseTooLarge { .. } => ErrorKind::ResponseTooLarge,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the failure was decided locally, with no network traffic.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::BlockedTarget(_))
    }
}
