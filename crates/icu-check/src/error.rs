//! Error types for privacy exposure checks.

use crate::score::ScoreRangeError;
use icu_core::InputKind;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while validating or running a check.
///
/// The type is `Clone` so a failure can be held in
/// [`CheckState::Failed`](crate::CheckState::Failed) and handed to callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    /// Input was empty after trimming
    #[error("please enter an email, username, or domain to check")]
    EmptyInput {
        /// Kind selected when the empty value was submitted
        kind: InputKind,
    },

    /// Input failed the strict per-kind syntax rules
    #[error("invalid {kind} format: {reason}")]
    InvalidFormat {
        /// Kind whose rules were violated
        kind: InputKind,
        /// Human-readable rule description
        reason: String,
    },

    /// Analysis service answered with a non-2xx status
    #[error("analysis service returned status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Connection or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// No answer within the request timeout
    #[error("privacy check timed out after {after:?}")]
    Timeout {
        /// Bound that elapsed
        after: Duration,
    },

    /// Response body could not be decoded
    #[error("invalid response from analysis service: {0}")]
    InvalidResponse(String),

    /// Backend sent a score outside 0-100
    #[error("analysis service broke its contract: {0}")]
    ScoreOutOfRange(#[from] ScoreRangeError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl CheckError {
    /// Whether the error was raised locally before any network activity.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyInput { .. } | Self::InvalidFormat { .. })
    }

    /// Whether the request ran out of time.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for check operations.
pub type Result<T> = std::result::Result<T, CheckError>;
