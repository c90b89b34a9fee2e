//! Error types shared across the todobot workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The shared error type for the dialog engine and its collaborator clients.
///
/// The variants mirror the failure classes the engine distinguishes at the
/// per-event boundary:
///
/// - [`BotError::Validation`] — bad user input, reported inline, the dialog
///   state does not advance.
/// - [`BotError::Remote`] — a collaborator service was unreachable or returned
///   an error status; the in-progress flow aborts back to idle.
/// - [`BotError::Protocol`] — a malformed or unexpected event for the current
///   dialog state; ignored or answered with a help hint.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum BotError {
    /// User input failed validation (e.g. empty category name)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A collaborator service failed or was unreachable
    #[error("Remote service failure: {message}")]
    Remote {
        /// HTTP status code, when the collaborator answered at all
        status: Option<u16>,
        message: String,
    },

    /// An event that makes no sense for the current dialog state
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// Configuration error (bad endpoint URL, malformed environment)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Remote error with an HTTP status
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a Remote error for transport-level failures (no status)
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Remote error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if this is a Protocol error
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// A type alias for `Result<T, BotError>`.
pub type Result<T> = std::result::Result<T, BotError>;
