//! Error types for the bot core.
//!
//! [`BotError`] is the top-level error. Handlers return it; the error boundary turns it into a
//! user-facing reply via [`BotError::user_message`].

use storage::StorageError;
use thiserror::Error;

const GENERIC_USER_MESSAGE: &str = "An error occurred. Please try again.";

/// Top-level error for the bot: storage, upstream API, input validation, transport and IO.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Upstream HTTP API failed. The string is shown to the user.
    #[error("API error: {0}")]
    Api(String),

    /// User input rejected. The string is shown to the user.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Text safe to show in chat for this error.
    pub fn user_message(&self) -> &str {
        match self {
            BotError::Api(msg) | BotError::Validation(msg) => msg,
            _ => GENERIC_USER_MESSAGE,
        }
    }
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
