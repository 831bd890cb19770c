//! Error types for the chat relay.

use thiserror::Error;

/// Result type alias using the relay error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the relay service.
#[derive(Error, Debug)]
pub enum Error {
    /// Fatal startup error: missing credential or malformed FAQ data
    #[error("Configuration error: {0}")]
    Config(String),

    /// The conversation has been marked ended
    #[error("The chat session has ended. Please start a new session.")]
    SessionEnded,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream completion API failure
    #[error("Error with completion API: {0}")]
    Upstream(String),

    /// Any other failure during turn processing
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if this is a fatal startup error.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Get HTTP status code for this error.
    ///
    /// `Config` never reaches a handler; it maps to 500 like any other
    /// unexpected failure if it somehow does.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::SessionEnded => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }
}
