//! Unified error type for deckforge.
//!
//! Degraded-but-successful conditions (unknown theme, missing image) are not
//! represented here: they produce a valid result and a `tracing` warning.
use thiserror::Error;

use crate::ooxml::OoxmlError;

/// Main error type for deckforge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Session lookup by an unknown or expired identifier
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// An Edit Set entry is missing a mandatory field or has an unusable value
    #[error("Invalid edit set entry {index}: {reason}")]
    Validation { index: usize, reason: String },

    /// Generator output did not contain a usable JSON payload
    #[error("Malformed edit set: {0}")]
    MalformedEditSet(String),

    /// A stored deck could not be decoded
    #[error("Malformed deck: {0}")]
    MalformedDeck(String),

    /// Unrecoverable failure while producing the presentation package
    #[error("Render failed: {0}")]
    Render(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a validation failure for the entry at `index`.
    pub(crate) fn validation(index: usize, reason: impl Into<String>) -> Self {
        Error::Validation {
            index,
            reason: reason.into(),
        }
    }

    /// Whether this error is a session lookup miss.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::SessionNotFound(_))
    }
}

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        Error::Render(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedEditSet(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for deckforge operations.
pub type Result<T> = std::result::Result<T, Error>;
