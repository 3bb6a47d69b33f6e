//! Personality Error Types
//!
//! Errors for slider input, document mapping, and syncing the personality
//! with the remote service. Uses `thiserror` like the rest of the crate.

use thiserror::Error;

use crate::core::service::ServiceError;

/// Errors related to personality configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersonalityError {
    /// Caller-side contract violation (malformed slider map, unknown trait value).
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong.
        message: String,
    },

    /// Slider name is not one of the five fixed keys.
    #[error("unknown slider: '{name}'")]
    UnknownSlider {
        /// The name that was not recognized.
        name: String,
    },

    /// Loading or publishing the personality through the service failed.
    #[error(transparent)]
    Remote(#[from] ServiceError),
}

impl PersonalityError {
    /// Create a new InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new UnknownSlider error.
    pub fn unknown_slider(name: impl Into<String>) -> Self {
        Self::UnknownSlider { name: name.into() }
    }
}

/// Result type alias for personality operations.
pub type Result<T> = std::result::Result<T, PersonalityError>;
