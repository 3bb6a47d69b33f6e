//! Remote Service Error Types
//!
//! Every call against the content service resolves to one of these. The
//! split between "the service answered no" and "nobody answered" matters to
//! the workflow: the first fails the item, a timeout cancels the transition.

use thiserror::Error;

/// Errors returned by [`ContentService`](super::ContentService) calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service responded with `success: false` (or a non-envelope error
    /// response) carrying a human-readable message.
    #[error("service rejected the request: {message}")]
    RemoteRejected {
        /// Message reported by the service.
        message: String,
    },

    /// No response was received (connect, DNS, or I/O failure).
    #[error("service unreachable: {message}")]
    RemoteUnreachable {
        /// Transport-level description of the failure.
        message: String,
    },

    /// The request did not complete within the transport timeout.
    #[error("service call timed out")]
    TimedOut,

    /// The service reported success but the payload could not be decoded.
    #[error("malformed service response: {message}")]
    Decode {
        /// Description of what was missing or malformed.
        message: String,
    },
}

impl ServiceError {
    /// Create a new RemoteRejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            message: message.into(),
        }
    }

    /// Create a new RemoteUnreachable error.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::RemoteUnreachable {
            message: message.into(),
        }
    }

    /// Create a new Decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether no definitive answer was received, so the caller should
    /// restore its pre-call state instead of recording a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimedOut
        } else if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::unreachable(err.to_string())
        }
    }
}

/// Result type alias for service calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
