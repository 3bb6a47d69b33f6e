//! Content Workflow Error Types

use thiserror::Error;

use super::types::{LifecycleState, Operation};
use crate::core::service::ServiceError;

/// Errors surfaced by the content lifecycle workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Missing or invalid input (empty topic, unset date, past date).
    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Another call is already pending on this workflow.
    #[error("{operation} already in progress")]
    OperationInProgress { operation: Operation },

    /// The trigger is not legal from the current state.
    #[error("Invalid transition: cannot {trigger} while {state}")]
    InvalidTransition {
        state: LifecycleState,
        trigger: String,
    },

    /// The service answered with a failure flag or an unusable payload.
    #[error("Service rejected the request: {message}")]
    RemoteRejected { message: String },

    /// The service could not be reached.
    #[error("Service unreachable: {message}")]
    RemoteUnreachable { message: String },

    /// The pending call was abandoned; the item is back in its pre-call state.
    #[error("{operation} cancelled")]
    Cancelled { operation: Operation },
}

impl WorkflowError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_transition(state: LifecycleState, trigger: impl Into<String>) -> Self {
        Self::InvalidTransition {
            state,
            trigger: trigger.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::RemoteRejected {
            message: message.into(),
        }
    }

    /// Whether this error came back from an external call (and so fails the item).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteRejected { .. } | Self::RemoteUnreachable { .. }
        )
    }

    /// Map a service failure for `operation` onto the workflow's error kinds.
    pub fn from_service(operation: Operation, err: ServiceError) -> Self {
        match err {
            ServiceError::RemoteRejected { message } => Self::RemoteRejected { message },
            ServiceError::Decode { message } => Self::RemoteRejected {
                message: format!("malformed response: {message}"),
            },
            ServiceError::RemoteUnreachable { message } => Self::RemoteUnreachable { message },
            ServiceError::TimedOut => Self::Cancelled { operation },
        }
    }
}

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
