//! Error types for the log list engine.

use horizon_loglist_core::DispatchError;

/// Result type alias for log list operations.
pub type Result<T> = std::result::Result<T, LogListError>;

/// Errors that can occur in the log list engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogListError {
    /// The requested operation is not supported by the store.
    #[error("Operation '{operation}' is not supported")]
    Unsupported { operation: &'static str },

    /// The UI dispatcher is gone.
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// An edit closure aborted the edit.
    #[error("Edit aborted: {reason}")]
    Aborted { reason: String },
}

impl LogListError {
    /// Create an unsupported-operation error.
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Create an error that aborts an edit and rolls it back.
    pub fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: reason.into(),
        }
    }
}
