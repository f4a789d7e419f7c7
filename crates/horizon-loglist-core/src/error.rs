//! Error types for Horizon LogList core.

use std::fmt;

/// The main error type for core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Signal-related error.
    Signal(SignalError),
    /// Dispatcher-related error.
    Dispatch(DispatchError),
    /// Thread pool error.
    ThreadPool(ThreadPoolError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(err) => write!(f, "Signal error: {err}"),
            Self::Dispatch(err) => write!(f, "Dispatch error: {err}"),
            Self::ThreadPool(err) => write!(f, "Thread pool error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Signal(err) => Some(err),
            Self::Dispatch(err) => Some(err),
            Self::ThreadPool(err) => Some(err),
        }
    }
}

impl From<SignalError> for CoreError {
    fn from(err: SignalError) -> Self {
        Self::Signal(err)
    }
}

impl From<DispatchError> for CoreError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl From<ThreadPoolError> for CoreError {
    fn from(err: ThreadPoolError) -> Self {
        Self::ThreadPool(err)
    }
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
        }
    }
}

impl std::error::Error for SignalError {}

/// Dispatcher-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The receiving side of the dispatcher has been dropped.
    Disconnected,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Dispatcher has been dropped"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Thread pool errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadPoolError {
    /// Failed to create the thread pool.
    CreationFailed(String),
}

impl fmt::Display for ThreadPoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreationFailed(msg) => write!(f, "Failed to create thread pool: {msg}"),
        }
    }
}

impl std::error::Error for ThreadPoolError {}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_core_error_wraps_source() {
        let err = CoreError::from(DispatchError::Disconnected);
        assert_eq!(err.to_string(), "Dispatch error: Dispatcher has been dropped");
        assert!(err.source().is_some());
    }
}
