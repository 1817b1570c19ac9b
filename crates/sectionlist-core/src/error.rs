//! Error types for sectionlist core.

use std::fmt;

/// The main error type for sectionlist core operations.
#[derive(Debug)]
pub enum CoreError {
    /// Thread pool error.
    ThreadPool(ThreadPoolError),
    /// UI dispatch error.
    Dispatch(DispatchError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreadPool(err) => write!(f, "Thread pool error: {err}"),
            Self::Dispatch(err) => write!(f, "Dispatch error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ThreadPool(err) => Some(err),
            Self::Dispatch(err) => Some(err),
        }
    }
}

/// Thread pool specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadPoolError {
    /// The underlying rayon pool could not be built.
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

impl From<ThreadPoolError> for CoreError {
    fn from(err: ThreadPoolError) -> Self {
        Self::ThreadPool(err)
    }
}

/// UI dispatch specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The owning `UiQueue` has been dropped; the invocation was not delivered.
    Disconnected,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "UI queue has been dropped"),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<DispatchError> for CoreError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

/// A specialized Result type for sectionlist core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
