//! Error types for the pollwait crate.

use std::time::Duration;

/// Terminal failure of a [`Poller::poll`](crate::Poller::poll) call.
///
/// Errors returned by the check function never show up here; they are
/// logged and the loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    /// The root signal fired. Takes precedence over every other outcome.
    #[error("aborted")]
    Aborted,

    /// The per-call operation signal fired while the root signal did not.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl PollError {
    /// True when the root signal ended the poll
    pub fn is_aborted(&self) -> bool {
        matches!(self, PollError::Aborted)
    }

    /// The operation signal's own error, if that is what ended the poll
    pub fn operation_error(&self) -> Option<OperationError> {
        match self {
            PollError::Operation(e) => Some(*e),
            PollError::Aborted => None,
        }
    }
}

/// Why an [`OperationSignal`](crate::OperationSignal) fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// `cancel()` was called before the deadline passed
    #[error("operation cancelled")]
    Cancelled,

    /// The deadline passed before anyone cancelled
    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

/// Invalid poller configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Poll interval must be a positive duration
    #[error("invalid poll interval {0:?}: must be greater than zero")]
    InvalidInterval(Duration),
}

/// Logging setup error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
}
