//! Error types for the timer primitive.
//!
//! The gate has no failure modes beyond a boolean outcome, so only timer
//! operations report errors.

use thiserror::Error;

/// Errors that can occur when arming a [`OneShotTimer`](crate::OneShotTimer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The timer already has a callback scheduled or running.
    #[error("Timer {0} is already armed")]
    AlreadyArmed(u64),

    /// The timer has fired or been cancelled and cannot be armed again.
    #[error("Timer {0} is spent; allocate a new timer to re-arm")]
    Spent(u64),

    /// The requested delay cannot be represented as a deadline.
    #[error("Timer delay {0:?} overflows the clock")]
    DeadlineOverflow(std::time::Duration),

    /// The dispatch thread for the callback could not be started.
    #[error("Failed to spawn timer dispatch thread: {0}")]
    SpawnFailed(String),
}

impl TimerError {
    /// Create a spawn failure error.
    #[must_use]
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed(reason.into())
    }
}

/// A specialized `Result` type for timer operations.
pub type TimerResult<T> = std::result::Result<T, TimerError>;
