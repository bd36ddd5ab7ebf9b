//! Error types

use thiserror::Error;

/// Errors surfaced by timer commands
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Start was given a non-positive or non-numeric duration
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("failed to lock timer state: {0}")]
    StateLock(String),
}

impl TimerError {
    pub(crate) fn lock<E: std::fmt::Display>(e: E) -> Self {
        Self::StateLock(e.to_string())
    }
}
