//! # Queue Error Types
//!
//! Timeouts and empty reads are not errors here: they come back as
//! `Ok(None)` or as [`OfferError::Timeout`] carrying the rejected element.

use std::fmt;

use thiserror::Error;

/// Errors that can occur while building or waiting on a queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// A capacity of zero was requested through a checked constructor.
    #[error("invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The wait was cancelled through a [`CancelToken`](crate::CancelToken).
    #[error("wait cancelled")]
    Cancelled,
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// A failed enqueue. The element is handed back to the caller.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OfferError<T> {
    /// The write buffer stayed full for the whole wait.
    Timeout(T),
    /// The wait was cancelled before space became available.
    Cancelled(T),
}

impl<T> OfferError<T> {
    /// Returns the element that could not be enqueued.
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            Self::Timeout(value) | Self::Cancelled(value) => value,
        }
    }

    /// Returns true if the enqueue ran out of time.
    #[inline]
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns true if the enqueue was cancelled.
    #[inline]
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

impl<T> fmt::Debug for OfferError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(_) => f.write_str("Timeout(..)"),
            Self::Cancelled(_) => f.write_str("Cancelled(..)"),
        }
    }
}

impl<T> fmt::Display for OfferError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(_) => write!(f, "queue is full"),
            Self::Cancelled(_) => write!(f, "enqueue cancelled"),
        }
    }
}

impl<T> std::error::Error for OfferError<T> {}
