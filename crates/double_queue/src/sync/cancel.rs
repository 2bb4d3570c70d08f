//! # Cancellation
//!
//! Rust threads cannot be interrupted from outside, so a blocked queue
//! operation is cancelled through a shared flag instead. The queue checks
//! the flag before taking a lock and after every wake-up.
//!
//! ```rust,ignore
//! let token = CancelToken::new();
//!
//! // Consumer thread
//! match queue.dequeue_cancellable(Wait::Forever, &token) {
//!     Ok(Some(job)) => run(job),
//!     Ok(None) => {}
//!     Err(QueueError::Cancelled) => return,
//!     Err(e) => panic!("{e}"),
//! }
//!
//! // Elsewhere: sets the flag and wakes the blocked consumer.
//! queue.interrupt(&token);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared between a waiter and its canceller.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token as cancelled.
    ///
    /// This does not wake a thread that is already blocked. Use
    /// [`DoubleQueue::interrupt`](crate::DoubleQueue::interrupt) for that.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns whether the token has been cancelled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clears the flag so the token can be reused.
    #[inline]
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

/// True if an optional token is present and cancelled.
#[inline]
pub(crate) fn is_cancelled(token: Option<&CancelToken>) -> bool {
    token.is_some_and(CancelToken::is_cancelled)
}
