//! # Wait Budgets
//!
//! Callers pass a [`Wait`]; the queue turns it into a [`Deadline`] once, at
//! the start of the operation. Every re-wait after a wake-up uses what is
//! left of that deadline, so spurious wake-ups never stretch the budget.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

/// How long a blocking operation may wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wait {
    /// Return immediately if the operation cannot make progress.
    NoWait,
    /// Wait at most this long.
    For(Duration),
    /// Wait until the operation succeeds or is cancelled.
    Forever,
}

impl Wait {
    /// Wait budget of `millis` milliseconds.
    #[inline]
    #[must_use]
    pub const fn millis(millis: u64) -> Self {
        Self::For(Duration::from_millis(millis))
    }
}

impl From<Duration> for Wait {
    #[inline]
    fn from(duration: Duration) -> Self {
        Self::For(duration)
    }
}

/// Absolute end of a wait budget.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Deadline {
    At(Instant),
    Never,
}

impl Deadline {
    /// Starts the clock for `wait`.
    pub(crate) fn start(wait: Wait) -> Self {
        match wait {
            Wait::NoWait => Self::At(Instant::now()),
            // Durations too large to represent are treated as unbounded.
            Wait::For(duration) => Instant::now()
                .checked_add(duration)
                .map_or(Self::Never, Self::At),
            Wait::Forever => Self::Never,
        }
    }

    /// True once the budget is used up. Never true for `Forever`.
    #[inline]
    pub(crate) fn has_elapsed(&self) -> bool {
        match self {
            Self::At(at) => Instant::now() >= *at,
            Self::Never => false,
        }
    }

    /// The earlier of this deadline and `max` from now.
    pub(crate) fn capped(&self, max: Duration) -> Self {
        let limit = Instant::now().checked_add(max);
        match (self, limit) {
            (Self::At(at), Some(limit)) => Self::At((*at).min(limit)),
            (Self::At(at), None) => Self::At(*at),
            (Self::Never, Some(limit)) => Self::At(limit),
            (Self::Never, None) => Self::Never,
        }
    }

    /// Acquires `mutex`, giving up once the budget is used up.
    pub(crate) fn lock<'a, T: ?Sized>(&self, mutex: &'a Mutex<T>) -> Option<MutexGuard<'a, T>> {
        match self {
            Self::At(at) => mutex.try_lock_until(*at),
            Self::Never => Some(mutex.lock()),
        }
    }

    /// Blocks on `condvar` for at most the remaining budget.
    ///
    /// Returns on notification, spurious wake-up or expiry alike; the
    /// caller re-checks its condition either way.
    pub(crate) fn wait_on<T: ?Sized>(&self, condvar: &Condvar, guard: &mut MutexGuard<'_, T>) {
        match self {
            Self::At(at) => {
                condvar.wait_until(guard, *at);
            }
            Self::Never => condvar.wait(guard),
        }
    }
}
