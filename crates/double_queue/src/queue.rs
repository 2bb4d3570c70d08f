//! # Double-Buffered Blocking Queue
//!
//! Producers and consumers work on two different buffers under two
//! different locks. They meet only when the consumer drains its buffer
//! and swaps it for the producers' one.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!                  │             DoubleQueue              │
//!                  │                                      │
//!   enqueue ─────> │  producer: Mutex<SlotBuffer>  ◄──┐   │
//!                  │     not_full / data_available    │   │
//!                  │                                  │   │
//!   dequeue ─────> │  consumer: Mutex<SlotBuffer>  ───┘   │
//!                  │        (swap when drained)           │
//!                  └──────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//!
//! Elements come out in the order they went into a buffer. Elements still
//! in the write buffer are invisible to [`DoubleQueue::size`],
//! [`DoubleQueue::peek`] and [`DoubleQueue::dequeue`] until the read buffer
//! is drained and a swap promotes them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::buffer::{exchange, SlotBuffer};
use crate::config::{QueueConfig, DEFAULT_CAPACITY};
use crate::error::{OfferError, QueueError, QueueResult};
use crate::sync::{is_cancelled, CancelToken, Deadline, Wait};

/// How often a cancellable consumer re-checks its token while queued
/// behind another consumer.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(10);

/// What a swap attempt achieved.
enum SwapOutcome {
    /// The write buffer became the read buffer.
    Swapped,
    /// Nothing to swap; slept on "data available" and should try again.
    Woke,
    /// Nothing to swap and no budget left.
    Expired,
}

/// Bounded, thread-safe FIFO queue built on two swapped buffers.
///
/// Each buffer holds up to `capacity` elements, so up to `2 * capacity`
/// elements can be in flight: one buffer filling, one draining.
///
/// ## Usage
///
/// ```rust
/// use double_queue::{DoubleQueue, Wait};
///
/// let queue = DoubleQueue::new(2);
/// queue.enqueue("a", Wait::NoWait).unwrap();
/// queue.enqueue("b", Wait::NoWait).unwrap();
///
/// // Nothing has been swapped to the read side yet.
/// assert_eq!(queue.size(), 0);
///
/// assert_eq!(queue.dequeue(Wait::NoWait), Some("a"));
/// assert_eq!(queue.size(), 1);
/// ```
pub struct DoubleQueue<T> {
    /// Producer lock: write buffer. Also the lock both conditions wait on.
    producer: Mutex<SlotBuffer<T>>,
    /// Consumer lock: read buffer.
    consumer: Mutex<SlotBuffer<T>>,
    /// Signalled when a swap or clear frees the write buffer.
    not_full: Condvar,
    /// Signalled when the write buffer goes from empty to non-empty.
    data_available: Condvar,
    /// Slots per buffer.
    capacity: usize,
    /// Budget for `offer` / `poll`.
    default_timeout: Duration,
    /// Completed swaps, for profiling.
    swaps: AtomicU64,
}

impl<T> DoubleQueue<T> {
    /// Creates a queue whose buffers hold `capacity` elements each.
    ///
    /// A capacity of zero is replaced by [`DEFAULT_CAPACITY`]. Use
    /// [`try_new`](Self::try_new) to reject it instead.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            tracing::warn!(
                "Queue capacity 0 is invalid, using default capacity {}",
                DEFAULT_CAPACITY
            );
            DEFAULT_CAPACITY
        } else {
            capacity
        };

        Self::build(capacity, QueueConfig::default().default_timeout())
    }

    /// Creates a queue, rejecting a zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> QueueResult<Self> {
        Self::with_config(QueueConfig::with_capacity(capacity))
    }

    /// Creates a queue from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if the configured capacity is
    /// zero.
    pub fn with_config(config: QueueConfig) -> QueueResult<Self> {
        config.validate()?;
        Ok(Self::build(config.capacity, config.default_timeout()))
    }

    fn build(capacity: usize, default_timeout: Duration) -> Self {
        Self {
            producer: Mutex::new(SlotBuffer::new(capacity)),
            consumer: Mutex::new(SlotBuffer::new(capacity)),
            not_full: Condvar::new(),
            data_available: Condvar::new(),
            capacity,
            default_timeout,
            swaps: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Producer side
    // =========================================================================

    /// Appends `element` to the write buffer, waiting up to `wait` for room.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::Timeout`] with the element if the write buffer
    /// stayed full for the whole wait.
    pub fn enqueue(&self, element: T, wait: Wait) -> Result<(), OfferError<T>> {
        self.enqueue_inner(element, Deadline::start(wait), None)
    }

    /// Like [`enqueue`](Self::enqueue), but gives up when `token` is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// [`OfferError::Timeout`] as for `enqueue`, or
    /// [`OfferError::Cancelled`] if the token was cancelled before the
    /// element could be stored.
    pub fn enqueue_cancellable(
        &self,
        element: T,
        wait: Wait,
        token: &CancelToken,
    ) -> Result<(), OfferError<T>> {
        self.enqueue_inner(element, Deadline::start(wait), Some(token))
    }

    /// Enqueues with the default timeout (500 ms unless configured).
    ///
    /// # Errors
    ///
    /// See [`enqueue`](Self::enqueue).
    pub fn offer(&self, element: T) -> Result<(), OfferError<T>> {
        self.enqueue(element, Wait::For(self.default_timeout))
    }

    /// Enqueues only if there is room right now.
    ///
    /// # Errors
    ///
    /// See [`enqueue`](Self::enqueue).
    pub fn try_offer(&self, element: T) -> Result<(), OfferError<T>> {
        self.enqueue(element, Wait::NoWait)
    }

    /// Enqueues, waiting as long as it takes.
    pub fn put(&self, mut element: T) {
        loop {
            match self.enqueue(element, Wait::Forever) {
                Ok(()) => return,
                // Unbounded waits only end on success; keep the element and retry.
                Err(err) => element = err.into_inner(),
            }
        }
    }

    fn enqueue_inner(
        &self,
        element: T,
        deadline: Deadline,
        token: Option<&CancelToken>,
    ) -> Result<(), OfferError<T>> {
        if is_cancelled(token) {
            return Err(OfferError::Cancelled(element));
        }

        let mut write = self.producer.lock();
        loop {
            if !write.is_full() {
                write.push(element);
                if write.len() == 1 {
                    self.data_available.notify_one();
                }
                return Ok(());
            }

            if deadline.has_elapsed() {
                tracing::debug!("Enqueue timed out, write buffer full");
                return Err(OfferError::Timeout(element));
            }

            // Checked under the producer lock, so an interrupt either lands
            // here or finds this thread asleep.
            if is_cancelled(token) {
                tracing::debug!("Enqueue cancelled before waiting for space");
                return Err(OfferError::Cancelled(element));
            }

            tracing::debug!("Write buffer full, waiting for a swap");
            deadline.wait_on(&self.not_full, &mut write);

            if is_cancelled(token) {
                // Pass on a wake-up this thread may have taken from another producer.
                self.not_full.notify_one();
                tracing::debug!("Enqueue cancelled while waiting for space");
                return Err(OfferError::Cancelled(element));
            }
        }
    }

    // =========================================================================
    // Consumer side
    // =========================================================================

    /// Takes the front element, waiting up to `wait` for one.
    ///
    /// If the read buffer is empty the write buffer is swapped in first.
    /// Returns `None` when the wait ends with both buffers empty.
    pub fn dequeue(&self, wait: Wait) -> Option<T> {
        // Without a token the only error, cancellation, cannot happen.
        self.dequeue_inner(Deadline::start(wait), None).ok().flatten()
    }

    /// Like [`dequeue`](Self::dequeue), but gives up when `token` is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Cancelled`] if the token was cancelled before
    /// an element was taken. No element is lost in that case.
    pub fn dequeue_cancellable(&self, wait: Wait, token: &CancelToken) -> QueueResult<Option<T>> {
        self.dequeue_inner(Deadline::start(wait), Some(token))
    }

    /// Dequeues with the default timeout (500 ms unless configured).
    pub fn poll(&self) -> Option<T> {
        self.dequeue(Wait::For(self.default_timeout))
    }

    /// Dequeues only what can be taken without blocking.
    pub fn try_poll(&self) -> Option<T> {
        self.dequeue(Wait::NoWait)
    }

    /// Dequeues, waiting as long as it takes.
    pub fn take(&self) -> T {
        loop {
            if let Some(element) = self.dequeue(Wait::Forever) {
                return element;
            }
        }
    }

    fn dequeue_inner(
        &self,
        deadline: Deadline,
        token: Option<&CancelToken>,
    ) -> QueueResult<Option<T>> {
        let Some(mut read) = self.lock_consumer(&deadline, token)? else {
            tracing::debug!("Dequeue timed out waiting for another consumer");
            return Ok(None);
        };

        loop {
            if let Some(element) = read.pop_front() {
                return Ok(Some(element));
            }

            match self.swap(&mut read, &deadline, token)? {
                SwapOutcome::Swapped | SwapOutcome::Woke => {}
                SwapOutcome::Expired => {
                    tracing::debug!("Dequeue timed out, queue empty");
                    return Ok(None);
                }
            }
        }
    }

    /// Takes the consumer lock within the wait budget.
    ///
    /// Another consumer may hold the lock while it sleeps on "data
    /// available", so the acquisition itself is bounded by the deadline.
    /// With a token, the wait is cut into slices so a cancellation is seen
    /// within [`CANCEL_CHECK_INTERVAL`].
    fn lock_consumer(
        &self,
        deadline: &Deadline,
        token: Option<&CancelToken>,
    ) -> QueueResult<Option<MutexGuard<'_, SlotBuffer<T>>>> {
        let Some(token) = token else {
            return Ok(deadline.lock(&self.consumer));
        };

        loop {
            if token.is_cancelled() {
                return Err(QueueError::Cancelled);
            }

            if let Some(read) = deadline.capped(CANCEL_CHECK_INTERVAL).lock(&self.consumer) {
                if token.is_cancelled() {
                    return Err(QueueError::Cancelled);
                }
                return Ok(Some(read));
            }

            if deadline.has_elapsed() {
                return Ok(None);
            }
        }
    }

    /// Promotes the write buffer to the read side.
    ///
    /// Runs under the producer lock while the caller holds the consumer
    /// lock. With an empty write buffer it sleeps on "data available" for
    /// what is left of the budget instead.
    fn swap(
        &self,
        read: &mut MutexGuard<'_, SlotBuffer<T>>,
        deadline: &Deadline,
        token: Option<&CancelToken>,
    ) -> QueueResult<SwapOutcome> {
        let mut write = self.producer.lock();

        if write.is_empty() {
            if deadline.has_elapsed() {
                return Ok(SwapOutcome::Expired);
            }

            if is_cancelled(token) {
                tracing::debug!("Dequeue cancelled before waiting for data");
                return Err(QueueError::Cancelled);
            }

            tracing::debug!("Queue empty, waiting for data");
            deadline.wait_on(&self.data_available, &mut write);

            if is_cancelled(token) {
                self.data_available.notify_one();
                tracing::debug!("Dequeue cancelled while waiting for data");
                return Err(QueueError::Cancelled);
            }
            return Ok(SwapOutcome::Woke);
        }

        exchange(&mut write, read);
        self.swaps.fetch_add(1, Ordering::Relaxed);
        self.not_full.notify_all();

        tracing::debug!("Swapped buffers, {} elements ready", read.len());
        Ok(SwapOutcome::Swapped)
    }

    /// Returns a copy of the front of the read buffer.
    ///
    /// Never swaps, so elements still in the write buffer are not seen.
    #[must_use]
    pub fn peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.peek_with(T::clone)
    }

    /// Applies `f` to the front of the read buffer without removing it.
    ///
    /// Blocks while another thread holds the consumer lock, including a
    /// consumer sleeping in [`dequeue`](Self::dequeue) on an empty queue.
    pub fn peek_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.consumer.lock().front().map(f)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of elements in the read buffer.
    ///
    /// Elements waiting in the write buffer are not counted until a swap
    /// moves them over; see [`pending`](Self::pending).
    ///
    /// Takes the consumer lock, so it blocks while a consumer sleeps in
    /// [`dequeue`](Self::dequeue) on an empty queue.
    #[must_use]
    pub fn size(&self) -> usize {
        self.consumer.lock().len()
    }

    /// True if the read buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of elements in the write buffer, waiting for a swap.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.producer.lock().len()
    }

    /// Slots per buffer.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left in the write buffer.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        let write = self.producer.lock();
        write.capacity() - write.len()
    }

    /// Number of swaps performed so far.
    #[inline]
    #[must_use]
    pub fn swap_count(&self) -> u64 {
        self.swaps.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Drops every element in both buffers.
    ///
    /// Waits for an in-progress dequeue to release the consumer lock first,
    /// which for `Wait::Forever` means until data arrives.
    pub fn clear(&self) {
        let mut read = self.consumer.lock();
        let mut write = self.producer.lock();

        read.reset();
        write.reset();
        self.not_full.notify_all();

        tracing::debug!("Queue cleared");
    }

    /// Cancels `token` and wakes every thread blocked on this queue.
    ///
    /// The thread waiting with `token` returns a cancellation; every other
    /// waiter re-checks its condition and goes back to sleep. A consumer
    /// queued behind another consumer notices within a few milliseconds.
    pub fn interrupt(&self, token: &CancelToken) {
        token.cancel();

        // Taking the lock orders the flag before any waiter's next check.
        let _write = self.producer.lock();
        self.not_full.notify_all();
        self.data_available.notify_all();
    }
}

impl<T> Default for DoubleQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Counts read with `try_lock`; `None` while the side is busy.
impl<T> fmt::Debug for DoubleQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.consumer.try_lock().map(|read| read.len());
        let pending = self.producer.try_lock().map(|write| write.len());

        f.debug_struct("DoubleQueue")
            .field("capacity", &self.capacity)
            .field("size", &size)
            .field("pending", &pending)
            .field("swaps", &self.swap_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_queue_creation() {
        let queue: DoubleQueue<u32> = DoubleQueue::new(16);
        assert_eq!(queue.capacity(), 16);
        assert_eq!(queue.size(), 0);
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.remaining_capacity(), 16);
        assert_eq!(queue.swap_count(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let queue: DoubleQueue<u8> = DoubleQueue::new(0);
        assert_eq!(queue.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_try_new_rejects_zero_capacity() {
        let result: QueueResult<DoubleQueue<u8>> = DoubleQueue::try_new(0);
        assert!(matches!(result, Err(QueueError::InvalidCapacity(0))));
        assert!(DoubleQueue::<u8>::try_new(3).is_ok());
    }

    #[test]
    fn test_with_config_uses_default_timeout() {
        let config = QueueConfig {
            capacity: 1,
            default_timeout_ms: 10,
        };
        let queue = DoubleQueue::with_config(config).unwrap();
        queue.offer(1).unwrap();

        let start = Instant::now();
        assert!(queue.offer(2).unwrap_err().is_timeout());
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(10));
        assert!(waited < Duration::from_millis(400));
    }

    #[test]
    fn test_swap_promotes_write_buffer() {
        let queue = DoubleQueue::new(4);
        for i in 0..3 {
            queue.enqueue(i, Wait::NoWait).unwrap();
        }
        assert_eq!(queue.pending(), 3);
        assert_eq!(queue.size(), 0);

        assert_eq!(queue.dequeue(Wait::NoWait), Some(0));

        assert_eq!(queue.swap_count(), 1);
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.size(), 2);
        assert_eq!(queue.remaining_capacity(), 4);
    }

    #[test]
    fn test_no_swap_while_read_buffer_has_data() {
        let queue = DoubleQueue::new(4);
        queue.enqueue(1, Wait::NoWait).unwrap();
        queue.enqueue(2, Wait::NoWait).unwrap();
        assert_eq!(queue.dequeue(Wait::NoWait), Some(1));

        queue.enqueue(3, Wait::NoWait).unwrap();
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.pending(), 1);

        assert_eq!(queue.dequeue(Wait::NoWait), Some(2));
        assert_eq!(queue.swap_count(), 1);
        assert_eq!(queue.dequeue(Wait::NoWait), Some(3));
        assert_eq!(queue.swap_count(), 2);
    }

    #[test]
    fn test_empty_dequeue_does_not_swap() {
        let queue: DoubleQueue<u8> = DoubleQueue::new(2);
        assert_eq!(queue.dequeue(Wait::NoWait), None);
        assert_eq!(queue.dequeue(Wait::millis(5)), None);
        assert_eq!(queue.swap_count(), 0);
    }

    #[test]
    fn test_peek_does_not_swap() {
        let queue = DoubleQueue::new(2);
        queue.enqueue(String::from("a"), Wait::NoWait).unwrap();
        assert_eq!(queue.peek(), None);

        assert_eq!(queue.dequeue(Wait::NoWait).as_deref(), Some("a"));
        queue.enqueue(String::from("b"), Wait::NoWait).unwrap();
        queue.enqueue(String::from("c"), Wait::NoWait).unwrap();
        assert_eq!(queue.peek(), None);

        assert_eq!(queue.dequeue(Wait::NoWait).as_deref(), Some("b"));
        assert_eq!(queue.peek().as_deref(), Some("c"));
        assert_eq!(queue.peek_with(String::len), Some(1));
        assert_eq!(queue.size(), 1);
    }

    #[test]
    fn test_clear_resets_both_buffers() {
        let queue = DoubleQueue::new(2);
        queue.enqueue(1, Wait::NoWait).unwrap();
        queue.enqueue(2, Wait::NoWait).unwrap();
        assert_eq!(queue.dequeue(Wait::NoWait), Some(1));
        queue.enqueue(3, Wait::NoWait).unwrap();

        queue.clear();

        assert_eq!(queue.size(), 0);
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.remaining_capacity(), 2);
        assert_eq!(queue.dequeue(Wait::NoWait), None);

        queue.enqueue(4, Wait::NoWait).unwrap();
        assert_eq!(queue.dequeue(Wait::NoWait), Some(4));
    }

    #[test]
    fn test_clear_drops_elements() {
        let tracked = Arc::new(());
        let queue = DoubleQueue::new(4);
        for _ in 0..3 {
            queue.enqueue(Arc::clone(&tracked), Wait::NoWait).unwrap();
        }
        drop(queue.dequeue(Wait::NoWait));
        queue.enqueue(Arc::clone(&tracked), Wait::NoWait).unwrap();
        assert_eq!(Arc::strong_count(&tracked), 4);

        queue.clear();
        assert_eq!(Arc::strong_count(&tracked), 1);
    }

    #[test]
    fn test_drop_releases_elements() {
        let tracked = Arc::new(());
        {
            let queue = DoubleQueue::new(2);
            queue.enqueue(Arc::clone(&tracked), Wait::NoWait).unwrap();
            queue.enqueue(Arc::clone(&tracked), Wait::NoWait).unwrap();
            drop(queue.dequeue(Wait::NoWait));
            queue.enqueue(Arc::clone(&tracked), Wait::NoWait).unwrap();
        }
        assert_eq!(Arc::strong_count(&tracked), 1);
    }

    #[test]
    fn test_blocked_producer_released_by_swap() {
        let queue = Arc::new(DoubleQueue::new(1));
        queue.enqueue(1, Wait::NoWait).unwrap();

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.enqueue(2, Wait::Forever).is_ok())
        };

        thread::sleep(Duration::from_millis(20));
        assert_eq!(queue.dequeue(Wait::NoWait), Some(1));

        assert!(producer.join().unwrap());
        assert_eq!(queue.dequeue(Wait::millis(500)), Some(2));
    }

    #[test]
    fn test_blocked_consumer_woken_by_enqueue() {
        let queue = Arc::new(DoubleQueue::new(4));

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.dequeue(Wait::Forever))
        };

        thread::sleep(Duration::from_millis(20));
        queue.enqueue(7, Wait::NoWait).unwrap();

        assert_eq!(consumer.join().unwrap(), Some(7));
    }

    #[test]
    fn test_pre_cancelled_token_short_circuits() {
        let queue = DoubleQueue::new(2);
        let token = CancelToken::new();
        token.cancel();

        let err = queue.enqueue_cancellable(1, Wait::Forever, &token).unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.into_inner(), 1);
        assert_eq!(queue.pending(), 0);

        assert_eq!(
            queue.dequeue_cancellable(Wait::Forever, &token),
            Err(QueueError::Cancelled)
        );
    }

    #[test]
    fn test_interrupt_blocked_consumer() {
        let queue: Arc<DoubleQueue<u32>> = Arc::new(DoubleQueue::new(2));
        let token = CancelToken::new();

        let consumer = {
            let queue = Arc::clone(&queue);
            let token = token.clone();
            thread::spawn(move || queue.dequeue_cancellable(Wait::Forever, &token))
        };

        thread::sleep(Duration::from_millis(20));
        queue.interrupt(&token);

        assert_eq!(consumer.join().unwrap(), Err(QueueError::Cancelled));
    }

    #[test]
    fn test_interrupt_blocked_producer_keeps_state() {
        let queue = Arc::new(DoubleQueue::new(1));
        queue.enqueue(1, Wait::NoWait).unwrap();
        let token = CancelToken::new();

        let producer = {
            let queue = Arc::clone(&queue);
            let token = token.clone();
            thread::spawn(move || {
                queue
                    .enqueue_cancellable(2, Wait::Forever, &token)
                    .map_err(OfferError::into_inner)
            })
        };

        thread::sleep(Duration::from_millis(20));
        queue.interrupt(&token);

        assert_eq!(producer.join().unwrap(), Err(2));
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.dequeue(Wait::NoWait), Some(1));
        assert_eq!(queue.dequeue(Wait::NoWait), None);
    }

    /// Runs `interrupt`'s steps while the producer lock is held by the test,
    /// so the waiter is parked on the lock rather than on a condition.
    fn interrupt_while_producer_locked<T>(
        queue: &DoubleQueue<T>,
        token: &CancelToken,
        held: MutexGuard<'_, SlotBuffer<T>>,
    ) {
        token.cancel();
        queue.not_full.notify_all();
        queue.data_available.notify_all();
        drop(held);
    }

    #[test]
    fn test_interrupt_before_producer_sleeps() {
        let queue = Arc::new(DoubleQueue::new(1));
        queue.enqueue(1, Wait::NoWait).unwrap();
        let token = CancelToken::new();
        let (tx, rx) = crossbeam_channel::bounded(1);

        let held = queue.producer.lock();
        let producer = {
            let queue = Arc::clone(&queue);
            let token = token.clone();
            thread::spawn(move || {
                let result = queue.enqueue_cancellable(2, Wait::Forever, &token);
                let _ = tx.send(result.map_err(|e| e.is_cancelled()));
            })
        };

        // Past the entry check, blocked on the producer lock.
        thread::sleep(Duration::from_millis(20));
        interrupt_while_producer_locked(&queue, &token, held);

        let result = rx.recv_timeout(Duration::from_secs(2));
        assert_eq!(result, Ok(Err(true)), "cancelled enqueue kept sleeping");
        producer.join().unwrap();
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_interrupt_before_consumer_sleeps() {
        let queue: Arc<DoubleQueue<u32>> = Arc::new(DoubleQueue::new(2));
        let token = CancelToken::new();
        let (tx, rx) = crossbeam_channel::bounded(1);

        let held = queue.producer.lock();
        let consumer = {
            let queue = Arc::clone(&queue);
            let token = token.clone();
            thread::spawn(move || {
                let _ = tx.send(queue.dequeue_cancellable(Wait::Forever, &token));
            })
        };

        // Holding the consumer lock, blocked on the producer lock in swap.
        thread::sleep(Duration::from_millis(20));
        interrupt_while_producer_locked(&queue, &token, held);

        let result = rx.recv_timeout(Duration::from_secs(2));
        assert_eq!(result, Ok(Err(QueueError::Cancelled)), "cancelled dequeue kept sleeping");
        consumer.join().unwrap();

        queue.enqueue(5, Wait::NoWait).unwrap();
        assert_eq!(queue.dequeue(Wait::NoWait), Some(5));
    }

    #[test]
    fn test_debug_output() {
        let queue = DoubleQueue::new(3);
        queue.enqueue('x', Wait::NoWait).unwrap();
        let text = format!("{queue:?}");
        assert!(text.contains("capacity: 3"));
        assert!(text.contains("size: Some(0)"));
        assert!(text.contains("pending: Some(1)"));
    }
}
