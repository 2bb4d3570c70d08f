//! # Slot Buffers
//!
//! Fixed-size element storage for one side of the queue.
//!
//! ```text
//!   write side                      read side
//!   ┌───┬───┬───┬───┐               ┌───┬───┬───┬───┐
//!   │ a │ b │ c │   │   exchange    │   │   │ x │ y │
//!   └───┴───┴───┴───┘  <-------->   └───┴───┴───┴───┘
//!   head=0     tail=3               head=2     tail=4
//! ```
//!
//! The write side only appends at `tail`, the read side only takes from
//! `head`. [`exchange`] trades the two slot arrays without touching any
//! element, so the cost of handing a full buffer to the consumer does not
//! depend on how many elements it holds.
//!
//! Nothing here locks. Callers own a `SlotBuffer` through a mutex guard.

use std::mem;

/// One fixed-capacity buffer plus its cursors.
pub(crate) struct SlotBuffer<T> {
    /// Storage. Allocated once, never resized.
    slots: Box<[Option<T>]>,
    /// Index of the next element to take.
    head: usize,
    /// Index of the next free slot.
    tail: usize,
    /// Number of live elements.
    count: usize,
}

impl<T> SlotBuffer<T> {
    /// Allocates `capacity` empty slots.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "slot buffer capacity must be non-zero");

        let slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();

        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Full means no slot is left past `tail`. Slots freed from the front
    /// are only reused after the next exchange.
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.tail >= self.slots.len()
    }

    /// Appends at `tail`.
    ///
    /// The caller checks [`is_full`](Self::is_full) first.
    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(!self.is_full(), "push into a full slot buffer");

        self.slots[self.tail] = Some(value);
        self.tail += 1;
        self.count += 1;
    }

    /// Takes the element at `head` and leaves the slot empty.
    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let value = self.slots[self.head].take();
        self.head += 1;
        self.count -= 1;
        value
    }

    /// Borrows the element at `head`.
    #[inline]
    pub(crate) fn front(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Drops every live element and rewinds the cursors.
    pub(crate) fn reset(&mut self) {
        for slot in &mut self.slots[self.head..self.tail] {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }
}

/// Promotes the write buffer to be the new read buffer.
///
/// Only the boxed slot arrays trade places. Afterwards `read` holds what
/// `write` held, cursors starting at zero, and `write` is empty.
///
/// The caller holds both locks and has checked that `read` is drained and
/// `write` is not empty.
pub(crate) fn exchange<T>(write: &mut SlotBuffer<T>, read: &mut SlotBuffer<T>) {
    debug_assert!(read.is_empty(), "exchange with a non-empty read buffer");

    mem::swap(&mut write.slots, &mut read.slots);

    read.count = write.count;
    read.head = 0;
    read.tail = write.tail;

    write.count = 0;
    write.tail = 0;
    write.head = read.head;
}
