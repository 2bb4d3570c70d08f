//! # Double Queue
//!
//! Bounded, thread-safe FIFO queue for producer/consumer hand-off under
//! sustained load.
//!
//! ## Design
//!
//! ```text
//!   producers ──> [ write buffer ]        [ read buffer ] ──> consumers
//!                  producer lock           consumer lock
//!                         └──── swap when read is drained ────┘
//! ```
//!
//! Producers append to one buffer, consumers drain the other, each under
//! its own lock. When the read buffer runs dry the consumer takes the
//! producer lock once and trades the two buffers. The trade moves two
//! boxed slices, never the elements, so it costs the same at any depth.
//!
//! ## Rules
//!
//! 1. **Fixed memory** - both buffers are allocated at construction
//! 2. **Timeouts are values** - a full or empty queue is `Err(Timeout)` or `None`
//! 3. **Epoch ordering** - FIFO within a buffer, weaker across a swap
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use double_queue::{DoubleQueue, Wait};
//!
//! let queue = Arc::new(DoubleQueue::new(1024));
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             queue.put(i);
//!         }
//!     })
//! };
//!
//! let mut received = Vec::new();
//! while received.len() < 100 {
//!     if let Some(value) = queue.dequeue(Wait::millis(100)) {
//!         received.push(value);
//!     }
//! }
//! producer.join().unwrap();
//! assert_eq!(received, (0..100).collect::<Vec<_>>());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod buffer;
pub mod config;
pub mod error;
mod queue;
pub mod sync;

pub use config::{QueueConfig, DEFAULT_CAPACITY, DEFAULT_TIMEOUT};
pub use error::{OfferError, QueueError, QueueResult};
pub use queue::DoubleQueue;
pub use sync::{CancelToken, Wait};
