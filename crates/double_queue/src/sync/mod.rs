//! # Blocking and Cancellation
//!
//! ```text
//!   enqueue ──lock──> producer mutex ──full?──> wait "not full"
//!                                                     ▲
//!   dequeue ──lock──> consumer mutex                  │ swap
//!                        │ read empty                 │
//!                        └──lock──> producer mutex ───┘
//!                                      │ write empty
//!                                      └──> wait "data available"
//! ```
//!
//! Both condition variables belong to the producer mutex. A consumer can
//! hold both mutexes at once (consumer first), a producer only ever holds
//! its own.

mod cancel;
mod wait;

pub use cancel::CancelToken;
pub use wait::Wait;

pub(crate) use cancel::is_cancelled;
pub(crate) use wait::Deadline;
