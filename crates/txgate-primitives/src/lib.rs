//! # txgate-primitives
//!
//! Synchronisation building blocks for serialising access to a single,
//! non-reentrant transaction channel (for example one contactless-radio
//! command/response cycle).
//!
//! ## Architecture
//!
//! - [`gate`] - [`Gate`], a capacity-1 counting primitive with blocking,
//!   non-blocking and guarded release operations
//! - [`timer`] - [`OneShotTimer`], a cancelable one-shot timer that runs its
//!   callback on a dispatch thread independent of the caller
//! - [`error`] - Timer error types
//!
//! ## Invariants
//!
//! - A [`Gate`] count is always `0` or `1`. [`Gate::release`] checks the count
//!   before raising it, so a second release is rejected instead of overrunning
//!   the capacity.
//! - Once [`OneShotTimer::cancel`] returns, the timer's callback will not start.
//!   A cancelled timer is spent; callers allocate a new instance for the next arm.
//!
//! ## Example
//!
//! ```rust
//! use txgate_primitives::prelude::*;
//! use std::time::Duration;
//!
//! let gate = Gate::new();
//! assert!(gate.try_acquire());
//! assert!(!gate.acquire_blocking(Duration::ZERO));
//! assert!(gate.release());
//! assert!(!gate.release());
//! assert_eq!(gate.current_count(), 1);
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod gate;
pub mod timer;

pub mod prelude;

pub use error::{TimerError, TimerResult};
pub use gate::Gate;
pub use timer::{OneShotTimer, TimerId, TimerState};
