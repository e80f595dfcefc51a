//! # txgate-controller
//!
//! Transaction controller serialising access to a single, non-reentrant
//! hardware transaction channel shared by competing request sources.
//!
//! ## Responsibilities
//!
//! - **Exclusive access**: one requestor holds the channel at a time, acquired
//!   with a blocking-with-timeout or non-blocking attempt.
//! - **Watchdog recovery**: livelock-prone requestors get a watchdog that
//!   forcibly terminates the transaction if it is never ended.
//! - **Pending resume**: a release that finds queued work schedules a worker
//!   to resume it, and new attempts are denied until that worker is launched.
//! - **Capacity guard**: the gate count never exceeds one, whichever release
//!   path (end, terminate, watchdog) fires.
//!
//! ## Architecture
//!
//! - [`controller`] - [`TransactionController`], the orchestrator
//! - [`registry`] - [`ControllerRegistry`], lazy process-wide ownership and reset
//! - [`requestor`] - [`Requestor`] identities and the livelock-prone predicate
//! - [`state`] - [`SharedTransactionState`], the record shared with the stack
//! - [`collaborators`] - Pending-request oracle and resume-worker spawner seams
//! - [`config`] - [`ControllerConfig`] and its builder
//! - [`stats`] - Diagnostic counters
//! - [`error`] - Setup error types
//!
//! ## Example
//!
//! ```rust
//! use txgate_controller::prelude::*;
//! use std::time::Duration;
//!
//! let registry = ControllerRegistry::new(ControllerConfig::default(), Collaborators::detached())?;
//! let controller = registry.reset();
//!
//! assert!(controller.attempt(Requestor::EnableDiscovery, Duration::from_millis(10)));
//! assert!(!controller.attempt(Requestor::SetRouting, Duration::ZERO));
//!
//! controller.end(Requestor::EnableDiscovery);
//! assert_eq!(controller.gate_count(), 1);
//! assert!(controller.try_attempt(Requestor::SetRouting));
//! # Ok::<(), ControllerError>(())
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

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod error;
pub mod registry;
pub mod requestor;
pub mod state;
pub mod stats;

pub mod prelude;

pub use collaborators::{
    Collaborators, NoPendingRequests, PendingRequestOracle, ResumeSpawner, ThreadResumeSpawner,
};
pub use config::{ControllerConfig, ControllerConfigBuilder};
pub use controller::TransactionController;
pub use error::{ControllerError, ControllerResult};
pub use registry::{ControllerRegistry, global, install_global};
pub use requestor::Requestor;
pub use state::{SharedTransactionState, TransactionDetail, TransactionPhase};
pub use stats::{ControllerStats, StatsSnapshot};
