//! Shared test utilities for txgate.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Assertions on controller state
//! - [`wait`] - Polling helper for conditions reached on timer threads
//! - [`mock`] - Recording collaborators for the transaction controller
//! - [`logging`] - Test subscriber initialisation
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! txgate-test-helpers = { path = "crates/txgate-test-helpers" }
//! ```
//!
//! ```rust,ignore
//! use txgate_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod must;
pub mod prelude;
pub mod wait;

#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod assertions;

#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

pub use must::*;
pub use wait::wait_for;
