//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use txgate_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_some};
pub use crate::wait::wait_for;

#[cfg(feature = "mock")]
pub use crate::assertions::{assert_free, assert_held};
#[cfg(feature = "mock")]
pub use crate::mock::{
    Instrumented, RecordingSpawner, SwitchableOracle, instrumented, recording_collaborators,
};

#[cfg(feature = "logging")]
pub use crate::logging::init_test_logging;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
