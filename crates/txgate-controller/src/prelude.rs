//! Prelude for txgate-controller.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use txgate_controller::prelude::*;
//!
//! let controller = TransactionController::new(
//!     ControllerConfig::default(),
//!     Collaborators::detached(),
//! )?;
//! assert_eq!(controller.current_holder(), Requestor::None);
//! # Ok::<(), ControllerError>(())
//! ```

pub use crate::collaborators::{
    Collaborators, NoPendingRequests, PendingRequestOracle, ResumeSpawner, ThreadResumeSpawner,
};
pub use crate::config::{ControllerConfig, ControllerConfigBuilder};
pub use crate::controller::TransactionController;
pub use crate::error::{ControllerError, ControllerResult};
pub use crate::registry::ControllerRegistry;
pub use crate::requestor::Requestor;
pub use crate::state::{SharedTransactionState, TransactionDetail, TransactionPhase};
pub use crate::stats::StatsSnapshot;
