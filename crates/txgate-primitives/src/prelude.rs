//! Prelude for txgate-primitives.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use txgate_primitives::prelude::*;
//!
//! let gate = Gate::default();
//! let timer = OneShotTimer::new("prelude");
//! assert_eq!(gate.current_count(), 1);
//! assert_eq!(timer.state(), TimerState::Idle);
//! ```

pub use crate::error::{TimerError, TimerResult};
pub use crate::gate::Gate;
pub use crate::timer::{OneShotTimer, TimerId, TimerState};
