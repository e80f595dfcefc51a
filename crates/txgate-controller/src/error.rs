//! Error types for controller construction and configuration.
//!
//! Transaction operations (`attempt`, `end`, `terminate`) never return these:
//! their outcomes are booleans, and internal failures are logged.

use thiserror::Error;

/// Errors raised by controller setup surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A process-wide registry has already been installed.
    #[error("Controller registry already installed")]
    RegistryAlreadyInstalled,
}

impl ControllerError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

/// A specialized `Result` type for controller setup.
pub type ControllerResult<T> = std::result::Result<T, ControllerError>;
