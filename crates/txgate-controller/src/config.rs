//! Controller configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ControllerError, ControllerResult};

/// Upper bound accepted for the watchdog delay.
pub const MAX_WATCHDOG_DELAY: Duration = Duration::from_secs(60);

/// Transaction controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Delay before a livelock-prone transaction is forcibly terminated.
    pub watchdog_delay: Duration,
    /// Delay before the pending-resume callback runs after a release.
    pub resume_delay: Duration,
    /// Emit debug events for attempt/grant/deny/end/terminate.
    pub debug_logging: bool,
    /// Thread name for resume workers started by the default spawner.
    pub worker_name: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            watchdog_delay: Duration::from_secs(1),
            resume_delay: Duration::from_millis(1),
            debug_logging: false,
            worker_name: "txgate-resume".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> ControllerResult<()> {
        if self.watchdog_delay.is_zero() {
            return Err(ControllerError::invalid_configuration(
                "watchdog_delay must be greater than 0",
            ));
        }
        if self.watchdog_delay > MAX_WATCHDOG_DELAY {
            return Err(ControllerError::invalid_configuration(
                "watchdog_delay must not exceed 60s",
            ));
        }
        if self.resume_delay.is_zero() {
            return Err(ControllerError::invalid_configuration(
                "resume_delay must be greater than 0",
            ));
        }
        if self.worker_name.is_empty() {
            return Err(ControllerError::invalid_configuration(
                "worker_name must not be empty",
            ));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }
}

/// Builder for `ControllerConfig`.
#[derive(Debug, Default)]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    /// Set the watchdog delay.
    #[must_use]
    pub fn watchdog_delay(mut self, delay: Duration) -> Self {
        self.config.watchdog_delay = delay;
        self
    }

    /// Set the pending-resume delay.
    #[must_use]
    pub fn resume_delay(mut self, delay: Duration) -> Self {
        self.config.resume_delay = delay;
        self
    }

    /// Enable or disable debug events.
    #[must_use]
    pub fn debug_logging(mut self, enabled: bool) -> Self {
        self.config.debug_logging = enabled;
        self
    }

    /// Set the resume worker thread name.
    #[must_use]
    pub fn worker_name(mut self, name: impl Into<String>) -> Self {
        self.config.worker_name = name.into();
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> ControllerResult<ControllerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
