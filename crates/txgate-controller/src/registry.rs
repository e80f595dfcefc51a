//! Owner of the process-wide controller instance.
//!
//! Getting the instance and reinitialising it are separate operations:
//! [`ControllerRegistry::create_or_get`] never mutates an existing controller,
//! [`ControllerRegistry::reset`] always returns it to a clean state.

use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

use crate::collaborators::Collaborators;
use crate::config::ControllerConfig;
use crate::controller::TransactionController;
use crate::error::{ControllerError, ControllerResult};
use crate::state::SharedTransactionState;

static GLOBAL: OnceLock<ControllerRegistry> = OnceLock::new();

/// Lazily creates and owns a single [`TransactionController`].
pub struct ControllerRegistry {
    config: ControllerConfig,
    collaborators: Collaborators,
    instance: RwLock<Option<Arc<TransactionController>>>,
}

impl ControllerRegistry {
    /// Create an empty registry. No controller exists until first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ControllerConfig, collaborators: Collaborators) -> ControllerResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            collaborators,
            instance: RwLock::new(None),
        })
    }

    /// The existing controller, or a newly created one.
    pub fn create_or_get(&self) -> Arc<TransactionController> {
        if let Some(controller) = self.instance.read().as_ref() {
            return Arc::clone(controller);
        }

        let mut slot = self.instance.write();
        match slot.as_ref() {
            Some(controller) => Arc::clone(controller),
            None => {
                let controller = self.spawn_controller();
                *slot = Some(Arc::clone(&controller));
                controller
            }
        }
    }

    /// Create the controller if needed, otherwise reinitialise it; in both
    /// cases the shared transaction record is zeroed.
    ///
    /// Calling this twice in a row yields the same observable state.
    pub fn reset(&self) -> Arc<TransactionController> {
        let mut slot = self.instance.write();
        let controller = match slot.as_ref() {
            Some(controller) => {
                controller.reinitialize();
                Arc::clone(controller)
            }
            None => {
                let controller = self.spawn_controller();
                *slot = Some(Arc::clone(&controller));
                controller
            }
        };
        drop(slot);

        self.collaborators.state.zero();
        controller
    }

    /// The controller if one has been created, with no side effects.
    #[must_use]
    pub fn get_existing(&self) -> Option<Arc<TransactionController>> {
        self.instance.read().clone()
    }

    /// Shared transaction record handed to the controller.
    #[must_use]
    pub fn shared_state(&self) -> &Arc<SharedTransactionState> {
        &self.collaborators.state
    }

    /// Configuration used for the controller.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn spawn_controller(&self) -> Arc<TransactionController> {
        TransactionController::build(self.config.clone(), self.collaborators.clone())
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("config", &self.config)
            .field("created", &self.instance.read().is_some())
            .finish_non_exhaustive()
    }
}

/// Install `registry` as the process-wide registry.
///
/// # Errors
///
/// Returns [`ControllerError::RegistryAlreadyInstalled`] if one is already installed.
pub fn install_global(registry: ControllerRegistry) -> ControllerResult<&'static ControllerRegistry> {
    if GLOBAL.set(registry).is_err() {
        return Err(ControllerError::RegistryAlreadyInstalled);
    }
    GLOBAL.get().ok_or(ControllerError::RegistryAlreadyInstalled)
}

/// The process-wide registry, if installed.
#[must_use]
pub fn global() -> Option<&'static ControllerRegistry> {
    GLOBAL.get()
}
