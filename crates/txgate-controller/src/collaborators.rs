//! Interfaces to the surrounding stack.
//!
//! The controller decides *when* backlog processing resumes; the request
//! queue decides *what* is resumed. These traits are the seam between them.

use std::sync::Arc;
use std::thread;

use crate::config::ControllerConfig;
use crate::state::SharedTransactionState;

/// Reports whether requests arrived while the channel was held.
pub trait PendingRequestOracle: Send + Sync {
    /// `true` if backlog processing should be resumed after a release.
    fn has_pending_request(&self) -> bool;
}

impl<F> PendingRequestOracle for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn has_pending_request(&self) -> bool {
        self()
    }
}

/// Oracle for stacks without a request queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPendingRequests;

impl PendingRequestOracle for NoPendingRequests {
    fn has_pending_request(&self) -> bool {
        false
    }
}

/// Launches the worker that resumes backlog processing.
///
/// Fire-and-forget: the controller consumes no result.
pub trait ResumeSpawner: Send + Sync {
    /// Start one detached unit of work.
    fn spawn_resume_worker(&self);
}

impl<F> ResumeSpawner for F
where
    F: Fn() + Send + Sync,
{
    fn spawn_resume_worker(&self) {
        self();
    }
}

type ResumeJob = dyn Fn() + Send + Sync;

/// Spawner that runs a job on a fresh, detached OS thread.
pub struct ThreadResumeSpawner {
    name: String,
    job: Arc<ResumeJob>,
}

impl ThreadResumeSpawner {
    /// Create a spawner whose threads are named `name` and run `job`.
    pub fn new<F>(name: impl Into<String>, job: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            job: Arc::new(job),
        }
    }

    /// Create a spawner named after `config.worker_name`.
    pub fn from_config<F>(config: &ControllerConfig, job: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(config.worker_name.clone(), job)
    }

    /// Thread name given to spawned workers.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ResumeSpawner for ThreadResumeSpawner {
    fn spawn_resume_worker(&self) {
        let job = Arc::clone(&self.job);
        let spawned = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || job());

        if let Err(e) = spawned {
            tracing::error!(worker = %self.name, error = %e, "Unable to spawn resume worker");
        }
    }
}

impl std::fmt::Debug for ThreadResumeSpawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadResumeSpawner")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Everything the controller consumes from the surrounding stack.
#[derive(Clone)]
pub struct Collaborators {
    /// Shared transaction record.
    pub state: Arc<SharedTransactionState>,
    /// Pending-request query.
    pub oracle: Arc<dyn PendingRequestOracle>,
    /// Resume worker launcher.
    pub spawner: Arc<dyn ResumeSpawner>,
}

impl Collaborators {
    /// Bundle the given collaborators.
    pub fn new(
        state: Arc<SharedTransactionState>,
        oracle: Arc<dyn PendingRequestOracle>,
        spawner: Arc<dyn ResumeSpawner>,
    ) -> Self {
        Self {
            state,
            oracle,
            spawner,
        }
    }

    /// Fresh state, no pending requests and a spawner that does nothing.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(
            Arc::new(SharedTransactionState::new()),
            Arc::new(NoPendingRequests),
            Arc::new(|| {}),
        )
    }

    /// Replace the pending-request oracle.
    #[must_use]
    pub fn with_oracle(mut self, oracle: Arc<dyn PendingRequestOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Replace the resume spawner.
    #[must_use]
    pub fn with_spawner(mut self, spawner: Arc<dyn ResumeSpawner>) -> Self {
        self.spawner = spawner;
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("state", &self.state.snapshot())
            .finish_non_exhaustive()
    }
}
