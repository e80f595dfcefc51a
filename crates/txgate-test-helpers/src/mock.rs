//! Recording collaborators for the transaction controller.
//!
//! These stand in for the request queue and worker launcher so tests can
//! drive the pending-request path and observe resume workers.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, ThreadId};
use txgate_controller::{
    Collaborators, ControllerConfig, PendingRequestOracle, ResumeSpawner, SharedTransactionState,
    TransactionController,
};

/// Oracle whose answer the test flips at will.
#[derive(Debug, Default)]
pub struct SwitchableOracle {
    pending: AtomicBool,
    queries: AtomicUsize,
}

impl SwitchableOracle {
    /// Create an oracle reporting `pending`.
    #[must_use]
    pub fn new(pending: bool) -> Self {
        Self {
            pending: AtomicBool::new(pending),
            queries: AtomicUsize::new(0),
        }
    }

    /// Change the reported answer.
    pub fn set_pending(&self, pending: bool) {
        self.pending.store(pending, Ordering::SeqCst);
    }

    /// Number of times the controller asked.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl PendingRequestOracle for SwitchableOracle {
    fn has_pending_request(&self) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.pending.load(Ordering::SeqCst)
    }
}

/// Spawner that records each launch instead of starting real work.
#[derive(Debug, Default)]
pub struct RecordingSpawner {
    spawns: AtomicUsize,
    threads: Mutex<Vec<ThreadId>>,
}

impl RecordingSpawner {
    /// Create a spawner with no launches recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resume workers launched.
    #[must_use]
    pub fn spawns(&self) -> usize {
        self.spawns.load(Ordering::SeqCst)
    }

    /// Threads the launches were requested from.
    #[must_use]
    pub fn caller_threads(&self) -> Vec<ThreadId> {
        self.threads.lock().clone()
    }
}

impl ResumeSpawner for RecordingSpawner {
    fn spawn_resume_worker(&self) {
        self.threads.lock().push(thread::current().id());
        self.spawns.fetch_add(1, Ordering::SeqCst);
    }
}

/// A controller wired to fresh recording collaborators.
#[derive(Debug)]
pub struct Instrumented {
    /// Controller under test.
    pub controller: Arc<TransactionController>,
    /// Oracle handed to the controller.
    pub oracle: Arc<SwitchableOracle>,
    /// Spawner handed to the controller.
    pub spawner: Arc<RecordingSpawner>,
    /// Shared transaction record handed to the controller.
    pub state: Arc<SharedTransactionState>,
}

/// Collaborators backed by a [`SwitchableOracle`] and a [`RecordingSpawner`].
#[must_use]
pub fn recording_collaborators(
    pending: bool,
) -> (Collaborators, Arc<SwitchableOracle>, Arc<RecordingSpawner>) {
    let oracle = Arc::new(SwitchableOracle::new(pending));
    let spawner = Arc::new(RecordingSpawner::new());
    let collaborators = Collaborators::detached()
        .with_oracle(Arc::clone(&oracle) as Arc<dyn PendingRequestOracle>)
        .with_spawner(Arc::clone(&spawner) as Arc<dyn ResumeSpawner>);
    (collaborators, oracle, spawner)
}

/// Build a controller with `config` and recording collaborators.
///
/// # Panics
///
/// Panics if `config` is invalid.
#[track_caller]
#[must_use]
pub fn instrumented(config: ControllerConfig) -> Instrumented {
    let (collaborators, oracle, spawner) = recording_collaborators(false);
    let state = Arc::clone(&collaborators.state);
    let controller = crate::must::must(TransactionController::new(config, collaborators));
    Instrumented {
        controller,
        oracle,
        spawner,
        state,
    }
}
