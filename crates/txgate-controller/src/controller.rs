//! Transaction controller.
//!
//! Serialises requestors onto the channel through a [`Gate`], arms a watchdog
//! for livelock-prone holders, and schedules a resume of backlog processing
//! when a release finds pending requests.
//!
//! Exactly one release path acts for a given acquisition. `end`, `terminate`
//! and the watchdog all go through a compare-and-clear of the holder field, so
//! only the caller that observes its own authorisation and clears the holder
//! proceeds to release the gate. [`Gate::release`] rejects anything that slips
//! past that check.

use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use std::time::Duration;
use txgate_primitives::{Gate, OneShotTimer, TimerId};

use crate::collaborators::{Collaborators, PendingRequestOracle, ResumeSpawner};
use crate::config::ControllerConfig;
use crate::error::ControllerResult;
use crate::requestor::Requestor;
use crate::state::{SharedTransactionState, TransactionPhase};
use crate::stats::{ControllerStats, StatsSnapshot};

const WATCHDOG_TIMER: &str = "watchdog";
const RESUME_TIMER: &str = "pending-resume";

macro_rules! txn_debug {
    ($self:ident, $($arg:tt)+) => {
        if $self.config.debug_logging {
            tracing::debug!($($arg)+);
        }
    };
}

/// Mutual-exclusion gate with watchdog recovery and pending-request resume.
///
/// Controllers are always handed out as `Arc<TransactionController>`; timer
/// callbacks hold a weak reference back to the controller that armed them.
///
/// # Example
///
/// ```rust
/// use txgate_controller::prelude::*;
/// use std::time::Duration;
///
/// let controller = TransactionController::new(
///     ControllerConfig::default(),
///     Collaborators::detached(),
/// )?;
///
/// assert!(controller.attempt(Requestor::SetRouting, Duration::ZERO));
/// assert!(controller.in_progress());
/// assert!(!controller.try_attempt(Requestor::SeTransceive));
///
/// controller.end(Requestor::SetRouting);
/// assert!(!controller.in_progress());
/// assert!(controller.try_attempt(Requestor::SeTransceive));
/// # Ok::<(), txgate_controller::ControllerError>(())
/// ```
pub struct TransactionController {
    config: ControllerConfig,
    state: Arc<SharedTransactionState>,
    oracle: Arc<dyn PendingRequestOracle>,
    spawner: Arc<dyn ResumeSpawner>,
    holder: Mutex<Requestor>,
    gate: RwLock<Arc<Gate>>,
    watchdog: Mutex<OneShotTimer>,
    pending_resume: Mutex<OneShotTimer>,
    stats: ControllerStats,
    this: Weak<Self>,
}

impl TransactionController {
    /// Create a controller after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ControllerConfig, collaborators: Collaborators) -> ControllerResult<Arc<Self>> {
        config.validate()?;
        Ok(Self::build(config, collaborators))
    }

    pub(crate) fn build(config: ControllerConfig, collaborators: Collaborators) -> Arc<Self> {
        let Collaborators {
            state,
            oracle,
            spawner,
        } = collaborators;

        let controller = Arc::new_cyclic(|this| Self {
            config,
            state,
            oracle,
            spawner,
            holder: Mutex::new(Requestor::None),
            gate: RwLock::new(Arc::new(Gate::new())),
            watchdog: Mutex::new(OneShotTimer::new(WATCHDOG_TIMER)),
            pending_resume: Mutex::new(OneShotTimer::new(RESUME_TIMER)),
            stats: ControllerStats::default(),
            this: Weak::clone(this),
        });
        txn_debug!(controller, "Transaction controller created");
        controller
    }

    /// Acquire the channel, waiting up to `timeout`.
    ///
    /// Denied immediately, without touching the gate, while a pending resume
    /// is scheduled. Returns `true` only when the gate was acquired; nothing
    /// changes on a `false` return.
    pub fn attempt(&self, requestor: Requestor, timeout: Duration) -> bool {
        let Some(gate) = self.admit(requestor) else {
            return false;
        };
        if !gate.acquire_blocking(timeout) {
            self.deny_busy(requestor);
            return false;
        }
        self.grant(requestor, &gate)
    }

    /// Acquire the channel only if it is free right now.
    ///
    /// Same admission policy as [`TransactionController::attempt`], never blocks.
    pub fn try_attempt(&self, requestor: Requestor) -> bool {
        let Some(gate) = self.admit(requestor) else {
            return false;
        };
        if !gate.try_acquire() {
            self.deny_busy(requestor);
            return false;
        }
        self.grant(requestor, &gate)
    }

    /// Normal-path release by the current holder.
    ///
    /// No-op unless `requestor` is the current holder.
    pub fn end(&self, requestor: Requestor) {
        txn_debug!(self, requestor = %requestor, "Transaction end requested");
        if requestor.is_sentinel() || self.claim_holder(|holder| holder == requestor).is_none() {
            return;
        }

        self.disarm_watchdog();
        self.state.set_in_progress(false);
        self.stats.record_end();
        txn_debug!(self, requestor = %requestor, "Transaction ended");

        self.finish_release();
    }

    /// Recovery-path release.
    ///
    /// Succeeds when a holder exists and `requestor` is that holder or
    /// [`Requestor::ExecPending`].
    pub fn terminate(&self, requestor: Requestor) -> bool {
        txn_debug!(self, requestor = %requestor, "Transaction terminate requested");
        self.force_release(requestor, |holder| {
            requestor == holder || requestor == Requestor::ExecPending
        })
    }

    /// Re-arm the watchdog with `delay`. No-op unless a transaction is in progress.
    pub fn set_abort_timer(&self, delay: Duration) {
        // Armed under the holder lock so a concurrent release either runs
        // first and leaves nothing to watch, or disarms this timer after.
        let holder = self.holder.lock();
        if *holder == Requestor::None {
            txn_debug!(self, ?delay, "Abort timer not set: no transaction in progress");
            return;
        }
        self.arm_watchdog(delay);
        txn_debug!(self, ?delay, holder = %*holder, "Transaction abort timer set");
    }

    /// Cancel the watchdog. No-op unless a transaction is in progress.
    pub fn kill_abort_timer(&self) {
        let holder = self.holder.lock();
        if *holder == Requestor::None {
            return;
        }
        self.disarm_watchdog();
        txn_debug!(self, holder = %*holder, "Transaction abort timer killed");
    }

    /// Whether a transaction is in progress, read from the shared state.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.state.in_progress()
    }

    /// Current holder, [`Requestor::None`] when free.
    #[must_use]
    pub fn current_holder(&self) -> Requestor {
        *self.holder.lock()
    }

    /// Gate count, `1` when free. Racy; diagnostics only.
    #[must_use]
    pub fn gate_count(&self) -> usize {
        self.gate().current_count()
    }

    /// Whether the watchdog has a callback scheduled or running.
    #[must_use]
    pub fn watchdog_armed(&self) -> bool {
        self.watchdog.lock().is_pending()
    }

    /// Whether a pending resume is scheduled. New attempts are denied while it is.
    #[must_use]
    pub fn resume_pending(&self) -> bool {
        self.pending_resume.lock().is_pending()
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Shared transaction record this controller writes.
    #[must_use]
    pub fn shared_state(&self) -> &Arc<SharedTransactionState> {
        &self.state
    }

    /// Return to a known-clean state.
    ///
    /// Clears the holder and in-progress flag, discards both timers for fresh
    /// instances, replaces the gate with a new one at capacity and zeroes the
    /// shared record. A thread still blocked in [`TransactionController::attempt`]
    /// keeps waiting on the discarded gate until its timeout.
    pub fn reinitialize(&self) {
        let mut holder = self.holder.lock();
        self.state.set_in_progress(false);
        *holder = Requestor::None;
        replace_timer(&self.watchdog, WATCHDOG_TIMER);
        replace_timer(&self.pending_resume, RESUME_TIMER);
        *self.gate.write() = Arc::new(Gate::new());
        drop(holder);
        self.state.zero();
        txn_debug!(self, "Transaction controller initialized");
    }

    fn gate(&self) -> Arc<Gate> {
        Arc::clone(&self.gate.read())
    }

    fn admit(&self, requestor: Requestor) -> Option<Arc<Gate>> {
        self.stats.record_attempt();
        let gate = self.gate();
        txn_debug!(
            self,
            requestor = %requestor,
            gate_count = gate.current_count(),
            "Transaction attempted"
        );

        if requestor.is_sentinel() {
            tracing::warn!(requestor = %requestor, "Sentinel requestor cannot hold the channel");
            self.stats.record_denied_busy();
            return None;
        }
        if self.resume_pending() {
            self.stats.record_denied_recovering();
            txn_debug!(
                self,
                requestor = %requestor,
                "Transaction denied due to pending transaction"
            );
            return None;
        }
        Some(gate)
    }

    fn deny_busy(&self, requestor: Requestor) {
        self.stats.record_denied_busy();
        txn_debug!(self, requestor = %requestor, "Transaction denied");
    }

    /// Record `requestor` as holder of `gate`, which it has just acquired.
    ///
    /// Fails if a reinitialisation replaced `gate` after admission; the permit
    /// goes back to the discarded gate and the attempt is denied.
    fn grant(&self, requestor: Requestor, gate: &Arc<Gate>) -> bool {
        let mut holder = self.holder.lock();
        if !Arc::ptr_eq(gate, &*self.gate.read()) {
            drop(holder);
            gate.release();
            tracing::warn!(requestor = %requestor, "Acquired gate was replaced by a reset");
            self.deny_busy(requestor);
            return false;
        }

        self.state.set_in_progress(true);
        *holder = requestor;
        if requestor.is_livelock_prone() {
            self.arm_watchdog(self.config.watchdog_delay);
        }
        drop(holder);

        self.stats.record_grant();
        txn_debug!(
            self,
            requestor = %requestor,
            gate_count = gate.current_count(),
            "Transaction granted"
        );
        true
    }

    /// Clear the holder if `authorised` accepts it; returns the previous holder.
    fn claim_holder(&self, authorised: impl FnOnce(Requestor) -> bool) -> Option<Requestor> {
        let mut holder = self.holder.lock();
        if *holder == Requestor::None || !authorised(*holder) {
            return None;
        }
        Some(std::mem::replace(&mut *holder, Requestor::None))
    }

    fn force_release(
        &self,
        requestor: Requestor,
        authorised: impl FnOnce(Requestor) -> bool,
    ) -> bool {
        let Some(previous) = self.claim_holder(authorised) else {
            txn_debug!(self, requestor = %requestor, "Transaction terminate denied");
            return false;
        };

        self.state.set_in_progress(false);
        self.disarm_watchdog();
        self.stats.record_termination();
        txn_debug!(
            self,
            requestor = %requestor,
            holder = %previous,
            "Transaction terminated"
        );

        self.finish_release();
        true
    }

    fn finish_release(&self) {
        if self.oracle.has_pending_request() {
            self.schedule_resume();
        }
        if !self.gate().release() {
            self.stats.record_rejected_release();
        }
    }

    fn arm_watchdog(&self, delay: Duration) {
        let mut slot = self.watchdog.lock();
        *slot = OneShotTimer::new(WATCHDOG_TIMER);

        let timer_id = slot.id();
        let this = Weak::clone(&self.this);
        let armed = slot.arm(delay, move || {
            if let Some(controller) = this.upgrade() {
                controller.on_watchdog_expiry(timer_id);
            }
        });

        if let Err(e) = armed {
            tracing::error!(error = %e, "Unable to arm transaction watchdog");
        }
    }

    fn disarm_watchdog(&self) {
        replace_timer(&self.watchdog, WATCHDOG_TIMER);
    }

    fn on_watchdog_expiry(&self, timer_id: TimerId) {
        txn_debug!(self, timer = %timer_id, "Transaction watchdog expired");

        // The slot check runs under the holder lock so an expiry racing a
        // new grant cannot terminate the transaction that replaced its own.
        let current = |_: Requestor| self.watchdog.lock().id() == timer_id;
        if self.force_release(Requestor::ExecPending, current) {
            self.stats.record_watchdog_expiry();
        } else {
            txn_debug!(self, timer = %timer_id, "Stale watchdog expiry ignored");
        }
    }

    fn schedule_resume(&self) {
        let mut slot = self.pending_resume.lock();
        if slot.is_pending() {
            txn_debug!(self, "Pending resume already scheduled");
            return;
        }
        if slot.state().is_spent() {
            *slot = OneShotTimer::new(RESUME_TIMER);
        }

        let timer_id = slot.id();
        let this = Weak::clone(&self.this);
        let armed = slot.arm(self.config.resume_delay, move || {
            if let Some(controller) = this.upgrade() {
                controller.on_resume(timer_id);
            }
        });

        match armed {
            Ok(()) => {
                self.stats.record_resume_scheduled();
                txn_debug!(self, timer = %timer_id, "Pending resume scheduled");
            }
            Err(e) => tracing::error!(error = %e, "Unable to schedule pending resume"),
        }
    }

    fn on_resume(&self, timer_id: TimerId) {
        {
            let mut slot = self.pending_resume.lock();
            if slot.id() != timer_id {
                return;
            }
            *slot = OneShotTimer::new(RESUME_TIMER);
        }

        txn_debug!(self, timer = %timer_id, "Resuming pending request");
        self.spawner.spawn_resume_worker();
        self.state.set_phase(TransactionPhase::RfTransEnd);
        self.stats.record_resume_run();
    }
}

/// Cancel the timer in `slot` and put a fresh instance in its place.
fn replace_timer(slot: &Mutex<OneShotTimer>, name: &'static str) {
    let mut slot = slot.lock();
    slot.cancel();
    *slot = OneShotTimer::new(name);
}

impl std::fmt::Debug for TransactionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionController")
            .field("config", &self.config)
            .field("holder", &self.current_holder())
            .field("in_progress", &self.in_progress())
            .field("gate_count", &self.gate_count())
            .finish_non_exhaustive()
    }
}
