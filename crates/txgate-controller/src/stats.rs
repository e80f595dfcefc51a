//! Controller statistics.
//!
//! Lock-free counters updated on every controller event. They are
//! diagnostics only; no controller decision reads them.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by a controller.
#[derive(Debug, Default)]
pub struct ControllerStats {
    attempts: AtomicU64,
    grants: AtomicU64,
    denied_busy: AtomicU64,
    denied_recovering: AtomicU64,
    ends: AtomicU64,
    terminations: AtomicU64,
    watchdog_expiries: AtomicU64,
    resumes_scheduled: AtomicU64,
    resumes_run: AtomicU64,
    rejected_releases: AtomicU64,
}

/// Point-in-time copy of [`ControllerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Acquisition attempts, either mode.
    pub attempts: u64,
    /// Attempts that acquired the gate.
    pub grants: u64,
    /// Attempts denied because the gate was held, the timeout elapsed or the
    /// requestor was a sentinel.
    pub denied_busy: u64,
    /// Attempts denied because a pending resume was scheduled.
    pub denied_recovering: u64,
    /// Normal-path releases.
    pub ends: u64,
    /// Forced releases, watchdog-triggered included.
    pub terminations: u64,
    /// Watchdog expiries that terminated a transaction.
    pub watchdog_expiries: u64,
    /// Pending-resume timers armed.
    pub resumes_scheduled: u64,
    /// Pending-resume callbacks run.
    pub resumes_run: u64,
    /// Gate releases rejected by the capacity guard.
    pub rejected_releases: u64,
}

impl StatsSnapshot {
    /// Total denials of either kind.
    #[must_use]
    pub fn denials(&self) -> u64 {
        self.denied_busy.saturating_add(self.denied_recovering)
    }
}

macro_rules! counter {
    ($($record:ident => $field:ident),* $(,)?) => {
        impl ControllerStats {
            $(
                pub(crate) fn $record(&self) {
                    self.$field.fetch_add(1, Ordering::Relaxed);
                }
            )*
        }
    };
}

counter! {
    record_attempt => attempts,
    record_grant => grants,
    record_denied_busy => denied_busy,
    record_denied_recovering => denied_recovering,
    record_end => ends,
    record_termination => terminations,
    record_watchdog_expiry => watchdog_expiries,
    record_resume_scheduled => resumes_scheduled,
    record_resume_run => resumes_run,
    record_rejected_release => rejected_releases,
}

impl ControllerStats {
    /// Copy the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            grants: self.grants.load(Ordering::Relaxed),
            denied_busy: self.denied_busy.load(Ordering::Relaxed),
            denied_recovering: self.denied_recovering.load(Ordering::Relaxed),
            ends: self.ends.load(Ordering::Relaxed),
            terminations: self.terminations.load(Ordering::Relaxed),
            watchdog_expiries: self.watchdog_expiries.load(Ordering::Relaxed),
            resumes_scheduled: self.resumes_scheduled.load(Ordering::Relaxed),
            resumes_run: self.resumes_run.load(Ordering::Relaxed),
            rejected_releases: self.rejected_releases.load(Ordering::Relaxed),
        }
    }
}
