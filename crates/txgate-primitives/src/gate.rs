//! Capacity-1 gate granting exclusive access to the transaction channel.
//!
//! The gate behaves like a binary semaphore whose release is capacity
//! checked: raising the count when it is already `1` is rejected and logged
//! rather than performed. Waiters block on a real OS-level condition variable.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const CAPACITY: usize = 1;

/// Binary gate with blocking, non-blocking and guarded release operations.
///
/// # Thread Safety
///
/// All operations take `&self`. The count lives behind a `parking_lot::Mutex`
/// and blocked acquirers park on a `Condvar`. A lock-free shadow of the count
/// backs [`Gate::current_count`] so diagnostics never contend with acquirers.
#[derive(Debug)]
pub struct Gate {
    count: Mutex<usize>,
    available: Condvar,
    count_shadow: AtomicUsize,
}

impl Gate {
    /// Create a gate with its single permit available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: Mutex::new(CAPACITY),
            available: Condvar::new(),
            count_shadow: AtomicUsize::new(CAPACITY),
        }
    }

    /// Wait up to `timeout` for the permit and take it.
    ///
    /// Returns `false` without side effects if the timeout elapses first.
    /// A zero timeout degenerates to [`Gate::try_acquire`].
    pub fn acquire_blocking(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut count = self.count.lock();

        while *count == 0 {
            match deadline {
                Some(deadline) => {
                    if self.available.wait_until(&mut count, deadline).timed_out() {
                        if *count == 0 {
                            return false;
                        }
                        break;
                    }
                }
                // Deadline beyond the clock's range; wait without a bound.
                None => self.available.wait(&mut count),
            }
        }

        self.take(&mut count);
        true
    }

    /// Take the permit if it is immediately available.
    pub fn try_acquire(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            return false;
        }
        self.take(&mut count);
        true
    }

    /// Return the permit.
    ///
    /// The count is raised only when it is currently `0`. A release while the
    /// permit is already available indicates a logic defect upstream; it is
    /// logged at error level, leaves the count untouched and returns `false`.
    pub fn release(&self) -> bool {
        let mut count = self.count.lock();
        if *count >= CAPACITY {
            drop(count);
            tracing::error!(
                capacity = CAPACITY,
                "Gate release rejected: permit already available"
            );
            return false;
        }

        *count = CAPACITY;
        self.count_shadow.store(CAPACITY, Ordering::Release);
        drop(count);
        self.available.notify_one();
        true
    }

    /// Current count, `1` when free and `0` when held.
    ///
    /// The value is racy by nature; use it for logging and tests only.
    #[must_use]
    pub fn current_count(&self) -> usize {
        self.count_shadow.load(Ordering::Acquire)
    }

    /// Maximum count of the gate.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    fn take(&self, count: &mut usize) {
        *count = 0;
        self.count_shadow.store(0, Ordering::Release);
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}
