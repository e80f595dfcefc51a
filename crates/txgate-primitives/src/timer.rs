//! Cancelable one-shot timer.
//!
//! Each armed timer owns a dedicated dispatch thread that sleeps on a
//! condition variable until the deadline or a cancellation. The timer is a
//! one-shot: after it fires or is cancelled it is spent, and the owner
//! replaces it with a fresh instance before arming again.
//!
//! ```text
//!            arm()              deadline
//!   Idle ─────────────► Armed ───────────► Firing ──► Fired
//!     │                   │
//!     │ cancel()          │ cancel()
//!     ▼                   ▼
//!   Cancelled ◄───────────┘
//! ```

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{TimerError, TimerResult};

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a timer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        Self(NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Lifecycle state of a [`OneShotTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Never armed.
    #[default]
    Idle,
    /// Callback scheduled, deadline not reached.
    Armed,
    /// Deadline reached, callback running.
    Firing,
    /// Callback completed.
    Fired,
    /// Cancelled before the callback started.
    Cancelled,
}

impl TimerState {
    /// Whether a callback is scheduled or currently running.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Armed | Self::Firing)
    }

    /// Whether the timer can no longer be armed.
    #[must_use]
    pub fn is_spent(self) -> bool {
        matches!(self, Self::Fired | Self::Cancelled)
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<TimerState>,
    wakeup: Condvar,
}

/// One-shot timer whose callback runs on its own dispatch thread.
///
/// Dropping an armed timer cancels it, so replacing a timer slot with a new
/// instance is enough to discard the old schedule.
///
/// # Example
///
/// ```rust
/// use txgate_primitives::OneShotTimer;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
///
/// let fired = Arc::new(AtomicBool::new(false));
/// let timer = OneShotTimer::new("example");
/// let flag = Arc::clone(&fired);
/// timer.arm(Duration::from_secs(60), move || flag.store(true, Ordering::SeqCst))?;
/// assert!(timer.is_pending());
///
/// assert!(timer.cancel());
/// assert!(!timer.is_pending());
/// assert!(!fired.load(Ordering::SeqCst));
/// # Ok::<(), txgate_primitives::TimerError>(())
/// ```
pub struct OneShotTimer {
    id: TimerId,
    name: &'static str,
    shared: Arc<Shared>,
}

impl OneShotTimer {
    /// Create an idle timer. `name` labels the dispatch thread.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            id: TimerId::next(),
            name,
            shared: Arc::new(Shared {
                state: Mutex::new(TimerState::Idle),
                wakeup: Condvar::new(),
            }),
        }
    }

    /// Identity of this instance.
    #[must_use]
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Label given at construction.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        *self.shared.state.lock()
    }

    /// Whether a callback is scheduled or running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    /// Schedule `callback` to run once after `delay`.
    ///
    /// # Errors
    ///
    /// - [`TimerError::AlreadyArmed`] if a callback is already scheduled or running.
    /// - [`TimerError::Spent`] if the timer has fired or been cancelled.
    /// - [`TimerError::DeadlineOverflow`] if `delay` cannot be added to the clock.
    /// - [`TimerError::SpawnFailed`] if the dispatch thread could not start; the
    ///   timer returns to `Idle`.
    pub fn arm<F>(&self, delay: Duration, callback: F) -> TimerResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now()
            .checked_add(delay)
            .ok_or(TimerError::DeadlineOverflow(delay))?;

        {
            let mut state = self.shared.state.lock();
            match *state {
                TimerState::Idle => *state = TimerState::Armed,
                TimerState::Armed | TimerState::Firing => {
                    return Err(TimerError::AlreadyArmed(self.id.as_u64()));
                }
                TimerState::Fired | TimerState::Cancelled => {
                    return Err(TimerError::Spent(self.id.as_u64()));
                }
            }
        }

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(format!("txgate-timer-{}", self.name))
            .spawn(move || dispatch(&shared, deadline, callback));

        if let Err(e) = spawned {
            *self.shared.state.lock() = TimerState::Idle;
            return Err(TimerError::spawn_failed(e.to_string()));
        }

        tracing::trace!(timer = %self.id, name = self.name, ?delay, "Timer armed");
        Ok(())
    }

    /// Prevent a scheduled callback from starting.
    ///
    /// Returns `true` if a scheduled callback was discarded. Safe to call on a
    /// never-armed, already-fired or already-cancelled timer. A callback that
    /// has already started is not interrupted. Cancelling spends the timer.
    pub fn cancel(&self) -> bool {
        let mut state = self.shared.state.lock();
        match *state {
            TimerState::Armed => {
                *state = TimerState::Cancelled;
                drop(state);
                self.shared.wakeup.notify_all();
                tracing::trace!(timer = %self.id, name = self.name, "Timer cancelled");
                true
            }
            TimerState::Idle => {
                *state = TimerState::Cancelled;
                false
            }
            TimerState::Firing | TimerState::Fired | TimerState::Cancelled => false,
        }
    }
}

impl Drop for OneShotTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for OneShotTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShotTimer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}

/// Marks the timer `Fired` when the callback returns or unwinds.
struct FireGuard<'a> {
    shared: &'a Shared,
}

impl Drop for FireGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        if *state == TimerState::Firing {
            *state = TimerState::Fired;
        }
    }
}

fn dispatch<F>(shared: &Shared, deadline: Instant, callback: F)
where
    F: FnOnce(),
{
    let mut state = shared.state.lock();
    while *state == TimerState::Armed {
        if shared.wakeup.wait_until(&mut state, deadline).timed_out() {
            break;
        }
    }

    if *state != TimerState::Armed {
        return;
    }
    *state = TimerState::Firing;
    drop(state);

    let _guard = FireGuard { shared };
    callback();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use txgate_test_helpers::wait_for;

    #[test]
    fn test_timer_fires_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let timer = OneShotTimer::new("fires");
        let counter = Arc::clone(&hits);
        assert!(
            timer
                .arm(Duration::from_millis(10), move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .is_ok()
        );

        assert!(wait_for(|| timer.state() == TimerState::Fired, Duration::from_secs(2)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_cancel_prevents_callback() {
        let fired = Arc::new(AtomicBool::new(false));
        let timer = OneShotTimer::new("cancel");
        let flag = Arc::clone(&fired);
        assert!(
            timer
                .arm(Duration::from_millis(50), move || flag.store(true, Ordering::SeqCst))
                .is_ok()
        );

        assert!(timer.cancel());
        assert_eq!(timer.state(), TimerState::Cancelled);
        thread::sleep(Duration::from_millis(100));
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cancel_is_safe_when_idle_or_fired() {
        let idle = OneShotTimer::new("idle");
        assert!(!idle.cancel());
        assert!(!idle.cancel());

        let fired = OneShotTimer::new("fired");
        assert!(fired.arm(Duration::ZERO, || {}).is_ok());
        assert!(wait_for(|| fired.state() == TimerState::Fired, Duration::from_secs(2)));
        assert!(!fired.cancel());
        assert_eq!(fired.state(), TimerState::Fired);
    }

    #[test]
    fn test_spent_timer_rejects_rearm() {
        let timer = OneShotTimer::new("spent");
        assert!(timer.arm(Duration::from_secs(10), || {}).is_ok());
        assert!(matches!(
            timer.arm(Duration::from_secs(10), || {}),
            Err(TimerError::AlreadyArmed(_))
        ));

        timer.cancel();
        assert!(matches!(
            timer.arm(Duration::from_secs(10), || {}),
            Err(TimerError::Spent(_))
        ));
    }

    #[test]
    fn test_drop_cancels_pending_callback() {
        let fired = Arc::new(AtomicBool::new(false));
        {
            let timer = OneShotTimer::new("drop");
            let flag = Arc::clone(&fired);
            assert!(
                timer
                    .arm(Duration::from_millis(30), move || flag.store(true, Ordering::SeqCst))
                    .is_ok()
            );
        }
        thread::sleep(Duration::from_millis(80));
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn test_overflowing_delay_is_rejected() {
        let timer = OneShotTimer::new("overflow");
        assert!(matches!(
            timer.arm(Duration::MAX, || {}),
            Err(TimerError::DeadlineOverflow(_))
        ));
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = OneShotTimer::new("a");
        let b = OneShotTimer::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_panicking_callback_still_completes() {
        let timer = OneShotTimer::new("panics");
        assert!(
            timer
                .arm(Duration::ZERO, || std::panic::resume_unwind(Box::new("callback failure")))
                .is_ok()
        );
        assert!(wait_for(|| timer.state() == TimerState::Fired, Duration::from_secs(2)));
    }
}
