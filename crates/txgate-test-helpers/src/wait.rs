//! Polling for conditions reached asynchronously.
//!
//! Watchdog expiries and resumes happen on timer threads; tests poll for
//! their effects with a bounded wait instead of sleeping a fixed amount.

use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Poll `condition` until it holds or `within` elapses.
///
/// Returns the final value of `condition`.
///
/// # Example
///
/// ```rust
/// use txgate_test_helpers::wait_for;
/// use std::time::Duration;
///
/// assert!(wait_for(|| true, Duration::from_millis(10)));
/// assert!(!wait_for(|| false, Duration::from_millis(10)));
/// ```
pub fn wait_for(mut condition: impl FnMut() -> bool, within: Duration) -> bool {
    let deadline = Instant::now().checked_add(within);
    loop {
        if condition() {
            return true;
        }
        match deadline {
            Some(deadline) if Instant::now() >= deadline => return condition(),
            _ => thread::sleep(POLL_INTERVAL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_for_returns_once_condition_holds() {
        let mut polls = 0;
        assert!(wait_for(
            || {
                polls += 1;
                polls >= 3
            },
            Duration::from_secs(1)
        ));
        assert_eq!(polls, 3);
    }

    #[test]
    fn test_wait_for_gives_up_after_deadline() {
        let start = Instant::now();
        assert!(!wait_for(|| false, Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
