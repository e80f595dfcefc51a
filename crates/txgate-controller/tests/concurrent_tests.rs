//! Concurrency tests for the transaction controller.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use txgate_controller::prelude::*;
use txgate_test_helpers::prelude::*;

const CONTENDERS: [Requestor; 6] = [
    Requestor::SetRouting,
    Requestor::SeTransceive,
    Requestor::SeOpenChannel,
    Requestor::SeCloseChannel,
    Requestor::EnableDiscovery,
    Requestor::DisableDiscovery,
];

#[test]
fn test_one_holder_under_contention() -> TestResult {
    let controller = TransactionController::new(ControllerConfig::default(), Collaborators::detached())?;
    let inside = Arc::new(AtomicUsize::new(0));
    let max_inside = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = CONTENDERS
        .iter()
        .map(|&requestor| {
            let controller = Arc::clone(&controller);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            thread::spawn(move || {
                for _ in 0..40 {
                    if !controller.attempt(requestor, Duration::from_secs(5)) {
                        continue;
                    }
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inside.fetch_max(now, Ordering::SeqCst);
                    assert_eq!(controller.current_holder(), requestor);
                    assert_eq!(controller.gate_count(), 0);
                    inside.fetch_sub(1, Ordering::SeqCst);
                    controller.end(requestor);
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    assert_eq!(controller.gate_count(), 1);
    let stats = controller.stats();
    assert_eq!(stats.grants, stats.ends);
    assert_eq!(stats.rejected_releases, 0);
    Ok(())
}

#[test]
fn test_concurrent_try_attempts_grant_once() -> TestResult {
    let controller = TransactionController::new(ControllerConfig::default(), Collaborators::detached())?;
    let barrier = Arc::new(std::sync::Barrier::new(CONTENDERS.len()));
    let granted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = CONTENDERS
        .iter()
        .map(|&requestor| {
            let controller = Arc::clone(&controller);
            let barrier = Arc::clone(&barrier);
            let granted = Arc::clone(&granted);
            thread::spawn(move || {
                barrier.wait();
                if controller.try_attempt(requestor) {
                    granted.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    assert_eq!(granted.load(Ordering::SeqCst), 1);
    assert_eq!(controller.gate_count(), 0);
    Ok(())
}

#[test]
fn test_end_racing_watchdog_releases_once() -> TestResult {
    init_test_logging();
    let config = ControllerConfig::builder()
        .watchdog_delay(Duration::from_millis(1))
        .build()?;
    let controller = TransactionController::new(config, Collaborators::detached())?;

    for _ in 0..50 {
        assert!(wait_for(
            || controller.try_attempt(Requestor::RfFieldChange),
            Duration::from_secs(2)
        ));
        thread::sleep(Duration::from_micros(900));
        controller.end(Requestor::RfFieldChange);

        assert!(wait_for(
            || controller.gate_count() == 1 && !controller.watchdog_armed(),
            Duration::from_secs(2)
        ));
    }

    let stats = controller.stats();
    assert_eq!(stats.grants, 50);
    assert_eq!(stats.ends + stats.terminations, 50);
    assert_eq!(stats.rejected_releases, 0);
    Ok(())
}

#[test]
fn test_terminate_racing_end_releases_once() -> TestResult {
    let controller = TransactionController::new(ControllerConfig::default(), Collaborators::detached())?;

    for _ in 0..100 {
        assert!(controller.try_attempt(Requestor::SeReset));
        let recovery = {
            let controller = Arc::clone(&controller);
            thread::spawn(move || controller.terminate(Requestor::ExecPending))
        };
        controller.end(Requestor::SeReset);
        assert!(recovery.join().is_ok(), "thread panicked unexpectedly");
        assert_eq!(controller.gate_count(), 1);
    }

    let stats = controller.stats();
    assert_eq!(stats.ends + stats.terminations, 100);
    assert_eq!(stats.rejected_releases, 0);
    Ok(())
}

#[test]
fn test_abort_timer_racing_end_never_outlives_release() -> TestResult {
    let controller = TransactionController::new(ControllerConfig::default(), Collaborators::detached())?;
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let rearmer = {
        let controller = Arc::clone(&controller);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                controller.set_abort_timer(Duration::from_secs(60));
                thread::yield_now();
            }
        })
    };

    for _ in 0..200 {
        assert!(controller.try_attempt(Requestor::SetRouting));
        thread::yield_now();
        controller.end(Requestor::SetRouting);
        assert!(!controller.watchdog_armed(), "watchdog armed after release");
    }

    stop.store(true, Ordering::SeqCst);
    assert!(rearmer.join().is_ok(), "thread panicked unexpectedly");
    assert_eq!(controller.stats().watchdog_expiries, 0);
    Ok(())
}
