//! Performance benchmarks for the transaction controller hot paths.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use txgate_controller::prelude::*;

fn bench_acquire_release(c: &mut Criterion) {
    let Ok(controller) = TransactionController::new(ControllerConfig::default(), Collaborators::detached())
    else {
        return;
    };

    c.bench_function("controller_try_attempt_end", |b| {
        b.iter(|| {
            black_box(controller.try_attempt(black_box(Requestor::SetRouting)));
            controller.end(black_box(Requestor::SetRouting));
        });
    });

    c.bench_function("controller_attempt_terminate", |b| {
        b.iter(|| {
            black_box(controller.attempt(Requestor::SeTransceive, Duration::from_millis(1)));
            black_box(controller.terminate(Requestor::ExecPending));
        });
    });

    c.bench_function("controller_watched_attempt_end", |b| {
        b.iter(|| {
            black_box(controller.try_attempt(Requestor::CeActivated));
            controller.end(Requestor::CeActivated);
        });
    });
}

fn bench_denials(c: &mut Criterion) {
    let Ok(controller) = TransactionController::new(ControllerConfig::default(), Collaborators::detached())
    else {
        return;
    };
    if !controller.try_attempt(Requestor::SetRouting) {
        return;
    }

    c.bench_function("controller_try_attempt_busy", |b| {
        b.iter(|| black_box(controller.try_attempt(black_box(Requestor::SeReset))));
    });

    c.bench_function("controller_end_non_holder", |b| {
        b.iter(|| controller.end(black_box(Requestor::SeReset)));
    });
}

fn bench_queries(c: &mut Criterion) {
    let Ok(controller) = TransactionController::new(ControllerConfig::default(), Collaborators::detached())
    else {
        return;
    };

    c.bench_function("controller_in_progress", |b| {
        b.iter(|| black_box(controller.in_progress()));
    });

    c.bench_function("controller_stats_snapshot", |b| {
        b.iter(|| black_box(controller.stats()));
    });
}

criterion_group!(benches, bench_acquire_release, bench_denials, bench_queries);
criterion_main!(benches);
