//! Performance benchmarks for the gate and timer primitives.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use txgate_primitives::prelude::*;

fn bench_gate_uncontended(c: &mut Criterion) {
    let gate = Gate::new();

    c.bench_function("gate_try_acquire_release", |b| {
        b.iter(|| {
            black_box(gate.try_acquire());
            black_box(gate.release());
        });
    });

    c.bench_function("gate_acquire_blocking_release", |b| {
        b.iter(|| {
            black_box(gate.acquire_blocking(black_box(Duration::from_millis(1))));
            black_box(gate.release());
        });
    });

    c.bench_function("gate_current_count", |b| {
        b.iter(|| black_box(gate.current_count()));
    });
}

fn bench_timer_arm_cancel(c: &mut Criterion) {
    c.bench_function("timer_arm_cancel", |b| {
        b.iter(|| {
            let timer = OneShotTimer::new("bench");
            black_box(timer.arm(Duration::from_secs(60), || {}).is_ok());
            black_box(timer.cancel());
        });
    });
}

criterion_group!(benches, bench_gate_uncontended, bench_timer_arm_cancel);
criterion_main!(benches);
