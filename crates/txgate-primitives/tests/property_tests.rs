//! Property-based tests for gate invariants.

use proptest::prelude::*;
use std::time::Duration;
use txgate_primitives::Gate;

#[derive(Debug, Clone, Copy)]
enum GateOp {
    TryAcquire,
    AcquireZero,
    Release,
}

fn gate_op() -> impl Strategy<Value = GateOp> {
    prop_oneof![
        Just(GateOp::TryAcquire),
        Just(GateOp::AcquireZero),
        Just(GateOp::Release),
    ]
}

proptest! {
    #[test]
    fn test_count_stays_binary(ops in prop::collection::vec(gate_op(), 0..200)) {
        let gate = Gate::new();
        let mut held = false;

        for op in ops {
            match op {
                GateOp::TryAcquire => {
                    let acquired = gate.try_acquire();
                    prop_assert_eq!(acquired, !held);
                    held = true;
                }
                GateOp::AcquireZero => {
                    let acquired = gate.acquire_blocking(Duration::ZERO);
                    prop_assert_eq!(acquired, !held);
                    held = true;
                }
                GateOp::Release => {
                    let released = gate.release();
                    prop_assert_eq!(released, held);
                    held = false;
                }
            }
            prop_assert!(gate.current_count() <= 1);
            prop_assert_eq!(gate.current_count(), usize::from(!held));
        }
    }

    #[test]
    fn test_repeated_release_never_exceeds_capacity(releases in 1usize..20) {
        let gate = Gate::new();
        prop_assert!(gate.try_acquire());

        let mut successes = 0usize;
        for _ in 0..releases {
            if gate.release() {
                successes += 1;
            }
        }

        prop_assert_eq!(successes, 1);
        prop_assert_eq!(gate.current_count(), 1);
    }
}
