//! Assertions on observable controller state.

use txgate_controller::{Requestor, TransactionController};

/// Assert the channel is free: no holder, nothing in progress, permit available.
///
/// # Panics
///
/// Panics if any of the three disagree with a free channel.
#[track_caller]
pub fn assert_free(controller: &TransactionController) {
    assert_eq!(controller.current_holder(), Requestor::None, "holder on a free channel");
    assert!(!controller.in_progress(), "in_progress set on a free channel");
    assert_eq!(controller.gate_count(), 1, "gate permit missing on a free channel");
}

/// Assert `requestor` holds the channel and the permit is taken.
///
/// # Panics
///
/// Panics if `requestor` is not the holder or the gate disagrees.
#[track_caller]
pub fn assert_held(controller: &TransactionController, requestor: Requestor) {
    assert_eq!(controller.current_holder(), requestor, "unexpected holder");
    assert!(controller.in_progress(), "in_progress clear while held");
    assert_eq!(controller.gate_count(), 0, "gate permit available while held");
}

#[cfg(test)]
mod tests {
    use super::*;
    use txgate_controller::{Collaborators, ControllerConfig};

    #[test]
    fn test_assertions_track_lifecycle() -> Result<(), txgate_controller::ControllerError> {
        let controller = TransactionController::new(ControllerConfig::default(), Collaborators::detached())?;
        assert_free(&controller);
        assert!(controller.try_attempt(Requestor::SeOpenChannel));
        assert_held(&controller, Requestor::SeOpenChannel);
        controller.end(Requestor::SeOpenChannel);
        assert_free(&controller);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "unexpected holder")]
    fn test_assert_held_rejects_other_holder() {
        let controller = crate::must(TransactionController::new(
            ControllerConfig::default(),
            Collaborators::detached(),
        ));
        assert!(controller.try_attempt(Requestor::SetRouting));
        assert_held(&controller, Requestor::SeReset);
    }
}
