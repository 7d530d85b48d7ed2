//! Confirmation guards for destructive operator actions.
//!
//! Pausing a running clock and resetting the match are guarded: the first
//! time each is applied in a process it goes through unconditionally, and
//! every later application needs an explicit affirmative confirmation. The
//! counters live for the whole process and are not cleared by a match reset.

use serde::Serialize;

/// An action subject to the confirmation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardedAction {
    /// Pausing a running clock.
    Pause,
    /// Resetting the match.
    Reset,
}

/// What the caller should do with a guarded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Apply the action.
    Proceed,
    /// Ask the operator first; nothing is applied.
    NeedsConfirmation,
    /// The operator said no; nothing is applied.
    Declined,
}

/// Per-action counters of how many times a guarded action was applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmationGuard {
    pause_count: u32,
    reset_count: u32,
}

impl ConfirmationGuard {
    /// Create a guard with both counters at zero.
    pub const fn new() -> Self {
        Self {
            pause_count: 0,
            reset_count: 0,
        }
    }

    /// Decide whether `action` may be applied given the operator's answer.
    ///
    /// `confirm` is `None` when the operator has not been asked yet.
    pub const fn check(&self, action: GuardedAction, confirm: Option<bool>) -> GuardDecision {
        match confirm {
            Some(true) => GuardDecision::Proceed,
            Some(false) => GuardDecision::Declined,
            None if self.count(action) == 0 => GuardDecision::Proceed,
            None => GuardDecision::NeedsConfirmation,
        }
    }

    /// Note that `action` was applied.
    pub const fn record(&mut self, action: GuardedAction) {
        match action {
            GuardedAction::Pause => self.pause_count = self.pause_count.saturating_add(1),
            GuardedAction::Reset => self.reset_count = self.reset_count.saturating_add(1),
        }
    }

    /// How many times `action` has been applied.
    pub const fn count(&self, action: GuardedAction) -> u32 {
        match action {
            GuardedAction::Pause => self.pause_count,
            GuardedAction::Reset => self.reset_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_application_is_free() {
        let guard = ConfirmationGuard::new();
        assert_eq!(guard.check(GuardedAction::Pause, None), GuardDecision::Proceed);
        assert_eq!(guard.check(GuardedAction::Reset, None), GuardDecision::Proceed);
    }

    #[test]
    fn later_applications_need_confirmation() {
        let mut guard = ConfirmationGuard::new();
        guard.record(GuardedAction::Pause);

        assert_eq!(
            guard.check(GuardedAction::Pause, None),
            GuardDecision::NeedsConfirmation
        );
        assert_eq!(
            guard.check(GuardedAction::Pause, Some(true)),
            GuardDecision::Proceed
        );
        assert_eq!(
            guard.check(GuardedAction::Pause, Some(false)),
            GuardDecision::Declined
        );
        // Counters are independent.
        assert_eq!(guard.check(GuardedAction::Reset, None), GuardDecision::Proceed);
    }

    #[test]
    fn explicit_decline_wins_even_when_free() {
        let guard = ConfirmationGuard::new();
        assert_eq!(
            guard.check(GuardedAction::Reset, Some(false)),
            GuardDecision::Declined
        );
    }
}
