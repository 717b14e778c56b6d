//! State machine trait for status enums.
//!
//! Gives lifecycle statuses (payment intents today) one interface for
//! checking and performing transitions.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// ```ignore
/// let next = IntentStatus::Created.transition_to(IntentStatus::Paid)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TicketStatus {
        Open,
        Claimed,
        Closed,
    }

    impl StateMachine for TicketStatus {
        fn can_transition_to(&self, target: &Self) -> bool {
            use TicketStatus::*;
            matches!((self, target), (Open, Claimed) | (Claimed, Closed) | (Open, Closed))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TicketStatus::*;
            match self {
                Open => vec![Claimed, Closed],
                Claimed => vec![Closed],
                Closed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let result = TicketStatus::Open.transition_to(TicketStatus::Claimed);
        assert_eq!(result, Ok(TicketStatus::Claimed));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let result = TicketStatus::Closed.transition_to(TicketStatus::Open);
        assert!(result.is_err());
    }

    #[test]
    fn is_terminal_only_for_states_without_exits() {
        assert!(TicketStatus::Closed.is_terminal());
        assert!(!TicketStatus::Open.is_terminal());
    }
}
