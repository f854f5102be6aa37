//! Invocation state machine
//!
//! ```text
//! Start ──► InputResolved ──► Annotated ───► Success
//!   │             │              │
//!   │             └─► ErrorResult┴─────────► Failure
//!   └──────────────────────────────────────► Failure
//! ```

use crate::error::StateMachineError;
use serde::{Deserialize, Serialize};

/// States one invocation passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvocationState {
    /// Unit taken from the session
    Start,
    /// Input text determined
    InputResolved,
    /// Pipeline, assembler and serializer produced a value
    Annotated,
    /// Pipeline, assembler or serializer failed
    ErrorResult,
    /// Routed to success
    Success,
    /// Routed to failure
    Failure,
}

impl InvocationState {
    /// Check if no further transition is allowed
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// Validates a state transition.
pub fn validate_transition(
    from: InvocationState,
    to: InvocationState,
) -> Result<(), StateMachineError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(StateMachineError::IllegalTransition { from, to })
    }
}

/// States reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: InvocationState) -> &'static [InvocationState] {
    use InvocationState::*;
    match from {
        Start => &[InputResolved, Failure],
        InputResolved => &[Annotated, ErrorResult],
        Annotated => &[Success, Failure],
        ErrorResult => &[Failure],
        Success | Failure => &[],
    }
}

/// Tracks the current state of one invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    state: InvocationState,
    history: Vec<InvocationState>,
}

impl Invocation {
    /// Begin a new invocation in `Start`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: InvocationState::Start,
            history: vec![InvocationState::Start],
        }
    }

    /// Move to `to`, rejecting illegal transitions
    pub fn advance(&mut self, to: InvocationState) -> Result<(), StateMachineError> {
        validate_transition(self.state, to)?;
        tracing::debug!(from = ?self.state, to = ?to, "invocation transition");
        self.state = to;
        self.history.push(to);
        Ok(())
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Every state visited, in order
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[InvocationState] {
        &self.history
    }
}

impl Default for Invocation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::InvocationState::*;
    use super::*;

    #[test]
    fn happy_path() {
        let mut inv = Invocation::new();
        inv.advance(InputResolved).unwrap();
        inv.advance(Annotated).unwrap();
        inv.advance(Success).unwrap();
        assert_eq!(inv.history(), &[Start, InputResolved, Annotated, Success]);
        assert!(inv.state().is_terminal());
    }

    #[test]
    fn missing_input_goes_straight_to_failure() {
        let mut inv = Invocation::new();
        inv.advance(Failure).unwrap();
        assert_eq!(inv.state(), Failure);
    }

    #[test]
    fn error_result_cannot_succeed() {
        let mut inv = Invocation::new();
        inv.advance(InputResolved).unwrap();
        inv.advance(ErrorResult).unwrap();
        assert_eq!(
            inv.advance(Success),
            Err(StateMachineError::IllegalTransition {
                from: ErrorResult,
                to: Success
            })
        );
        assert_eq!(inv.state(), ErrorResult);
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [Success, Failure] {
            assert!(allowed_transitions(terminal).is_empty());
            assert!(validate_transition(terminal, Failure).is_err());
        }
    }
}
