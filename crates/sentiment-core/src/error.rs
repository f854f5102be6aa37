//! Error types for the sentiment processor
//!
//! Mirrors the outcome taxonomy of an invocation:
//! - Missing input text (routed to failure)
//! - Annotation pipeline failures (routed to failure)
//! - Session and state machine faults (returned to the host for rollback)

use crate::state_machine::InvocationState;

/// Failure raised while annotating text or walking the annotation graph
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The annotation capability rejected or failed on the text
    #[error("annotation failed: {0}")]
    Annotation(String),

    /// Transport to a remote capability failed
    #[error("transport failed: {0}")]
    Transport(String),

    /// The annotation graph is missing a structure the assembler needs
    #[error("malformed annotation in sentence {sentence}: {reason}")]
    Traversal {
        /// Zero-based sentence index
        sentence: usize,
        /// What was missing or invalid
        reason: String,
    },

    /// The result tree could not be rendered
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The capability panicked while annotating
    #[error("annotation panicked: {0}")]
    Panicked(String),
}

impl PipelineError {
    /// Check if a fresh attempt could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Failure to determine the text for an invocation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Neither the attribute nor the configured property yielded text
    #[error("no input text: attribute '{attribute}' absent and property unresolved")]
    MissingInput {
        /// Attribute that was consulted first
        attribute: String,
    },
}

/// Errors raised by the hosting session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Unit is not owned by this session
    #[error("unknown work unit: {0}")]
    UnknownUnit(String),

    /// Unit was already routed during this session
    #[error("work unit {0} already transferred")]
    AlreadyTransferred(String),

    /// Session was committed or rolled back
    #[error("session closed")]
    Closed,
}

/// Illegal invocation state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Transition not permitted from the current state
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: InvocationState,
        /// Requested state
        to: InvocationState,
    },
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Property set but empty
    #[error("property '{0}' must not be empty")]
    EmptyProperty(String),
}

/// Errors that escape an invocation and are handed to the host
///
/// The host is expected to roll back the session and retry the unit.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Session operation failed
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Invocation state machine violated
    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),
}

impl ProcessError {
    /// Check if the host should retry the rolled back unit
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Session(SessionError::Closed))
    }
}
