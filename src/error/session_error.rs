//! Editing-session error types.

use thiserror::Error;

use super::EngineError;
use crate::llm::LlmError;

/// Which phase of the editing session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// The mandatory first edit.
    Initial,
    /// The follow-up iterations.
    Iterative,
}

impl std::fmt::Display for EditPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditPhase::Initial => write!(f, "initial"),
            EditPhase::Iterative => write!(f, "iterative"),
        }
    }
}

/// Errors raised by the LLM editing session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("LLM transport error: {0}")]
    Transport(#[from] LlmError),
    #[error("{phase} edit phase exhausted after {attempts} attempts: {last_error}")]
    Exhausted {
        phase: EditPhase,
        attempts: u32,
        last_error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProposalError;

    #[test]
    fn test_exhausted_display() {
        let err = SessionError::Exhausted {
            phase: EditPhase::Initial,
            attempts: 4,
            last_error: "unknown edit function: frobnicate".into(),
        };
        assert_eq!(
            err.to_string(),
            "initial edit phase exhausted after 4 attempts: unknown edit function: frobnicate"
        );
    }

    #[test]
    fn test_session_error_from_engine() {
        let engine: EngineError = ProposalError::StopFirst.into();
        let err: SessionError = engine.into();
        assert!(matches!(err, SessionError::Engine(_)));
    }
}
