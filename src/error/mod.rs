//! Error types for the BPMN process engine.
//!
//! - [`EngineError`] — Umbrella over the synchronous engine layers
//!   (schema, lookup, structure, proposal).
//! - [`SessionError`] — Top-level errors for the LLM editing session.

pub mod engine_error;
pub mod session_error;

pub use engine_error::{EngineError, LookupError, ProposalError, SchemaError, StructureError};
pub use session_error::{EditPhase, SessionError};

/// Convenience alias for engine-level results.
pub type EngineResult<T> = Result<T, EngineError>;
/// Convenience alias for session-level results.
pub type SessionResult<T> = Result<T, SessionError>;
