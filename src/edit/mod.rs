//! Structural editing: the five edit operations, proposal validation,
//! and the LLM-driven editing session.

pub mod ops;
pub mod prompts;
pub mod proposal;
pub mod session;

pub use ops::{add_element, delete_element, move_element, redirect_branch, update_element};
pub use proposal::{apply, validate_proposal, EditCall, EditProposal};
pub use session::{EditSession, EditSessionConfig};
