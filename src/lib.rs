//! bpmnflow — a bidirectional BPMN 2.0 process kernel.
//!
//! The crate converts between two representations of a business
//! process: a hierarchical tree (nested branches inside gateways,
//! convenient for LLM exchange) and a flat graph (elements plus
//! sequence flows, the shape of BPMN 2.0 XML). On top of that it
//! provides schema validation, five structural edit operations
//! addressed by element id, and an LLM-driven editing session.

pub mod edit;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod llm;
pub mod model;
pub mod unflatten;
pub mod xml;

pub use crate::edit::{
    add_element, apply, delete_element, move_element, redirect_branch, update_element,
    validate_proposal, EditCall, EditProposal, EditSession, EditSessionConfig,
};
pub use crate::error::{
    EditPhase, EngineError, EngineResult, LookupError, ProposalError, SchemaError,
    SessionError, SessionResult, StructureError,
};
pub use crate::flatten::flatten;
pub use crate::graph::{build_flat_graph, FlatGraph};
pub use crate::llm::{LlmClient, LlmError, OpenAiClient, OpenAiConfig, ScriptedLlmClient};
pub use crate::model::{
    parse_process, to_json, to_json_pretty, validate, validate_element, Element, ElementType,
    ExclusiveBranch, FlatElement, FlatProcess, ParallelBranch, Process, SequenceFlow,
};
pub use crate::unflatten::unflatten;
pub use crate::xml::{emit_bpmn_xml, parse_bpmn_xml, process_to_xml, xml_to_process};
