//! Engine-level error types.
//!
//! Each enum covers one failure layer; [`EngineError`] is the umbrella
//! the engine functions return.

use thiserror::Error;

/// Schema violations in the hierarchical process tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("malformed process document: {0}")]
    Malformed(String),
    #[error("element has an empty id")]
    EmptyId,
    #[error("duplicate element id: {0}")]
    DuplicateId(String),
    #[error("element '{id}' ({element_type}) has an empty label")]
    EmptyLabel { id: String, element_type: String },
    #[error("gateway '{id}' has {count} branches, at least 2 required")]
    BranchArity { id: String, count: usize },
    #[error("branch {index} of gateway '{id}' has an empty condition")]
    EmptyCondition { id: String, index: usize },
    #[error("branch {index} of parallel gateway '{id}' is empty")]
    EmptyParallelBranch { id: String, index: usize },
    #[error("process has no start event at the top level")]
    NoStartEvent,
    #[error("process has {0} start events at the top level, exactly 1 required")]
    ExtraStartEvents(usize),
    #[error("start event '{0}' is nested inside a branch")]
    NestedStartEvent(String),
}

/// Referenced ids or conditions that do not exist in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("element id not found: {0}")]
    UnknownId(String),
    #[error("no branch with condition: {0:?}")]
    UnknownCondition(String),
    #[error("branch of gateway '{id}' points to unknown element '{next}'")]
    DanglingNext { id: String, next: String },
    #[error("exactly one of before_id / after_id must be given")]
    AnchorSelection,
}

/// Failures while parsing or reconstructing the flat representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("XML error: {0}")]
    Xml(String),
    #[error("document contains no process element")]
    NoProcessElement,
    #[error("document has {0} start events, exactly 1 required")]
    StartEventCount(usize),
    #[error("sequence flow '{flow}' references unknown element '{reference}'")]
    DanglingFlow { flow: String, reference: String },
    #[error("parallel gateway '{0}' has no reconverging join")]
    MissingJoin(String),
    #[error("element '{id}' has {count} outgoing flows but is not a gateway")]
    UnexpectedFanOut { id: String, count: usize },
}

/// Malformed edit proposals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProposalError {
    #[error("proposal is neither a stop signal nor a function call")]
    InvalidShape,
    #[error("unknown edit function: {0}")]
    UnknownFunction(String),
    #[error("function '{function}' is missing argument '{key}'")]
    MissingKey { function: String, key: String },
    #[error("function '{function}' has unexpected argument '{key}'")]
    UnexpectedKey { function: String, key: String },
    #[error("function '{function}' requires exactly one of before_id / after_id")]
    AnchorXor { function: String },
    #[error("argument '{key}' of '{function}' is not valid: {message}")]
    InvalidArgument {
        function: String,
        key: String,
        message: String,
    },
    #[error("stop is not allowed as the first proposal")]
    StopFirst,
    #[error("update_element cannot replace with gateway '{0}'; use add/delete for structural edits")]
    GatewayUpdate(String),
}

/// Umbrella error for all synchronous engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Proposal(#[from] ProposalError),
}
