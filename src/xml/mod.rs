//! BPMN 2.0 XML boundary: emission and parsing.

pub mod emitter;
pub mod parser;

pub use emitter::emit_bpmn_xml;
pub use parser::parse_bpmn_xml;

use crate::error::EngineResult;
use crate::model::Process;

/// Hierarchical process straight to BPMN XML (flatten + emit).
pub fn process_to_xml(process: &Process) -> EngineResult<String> {
    emit_bpmn_xml(&crate::flatten::flatten(process))
}

/// BPMN XML straight to a hierarchical process (parse + unflatten).
pub fn xml_to_process(xml: &str) -> EngineResult<Process> {
    crate::unflatten::unflatten(&parse_bpmn_xml(xml)?)
}
