//! JSON parser for the hierarchical wire form exchanged with the LLM.

use crate::error::{EngineResult, SchemaError};

use super::element::Process;

/// Parse the `{"process": [...]}` wire form into a [`Process`].
///
/// This narrows the shape only; call
/// [`validate`](crate::model::validate) for the semantic invariants.
pub fn parse_process(content: &str) -> EngineResult<Process> {
    serde_json::from_str(content).map_err(|e| SchemaError::Malformed(e.to_string()).into())
}

/// Serialize a process back into the wire form.
pub fn to_json(process: &Process) -> String {
    serde_json::to_string(process).unwrap_or_default()
}

/// Serialize a process into indented JSON for prompt embedding.
pub fn to_json_pretty(process: &Process) -> String {
    serde_json::to_string_pretty(process).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let json = r#"{"process":[
            {"type":"startEvent","id":"s1"},
            {"type":"task","id":"t1","label":"Do it"},
            {"type":"endEvent","id":"e1"}]}"#;
        let process = parse_process(json).unwrap();
        assert_eq!(process.elements.len(), 3);
        assert_eq!(process.elements[1].id(), "t1");
    }

    #[test]
    fn test_parse_gateway() {
        let json = r#"{"process":[
            {"type":"startEvent","id":"s1"},
            {"type":"exclusiveGateway","id":"g1","label":"OK?","has_join":true,
             "branches":[
                {"condition":"yes","path":[{"type":"task","id":"a","label":"A"}]},
                {"condition":"no","path":[]}]},
            {"type":"endEvent","id":"e1"}]}"#;
        let process = parse_process(json).unwrap();
        match &process.elements[1] {
            crate::model::Element::ExclusiveGateway {
                has_join, branches, ..
            } => {
                assert!(has_join);
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].path.len(), 1);
                assert!(branches[1].path.is_empty());
            }
            other => panic!("expected exclusive gateway, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_process("{{{invalid").is_err());
        assert!(parse_process("").is_err());
        assert!(parse_process(r#"{"process":[{"type":"loopTask","id":"x"}]}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{"process":[{"type":"startEvent","id":"s1"},{"type":"endEvent","id":"e1"}]}"#;
        let process = parse_process(json).unwrap();
        let back = parse_process(&to_json(&process)).unwrap();
        assert_eq!(process, back);
    }
}
