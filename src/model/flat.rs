//! The flat process representation: elements plus directed sequence
//! flows, matching the shape of BPMN 2.0 XML.

use super::element::ElementType;

/// One element of the flat form, branches erased.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatElement {
    pub id: String,
    pub element_type: ElementType,
    pub label: Option<String>,
    /// Incoming flow ids, in flow-insertion order.
    pub incoming: Vec<String>,
    /// Outgoing flow ids, in flow-insertion order.
    pub outgoing: Vec<String>,
}

impl FlatElement {
    pub fn new(id: impl Into<String>, element_type: ElementType, label: Option<String>) -> Self {
        Self {
            id: id.into(),
            element_type,
            label,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

/// A directed edge between two flat elements.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceFlow {
    pub id: String,
    pub source_ref: String,
    pub target_ref: String,
    /// Branch condition, emitted as the `name` attribute on the flow.
    pub condition: Option<String>,
}

impl SequenceFlow {
    /// Build a flow with the default `"<source>-<target>"` id.
    pub fn between(source: &str, target: &str, condition: Option<String>) -> Self {
        Self {
            id: format!("{}-{}", source, target),
            source_ref: source.to_string(),
            target_ref: target.to_string(),
            condition,
        }
    }
}

/// The complete flat form of a process.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatProcess {
    pub elements: Vec<FlatElement>,
    pub flows: Vec<SequenceFlow>,
}

impl FlatProcess {
    pub fn element(&self, id: &str) -> Option<&FlatElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn flow(&self, id: &str) -> Option<&SequenceFlow> {
        self.flows.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_default_id() {
        let flow = SequenceFlow::between("s1", "t1", None);
        assert_eq!(flow.id, "s1-t1");
        assert_eq!(flow.source_ref, "s1");
        assert_eq!(flow.target_ref, "t1");
        assert!(flow.condition.is_none());
    }

    #[test]
    fn test_flat_process_lookup() {
        let flat = FlatProcess {
            elements: vec![FlatElement::new("s1", ElementType::StartEvent, None)],
            flows: vec![SequenceFlow::between("s1", "t1", Some("yes".into()))],
        };
        assert!(flat.element("s1").is_some());
        assert!(flat.element("t1").is_none());
        assert_eq!(flat.flow("s1-t1").unwrap().condition.as_deref(), Some("yes"));
    }
}
