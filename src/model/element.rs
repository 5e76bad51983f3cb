//! The hierarchical process data model.
//!
//! [`Element`] is a closed sum over the supported BPMN element set; the
//! branch type inside a gateway is part of the variant
//! ([`ExclusiveBranch`] vs [`ParallelBranch`]), not a separate base.
//! The serde shape is the wire form exchanged with the LLM:
//! `{"type": "exclusiveGateway", "id": "...", "has_join": true, ...}`.

use serde::{Deserialize, Serialize};

/// Type tag of a BPMN element, shared by the hierarchical and flat forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Task,
    UserTask,
    ServiceTask,
    StartEvent,
    EndEvent,
    ExclusiveGateway,
    ParallelGateway,
}

impl ElementType {
    /// The XML tag / JSON tag for this element type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Task => "task",
            ElementType::UserTask => "userTask",
            ElementType::ServiceTask => "serviceTask",
            ElementType::StartEvent => "startEvent",
            ElementType::EndEvent => "endEvent",
            ElementType::ExclusiveGateway => "exclusiveGateway",
            ElementType::ParallelGateway => "parallelGateway",
        }
    }

    /// Parse a local tag name into an element type, if supported.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "task" => Some(ElementType::Task),
            "userTask" => Some(ElementType::UserTask),
            "serviceTask" => Some(ElementType::ServiceTask),
            "startEvent" => Some(ElementType::StartEvent),
            "endEvent" => Some(ElementType::EndEvent),
            "exclusiveGateway" => Some(ElementType::ExclusiveGateway),
            "parallelGateway" => Some(ElementType::ParallelGateway),
            _ => None,
        }
    }

    pub fn is_gateway(&self) -> bool {
        matches!(
            self,
            ElementType::ExclusiveGateway | ElementType::ParallelGateway
        )
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One element of the hierarchical process tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Task {
        id: String,
        label: String,
    },
    UserTask {
        id: String,
        label: String,
    },
    ServiceTask {
        id: String,
        label: String,
    },
    StartEvent {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    EndEvent {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    ExclusiveGateway {
        id: String,
        label: String,
        has_join: bool,
        branches: Vec<ExclusiveBranch>,
    },
    ParallelGateway {
        id: String,
        branches: Vec<ParallelBranch>,
    },
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Task { id, .. }
            | Element::UserTask { id, .. }
            | Element::ServiceTask { id, .. }
            | Element::StartEvent { id, .. }
            | Element::EndEvent { id, .. }
            | Element::ExclusiveGateway { id, .. }
            | Element::ParallelGateway { id, .. } => id,
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Element::Task { .. } => ElementType::Task,
            Element::UserTask { .. } => ElementType::UserTask,
            Element::ServiceTask { .. } => ElementType::ServiceTask,
            Element::StartEvent { .. } => ElementType::StartEvent,
            Element::EndEvent { .. } => ElementType::EndEvent,
            Element::ExclusiveGateway { .. } => ElementType::ExclusiveGateway,
            Element::ParallelGateway { .. } => ElementType::ParallelGateway,
        }
    }

    /// The element's label, if it carries a non-empty one.
    pub fn label(&self) -> Option<&str> {
        let label = match self {
            Element::Task { label, .. }
            | Element::UserTask { label, .. }
            | Element::ServiceTask { label, .. }
            | Element::ExclusiveGateway { label, .. } => label.as_str(),
            Element::StartEvent { label, .. } | Element::EndEvent { label, .. } => {
                label.as_deref().unwrap_or("")
            }
            Element::ParallelGateway { .. } => "",
        };
        if label.is_empty() {
            None
        } else {
            Some(label)
        }
    }

    pub fn is_gateway(&self) -> bool {
        self.element_type().is_gateway()
    }
}

/// One conditional branch of an exclusive gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusiveBranch {
    pub condition: String,
    #[serde(default)]
    pub path: Vec<Element>,
    /// Explicit continuation target, overriding the reconvergence point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// One branch of a parallel gateway: a bare list of elements on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParallelBranch(pub Vec<Element>);

/// An ordered list of top-level elements, `{"process": [...]}` on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "process")]
    pub elements: Vec<Element>,
}

impl Process {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_tag_values() {
        let task = Element::Task {
            id: "t1".into(),
            label: "Do it".into(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "task");

        let user = Element::UserTask {
            id: "u1".into(),
            label: "Review".into(),
        };
        assert_eq!(serde_json::to_value(&user).unwrap()["type"], "userTask");
    }

    #[test]
    fn test_exclusive_gateway_wire_shape() {
        let gateway = Element::ExclusiveGateway {
            id: "g1".into(),
            label: "OK?".into(),
            has_join: true,
            branches: vec![
                ExclusiveBranch {
                    condition: "yes".into(),
                    path: vec![],
                    next: None,
                },
                ExclusiveBranch {
                    condition: "no".into(),
                    path: vec![],
                    next: Some("e1".into()),
                },
            ],
        };
        let value = serde_json::to_value(&gateway).unwrap();
        assert_eq!(value["type"], "exclusiveGateway");
        assert_eq!(value["has_join"], true);
        assert_eq!(value["branches"][1]["next"], "e1");
        assert!(value["branches"][0].get("next").is_none());
    }

    #[test]
    fn test_parallel_branch_is_bare_list() {
        let gateway = Element::ParallelGateway {
            id: "p1".into(),
            branches: vec![ParallelBranch(vec![Element::Task {
                id: "ta".into(),
                label: "A".into(),
            }])],
        };
        let value = serde_json::to_value(&gateway).unwrap();
        assert!(value["branches"][0].is_array());
        assert_eq!(value["branches"][0][0]["id"], "ta");
    }

    #[test]
    fn test_start_event_label_absent_when_none() {
        let start = Element::StartEvent {
            id: "s1".into(),
            label: None,
        };
        let value = serde_json::to_value(&start).unwrap();
        assert!(value.get("label").is_none());
    }

    #[test]
    fn test_process_wire_key() {
        let process = Process::new(vec![Element::StartEvent {
            id: "s1".into(),
            label: None,
        }]);
        let value = serde_json::to_value(&process).unwrap();
        assert!(value.get("process").is_some());

        let parsed: Process = serde_json::from_value(json!({
            "process": [
                {"type": "startEvent", "id": "s1"},
                {"type": "task", "id": "t1", "label": "Do it"},
                {"type": "endEvent", "id": "e1"}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.elements.len(), 3);
        assert_eq!(parsed.elements[1].id(), "t1");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<Element, _> = serde_json::from_value(json!({
            "type": "callActivity", "id": "c1"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_element_type_tags() {
        assert_eq!(ElementType::from_tag("userTask"), Some(ElementType::UserTask));
        assert_eq!(ElementType::from_tag("process"), None);
        assert_eq!(ElementType::ExclusiveGateway.as_str(), "exclusiveGateway");
        assert!(ElementType::ParallelGateway.is_gateway());
        assert!(!ElementType::EndEvent.is_gateway());
    }
}
