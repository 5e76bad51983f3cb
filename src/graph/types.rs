use petgraph::stable_graph::NodeIndex;

use crate::model::ElementType;

/// A node of the flat graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Element id (matches the flat element's id).
    pub id: String,
    /// Element type tag.
    pub element_type: ElementType,
    /// Label, if the element carries one.
    pub label: Option<String>,
}

/// An edge of the flat graph.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    /// Flow id.
    pub id: String,
    /// Source element id.
    pub source: String,
    /// Target element id.
    pub target: String,
    /// Branch condition carried by the flow.
    pub condition: Option<String>,
    /// Position in the flat flow list; ordered edge queries sort on
    /// this so branch order never depends on graph internals.
    pub order: usize,
}

/// Element id to petgraph NodeIndex mapping.
pub type NodeIndexMap = std::collections::HashMap<String, NodeIndex>;
