use petgraph::stable_graph::StableDiGraph;

use crate::error::{EngineResult, LookupError, StructureError};
use crate::model::{ElementType, FlatProcess};

use super::types::*;

/// Immutable graph view over a flat process.
#[derive(Debug)]
pub struct FlatGraph {
    /// Graph structure.
    pub graph: StableDiGraph<GraphNode, GraphEdge>,
    /// Element id to NodeIndex mapping.
    pub node_index_map: NodeIndexMap,
}

impl FlatGraph {
    /// Get a graph node by element id.
    pub fn node(&self, element_id: &str) -> EngineResult<&GraphNode> {
        let idx = self
            .node_index_map
            .get(element_id)
            .ok_or_else(|| LookupError::UnknownId(element_id.to_string()))?;
        self.graph
            .node_weight(*idx)
            .ok_or_else(|| LookupError::UnknownId(element_id.to_string()).into())
    }

    /// Outgoing flows of an element, in flow-insertion order.
    pub fn outgoing(&self, element_id: &str) -> EngineResult<Vec<&GraphEdge>> {
        self.edges(element_id, petgraph::Direction::Outgoing)
    }

    /// Incoming flows of an element, in flow-insertion order.
    pub fn incoming(&self, element_id: &str) -> EngineResult<Vec<&GraphEdge>> {
        self.edges(element_id, petgraph::Direction::Incoming)
    }

    fn edges(
        &self,
        element_id: &str,
        direction: petgraph::Direction,
    ) -> EngineResult<Vec<&GraphEdge>> {
        let idx = self
            .node_index_map
            .get(element_id)
            .ok_or_else(|| LookupError::UnknownId(element_id.to_string()))?;
        let mut edges: Vec<&GraphEdge> = self
            .graph
            .edges_directed(*idx, direction)
            .map(|e| e.weight())
            .collect();
        edges.sort_by_key(|e| e.order);
        Ok(edges)
    }

    /// The target of the element's single outgoing flow, if it has
    /// exactly one.
    pub fn sole_successor(&self, element_id: &str) -> EngineResult<Option<String>> {
        let outgoing = self.outgoing(element_id)?;
        Ok(match outgoing.as_slice() {
            [only] => Some(only.target.clone()),
            _ => None,
        })
    }

    /// The unique start event, or a structure error on any other count.
    pub fn start_event(&self) -> EngineResult<&GraphNode> {
        let mut starts: Vec<&GraphNode> = self
            .graph
            .node_weights()
            .filter(|n| n.element_type == ElementType::StartEvent)
            .collect();
        if starts.len() != 1 {
            return Err(StructureError::StartEventCount(starts.len()).into());
        }
        Ok(starts.remove(0))
    }
}

/// Build a [`FlatGraph`] from a flat process.
pub fn build_flat_graph(flat: &FlatProcess) -> EngineResult<FlatGraph> {
    let mut graph = StableDiGraph::<GraphNode, GraphEdge>::new();
    let mut node_index_map = NodeIndexMap::new();

    for element in &flat.elements {
        let idx = graph.add_node(GraphNode {
            id: element.id.clone(),
            element_type: element.element_type,
            label: element.label.clone(),
        });
        node_index_map.insert(element.id.clone(), idx);
    }

    for (order, flow) in flat.flows.iter().enumerate() {
        let source_idx = node_index_map.get(&flow.source_ref).ok_or_else(|| {
            StructureError::DanglingFlow {
                flow: flow.id.clone(),
                reference: flow.source_ref.clone(),
            }
        })?;
        let target_idx = node_index_map.get(&flow.target_ref).ok_or_else(|| {
            StructureError::DanglingFlow {
                flow: flow.id.clone(),
                reference: flow.target_ref.clone(),
            }
        })?;

        graph.add_edge(
            *source_idx,
            *target_idx,
            GraphEdge {
                id: flow.id.clone(),
                source: flow.source_ref.clone(),
                target: flow.target_ref.clone(),
                condition: flow.condition.clone(),
                order,
            },
        );
    }

    Ok(FlatGraph {
        graph,
        node_index_map,
    })
}
