//! Reconstruction of the hierarchical tree from the flat graph.
//!
//! The walker starts at the unique start event and advances linearly
//! until it hits its stop boundary or an already-visited node. For each
//! gateway it computes the common branch endpoint (CBE): the first id,
//! in a breadth-first walk from each outgoing target independently,
//! that appears in every walk. Branch bodies are rebuilt by recursing
//! bounded by the CBE.
//!
//! Join attribution follows the flattener's naming contract: a CBE is
//! gateway G's join only if it is an exclusive gateway with exactly one
//! outgoing flow and its id is `<G.id>-join`. A nested exclusive
//! gateway without a join therefore continues at its CBE instead of
//! capturing an enclosing join.

use std::collections::{HashSet, VecDeque};

use crate::error::{EngineResult, StructureError};
use crate::graph::{build_flat_graph, FlatGraph, GraphEdge, GraphNode};
use crate::model::{
    Element, ElementType, ExclusiveBranch, FlatProcess, ParallelBranch, Process,
};

/// Rebuild the hierarchical process from a flat one.
pub fn unflatten(flat: &FlatProcess) -> EngineResult<Process> {
    let graph = build_flat_graph(flat)?;
    let start = graph.start_event()?.id.clone();
    let mut walker = Walker {
        graph: &graph,
        visited: HashSet::new(),
    };
    let mut elements = Vec::new();
    walker.walk(Some(start), None, &mut elements)?;
    Ok(Process::new(elements))
}

struct Walker<'a> {
    graph: &'a FlatGraph,
    visited: HashSet<String>,
}

impl<'a> Walker<'a> {
    /// Emit elements into `out`, starting at `current` and stopping at
    /// the `stop` boundary or any already-visited node.
    fn walk(
        &mut self,
        mut current: Option<String>,
        stop: Option<&str>,
        out: &mut Vec<Element>,
    ) -> EngineResult<()> {
        while let Some(id) = current {
            if stop == Some(id.as_str()) || self.visited.contains(&id) {
                break;
            }
            self.visited.insert(id.clone());
            let node = self.graph.node(&id)?.clone();
            current = match node.element_type {
                ElementType::ExclusiveGateway => self.rebuild_exclusive(&node, out)?,
                ElementType::ParallelGateway => self.rebuild_parallel(&node, out)?,
                leaf => {
                    out.push(leaf_element(&node, leaf));
                    self.step_linear(&node)?
                }
            };
        }
        Ok(())
    }

    fn step_linear(&self, node: &GraphNode) -> EngineResult<Option<String>> {
        let outgoing = self.graph.outgoing(&node.id)?;
        match outgoing.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only.target.clone())),
            many => Err(StructureError::UnexpectedFanOut {
                id: node.id.clone(),
                count: many.len(),
            }
            .into()),
        }
    }

    fn rebuild_exclusive(
        &mut self,
        node: &GraphNode,
        out: &mut Vec<Element>,
    ) -> EngineResult<Option<String>> {
        let graph = self.graph;
        let outgoing = graph.outgoing(&node.id)?;
        let cbe = self.common_branch_endpoint(&node.id)?;
        let join = cbe
            .clone()
            .filter(|candidate| self.is_exclusive_join(&node.id, candidate));

        let mut branches = Vec::new();
        for edge in &outgoing {
            let mut path = Vec::new();
            self.walk(Some(edge.target.clone()), cbe.as_deref(), &mut path)?;
            let next = self.branch_next(&path, edge, cbe.as_deref())?;
            branches.push(ExclusiveBranch {
                condition: edge.condition.clone().unwrap_or_default(),
                path,
                next,
            });
        }

        let follow = match &join {
            Some(join_id) => {
                self.visited.insert(join_id.clone());
                graph.sole_successor(join_id)?
            }
            None => cbe,
        };

        out.push(Element::ExclusiveGateway {
            id: node.id.clone(),
            label: node.label.clone().unwrap_or_default(),
            has_join: join.is_some(),
            branches,
        });
        Ok(follow)
    }

    fn rebuild_parallel(
        &mut self,
        node: &GraphNode,
        out: &mut Vec<Element>,
    ) -> EngineResult<Option<String>> {
        let graph = self.graph;
        let outgoing = graph.outgoing(&node.id)?;
        let Some(join) = self.common_branch_endpoint(&node.id)? else {
            return Err(StructureError::MissingJoin(node.id.clone()).into());
        };
        let is_join = graph.node(&join)?.element_type == ElementType::ParallelGateway
            && graph.outgoing(&join)?.len() == 1;
        if !is_join {
            return Err(StructureError::MissingJoin(node.id.clone()).into());
        }

        let mut branches = Vec::new();
        for edge in &outgoing {
            let mut path = Vec::new();
            self.walk(Some(edge.target.clone()), Some(join.as_str()), &mut path)?;
            branches.push(ParallelBranch(path));
        }

        self.visited.insert(join.clone());
        let follow = graph.sole_successor(&join)?;
        out.push(Element::ParallelGateway {
            id: node.id.clone(),
            branches,
        });
        Ok(follow)
    }

    fn is_exclusive_join(&self, gateway_id: &str, candidate: &str) -> bool {
        if candidate != format!("{}-join", gateway_id) {
            return false;
        }
        let Ok(node) = self.graph.node(candidate) else {
            return false;
        };
        node.element_type == ElementType::ExclusiveGateway
            && matches!(self.graph.outgoing(candidate), Ok(o) if o.len() == 1)
    }

    /// A branch gets an explicit `next` when its flow leaves the scope:
    /// an empty body targeting something other than the CBE, or a body
    /// whose natural continuation is not the CBE.
    fn branch_next(
        &self,
        path: &[Element],
        edge: &GraphEdge,
        cbe: Option<&str>,
    ) -> EngineResult<Option<String>> {
        let Some(last) = path.last() else {
            if cbe != Some(edge.target.as_str()) {
                return Ok(Some(edge.target.clone()));
            }
            return Ok(None);
        };
        match self.continuation_of(last)? {
            Some(continuation) if Some(continuation.as_str()) != cbe => Ok(Some(continuation)),
            _ => Ok(None),
        }
    }

    /// Where a rebuilt element hands control next: a plain element's
    /// sole outgoing target, a joined gateway's join successor, or a
    /// joinless exclusive gateway's CBE.
    fn continuation_of(&self, element: &Element) -> EngineResult<Option<String>> {
        match element {
            Element::ExclusiveGateway {
                id, has_join: true, ..
            } => self.graph.sole_successor(&format!("{}-join", id)),
            Element::ExclusiveGateway {
                id, has_join: false, ..
            } => self.common_branch_endpoint(id),
            Element::ParallelGateway { id, .. } => {
                self.graph.sole_successor(&format!("{}-join", id))
            }
            _ => self.graph.sole_successor(element.id()),
        }
    }

    /// The first id, in a breadth-first walk from each outgoing target
    /// independently, that appears in every walk. Candidate order is
    /// the first walk's BFS order.
    fn common_branch_endpoint(&self, gateway_id: &str) -> EngineResult<Option<String>> {
        let outgoing = self.graph.outgoing(gateway_id)?;
        if outgoing.is_empty() {
            return Ok(None);
        }
        let walks: Vec<BfsWalk> = outgoing
            .iter()
            .map(|edge| self.bfs_walk(&edge.target))
            .collect::<EngineResult<_>>()?;

        let (first, rest) = (&walks[0], &walks[1..]);
        for id in &first.order {
            if rest.iter().all(|walk| walk.seen.contains(id)) {
                return Ok(Some(id.clone()));
            }
        }
        Ok(None)
    }

    fn bfs_walk(&self, from: &str) -> EngineResult<BfsWalk> {
        let mut walk = BfsWalk::default();
        let mut queue = VecDeque::new();
        walk.seen.insert(from.to_string());
        walk.order.push(from.to_string());
        queue.push_back(from.to_string());

        while let Some(id) = queue.pop_front() {
            for edge in self.graph.outgoing(&id)? {
                if walk.seen.insert(edge.target.clone()) {
                    walk.order.push(edge.target.clone());
                    queue.push_back(edge.target.clone());
                }
            }
        }
        Ok(walk)
    }
}

#[derive(Debug, Default)]
struct BfsWalk {
    order: Vec<String>,
    seen: HashSet<String>,
}

fn leaf_element(node: &GraphNode, element_type: ElementType) -> Element {
    let id = node.id.clone();
    match element_type {
        ElementType::UserTask => Element::UserTask {
            id,
            label: node.label.clone().unwrap_or_default(),
        },
        ElementType::ServiceTask => Element::ServiceTask {
            id,
            label: node.label.clone().unwrap_or_default(),
        },
        ElementType::StartEvent => Element::StartEvent {
            id,
            label: node.label.clone(),
        },
        ElementType::EndEvent => Element::EndEvent {
            id,
            label: node.label.clone(),
        },
        _ => Element::Task {
            id,
            label: node.label.clone().unwrap_or_default(),
        },
    }
}
