//! Structural addressing inside the nested process tree.
//!
//! A path is a sequence of steps identifying a containing list: a list
//! index, the `branches` slot of a gateway, a branch index, and the
//! branch's `path` list. The empty path addresses the top-level list.

use crate::error::{EngineResult, LookupError};

use super::element::{Element, ExclusiveBranch, Process};

/// One step of a structural path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// Index into the current element list.
    Index(usize),
    /// Enter the `branches` list of the gateway selected by the
    /// preceding `Index`.
    Branches,
    /// Select one branch.
    Branch(usize),
    /// Enter the selected branch's element list.
    Path,
}

/// A path addressing a list slot inside the tree.
pub type ElementPath = Vec<PathStep>;

/// Every element id in the tree, in depth-first walk order.
pub fn all_ids(process: &Process) -> Vec<String> {
    let mut ids = Vec::new();
    collect_ids(&process.elements, &mut ids);
    ids
}

fn collect_ids(elements: &[Element], out: &mut Vec<String>) {
    for element in elements {
        out.push(element.id().to_string());
        match element {
            Element::ExclusiveGateway { branches, .. } => {
                for branch in branches {
                    collect_ids(&branch.path, out);
                }
            }
            Element::ParallelGateway { branches, .. } => {
                for branch in branches {
                    collect_ids(&branch.0, out);
                }
            }
            _ => {}
        }
    }
}

/// Locate an element by id: the path of its containing list plus its
/// index within that list. Depth-first, top-level-index order.
pub fn find_element(process: &Process, element_id: &str) -> Option<(ElementPath, usize)> {
    locate_in(&process.elements, element_id, &Vec::new())
}

fn locate_in(
    elements: &[Element],
    target: &str,
    prefix: &ElementPath,
) -> Option<(ElementPath, usize)> {
    for (i, element) in elements.iter().enumerate() {
        if element.id() == target {
            return Some((prefix.clone(), i));
        }
        match element {
            Element::ExclusiveGateway { branches, .. } => {
                for (b, branch) in branches.iter().enumerate() {
                    let nested = nested_prefix(prefix, i, b);
                    if let Some(found) = locate_in(&branch.path, target, &nested) {
                        return Some(found);
                    }
                }
            }
            Element::ParallelGateway { branches, .. } => {
                for (b, branch) in branches.iter().enumerate() {
                    let nested = nested_prefix(prefix, i, b);
                    if let Some(found) = locate_in(&branch.0, target, &nested) {
                        return Some(found);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn nested_prefix(prefix: &ElementPath, index: usize, branch: usize) -> ElementPath {
    let mut nested = prefix.clone();
    nested.extend([
        PathStep::Index(index),
        PathStep::Branches,
        PathStep::Branch(branch),
        PathStep::Path,
    ]);
    nested
}

/// Resolve an insertion position from a before/after anchor.
///
/// Exactly one anchor must be supplied; `before` yields the anchor's
/// index, `after` yields index + 1.
pub fn find_position(
    process: &Process,
    before_id: Option<&str>,
    after_id: Option<&str>,
) -> EngineResult<(ElementPath, usize)> {
    let (anchor, offset) = match (before_id, after_id) {
        (Some(before), None) => (before, 0),
        (None, Some(after)) => (after, 1),
        _ => return Err(LookupError::AnchorSelection.into()),
    };
    let (path, index) = find_element(process, anchor)
        .ok_or_else(|| LookupError::UnknownId(anchor.to_string()))?;
    Ok((path, index + offset))
}

/// Find the first exclusive branch with the given condition: the path
/// of the owning gateway's `branches` list plus the branch index.
pub fn find_branch_position(
    process: &Process,
    condition: &str,
) -> EngineResult<(ElementPath, usize)> {
    locate_branch(&process.elements, condition, &Vec::new())
        .ok_or_else(|| LookupError::UnknownCondition(condition.to_string()).into())
}

fn locate_branch(
    elements: &[Element],
    condition: &str,
    prefix: &ElementPath,
) -> Option<(ElementPath, usize)> {
    for (i, element) in elements.iter().enumerate() {
        match element {
            Element::ExclusiveGateway { branches, .. } => {
                for (b, branch) in branches.iter().enumerate() {
                    if branch.condition == condition {
                        let mut path = prefix.clone();
                        path.extend([PathStep::Index(i), PathStep::Branches]);
                        return Some((path, b));
                    }
                }
                for (b, branch) in branches.iter().enumerate() {
                    let nested = nested_prefix(prefix, i, b);
                    if let Some(found) = locate_branch(&branch.path, condition, &nested) {
                        return Some(found);
                    }
                }
            }
            Element::ParallelGateway { branches, .. } => {
                for (b, branch) in branches.iter().enumerate() {
                    let nested = nested_prefix(prefix, i, b);
                    if let Some(found) = locate_branch(&branch.0, condition, &nested) {
                        return Some(found);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Resolve a containing-list path to its mutable element list.
///
/// Returns `None` if the path does not address a list in this tree.
pub fn list_at_mut<'a>(
    process: &'a mut Process,
    path: &[PathStep],
) -> Option<&'a mut Vec<Element>> {
    let mut list = &mut process.elements;
    let mut rest = path;
    while !rest.is_empty() {
        let [PathStep::Index(i), PathStep::Branches, PathStep::Branch(b), PathStep::Path, tail @ ..] =
            rest
        else {
            return None;
        };
        list = match list.get_mut(*i)? {
            Element::ExclusiveGateway { branches, .. } => &mut branches.get_mut(*b)?.path,
            Element::ParallelGateway { branches, .. } => &mut branches.get_mut(*b)?.0,
            _ => return None,
        };
        rest = tail;
    }
    Some(list)
}

/// Resolve a path ending in `Branches` to the exclusive-branch list of
/// the addressed gateway.
pub fn exclusive_branches_at_mut<'a>(
    process: &'a mut Process,
    path: &[PathStep],
) -> Option<&'a mut Vec<ExclusiveBranch>> {
    let [list_path @ .., PathStep::Index(i), PathStep::Branches] = path else {
        return None;
    };
    let list = list_at_mut(process, list_path)?;
    match list.get_mut(*i)? {
        Element::ExclusiveGateway { branches, .. } => Some(branches),
        _ => None,
    }
}
