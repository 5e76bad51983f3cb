//! Schema validation over the hierarchical process tree.
//!
//! Fail-fast: the first violation is returned, in walk order.

use std::collections::HashSet;

use crate::error::{EngineResult, LookupError, SchemaError};

use super::element::{Element, ElementType, Process};
use super::paths::all_ids;

/// Validate a whole process: start-event placement, id uniqueness,
/// gateway arity, label and condition rules, and `next` references.
pub fn validate(process: &Process) -> EngineResult<()> {
    let starts = process
        .elements
        .iter()
        .filter(|e| e.element_type() == ElementType::StartEvent)
        .count();
    match starts {
        0 => return Err(SchemaError::NoStartEvent.into()),
        1 => {}
        n => return Err(SchemaError::ExtraStartEvents(n).into()),
    }

    let mut seen = HashSet::new();
    for element in &process.elements {
        check_element(element, &mut seen, true)?;
    }

    let ids: HashSet<String> = all_ids(process).into_iter().collect();
    check_next_refs(&process.elements, &ids)?;
    Ok(())
}

/// Validate a single element (and its nested branches) in isolation.
///
/// Cross-tree concerns (id collisions with the rest of the process,
/// start-event placement) are left to [`validate`].
pub fn validate_element(element: &Element) -> EngineResult<()> {
    let mut seen = HashSet::new();
    check_element(element, &mut seen, true)
}

fn check_element(
    element: &Element,
    seen: &mut HashSet<String>,
    top_level: bool,
) -> EngineResult<()> {
    let id = element.id();
    if id.trim().is_empty() {
        return Err(SchemaError::EmptyId.into());
    }
    if !seen.insert(id.to_string()) {
        return Err(SchemaError::DuplicateId(id.to_string()).into());
    }

    match element {
        Element::Task { label, .. }
        | Element::UserTask { label, .. }
        | Element::ServiceTask { label, .. } => {
            if label.trim().is_empty() {
                return Err(SchemaError::EmptyLabel {
                    id: id.to_string(),
                    element_type: element.element_type().to_string(),
                }
                .into());
            }
        }
        Element::StartEvent { .. } => {
            if !top_level {
                return Err(SchemaError::NestedStartEvent(id.to_string()).into());
            }
        }
        Element::EndEvent { .. } => {}
        Element::ExclusiveGateway {
            label, branches, ..
        } => {
            if label.trim().is_empty() {
                return Err(SchemaError::EmptyLabel {
                    id: id.to_string(),
                    element_type: element.element_type().to_string(),
                }
                .into());
            }
            if branches.len() < 2 {
                return Err(SchemaError::BranchArity {
                    id: id.to_string(),
                    count: branches.len(),
                }
                .into());
            }
            for (index, branch) in branches.iter().enumerate() {
                if branch.condition.trim().is_empty() {
                    return Err(SchemaError::EmptyCondition {
                        id: id.to_string(),
                        index,
                    }
                    .into());
                }
                for nested in &branch.path {
                    check_element(nested, seen, false)?;
                }
            }
        }
        Element::ParallelGateway { branches, .. } => {
            if branches.len() < 2 {
                return Err(SchemaError::BranchArity {
                    id: id.to_string(),
                    count: branches.len(),
                }
                .into());
            }
            for (index, branch) in branches.iter().enumerate() {
                if branch.0.is_empty() {
                    return Err(SchemaError::EmptyParallelBranch {
                        id: id.to_string(),
                        index,
                    }
                    .into());
                }
                for nested in &branch.0 {
                    check_element(nested, seen, false)?;
                }
            }
        }
    }
    Ok(())
}

fn check_next_refs(elements: &[Element], ids: &HashSet<String>) -> EngineResult<()> {
    for element in elements {
        match element {
            Element::ExclusiveGateway { id, branches, .. } => {
                for branch in branches {
                    if let Some(next) = &branch.next {
                        if !ids.contains(next) {
                            return Err(LookupError::DanglingNext {
                                id: id.clone(),
                                next: next.clone(),
                            }
                            .into());
                        }
                    }
                    check_next_refs(&branch.path, ids)?;
                }
            }
            Element::ParallelGateway { branches, .. } => {
                for branch in branches {
                    check_next_refs(&branch.0, ids)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
