//! Structural edit operations over the hierarchical tree.
//!
//! All operations are pure: the input process is cloned and the clone
//! is mutated and returned. Elements are addressed by id at arbitrary
//! nesting depth via [`model::paths`](crate::model::paths).

use crate::error::{EngineResult, LookupError, ProposalError, SchemaError};
use crate::model::paths::{
    all_ids, exclusive_branches_at_mut, find_branch_position, find_element, find_position,
    list_at_mut,
};
use crate::model::{Element, Process};

/// Remove the element from its containing list. Does not cascade
/// across branches.
pub fn delete_element(process: &Process, element_id: &str) -> EngineResult<Process> {
    let mut edited = process.clone();
    remove_by_id(&mut edited, element_id)?;
    Ok(edited)
}

/// Set the `next` of the first branch whose condition matches exactly.
///
/// The target id is not checked against the tree; callers validate the
/// whole process when they need that guarantee.
pub fn redirect_branch(
    process: &Process,
    branch_condition: &str,
    next_id: &str,
) -> EngineResult<Process> {
    let mut edited = process.clone();
    let (path, index) = find_branch_position(&edited, branch_condition)?;
    let branches = exclusive_branches_at_mut(&mut edited, &path)
        .ok_or_else(|| LookupError::UnknownCondition(branch_condition.to_string()))?;
    branches[index].next = Some(next_id.to_string());
    Ok(edited)
}

/// Insert `element` into the list containing the anchor, before or
/// after it.
pub fn add_element(
    process: &Process,
    element: Element,
    before_id: Option<&str>,
    after_id: Option<&str>,
) -> EngineResult<Process> {
    let mut edited = process.clone();
    insert_element(&mut edited, element, before_id, after_id)?;
    Ok(edited)
}

/// Move an element next to the anchor: a delete followed by an add of
/// the removed value.
pub fn move_element(
    process: &Process,
    element_id: &str,
    before_id: Option<&str>,
    after_id: Option<&str>,
) -> EngineResult<Process> {
    let mut edited = process.clone();
    let removed = remove_by_id(&mut edited, element_id)?;
    insert_element(&mut edited, removed, before_id, after_id)?;
    Ok(edited)
}

/// Replace the element carrying the same id as `new_element`.
///
/// Gateways cannot be written this way; structural edits go through
/// add/delete.
pub fn update_element(process: &Process, new_element: Element) -> EngineResult<Process> {
    if new_element.is_gateway() {
        return Err(ProposalError::GatewayUpdate(new_element.id().to_string()).into());
    }
    let mut edited = process.clone();
    let id = new_element.id().to_string();
    let (path, index) =
        find_element(&edited, &id).ok_or_else(|| LookupError::UnknownId(id.clone()))?;
    let list = list_at_mut(&mut edited, &path).ok_or(LookupError::UnknownId(id))?;
    list[index] = new_element;
    Ok(edited)
}

fn remove_by_id(process: &mut Process, element_id: &str) -> EngineResult<Element> {
    let (path, index) = find_element(process, element_id)
        .ok_or_else(|| LookupError::UnknownId(element_id.to_string()))?;
    let list = list_at_mut(process, &path)
        .ok_or_else(|| LookupError::UnknownId(element_id.to_string()))?;
    Ok(list.remove(index))
}

fn insert_element(
    process: &mut Process,
    element: Element,
    before_id: Option<&str>,
    after_id: Option<&str>,
) -> EngineResult<()> {
    if all_ids(process).iter().any(|id| id == element.id()) {
        return Err(SchemaError::DuplicateId(element.id().to_string()).into());
    }
    let (path, index) = find_position(process, before_id, after_id)?;
    let anchor = before_id.or(after_id).unwrap_or_default();
    let list = list_at_mut(process, &path)
        .ok_or_else(|| LookupError::UnknownId(anchor.to_string()))?;
    list.insert(index, element);
    Ok(())
}
