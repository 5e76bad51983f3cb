//! Prompt assembly for the editing session.

/// System prompt: role, function reference, and the JSON-only contract.
pub const SYSTEM_PROMPT: &str = r#"You are a BPMN process editor. You modify a business process, given as JSON, by calling exactly one edit function per response.

Available functions:

delete_element    arguments: {"element_id": "<id>"}
                  Remove the element from its containing list.
redirect_branch   arguments: {"branch_condition": "<condition>", "next_id": "<id>"}
                  Point the branch with that exact condition at another element.
add_element       arguments: {"element": {...}, "before_id": "<id>"}  (or "after_id", never both)
                  Insert a new element next to the anchor element.
move_element      arguments: {"element_id": "<id>", "before_id": "<id>"}  (or "after_id", never both)
                  Move an existing element next to the anchor element.
update_element    arguments: {"new_element": {...}}
                  Replace the element with the same id. Not allowed for gateways.

Element JSON shapes:
{"type": "task" | "userTask" | "serviceTask", "id": "...", "label": "..."}
{"type": "startEvent" | "endEvent", "id": "...", "label": "..."} (label optional)

Respond with a single JSON object and nothing else:
{"function": "<name>", "arguments": {...}}

When the change request is fully applied, respond with:
{"stop": true}"#;

/// First prompt of a session: the stop signal is not yet allowed.
pub fn initial_prompt(process_json: &str, change_request: &str) -> String {
    format!(
        "Current process:\n{process_json}\n\nChange request: {change_request}\n\nApply the first edit now. Respond with exactly one function call; stopping is not allowed yet."
    )
}

/// Follow-up prompt: another call or the stop signal.
pub fn iteration_prompt(process_json: &str, change_request: &str) -> String {
    format!(
        "Current process:\n{process_json}\n\nChange request: {change_request}\n\nIf further edits are needed, respond with exactly one function call. If the change request is fully applied, respond with {{\"stop\": true}}."
    )
}

/// Feedback message after a rejected proposal.
pub fn retry_feedback(error: &str) -> String {
    format!(
        "That proposal was rejected: {error}\n\nRespond again with a single corrected JSON object."
    )
}
