//! Edit-proposal validation: the sole place where the LLM's free-form
//! JSON is narrowed into typed argument records.

use serde_json::{Map, Value};

use crate::error::{EngineResult, ProposalError};
use crate::model::{validate_element, Element, Process};

use super::ops;

/// One validated proposal: an edit call or the stop signal.
#[derive(Debug, Clone, PartialEq)]
pub enum EditProposal {
    Stop,
    Call(EditCall),
}

/// A validated edit function call.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCall {
    DeleteElement {
        element_id: String,
    },
    RedirectBranch {
        branch_condition: String,
        next_id: String,
    },
    AddElement {
        element: Element,
        before_id: Option<String>,
        after_id: Option<String>,
    },
    MoveElement {
        element_id: String,
        before_id: Option<String>,
        after_id: Option<String>,
    },
    UpdateElement {
        new_element: Element,
    },
}

/// Validate a raw proposal. `first` marks the mandatory initial edit,
/// for which the stop signal is rejected.
pub fn validate_proposal(raw: &Value, first: bool) -> EngineResult<EditProposal> {
    let Some(object) = raw.as_object() else {
        return Err(ProposalError::InvalidShape.into());
    };

    if object.contains_key("stop") {
        if object.len() != 1 || object.get("stop") != Some(&Value::Bool(true)) {
            return Err(ProposalError::InvalidShape.into());
        }
        if first {
            return Err(ProposalError::StopFirst.into());
        }
        return Ok(EditProposal::Stop);
    }

    let function = object
        .get("function")
        .and_then(Value::as_str)
        .ok_or(ProposalError::InvalidShape)?;
    let arguments = object
        .get("arguments")
        .and_then(Value::as_object)
        .ok_or(ProposalError::InvalidShape)?;
    if object.len() != 2 {
        return Err(ProposalError::InvalidShape.into());
    }

    let call = match function {
        "delete_element" => {
            check_keys(function, arguments, &["element_id"], &[])?;
            EditCall::DeleteElement {
                element_id: string_arg(function, arguments, "element_id")?,
            }
        }
        "redirect_branch" => {
            check_keys(function, arguments, &["branch_condition", "next_id"], &[])?;
            EditCall::RedirectBranch {
                branch_condition: string_arg(function, arguments, "branch_condition")?,
                next_id: string_arg(function, arguments, "next_id")?,
            }
        }
        "add_element" => {
            check_keys(function, arguments, &["element"], &["before_id", "after_id"])?;
            let (before_id, after_id) = anchor_args(function, arguments)?;
            EditCall::AddElement {
                element: element_arg(function, arguments, "element")?,
                before_id,
                after_id,
            }
        }
        "move_element" => {
            check_keys(
                function,
                arguments,
                &["element_id"],
                &["before_id", "after_id"],
            )?;
            let (before_id, after_id) = anchor_args(function, arguments)?;
            EditCall::MoveElement {
                element_id: string_arg(function, arguments, "element_id")?,
                before_id,
                after_id,
            }
        }
        "update_element" => {
            check_keys(function, arguments, &["new_element"], &[])?;
            EditCall::UpdateElement {
                new_element: element_arg(function, arguments, "new_element")?,
            }
        }
        other => return Err(ProposalError::UnknownFunction(other.to_string()).into()),
    };
    Ok(EditProposal::Call(call))
}

/// Apply a validated call to a process, returning the edited copy.
pub fn apply(process: &Process, call: &EditCall) -> EngineResult<Process> {
    match call {
        EditCall::DeleteElement { element_id } => ops::delete_element(process, element_id),
        EditCall::RedirectBranch {
            branch_condition,
            next_id,
        } => ops::redirect_branch(process, branch_condition, next_id),
        EditCall::AddElement {
            element,
            before_id,
            after_id,
        } => ops::add_element(
            process,
            element.clone(),
            before_id.as_deref(),
            after_id.as_deref(),
        ),
        EditCall::MoveElement {
            element_id,
            before_id,
            after_id,
        } => ops::move_element(
            process,
            element_id,
            before_id.as_deref(),
            after_id.as_deref(),
        ),
        EditCall::UpdateElement { new_element } => {
            ops::update_element(process, new_element.clone())
        }
    }
}

fn check_keys(
    function: &str,
    arguments: &Map<String, Value>,
    required: &[&str],
    optional: &[&str],
) -> EngineResult<()> {
    for key in required {
        if !arguments.contains_key(*key) {
            return Err(ProposalError::MissingKey {
                function: function.to_string(),
                key: key.to_string(),
            }
            .into());
        }
    }
    for key in arguments.keys() {
        if !required.contains(&key.as_str()) && !optional.contains(&key.as_str()) {
            return Err(ProposalError::UnexpectedKey {
                function: function.to_string(),
                key: key.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn anchor_args(
    function: &str,
    arguments: &Map<String, Value>,
) -> EngineResult<(Option<String>, Option<String>)> {
    let before = optional_string_arg(function, arguments, "before_id")?;
    let after = optional_string_arg(function, arguments, "after_id")?;
    if before.is_some() == after.is_some() {
        return Err(ProposalError::AnchorXor {
            function: function.to_string(),
        }
        .into());
    }
    Ok((before, after))
}

fn string_arg(
    function: &str,
    arguments: &Map<String, Value>,
    key: &str,
) -> EngineResult<String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ProposalError::InvalidArgument {
                function: function.to_string(),
                key: key.to_string(),
                message: "expected a string".to_string(),
            }
            .into()
        })
}

fn optional_string_arg(
    function: &str,
    arguments: &Map<String, Value>,
    key: &str,
) -> EngineResult<Option<String>> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => string_arg(function, arguments, key).map(Some),
    }
}

fn element_arg(
    function: &str,
    arguments: &Map<String, Value>,
    key: &str,
) -> EngineResult<Element> {
    let value = arguments.get(key).cloned().unwrap_or(Value::Null);
    let element: Element =
        serde_json::from_value(value).map_err(|e| ProposalError::InvalidArgument {
            function: function.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        })?;
    validate_element(&element)?;
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use serde_json::json;

    #[test]
    fn test_delete_proposal() {
        let raw = json!({"function":"delete_element","arguments":{"element_id":"t1"}});
        let proposal = validate_proposal(&raw, true).unwrap();
        assert_eq!(
            proposal,
            EditProposal::Call(EditCall::DeleteElement {
                element_id: "t1".into()
            })
        );
    }

    #[test]
    fn test_stop_rules() {
        assert_eq!(
            validate_proposal(&json!({"stop": true}), false).unwrap(),
            EditProposal::Stop
        );
        assert!(matches!(
            validate_proposal(&json!({"stop": true}), true),
            Err(EngineError::Proposal(ProposalError::StopFirst))
        ));
        assert!(validate_proposal(&json!({"stop": false}), false).is_err());
        assert!(validate_proposal(&json!({"stop": true, "extra": 1}), false).is_err());
    }

    #[test]
    fn test_unknown_function() {
        let raw = json!({"function":"rename_element","arguments":{}});
        assert!(matches!(
            validate_proposal(&raw, false),
            Err(EngineError::Proposal(ProposalError::UnknownFunction(f))) if f == "rename_element"
        ));
    }

    #[test]
    fn test_missing_and_extra_keys() {
        let raw = json!({"function":"delete_element","arguments":{}});
        assert!(matches!(
            validate_proposal(&raw, false),
            Err(EngineError::Proposal(ProposalError::MissingKey { key, .. })) if key == "element_id"
        ));

        let raw = json!({"function":"delete_element",
                         "arguments":{"element_id":"t1","force":true}});
        assert!(matches!(
            validate_proposal(&raw, false),
            Err(EngineError::Proposal(ProposalError::UnexpectedKey { key, .. })) if key == "force"
        ));
    }

    #[test]
    fn test_anchor_xor() {
        let neither = json!({"function":"move_element","arguments":{"element_id":"t1"}});
        assert!(matches!(
            validate_proposal(&neither, false),
            Err(EngineError::Proposal(ProposalError::AnchorXor { .. }))
        ));

        let both = json!({"function":"move_element",
                          "arguments":{"element_id":"t1","before_id":"a","after_id":"b"}});
        assert!(matches!(
            validate_proposal(&both, false),
            Err(EngineError::Proposal(ProposalError::AnchorXor { .. }))
        ));

        let one = json!({"function":"move_element",
                         "arguments":{"element_id":"t1","after_id":"b"}});
        assert!(validate_proposal(&one, false).is_ok());
    }

    #[test]
    fn test_add_element_narrows_and_validates() {
        let raw = json!({"function":"add_element",
                         "arguments":{"element":{"type":"task","id":"t9","label":"New"},
                                      "after_id":"t1"}});
        match validate_proposal(&raw, true).unwrap() {
            EditProposal::Call(EditCall::AddElement {
                element, after_id, ..
            }) => {
                assert_eq!(element.id(), "t9");
                assert_eq!(after_id.as_deref(), Some("t1"));
            }
            other => panic!("unexpected proposal: {:?}", other),
        }

        let bad_label = json!({"function":"add_element",
                               "arguments":{"element":{"type":"task","id":"t9","label":""},
                                            "after_id":"t1"}});
        assert!(matches!(
            validate_proposal(&bad_label, true),
            Err(EngineError::Schema(_))
        ));

        let bad_type = json!({"function":"add_element",
                              "arguments":{"element":{"type":"callActivity","id":"c1"},
                                           "after_id":"t1"}});
        assert!(matches!(
            validate_proposal(&bad_type, true),
            Err(EngineError::Proposal(ProposalError::InvalidArgument { .. }))
        ));
    }

    #[test]
    fn test_non_object_proposal() {
        assert!(validate_proposal(&json!("delete t1"), false).is_err());
        assert!(validate_proposal(&json!(["function"]), false).is_err());
        assert!(validate_proposal(&json!({"function":"delete_element"}), false).is_err());
    }

    #[test]
    fn test_apply_dispatch() {
        let process = crate::model::parse_process(
            r#"{"process":[
                {"type":"startEvent","id":"s1"},
                {"type":"task","id":"t1","label":"Do it"},
                {"type":"endEvent","id":"e1"}]}"#,
        )
        .unwrap();
        let call = EditCall::AddElement {
            element: Element::Task {
                id: "t2".into(),
                label: "X".into(),
            },
            before_id: None,
            after_id: Some("t1".into()),
        };
        let edited = apply(&process, &call).unwrap();
        assert_eq!(
            crate::model::paths::all_ids(&edited),
            vec!["s1", "t1", "t2", "e1"]
        );
    }
}
