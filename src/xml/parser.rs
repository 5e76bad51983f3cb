//! BPMN 2.0 XML parsing into the flat representation.
//!
//! Namespace-agnostic: only the local part of each tag is considered,
//! so `bpmn:task` and `task` parse the same. The first element whose
//! tag ends in `process` is scanned; only its direct children are
//! consumed and unsupported children are skipped.

use quick_xml::events::attributes::Attributes;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{EngineResult, StructureError};
use crate::model::{ElementType, FlatElement, FlatProcess, SequenceFlow};

/// Parse BPMN XML into a [`FlatProcess`].
pub fn parse_bpmn_xml(xml: &str) -> EngineResult<FlatProcess> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut elements: Vec<FlatElement> = Vec::new();
    let mut flows: Vec<SequenceFlow> = Vec::new();

    let mut in_process = false;
    let mut found_process = false;
    let mut child_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if !in_process {
                    if local_name(&e) == "process" {
                        in_process = true;
                        found_process = true;
                    }
                    continue;
                }
                if child_depth == 0 {
                    handle_child(&e, &mut elements, &mut flows)?;
                }
                child_depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if !in_process {
                    // A self-closing process element has no children to
                    // scope; record it and stop at the first process.
                    if local_name(&e) == "process" {
                        found_process = true;
                        break;
                    }
                    continue;
                }
                if child_depth == 0 {
                    handle_child(&e, &mut elements, &mut flows)?;
                }
            }
            Ok(Event::End(_)) => {
                if in_process {
                    if child_depth == 0 {
                        break;
                    }
                    child_depth -= 1;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(StructureError::Xml(e.to_string()).into()),
        }
    }

    if !found_process {
        return Err(StructureError::NoProcessElement.into());
    }

    let starts = elements
        .iter()
        .filter(|e| e.element_type == ElementType::StartEvent)
        .count();
    if starts != 1 {
        return Err(StructureError::StartEventCount(starts).into());
    }

    populate_flow_refs(&mut elements, &flows);
    Ok(FlatProcess { elements, flows })
}

fn handle_child(
    e: &BytesStart<'_>,
    elements: &mut Vec<FlatElement>,
    flows: &mut Vec<SequenceFlow>,
) -> EngineResult<()> {
    let tag = local_name(e);

    if tag == "sequenceFlow" {
        let id = attribute(e.attributes(), "id");
        let source = attribute(e.attributes(), "sourceRef").ok_or_else(|| {
            StructureError::Xml(format!(
                "sequenceFlow '{}' has no sourceRef",
                id.as_deref().unwrap_or("?")
            ))
        })?;
        let target = attribute(e.attributes(), "targetRef").ok_or_else(|| {
            StructureError::Xml(format!(
                "sequenceFlow '{}' has no targetRef",
                id.as_deref().unwrap_or("?")
            ))
        })?;
        let condition = attribute(e.attributes(), "name").filter(|c| !c.is_empty());
        flows.push(SequenceFlow {
            id: id.unwrap_or_else(|| format!("{}-{}", source, target)),
            source_ref: source,
            target_ref: target,
            condition,
        });
        return Ok(());
    }

    let Some(element_type) = ElementType::from_tag(&tag) else {
        return Ok(());
    };
    let id = attribute(e.attributes(), "id")
        .ok_or_else(|| StructureError::Xml(format!("<{}> element has no id", tag)))?;
    let label = match element_type {
        ElementType::ParallelGateway => None,
        _ => attribute(e.attributes(), "name").filter(|l| !l.is_empty()),
    };
    elements.push(FlatElement::new(id, element_type, label));
    Ok(())
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned()
}

fn attribute(attributes: Attributes<'_>, key: &str) -> Option<String> {
    for attr in attributes.flatten() {
        if String::from_utf8_lossy(attr.key.local_name().as_ref()) == key {
            return attr.unescape_value().ok().map(|v| v.into_owned());
        }
    }
    None
}

fn populate_flow_refs(elements: &mut [FlatElement], flows: &[SequenceFlow]) {
    for flow in flows {
        if let Some(source) = elements.iter_mut().find(|e| e.id == flow.source_ref) {
            source.outgoing.push(flow.id.clone());
        }
        if let Some(target) = elements.iter_mut().find(|e| e.id == flow.target_ref) {
            target.incoming.push(flow.id.clone());
        }
    }
}
