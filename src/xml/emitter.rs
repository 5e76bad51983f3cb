//! BPMN 2.0 XML emission from the flat representation.
//!
//! A fixed namespace set, one `bpmn:process` (`Process_1`,
//! `isExecutable="false"`), and a diagram-interchange block with
//! placeholder geometry for downstream layout tooling to relocate.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{EngineResult, StructureError};
use crate::model::FlatProcess;

const NS_MODEL: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
const NS_DI: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
const NS_DC: &str = "http://www.omg.org/spec/DD/20100524/DC";
const NS_DD_DI: &str = "http://www.omg.org/spec/DD/20100524/DI";

const PROCESS_ID: &str = "Process_1";

/// Serialize a flat process into BPMN 2.0 XML.
pub fn emit_bpmn_xml(flat: &FlatProcess) -> EngineResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_document(&mut writer, flat).map_err(|e| StructureError::Xml(e.to_string()))?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| StructureError::Xml(e.to_string()).into())
}

fn write_document(writer: &mut Writer<Vec<u8>>, flat: &FlatProcess) -> std::io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut definitions = BytesStart::new("bpmn:definitions");
    definitions.push_attribute(("xmlns:bpmn", NS_MODEL));
    definitions.push_attribute(("xmlns:bpmndi", NS_DI));
    definitions.push_attribute(("xmlns:dc", NS_DC));
    definitions.push_attribute(("xmlns:di", NS_DD_DI));
    definitions.push_attribute(("id", "Definitions_1"));
    definitions.push_attribute(("targetNamespace", "http://bpmn.io/schema/bpmn"));
    writer.write_event(Event::Start(definitions))?;

    write_process(writer, flat)?;
    write_diagram(writer, flat)?;

    writer.write_event(Event::End(BytesEnd::new("bpmn:definitions")))?;
    Ok(())
}

fn write_process(writer: &mut Writer<Vec<u8>>, flat: &FlatProcess) -> std::io::Result<()> {
    let mut process = BytesStart::new("bpmn:process");
    process.push_attribute(("id", PROCESS_ID));
    process.push_attribute(("isExecutable", "false"));
    writer.write_event(Event::Start(process))?;

    for element in &flat.elements {
        let tag = format!("bpmn:{}", element.element_type.as_str());
        let mut start = BytesStart::new(tag.as_str());
        start.push_attribute(("id", element.id.as_str()));
        if let Some(label) = element.label.as_deref().filter(|l| !l.is_empty()) {
            start.push_attribute(("name", label));
        }

        if element.incoming.is_empty() && element.outgoing.is_empty() {
            writer.write_event(Event::Empty(start))?;
            continue;
        }

        writer.write_event(Event::Start(start))?;
        for flow_id in &element.incoming {
            write_text_element(writer, "bpmn:incoming", flow_id)?;
        }
        for flow_id in &element.outgoing {
            write_text_element(writer, "bpmn:outgoing", flow_id)?;
        }
        writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    }

    for flow in &flat.flows {
        let mut start = BytesStart::new("bpmn:sequenceFlow");
        start.push_attribute(("id", flow.id.as_str()));
        start.push_attribute(("sourceRef", flow.source_ref.as_str()));
        start.push_attribute(("targetRef", flow.target_ref.as_str()));
        if let Some(condition) = flow.condition.as_deref().filter(|c| !c.is_empty()) {
            start.push_attribute(("name", condition));
        }
        writer.write_event(Event::Empty(start))?;
    }

    writer.write_event(Event::End(BytesEnd::new("bpmn:process")))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    text: &str,
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Placeholder diagram-interchange block: elements tiled on a 150-px
/// grid, edges with two zero waypoints. Coordinates are not a contract;
/// layout tooling replaces them.
fn write_diagram(writer: &mut Writer<Vec<u8>>, flat: &FlatProcess) -> std::io::Result<()> {
    let mut diagram = BytesStart::new("bpmndi:BPMNDiagram");
    diagram.push_attribute(("id", "BPMNDiagram_1"));
    writer.write_event(Event::Start(diagram))?;

    let mut plane = BytesStart::new("bpmndi:BPMNPlane");
    plane.push_attribute(("id", "BPMNPlane_1"));
    plane.push_attribute(("bpmnElement", PROCESS_ID));
    writer.write_event(Event::Start(plane))?;

    for (i, element) in flat.elements.iter().enumerate() {
        let mut shape = BytesStart::new("bpmndi:BPMNShape");
        let shape_id = format!("{}_di", element.id);
        shape.push_attribute(("id", shape_id.as_str()));
        shape.push_attribute(("bpmnElement", element.id.as_str()));
        writer.write_event(Event::Start(shape))?;

        let x = ((i % 8) * 150 + 150).to_string();
        let y = ((i / 8) * 150 + 100).to_string();
        let mut bounds = BytesStart::new("dc:Bounds");
        bounds.push_attribute(("x", x.as_str()));
        bounds.push_attribute(("y", y.as_str()));
        bounds.push_attribute(("width", "100"));
        bounds.push_attribute(("height", "80"));
        writer.write_event(Event::Empty(bounds))?;

        writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNShape")))?;
    }

    for flow in &flat.flows {
        let mut edge = BytesStart::new("bpmndi:BPMNEdge");
        let edge_id = format!("{}_di", flow.id);
        edge.push_attribute(("id", edge_id.as_str()));
        edge.push_attribute(("bpmnElement", flow.id.as_str()));
        writer.write_event(Event::Start(edge))?;
        for _ in 0..2 {
            let mut waypoint = BytesStart::new("di:waypoint");
            waypoint.push_attribute(("x", "0"));
            waypoint.push_attribute(("y", "0"));
            writer.write_event(Event::Empty(waypoint))?;
        }
        writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNEdge")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNPlane")))?;
    writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNDiagram")))?;
    Ok(())
}
