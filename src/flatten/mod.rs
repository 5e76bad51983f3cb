//! Lowering of the hierarchical tree into the flat representation.
//!
//! Each nested branch is lowered by a fresh [`Flattener`] and spliced
//! into its parent, so parent and child emissions compose without
//! leaking state. Flows carry `"<source>-<target>"` ids and are
//! deduplicated on the `(source, target)` pair, first occurrence wins.

use crate::model::{
    Element, ElementType, ExclusiveBranch, FlatElement, FlatProcess, ParallelBranch, Process,
    SequenceFlow,
};

/// Flatten a hierarchical process into elements plus sequence flows.
pub fn flatten(process: &Process) -> FlatProcess {
    let mut flattener = Flattener::default();
    flattener.walk(&process.elements, None);
    flattener.finish()
}

#[derive(Debug, Default)]
struct Flattener {
    elements: Vec<FlatElement>,
    flows: Vec<SequenceFlow>,
}

impl Flattener {
    fn walk(&mut self, elements: &[Element], parent_next: Option<&str>) {
        for element in elements {
            self.elements.push(FlatElement::new(
                element.id(),
                element.element_type(),
                element.label().map(str::to_string),
            ));
        }

        for (i, element) in elements.iter().enumerate() {
            let next_in_list = elements
                .get(i + 1)
                .map(|e| e.id().to_string())
                .or_else(|| parent_next.map(str::to_string));
            let next_in_list = next_in_list.as_deref();

            match element {
                Element::ExclusiveGateway {
                    id,
                    has_join,
                    branches,
                    ..
                } => self.lower_exclusive(id, *has_join, branches, next_in_list),
                Element::ParallelGateway { id, branches } => {
                    self.lower_parallel(id, branches, next_in_list)
                }
                Element::EndEvent { .. } => {}
                _ => {
                    if let Some(next) = next_in_list {
                        self.push_flow(element.id(), next, None);
                    }
                }
            }
        }
    }

    fn lower_exclusive(
        &mut self,
        id: &str,
        has_join: bool,
        branches: &[ExclusiveBranch],
        next_in_list: Option<&str>,
    ) {
        let join_id = has_join.then(|| format!("{}-join", id));
        if let Some(join) = &join_id {
            self.elements
                .push(FlatElement::new(join, ElementType::ExclusiveGateway, None));
        }

        for branch in branches {
            let target = branch
                .next
                .as_deref()
                .or(join_id.as_deref())
                .or(next_in_list);
            self.lower_branch(id, &branch.path, target, Some(branch.condition.clone()));
        }

        if let (Some(join), Some(next)) = (&join_id, next_in_list) {
            self.push_flow(join, next, None);
        }
    }

    fn lower_parallel(
        &mut self,
        id: &str,
        branches: &[ParallelBranch],
        next_in_list: Option<&str>,
    ) {
        let join_id = format!("{}-join", id);
        self.elements
            .push(FlatElement::new(&join_id, ElementType::ParallelGateway, None));

        for branch in branches {
            self.lower_branch(id, &branch.0, Some(&join_id), None);
        }

        if let Some(next) = next_in_list {
            self.push_flow(&join_id, next, None);
        }
    }

    /// Lower one branch body: empty branches flow straight from the
    /// gateway to the target, otherwise the body is lowered by a
    /// sub-flattener and the gateway flows into its first element.
    fn lower_branch(
        &mut self,
        gateway_id: &str,
        path: &[Element],
        target: Option<&str>,
        condition: Option<String>,
    ) {
        match path.first() {
            None => {
                if let Some(target) = target {
                    self.push_flow(gateway_id, target, condition);
                }
            }
            Some(first) => {
                let first_id = first.id().to_string();
                let mut sub = Flattener::default();
                sub.walk(path, target);
                self.splice(sub);
                self.push_flow(gateway_id, &first_id, condition);
            }
        }
    }

    fn splice(&mut self, sub: Flattener) {
        self.elements.extend(sub.elements);
        for flow in sub.flows {
            self.push(flow);
        }
    }

    fn push_flow(&mut self, source: &str, target: &str, condition: Option<String>) {
        self.push(SequenceFlow::between(source, target, condition));
    }

    fn push(&mut self, flow: SequenceFlow) {
        let duplicate = self
            .flows
            .iter()
            .any(|f| f.source_ref == flow.source_ref && f.target_ref == flow.target_ref);
        if !duplicate {
            self.flows.push(flow);
        }
    }

    fn finish(mut self) -> FlatProcess {
        let flows = std::mem::take(&mut self.flows);
        for flow in &flows {
            if let Some(source) = self.elements.iter_mut().find(|e| e.id == flow.source_ref) {
                source.outgoing.push(flow.id.clone());
            }
            if let Some(target) = self.elements.iter_mut().find(|e| e.id == flow.target_ref) {
                target.incoming.push(flow.id.clone());
            }
        }
        FlatProcess {
            elements: self.elements,
            flows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_process;

    fn flat(json: &str) -> FlatProcess {
        flatten(&parse_process(json).unwrap())
    }

    fn flow_ids(flat: &FlatProcess) -> Vec<&str> {
        flat.flows.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_linear_process() {
        let flat = flat(
            r#"{"process":[
                {"type":"startEvent","id":"s1"},
                {"type":"task","id":"t1","label":"Do it"},
                {"type":"endEvent","id":"e1"}]}"#,
        );
        let ids: Vec<&str> = flat.elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "t1", "e1"]);
        assert_eq!(flow_ids(&flat), vec!["s1-t1", "t1-e1"]);
        assert!(flat.element("e1").unwrap().outgoing.is_empty());
        assert_eq!(flat.element("t1").unwrap().incoming, vec!["s1-t1"]);
    }

    #[test]
    fn test_exclusive_gateway_with_join() {
        let flat = flat(
            r#"{"process":[
                {"type":"startEvent","id":"s1"},
                {"type":"exclusiveGateway","id":"g1","label":"OK?","has_join":true,
                 "branches":[
                    {"condition":"yes","path":[{"type":"task","id":"a","label":"A"}]},
                    {"condition":"no","path":[{"type":"task","id":"b","label":"B"}]}]},
                {"type":"endEvent","id":"e1"}]}"#,
        );
        assert!(flat.element("g1-join").is_some());
        assert_eq!(
            flat.element("g1-join").unwrap().element_type,
            ElementType::ExclusiveGateway
        );
        assert_eq!(
            flow_ids(&flat),
            vec!["s1-g1", "a-g1-join", "g1-a", "b-g1-join", "g1-b", "g1-join-e1"]
        );
        assert_eq!(flat.flow("g1-a").unwrap().condition.as_deref(), Some("yes"));
        assert_eq!(flat.flow("g1-b").unwrap().condition.as_deref(), Some("no"));
    }

    #[test]
    fn test_exclusive_branch_ending_early() {
        let flat = flat(
            r#"{"process":[
                {"type":"startEvent","id":"s1"},
                {"type":"exclusiveGateway","id":"g1","label":"Go?","has_join":false,
                 "branches":[
                    {"condition":"cancel","path":[{"type":"endEvent","id":"e2"}]},
                    {"condition":"go","path":[{"type":"task","id":"t1","label":"Work"}]}]},
                {"type":"endEvent","id":"e1"}]}"#,
        );
        assert!(flat.element("g1-join").is_none());
        assert!(flat.element("e2").unwrap().outgoing.is_empty());
        assert_eq!(flat.flow("t1-e1").unwrap().condition, None);
        assert!(flat.flow("g1-e2").is_some());
    }

    #[test]
    fn test_parallel_gateway() {
        let flat = flat(
            r#"{"process":[
                {"type":"startEvent","id":"s1"},
                {"type":"parallelGateway","id":"p1",
                 "branches":[[{"type":"task","id":"ta","label":"A"}],
                             [{"type":"task","id":"tb","label":"B"}]]},
                {"type":"endEvent","id":"e1"}]}"#,
        );
        let join = flat.element("p1-join").unwrap();
        assert_eq!(join.element_type, ElementType::ParallelGateway);
        assert_eq!(
            flow_ids(&flat),
            vec!["s1-p1", "ta-p1-join", "p1-ta", "tb-p1-join", "p1-tb", "p1-join-e1"]
        );
    }

    #[test]
    fn test_empty_branch_flows_to_continuation() {
        let flat = flat(
            r#"{"process":[
                {"type":"startEvent","id":"s1"},
                {"type":"exclusiveGateway","id":"g1","label":"OK?","has_join":false,
                 "branches":[
                    {"condition":"skip","path":[]},
                    {"condition":"do","path":[{"type":"task","id":"t1","label":"T"}]}]},
                {"type":"endEvent","id":"e1"}]}"#,
        );
        let skip = flat.flow("g1-e1").unwrap();
        assert_eq!(skip.condition.as_deref(), Some("skip"));
    }

    #[test]
    fn test_branch_next_overrides_continuation() {
        let flat = flat(
            r#"{"process":[
                {"type":"startEvent","id":"s1"},
                {"type":"task","id":"t0","label":"Prep"},
                {"type":"exclusiveGateway","id":"g1","label":"Retry?","has_join":false,
                 "branches":[
                    {"condition":"again","path":[],"next":"t0"},
                    {"condition":"done","path":[]}]},
                {"type":"endEvent","id":"e1"}]}"#,
        );
        assert_eq!(flat.flow("g1-t0").unwrap().condition.as_deref(), Some("again"));
        assert_eq!(flat.flow("g1-e1").unwrap().condition.as_deref(), Some("done"));
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let json = r#"{"process":[
            {"type":"startEvent","id":"s1"},
            {"type":"exclusiveGateway","id":"g1","label":"OK?","has_join":true,
             "branches":[
                {"condition":"yes","path":[{"type":"task","id":"a","label":"A"}]},
                {"condition":"no","path":[]}]},
            {"type":"endEvent","id":"e1"}]}"#;
        let process = parse_process(json).unwrap();
        assert_eq!(flatten(&process), flatten(&process));
    }
}
