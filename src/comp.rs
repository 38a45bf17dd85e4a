// Node-graph builder for the Fusion .setting composition format.
//
// Tools live in an arena addressed by NodeId, so a connection can only
// reference a tool registered in the same scope. Display names are checked
// for collisions when given explicitly and generated from the tool kind at
// serialization time otherwise.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Flow-view grid position. Serialized at the host's 110x33 pixel pitch.
pub type GridPos = (f64, f64);

const GRID_X: f64 = 110.0;
const GRID_Y: f64 = 33.0;

/// Handle to a tool within one composition scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A literal or connection wired into a named tool input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Point(f64, f64),
    /// Another tool's declared output, within the same composition.
    Connection { node: NodeId, source: String },
    /// Published polyline vertices; serialized as PublishID entries plus
    /// one Point{i} input per vertex.
    Polyline(Vec<(f64, f64)>),
}

/// One tool: operator kind, layout position, ordered named inputs, and the
/// output other tools connect from.
#[derive(Debug, Clone)]
pub struct Node {
    kind: String,
    label: Option<String>,
    position: GridPos,
    inputs: Vec<(String, InputValue)>,
    output: String,
    group: Option<Group>,
}

impl Node {
    fn new(kind: &str, label: Option<String>, position: GridPos) -> Self {
        // Mask tools publish a Mask output; image tools an Output
        let output = if kind.ends_with("Mask") { "Mask" } else { "Output" };
        Self {
            kind: kind.to_string(),
            label,
            position,
            inputs: Vec::new(),
            output: output.to_string(),
            group: None,
        }
    }
}

/// An input of an internal tool exposed on a group's control surface.
#[derive(Debug, Clone)]
pub struct InstanceInput {
    node: NodeId,
    input: String,
    name: Option<String>,
    control_group: Option<u32>,
    default: Option<f64>,
}

impl InstanceInput {
    pub fn new(node: NodeId, input: &str) -> Self {
        Self {
            node,
            input: input.to_string(),
            name: None,
            control_group: None,
            default: None,
        }
    }

    /// Display name shown on the group control.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Share one control between several exposed inputs (e.g. the four
    /// channels of a color under a single control).
    pub fn control_group(mut self, group: u32) -> Self {
        self.control_group = Some(group);
        self
    }

    /// Expose an input the internal tool does not carry a literal for.
    pub fn default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }
}

/// A reusable unit: a nested composition with selected inputs forwarded to
/// the outside and one internal tool's output as the group's own.
#[derive(Debug, Clone)]
pub struct Group {
    nodes: Composition,
    output: NodeId,
    exposed: Vec<InstanceInput>,
}

impl Group {
    pub fn new(nodes: Composition, output: NodeId) -> Self {
        Self {
            nodes,
            output,
            exposed: Vec::new(),
        }
    }

    pub fn expose(mut self, input: InstanceInput) -> Self {
        self.exposed.push(input);
        self
    }
}

/// Arena of tools making up one composition scope.
#[derive(Debug, Clone, Default)]
pub struct Composition {
    nodes: Vec<Node>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool named automatically from its kind at serialization time.
    pub fn add_tool(&mut self, kind: &str, position: GridPos) -> NodeId {
        self.nodes.push(Node::new(kind, None, position));
        NodeId(self.nodes.len() - 1)
    }

    /// Add a tool with an explicit name, unique within this scope.
    pub fn add_named(&mut self, name: &str, kind: &str, position: GridPos) -> Result<NodeId> {
        self.check_name(name)?;
        self.nodes
            .push(Node::new(kind, Some(name.to_string()), position));
        Ok(NodeId(self.nodes.len() - 1))
    }

    /// Add a group as a tool of this scope.
    pub fn add_group(&mut self, name: &str, position: GridPos, group: Group) -> Result<NodeId> {
        self.check_name(name)?;
        let mut node = Node::new("GroupOperator", Some(name.to_string()), position);
        node.group = Some(group);
        self.nodes.push(node);
        Ok(NodeId(self.nodes.len() - 1))
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if self.nodes.iter().any(|n| n.label.as_deref() == Some(name)) {
            return Err(Error::DuplicateNode(name.to_string()));
        }
        Ok(())
    }

    /// Set or replace a named input.
    pub fn set_input(&mut self, node: NodeId, name: &str, value: InputValue) {
        let inputs = &mut self.nodes[node.0].inputs;
        if let Some(slot) = inputs.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            inputs.push((name.to_string(), value));
        }
    }

    pub fn set_number(&mut self, node: NodeId, name: &str, value: f64) {
        self.set_input(node, name, InputValue::Number(value));
    }

    pub fn set_point(&mut self, node: NodeId, name: &str, x: f64, y: f64) {
        self.set_input(node, name, InputValue::Point(x, y));
    }

    /// Wire `src`'s declared output into a named input of `dst`.
    pub fn connect(&mut self, src: NodeId, dst: NodeId, dst_input: &str) {
        let source = self.nodes[src.0].output.clone();
        self.set_input(dst, dst_input, InputValue::Connection { node: src, source });
    }

    /// Wire a mask tool into `node`'s effect-mask input.
    pub fn set_mask(&mut self, node: NodeId, mask: NodeId) {
        self.connect(mask, node, "EffectMask");
    }

    /// Serialize the whole composition into the host's .setting text.
    /// Deterministic: arena order, input insertion order, stable number
    /// formatting.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str("{\n\tTools = ordered() {\n");
        self.write_tools(&mut out, 2);
        out.push_str("\t},\n}\n");
        out
    }

    /// Display names for every tool: explicit labels as given, the rest
    /// numbered per kind, skipping anything already taken.
    fn resolved_names(&self) -> Vec<String> {
        let mut used: HashSet<String> = self
            .nodes
            .iter()
            .filter_map(|n| n.label.clone())
            .collect();
        let mut counters: HashMap<String, usize> = HashMap::new();
        self.nodes
            .iter()
            .map(|node| match &node.label {
                Some(label) => label.clone(),
                None => {
                    let counter = counters.entry(node.kind.clone()).or_insert(0);
                    loop {
                        *counter += 1;
                        let candidate = format!("{}{}", node.kind, counter);
                        if used.insert(candidate.clone()) {
                            break candidate;
                        }
                    }
                }
            })
            .collect()
    }

    fn write_tools(&self, out: &mut String, depth: usize) {
        let names = self.resolved_names();
        for (idx, node) in self.nodes.iter().enumerate() {
            match &node.group {
                Some(group) => self.write_group(out, depth, &names, idx, group),
                None => self.write_tool(out, depth, &names, idx, node),
            }
        }
    }

    fn write_tool(&self, out: &mut String, depth: usize, names: &[String], idx: usize, node: &Node) {
        let ind = "\t".repeat(depth);
        out.push_str(&format!("{ind}{} = {} {{\n", names[idx], node.kind));
        if !node.inputs.is_empty() {
            out.push_str(&format!("{ind}\tInputs = {{\n"));
            for (name, value) in &node.inputs {
                write_input(out, depth + 2, name, value, names);
            }
            out.push_str(&format!("{ind}\t}},\n"));
        }
        write_view_info(out, depth + 1, "OperatorInfo", node.position);
        out.push_str(&format!("{ind}}},\n"));
    }

    fn write_group(
        &self,
        out: &mut String,
        depth: usize,
        names: &[String],
        idx: usize,
        group: &Group,
    ) {
        let ind = "\t".repeat(depth);
        let inner_names = group.nodes.resolved_names();
        out.push_str(&format!("{ind}{} = GroupOperator {{\n", names[idx]));

        if !group.exposed.is_empty() {
            out.push_str(&format!("{ind}\tInputs = ordered() {{\n"));
            for (i, exposed) in group.exposed.iter().enumerate() {
                out.push_str(&format!("{ind}\t\tInput{} = InstanceInput {{\n", i + 1));
                out.push_str(&format!(
                    "{ind}\t\t\tSourceOp = \"{}\",\n",
                    inner_names[exposed.node.0]
                ));
                out.push_str(&format!("{ind}\t\t\tSource = \"{}\",\n", exposed.input));
                if let Some(name) = &exposed.name {
                    out.push_str(&format!("{ind}\t\t\tName = \"{name}\",\n"));
                }
                if let Some(cg) = exposed.control_group {
                    out.push_str(&format!("{ind}\t\t\tControlGroup = {cg},\n"));
                }
                if let Some(default) = exposed.default {
                    out.push_str(&format!("{ind}\t\t\tDefault = {},\n", fmt_num(default)));
                }
                out.push_str(&format!("{ind}\t\t}},\n"));
            }
            out.push_str(&format!("{ind}\t}},\n"));
        }

        let output_node = &group.nodes.nodes[group.output.0];
        out.push_str(&format!("{ind}\tOutputs = {{\n"));
        out.push_str(&format!("{ind}\t\tMainOutput1 = InstanceOutput {{\n"));
        out.push_str(&format!(
            "{ind}\t\t\tSourceOp = \"{}\",\n",
            inner_names[group.output.0]
        ));
        out.push_str(&format!("{ind}\t\t\tSource = \"{}\",\n", output_node.output));
        out.push_str(&format!("{ind}\t\t}},\n"));
        out.push_str(&format!("{ind}\t}},\n"));

        write_view_info(out, depth + 1, "GroupInfo", self.nodes[idx].position);

        out.push_str(&format!("{ind}\tTools = ordered() {{\n"));
        group.nodes.write_tools(out, depth + 2);
        out.push_str(&format!("{ind}\t}},\n"));
        out.push_str(&format!("{ind}}},\n"));
    }
}

fn write_view_info(out: &mut String, depth: usize, info_kind: &str, position: GridPos) {
    let ind = "\t".repeat(depth);
    out.push_str(&format!(
        "{ind}ViewInfo = {info_kind} {{ Pos = {{ {}, {} }} }},\n",
        fmt_num(position.0 * GRID_X),
        fmt_num(position.1 * GRID_Y)
    ));
}

fn write_input(out: &mut String, depth: usize, name: &str, value: &InputValue, names: &[String]) {
    let ind = "\t".repeat(depth);
    match value {
        InputValue::Number(v) => {
            out.push_str(&format!("{ind}{name} = Input {{ Value = {}, }},\n", fmt_num(*v)));
        }
        InputValue::Integer(v) => {
            out.push_str(&format!("{ind}{name} = Input {{ Value = {v}, }},\n"));
        }
        InputValue::Text(v) => {
            out.push_str(&format!("{ind}{name} = Input {{ Value = \"{v}\", }},\n"));
        }
        InputValue::Point(x, y) => {
            out.push_str(&format!(
                "{ind}{name} = Input {{ Value = {{ {}, {} }}, }},\n",
                fmt_num(*x),
                fmt_num(*y)
            ));
        }
        InputValue::Connection { node, source } => {
            out.push_str(&format!("{ind}{name} = Input {{\n"));
            out.push_str(&format!("{ind}\tSourceOp = \"{}\",\n", names[node.0]));
            out.push_str(&format!("{ind}\tSource = \"{source}\",\n"));
            out.push_str(&format!("{ind}}},\n"));
        }
        InputValue::Polyline(points) => {
            out.push_str(&format!("{ind}{name} = Input {{\n"));
            out.push_str(&format!("{ind}\tValue = Polyline {{\n"));
            out.push_str(&format!("{ind}\t\tPoints = {{\n"));
            for i in 0..points.len() {
                out.push_str(&format!("{ind}\t\t\t{{ PublishID = \"Point{i}\" }},\n"));
            }
            out.push_str(&format!("{ind}\t\t}},\n"));
            out.push_str(&format!("{ind}\t}},\n"));
            out.push_str(&format!("{ind}}},\n"));
            for (i, (x, y)) in points.iter().enumerate() {
                out.push_str(&format!(
                    "{ind}Point{i} = Input {{ Value = {{ {}, {} }}, }},\n",
                    fmt_num(*x),
                    fmt_num(*y)
                ));
            }
        }
    }
}

/// Stable number formatting: integral values without a decimal point,
/// everything else via the shortest round-trip representation.
fn fmt_num(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_masked_background() -> Composition {
        let mut comp = Composition::new();
        let mask = comp.add_named("Shape", "RectangleMask", (0.0, -1.0)).unwrap();
        comp.set_number(mask, "Width", 0.5);
        let bg = comp.add_named("Fill", "Background", (0.0, 0.0)).unwrap();
        comp.set_number(bg, "TopLeftRed", 1.0);
        comp.set_mask(bg, mask);
        comp
    }

    #[test]
    fn test_duplicate_name_is_a_fault() {
        let mut comp = Composition::new();
        comp.add_named("A", "Background", (0.0, 0.0)).unwrap();
        let err = comp.add_named("A", "Merge", (1.0, 0.0)).unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(name) if name == "A"));
    }

    #[test]
    fn test_auto_names_are_numbered_per_kind() {
        let mut comp = Composition::new();
        comp.add_tool("Merge", (0.0, 0.0));
        comp.add_tool("Merge", (1.0, 0.0));
        comp.add_tool("Background", (2.0, 0.0));
        let names = comp.resolved_names();
        assert_eq!(names, vec!["Merge1", "Merge2", "Background1"]);
    }

    #[test]
    fn test_auto_names_skip_explicit_labels() {
        let mut comp = Composition::new();
        comp.add_named("Merge1", "Merge", (0.0, 0.0)).unwrap();
        comp.add_tool("Merge", (1.0, 0.0));
        let names = comp.resolved_names();
        assert_eq!(names, vec!["Merge1", "Merge2"]);
    }

    #[test]
    fn test_mask_connection_serialized() {
        let comp = make_masked_background();
        let text = comp.serialize();
        assert!(text.contains("EffectMask = Input {"));
        assert!(text.contains("SourceOp = \"Shape\""));
        assert!(text.contains("Source = \"Mask\""));
    }

    #[test]
    fn test_mask_kind_declares_mask_output() {
        let mut comp = Composition::new();
        let mask = comp.add_tool("EllipseMask", (0.0, 0.0));
        let bg = comp.add_tool("Background", (1.0, 0.0));
        comp.connect(mask, bg, "EffectMask");
        let text = comp.serialize();
        assert!(text.contains("Source = \"Mask\""));
    }

    #[test]
    fn test_polyline_publishes_points() {
        let mut comp = Composition::new();
        let line = comp.add_named("PlotLine", "PolylineMask", (0.0, 0.0)).unwrap();
        comp.set_input(
            line,
            "Polyline",
            InputValue::Polyline(vec![(0.1, 0.2), (0.3, 0.4)]),
        );
        let text = comp.serialize();
        assert!(text.contains("{ PublishID = \"Point0\" },"));
        assert!(text.contains("{ PublishID = \"Point1\" },"));
        assert!(text.contains("Point0 = Input { Value = { 0.1, 0.2 }, },"));
        assert!(text.contains("Point1 = Input { Value = { 0.3, 0.4 }, },"));
    }

    #[test]
    fn test_group_serialization() {
        let mut inner = Composition::new();
        let mask = inner.add_named("Shape", "RectangleMask", (0.0, -1.0)).unwrap();
        inner.set_number(mask, "Width", 0.25);
        let bg = inner.add_named("Fill", "Background", (0.0, 0.0)).unwrap();
        inner.set_mask(bg, mask);

        let group = Group::new(inner, bg)
            .expose(InstanceInput::new(mask, "Width").name("Thickness"))
            .expose(InstanceInput::new(mask, "WritePosition").default(0.0));

        let mut comp = Composition::new();
        comp.add_group("Unit", (0.0, -1.0), group).unwrap();

        let text = comp.serialize();
        assert!(text.contains("Unit = GroupOperator {"));
        assert!(text.contains("Input1 = InstanceInput {"));
        assert!(text.contains("Name = \"Thickness\""));
        assert!(text.contains("Default = 0,"));
        assert!(text.contains("MainOutput1 = InstanceOutput {"));
        assert!(text.contains("SourceOp = \"Fill\""));
    }

    #[test]
    fn test_serialize_deterministic() {
        let comp = make_masked_background();
        assert_eq!(comp.serialize(), comp.serialize());
    }

    #[test]
    fn test_grid_positions_scaled() {
        let mut comp = Composition::new();
        comp.add_named("BG", "Background", (-1.0, 0.0)).unwrap();
        let text = comp.serialize();
        assert!(text.contains("Pos = { -110, 0 }"));
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.003), "0.003");
        assert_eq!(fmt_num(-0.5), "-0.5");
        assert_eq!(fmt_num(1920.0), "1920");
    }
}
