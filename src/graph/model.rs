//! Displayable graph model
//!
//! Output side of the conversion: one graph per rule, plus the global
//! canonical state map. Nodes carry the layout hints the consuming frontend
//! refines; edges carry resolved labels, line colors and the curved-rendering
//! hint.

use crate::automaton::StateId;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Line color of rule-call edges
pub const RULE_EDGE_COLOR: &str = "rgba(255,0,0,0.5)";
/// Line color of plain epsilon edges
pub const EPSILON_EDGE_COLOR: &str = "rgba(0,0,0,0.45)";
/// Line color of action edges
pub const ACTION_EDGE_COLOR: &str = "rgba(0,0,0,0.44)";
/// Line color of other edges whose resolved label is the epsilon glyph
pub const EMPTY_LABEL_EDGE_COLOR: &str = "rgba(0,0,0,0.46)";
/// Line color of everything else (terminal matches and friends)
pub const DEFAULT_EDGE_COLOR: &str = "rgba(0,128,0,0.66)";

/// A displayable node for one automaton state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Stable identifier, the decimal state id
    pub id: String,
    /// Display label
    pub name: String,
    /// Layout hint; authoritative only when `fixed` is set
    pub x: f64,
    pub y: f64,
    /// Anchored by the layout engine (rule start and stop states)
    pub fixed: bool,
}

/// A displayable directed edge for one transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// Resolved, sanitized label text
    pub label: String,
    /// Label visibility, always on
    pub show_label: bool,
    /// Line color, rgba-style encoding
    pub color: String,
    /// Rendering hint: part of a two-state cycle, draw non-straight
    pub curved: bool,
}

/// The displayable graph of a single grammar rule.
#[derive(Debug)]
pub struct RuleGraph {
    pub rule_name: String,

    /// The underlying graph structure.
    /// Nodes represent merged automaton states, edges their transitions.
    pub graph: StableGraph<GraphNode, GraphEdge>,

    /// Lookup table from stable node identifiers to internal graph indices.
    /// Ensures each state is represented by exactly one node per rule.
    pub node_index: HashMap<String, NodeIndex>,
}

impl RuleGraph {
    pub fn new(rule_name: String) -> Self {
        Self {
            rule_name,
            graph: StableGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Adds a node, deduplicated by its stable identifier.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&index) = self.node_index.get(&node.id) {
            return index;
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_index.insert(id, index);
        index
    }

    /// Adds an edge between two already-emitted nodes.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Option<EdgeIndex> {
        if let (Some(&source), Some(&target)) = (
            self.node_index.get(&edge.source),
            self.node_index.get(&edge.target),
        ) {
            Some(self.graph.add_edge(source, target, edge))
        } else {
            None
        }
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Nodes in emission order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> + '_ {
        self.graph.node_indices().filter_map(|index| self.graph.node_weight(index))
    }

    /// Edges in emission order
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.graph.edge_indices().filter_map(|index| self.graph.edge_weight(index))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Render this rule's graph in DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut dot = format!("digraph {} {{\n", dot_ident(&self.rule_name));
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=circle];\n\n");

        for node in self.nodes() {
            let style = if node.fixed { ", style=filled" } else { "" };
            dot.push_str(&format!("  \"{}\" [label=\"{}\"{}];\n", node.id, node.name, style));
        }

        dot.push('\n');

        for edge in self.edges() {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                edge.source, edge.target, edge.label
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

fn dot_ident(name: &str) -> String {
    name.chars()
        .map(|chr| if chr.is_alphanumeric() { chr } else { '_' })
        .collect()
}

/// Global original-state to displayed-representative mapping.
///
/// Built from the per-rule canonical maps after all rules are processed;
/// `BTreeMap`-backed so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalMap {
    map: BTreeMap<StateId, StateId>,
}

impl CanonicalMap {
    pub fn new(map: BTreeMap<StateId, StateId>) -> Self {
        Self { map }
    }

    /// Displayed representative of a state, identity if unmapped.
    pub fn display(&self, state: StateId) -> StateId {
        self.map.get(&state).copied().unwrap_or(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
        self.map.iter().map(|(&original, &display)| (original, display))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The conversion's output artifact: all rule graphs, in automaton rule
/// order, plus the global canonical map.
#[derive(Debug)]
pub struct GraphCollection {
    pub graphs: Vec<RuleGraph>,
    pub canonical: CanonicalMap,
}

impl GraphCollection {
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            rules: self.graphs.len(),
            nodes: self.graphs.iter().map(RuleGraph::node_count).sum(),
            edges: self.graphs.iter().map(RuleGraph::edge_count).sum(),
            curved_edges: self
                .graphs
                .iter()
                .flat_map(RuleGraph::edges)
                .filter(|edge| edge.curved)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub rules: usize,
    pub nodes: usize,
    pub edges: usize,
    pub curved_edges: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            name: id.to_string(),
            x: 500.0,
            y: 600.0,
            fixed: false,
        }
    }

    fn edge(source: &str, target: &str, label: &str) -> GraphEdge {
        GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
            show_label: true,
            color: DEFAULT_EDGE_COLOR.to_string(),
            curved: false,
        }
    }

    #[test]
    fn test_add_node_deduplicates() {
        let mut graph = RuleGraph::new("expr".to_string());
        let first = graph.add_node(node("1"));
        let second = graph.add_node(node("1"));

        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge_requires_endpoints() {
        let mut graph = RuleGraph::new("expr".to_string());
        graph.add_node(node("1"));

        assert!(graph.add_edge(edge("1", "2", "ID")).is_none());

        graph.add_node(node("2"));
        assert!(graph.add_edge(edge("1", "2", "ID")).is_some());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_to_dot_output() {
        let mut graph = RuleGraph::new("expr rule".to_string());
        graph.add_node(node("1"));
        graph.add_node(node("2"));
        graph.add_edge(edge("1", "2", "ID"));

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph expr_rule {"));
        assert!(dot.contains("\"1\" -> \"2\" [label=\"ID\"];"));
    }

    #[test]
    fn test_canonical_map_identity_fallback() {
        let map = CanonicalMap::new(BTreeMap::from([(3, 1), (4, 2)]));
        assert_eq!(map.display(3), 1);
        assert_eq!(map.display(7), 7);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_collection_stats() {
        let mut graph = RuleGraph::new("expr".to_string());
        graph.add_node(node("1"));
        graph.add_node(node("2"));
        let mut curved = edge("1", "2", "ID");
        curved.curved = true;
        graph.add_edge(curved);

        let collection = GraphCollection {
            graphs: vec![graph],
            canonical: CanonicalMap::default(),
        };
        let stats = collection.stats();
        assert_eq!(stats.rules, 1);
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.curved_edges, 1);
    }
}
