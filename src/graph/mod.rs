//! Graph module - Convert the automaton into displayable per-rule graphs

use crate::Result;
use crate::automaton::Automaton;
use crate::config::LayoutConfig;

pub mod builder;
pub mod merge;
pub mod model;

// Re-export key types
pub use builder::GraphBuilder;
pub use merge::RuleCanonicalMap;
pub use model::{
    CanonicalMap, GraphCollection, GraphEdge, GraphNode, GraphStats, RuleGraph,
};

/// Convert every rule of the automaton into a displayable graph
pub fn build_graphs(automaton: &Automaton, layout: LayoutConfig) -> Result<GraphCollection> {
    GraphBuilder::new(automaton).with_layout(layout).build()
}
