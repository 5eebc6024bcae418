//! Output formatting module
//!
//! This module handles formatting graph collections for the different output
//! formats and exporting them to files.

use crate::error::{Error, Result};
use crate::graph::{GraphCollection, RuleGraph};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolve the output writer: a file when a path is given, stdout otherwise.
pub fn writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| Error::Output(format!("failed to create {:?}: {}", path, e)))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

/// Serialize a graph collection into its wire form.
///
/// Single serialization point so every output path agrees on the encoding;
/// node and edge order is emission order, the canonical map is sorted by
/// state id.
pub fn collection_to_json(collection: &GraphCollection) -> serde_json::Value {
    json!({
        "graphs": collection.graphs.iter().map(graph_to_json).collect::<Vec<_>>(),
        "canonical_map": collection.canonical,
    })
}

fn graph_to_json(graph: &RuleGraph) -> serde_json::Value {
    json!({
        "rule_name": graph.rule_name,
        "nodes": graph.nodes().collect::<Vec<_>>(),
        "edges": graph.edges().collect::<Vec<_>>(),
    })
}

/// Output the graph collection as JSON
pub fn output_json(
    w: &mut impl Write,
    collection: &GraphCollection,
    pretty: bool,
) -> Result<()> {
    let output = collection_to_json(collection);
    if pretty {
        serde_json::to_writer_pretty(&mut *w, &output)?;
    } else {
        serde_json::to_writer(&mut *w, &output)?;
    }
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output the graph collection as a text table
pub fn output_table(w: &mut impl Write, collection: &GraphCollection) -> Result<()> {
    let stats = collection.stats();

    writeln!(w, "Grammar Automaton Visualization - Rule Graphs")?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Rules:        {}", stats.rules)?;
    writeln!(w, "  Nodes:        {}", stats.nodes)?;
    writeln!(w, "  Edges:        {}", stats.edges)?;
    writeln!(w, "  Curved edges: {}", stats.curved_edges)?;
    writeln!(w)?;

    for graph in &collection.graphs {
        writeln!(w, "Rule: {}", graph.rule_name)?;
        writeln!(w, "{:-<80}", "")?;
        writeln!(
            w,
            "{:<8} {:<8} {:<24} {:<28} {:>6}",
            "From", "To", "Label", "Color", "Curved"
        )?;
        writeln!(w, "{:-<80}", "")?;

        for edge in graph.edges() {
            let label = if edge.label.len() > 22 {
                format!("{}...", &edge.label[..19])
            } else {
                edge.label.clone()
            };

            writeln!(
                w,
                "{:<8} {:<8} {:<24} {:<28} {:>6}",
                edge.source,
                edge.target,
                label,
                edge.color,
                if edge.curved { "yes" } else { "no" }
            )?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Output summary statistics only
pub fn output_stats(w: &mut impl Write, collection: &GraphCollection) -> Result<()> {
    let stats = collection.stats();

    writeln!(w, "{:<20} {:>6} {:>6} {:>7}", "Rule", "Nodes", "Edges", "Curved")?;
    writeln!(w, "{:-<42}", "")?;
    for graph in &collection.graphs {
        writeln!(
            w,
            "{:<20} {:>6} {:>6} {:>7}",
            graph.rule_name,
            graph.node_count(),
            graph.edge_count(),
            graph.edges().filter(|edge| edge.curved).count()
        )?;
    }
    writeln!(w, "{:-<42}", "")?;
    writeln!(
        w,
        "{:<20} {:>6} {:>6} {:>7}",
        "total", stats.nodes, stats.edges, stats.curved_edges
    )?;
    Ok(())
}

/// All rule graphs in DOT format, one digraph per rule
pub fn dot_string(collection: &GraphCollection) -> String {
    collection
        .graphs
        .iter()
        .map(RuleGraph::to_dot)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the DOT rendering to a given path
pub fn write_dot(path: &Path, collection: &GraphCollection) -> Result<()> {
    std::fs::write(path, dot_string(collection))
        .map_err(|e| Error::Output(format!("failed to write {:?}: {}", path, e)))
}

/// Export the DOT rendering to a timestamped file
pub fn export_dot(collection: &GraphCollection, directory: Option<&Path>) -> Result<PathBuf> {
    let filename = format!("{}.graph.dot", chrono::Utc::now().format("%Y%m%d%H%M%S"));
    let path = match directory {
        Some(dir) => dir.join(filename),
        None => PathBuf::from(filename),
    };
    write_dot(&path, collection)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::source::sample::sample_automaton;

    fn sample_collection() -> GraphCollection {
        let automaton = sample_automaton();
        GraphBuilder::new(&automaton).build().unwrap()
    }

    #[test]
    fn test_output_json() {
        let collection = sample_collection();
        let mut output = Vec::new();
        assert!(output_json(&mut output, &collection, true).is_ok());

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("\"rule_name\": \"expr\""));
        assert!(text.contains("\"canonical_map\""));
    }

    #[test]
    fn test_output_table() {
        let collection = sample_collection();
        let mut output = Vec::new();
        assert!(output_table(&mut output, &collection).is_ok());

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Rule: expr"));
        assert!(text.contains("Rule: term"));
    }

    #[test]
    fn test_output_stats() {
        let collection = sample_collection();
        let mut output = Vec::new();
        assert!(output_stats(&mut output, &collection).is_ok());

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("total"));
    }

    #[test]
    fn test_dot_string_contains_all_rules() {
        let collection = sample_collection();
        let dot = dot_string(&collection);
        assert!(dot.contains("digraph expr {"));
        assert!(dot.contains("digraph term {"));
    }

    /// Two runs over the same automaton must agree byte for byte.
    #[test]
    fn test_output_is_deterministic() {
        let first = sample_collection();
        let second = sample_collection();

        let mut a = Vec::new();
        let mut b = Vec::new();
        output_json(&mut a, &first, true).unwrap();
        output_json(&mut b, &second, true).unwrap();
        assert_eq!(a, b);

        assert_eq!(dot_string(&first), dot_string(&second));
    }
}
