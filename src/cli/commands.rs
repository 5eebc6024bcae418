//! CLI command implementations
//!
//! This module contains the implementation for each CLI command.

use crate::cli::{Cli, SourceType};
use crate::graph::{GraphCollection, build_graphs};
use crate::source::create_source;
use crate::{Config, Result};
use std::path::Path;

/// Load an automaton from the selected source and run the conversion.
fn load_and_build(
    source: SourceType,
    input: Option<&Path>,
    config: &Config,
) -> Result<GraphCollection> {
    let source = create_source(source, input)?;
    let automaton = source.load()?;
    tracing::info!(
        states = automaton.states.len(),
        rules = automaton.rules.len(),
        lexer = automaton.is_lexer(),
        "loaded automaton"
    );

    build_graphs(&automaton, config.layout.clone())
}

/// Render command implementation
pub mod render {
    use super::*;
    use crate::cli::{Commands, OutputFormat, output};

    /// Execute the render command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (source, input, format, out) = match args.command {
            Commands::Render {
                source,
                input,
                output,
                out,
            } => (source, input, output, out),
            _ => unreachable!("render::execute called with wrong command"),
        };

        let collection = load_and_build(source, input.as_deref(), &config)?;
        tracing::info!(rules = collection.graphs.len(), "conversion finished");

        match format {
            OutputFormat::Json => {
                let mut writer = output::writer(out.as_deref())?;
                output::output_json(&mut writer, &collection, config.output.pretty)
            }
            OutputFormat::Dot => match out {
                Some(path) => output::write_dot(&path, &collection),
                None => {
                    let path = output::export_dot(&collection, config.output.directory.as_deref())?;
                    println!("Graphs exported to {}", path.display());
                    Ok(())
                }
            },
            OutputFormat::Table => {
                let mut writer = output::writer(out.as_deref())?;
                output::output_table(&mut writer, &collection)
            }
        }
    }
}

/// Check command implementation
pub mod check {
    use super::*;
    use crate::cli::Commands;

    /// Execute the check command
    ///
    /// Runs the full conversion and discards the output; any contract
    /// violation propagates as a non-zero exit.
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (source, input) = match args.command {
            Commands::Check { source, input } => (source, input),
            _ => unreachable!("check::execute called with wrong command"),
        };

        let collection = load_and_build(source, input.as_deref(), &config)?;
        let stats = collection.stats();
        println!(
            "OK: {} rules, {} nodes, {} edges",
            stats.rules, stats.nodes, stats.edges
        );
        Ok(())
    }
}

/// Stats command implementation
pub mod stats {
    use super::*;
    use crate::cli::{Commands, output};

    /// Execute the stats command
    pub fn execute(args: Cli, config: Config) -> Result<()> {
        let (source, input) = match args.command {
            Commands::Stats { source, input } => (source, input),
            _ => unreachable!("stats::execute called with wrong command"),
        };

        let collection = load_and_build(source, input.as_deref(), &config)?;
        output::output_stats(&mut std::io::stdout(), &collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_build_sample() {
        let config = Config::default();
        let collection = load_and_build(SourceType::Sample, None, &config).unwrap();
        assert_eq!(collection.graphs.len(), 2);
    }

    #[test]
    fn test_file_source_requires_input() {
        let config = Config::default();
        assert!(load_and_build(SourceType::File, None, &config).is_err());
    }
}
