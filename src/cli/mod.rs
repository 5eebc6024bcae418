//! CLI module
//!
//! This module defines the command-line interface using clap and implements
//! the command execution logic.

use crate::{Config, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;
pub mod output;

/// Grammar Automaton Visualizer CLI
#[derive(Parser, Debug)]
#[command(name = "atn-viz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert an automaton into per-rule graphs and emit them
    Render {
        /// Automaton source type
        #[arg(short, long, value_enum, default_value = "file")]
        source: SourceType,

        /// Path to an automaton description (JSON), for the file source
        #[arg(short, long, env = "ATN_VIZ_INPUT")]
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,

        /// Write output to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the conversion for its contract checks only
    Check {
        /// Automaton source type
        #[arg(short, long, value_enum, default_value = "file")]
        source: SourceType,

        /// Path to an automaton description (JSON), for the file source
        #[arg(short, long, env = "ATN_VIZ_INPUT")]
        input: Option<PathBuf>,
    },

    /// Print summary statistics for the converted graphs
    Stats {
        /// Automaton source type
        #[arg(short, long, value_enum, default_value = "file")]
        source: SourceType,

        /// Path to an automaton description (JSON), for the file source
        #[arg(short, long, env = "ATN_VIZ_INPUT")]
        input: Option<PathBuf>,
    },
}

/// Automaton source types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceType {
    /// Built-in sample automaton
    Sample,
    /// JSON description file
    File,
}

/// Output format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// DOT format (Graphviz)
    Dot,
    /// Plain text table
    Table,
}

/// Execute the CLI command
pub fn execute(args: Cli, config: Config) -> Result<()> {
    match args.command {
        Commands::Render { .. } => commands::render::execute(args, config),
        Commands::Check { .. } => commands::check::execute(args, config),
        Commands::Stats { .. } => commands::stats::execute(args, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "atn-viz",
            "render",
            "--source",
            "sample",
            "--output",
            "table",
        ]);

        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let cli = Cli::try_parse_from(["atn-viz", "render", "--output", "yaml"]);
        assert!(cli.is_err());
    }
}
