//! Grammar Automaton Visualizer
//!
//! Converts a finished grammar automaton (the transition network a parser or
//! lexer generator builds for a rule set) into one displayable graph per
//! rule: nodes for automaton states, labeled and styled edges for
//! transitions.
//!
//! This library provides functionality for:
//! - Collapsing chains of pass-through states into canonical representatives
//! - Per-rule breadth-first graph construction with transition classification
//! - Edge styling and two-state cycle detection for curved rendering
//! - Loading automaton descriptions from JSON and emitting graph collections

pub mod automaton;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod source;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
