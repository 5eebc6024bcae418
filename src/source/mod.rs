//! Source module - Abstraction for obtaining automaton descriptions
//!
//! The automaton itself is produced by an external builder; this layer only
//! carries a finished description across the boundary and validates its
//! structural contract before the core sees it.

use crate::automaton::Automaton;
use crate::cli::SourceType;
use crate::error::{Error, Result};
use std::path::Path;

pub mod file;
pub mod sample;

pub use file::FileSource;
pub use sample::SampleSource;

/// Source of a finished automaton description
///
/// Implementations provide different ways of obtaining the automaton:
/// - `FileSource`: reads a JSON description written by the builder
/// - `SampleSource`: built-in expression-grammar automaton for demos
pub trait AutomatonSource {
    /// Load and validate the automaton
    fn load(&self) -> Result<Automaton>;
}

/// Create a source instance based on type and arguments
pub fn create_source(
    source_type: SourceType,
    input: Option<&Path>,
) -> Result<Box<dyn AutomatonSource>> {
    match source_type {
        SourceType::Sample => Ok(Box::new(SampleSource::new())),
        SourceType::File => {
            let path = input
                .ok_or_else(|| Error::source("--input is required with the file source"))?;
            Ok(Box::new(FileSource::new(path.to_path_buf())))
        }
    }
}
