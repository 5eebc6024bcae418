//! JSON file source
//!
//! Reads an automaton description serialized by the external builder.

use super::AutomatonSource;
use crate::automaton::Automaton;
use crate::error::{Error, Result};
use std::path::PathBuf;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AutomatonSource for FileSource {
    fn load(&self) -> Result<Automaton> {
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::source(format!("failed to read {:?}: {}", self.path, e)))?;

        let automaton: Automaton = serde_json::from_str(&contents)?;
        automaton.validate()?;

        tracing::debug!(path = ?self.path, states = automaton.states.len(), "loaded automaton");
        Ok(automaton)
    }
}
