//! Automaton state representation

use crate::automaton::Transition;
use serde::{Deserialize, Serialize};

/// Stable numeric identifier of an automaton state
pub type StateId = usize;

/// A state in the grammar automaton.
///
/// States are built once by the external automaton builder and never mutated
/// here; transitions are owned by their source state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomatonState {
    pub id: StateId,
    pub rule_index: usize,

    /// Outgoing transitions, in the order the builder declared them.
    #[serde(default)]
    pub transitions: Vec<Transition>,

    /// Designated start state of its rule
    #[serde(default)]
    pub rule_start: bool,

    /// Designated stop state of its rule
    #[serde(default)]
    pub rule_stop: bool,

    /// Global sentinel first state of the whole automaton
    #[serde(default)]
    pub global_first: bool,

    /// Global sentinel last state of the whole automaton
    #[serde(default)]
    pub global_last: bool,
}

impl AutomatonState {
    pub fn new(id: StateId, rule_index: usize) -> Self {
        Self {
            id,
            rule_index,
            transitions: Vec::new(),
            rule_start: false,
            rule_stop: false,
            global_first: false,
            global_last: false,
        }
    }

    pub fn with_transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn rule_start(mut self) -> Self {
        self.rule_start = true;
        self
    }

    pub fn rule_stop(mut self) -> Self {
        self.rule_stop = true;
        self
    }

    pub fn global_first(mut self) -> Self {
        self.global_first = true;
        self
    }

    pub fn global_last(mut self) -> Self {
        self.global_last = true;
        self
    }
}
