//! Automaton module - Input data model for the grammar automaton
//!
//! These types mirror the contract of the external automaton builder: a flat
//! list of states with outgoing transitions, per-rule start/stop boundaries,
//! rule names, an optional symbolic vocabulary for terminals, and a lexer
//! action table. Everything is (de)serializable so a builder can hand the
//! automaton over as JSON.

use crate::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod state;
pub mod transition;

// Re-export key types
pub use state::{AutomatonState, StateId};
pub use transition::{EPSILON_LABEL, Transition, sanitize_label};

/// What the automaton was built for.
///
/// Affects sentinel handling (the global first state belongs to lexer
/// automatons only) and action-edge labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammarKind {
    #[default]
    Parser,
    Lexer,
}

/// Start/stop state pair of one grammar rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBoundary {
    pub start: StateId,
    pub stop: StateId,
}

/// Symbolic names for terminal symbols, indexed by token code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    symbolic: Vec<Option<String>>,
}

impl Vocabulary {
    pub fn new(symbolic: Vec<Option<String>>) -> Self {
        Self { symbolic }
    }

    /// Look up the symbolic name of a token code.
    ///
    /// Negative or out-of-range codes have no name.
    pub fn symbolic_name(&self, token: i32) -> Option<&str> {
        usize::try_from(token)
            .ok()
            .and_then(|idx| self.symbolic.get(idx))
            .and_then(|name| name.as_deref())
    }
}

/// A lexer action referenced by action transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LexerAction {
    Skip,
    More,
    PopMode,
    Mode { mode: usize },
    PushMode { mode: usize },
    Channel { channel: usize },
    TokenType { token: i32 },
    Custom {
        rule: usize,
        #[serde(rename = "action_index")]
        action: usize,
    },
}

impl fmt::Display for LexerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerAction::Skip => write!(f, "skip"),
            LexerAction::More => write!(f, "more"),
            LexerAction::PopMode => write!(f, "popMode"),
            LexerAction::Mode { mode } => write!(f, "mode({mode})"),
            LexerAction::PushMode { mode } => write!(f, "pushMode({mode})"),
            LexerAction::Channel { channel } => write!(f, "channel({channel})"),
            LexerAction::TokenType { token } => write!(f, "type({token})"),
            LexerAction::Custom { rule, action } => write!(f, "action({rule},{action})"),
        }
    }
}

/// The full grammar automaton, as delivered by the external builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automaton {
    #[serde(default)]
    pub kind: GrammarKind,

    /// All states in id order. The first and last entries are the global
    /// sentinels and never appear in any displayed graph.
    pub states: Vec<AutomatonState>,

    /// Per-rule start/stop boundaries, indexed by rule number
    pub rules: Vec<RuleBoundary>,

    /// Rule names, indexed by rule number
    pub rule_names: Vec<String>,

    /// Symbolic names for terminal transitions, when the builder supplies them
    #[serde(default)]
    pub vocabulary: Option<Vocabulary>,

    /// Action table for lexer automatons
    #[serde(default)]
    pub lexer_actions: Vec<LexerAction>,
}

impl Automaton {
    pub fn is_lexer(&self) -> bool {
        self.kind == GrammarKind::Lexer
    }

    /// Access a state by id. Ids are dense (enforced by [`Automaton::validate`]).
    pub fn state(&self, id: StateId) -> &AutomatonState {
        &self.states[id]
    }

    /// Id of the global sentinel first state
    pub fn global_first(&self) -> Option<StateId> {
        self.states.first().map(|s| s.id)
    }

    /// Id of the global sentinel last state
    pub fn global_last(&self) -> Option<StateId> {
        self.states.last().map(|s| s.id)
    }

    /// Name of a rule, by rule number
    pub fn rule_name(&self, rule_index: usize) -> Option<&str> {
        self.rule_names.get(rule_index).map(String::as_str)
    }

    /// Check the structural contract of the automaton description.
    ///
    /// Called at the source boundary; the graph construction core assumes a
    /// validated automaton.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.states.is_empty(), "automaton has no states");
        ensure!(
            self.rules.len() == self.rule_names.len(),
            "rule count {} does not match rule name count {}",
            self.rules.len(),
            self.rule_names.len()
        );

        for (position, state) in self.states.iter().enumerate() {
            ensure!(
                state.id == position,
                "state ids must be dense: found id {} at position {}",
                state.id,
                position
            );
            for transition in &state.transitions {
                let target = transition.effective_target();
                ensure!(
                    target < self.states.len(),
                    "state {} has a transition to unknown state {}",
                    state.id,
                    target
                );
            }
        }

        let first = self.states.first().map(|s| s.id);
        let last = self.states.last().map(|s| s.id);
        for state in &self.states {
            ensure!(
                state.global_first == (Some(state.id) == first),
                "global-first flag mismatch on state {}",
                state.id
            );
            ensure!(
                state.global_last == (Some(state.id) == last),
                "global-last flag mismatch on state {}",
                state.id
            );
        }

        for (rule_index, boundary) in self.rules.iter().enumerate() {
            ensure!(
                boundary.start < self.states.len() && boundary.stop < self.states.len(),
                "rule {} boundary out of range",
                rule_index
            );
            ensure!(
                self.state(boundary.start).rule_start,
                "state {} is not flagged as the start of rule {}",
                boundary.start,
                rule_index
            );
            ensure!(
                self.state(boundary.stop).rule_stop,
                "state {} is not flagged as the stop of rule {}",
                boundary.stop,
                rule_index
            );
        }

        Ok(())
    }
}
