//! Built-in sample automaton for demos and development
//!
//! Encodes the automaton a parser generator would build for a small
//! expression grammar:
//!
//! ```text
//! expr: term (PLUS term)* ;
//! term: ID ;
//! ```
//!
//! The loop in `expr` produces a two-state cycle, so the sample exercises
//! rule calls, terminal matches, pass-through chains and curved rendering.

use super::AutomatonSource;
use crate::automaton::{
    Automaton, AutomatonState, GrammarKind, RuleBoundary, Transition, Vocabulary,
};
use crate::error::Result;

pub const TOKEN_ID: i32 = 1;
pub const TOKEN_PLUS: i32 = 2;

pub struct SampleSource;

impl Default for SampleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource {
    pub fn new() -> Self {
        Self
    }
}

impl AutomatonSource for SampleSource {
    fn load(&self) -> Result<Automaton> {
        let automaton = sample_automaton();
        automaton.validate()?;
        Ok(automaton)
    }
}

/// The sample expression-grammar automaton.
pub fn sample_automaton() -> Automaton {
    Automaton {
        kind: GrammarKind::Parser,
        states: vec![
            AutomatonState::new(0, 0).global_first(),
            // expr: start feeds the rule body through a pass-through
            AutomatonState::new(1, 0)
                .rule_start()
                .with_transitions(vec![Transition::Epsilon { target: 5 }]),
            AutomatonState::new(2, 0).rule_stop(),
            // term: a single ID match
            AutomatonState::new(3, 1)
                .rule_start()
                .with_transitions(vec![Transition::Atom { target: 9, token: TOKEN_ID }]),
            AutomatonState::new(4, 1).rule_stop(),
            // expr body: term, then zero or more (PLUS term)
            AutomatonState::new(5, 0).with_transitions(vec![Transition::Rule {
                target: 3,
                rule_index: 1,
                follow: 6,
            }]),
            AutomatonState::new(6, 0).with_transitions(vec![
                Transition::Epsilon { target: 7 },
                Transition::Atom { target: 8, token: TOKEN_PLUS },
            ]),
            AutomatonState::new(7, 0).with_transitions(vec![Transition::Epsilon { target: 2 }]),
            AutomatonState::new(8, 0).with_transitions(vec![Transition::Rule {
                target: 3,
                rule_index: 1,
                follow: 6,
            }]),
            // term body: ID lands here, then passes through to the stop
            AutomatonState::new(9, 1).with_transitions(vec![Transition::Epsilon { target: 4 }]),
            AutomatonState::new(10, 0).global_last(),
        ],
        rules: vec![
            RuleBoundary { start: 1, stop: 2 },
            RuleBoundary { start: 3, stop: 4 },
        ],
        rule_names: vec!["expr".to_string(), "term".to_string()],
        vocabulary: Some(Vocabulary::new(vec![
            None,
            Some("ID".to_string()),
            Some("PLUS".to_string()),
        ])),
        lexer_actions: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, model};

    #[test]
    fn test_sample_is_well_formed() {
        let automaton = SampleSource::new().load().unwrap();
        assert_eq!(automaton.states.len(), 11);
        assert_eq!(automaton.rules.len(), 2);
    }

    #[test]
    fn test_sample_converts() {
        let automaton = sample_automaton();
        let collection = GraphBuilder::new(&automaton).build().unwrap();

        assert_eq!(collection.graphs.len(), 2);

        // expr: term, loop-back over PLUS, exit to the stop
        let expr = &collection.graphs[0];
        assert_eq!(expr.rule_name, "expr");
        assert_eq!(expr.node_count(), 4);
        assert_eq!(expr.edge_count(), 4);
        assert_eq!(expr.edges().filter(|edge| edge.curved).count(), 2);

        // term: a single ID edge from start to stop
        let term = &collection.graphs[1];
        assert_eq!(term.rule_name, "term");
        assert_eq!(term.edge_count(), 1);
        let edge = term.edges().next().unwrap();
        assert_eq!(edge.label, "ID");
        assert_eq!(edge.color, model::DEFAULT_EDGE_COLOR);
    }

    #[test]
    fn test_sample_labels_and_colors() {
        let automaton = sample_automaton();
        let collection = GraphBuilder::new(&automaton).build().unwrap();

        let labels: Vec<(String, String)> = collection.graphs[0]
            .edges()
            .map(|edge| (edge.label.clone(), edge.color.clone()))
            .collect();

        assert!(labels.contains(&("term".to_string(), model::RULE_EDGE_COLOR.to_string())));
        assert!(labels.contains(&("PLUS".to_string(), model::DEFAULT_EDGE_COLOR.to_string())));
        assert!(labels.iter().any(|(_, color)| color == model::EPSILON_EDGE_COLOR));
    }
}
