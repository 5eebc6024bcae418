//! Rule graph builder
//!
//! Drives one merge pass per rule, then breadth-first traverses the merged
//! automaton to enumerate every reachable transition exactly once, classifies
//! and styles each edge, flags two-state cycles for curved rendering and
//! verifies the completeness invariant over all automaton states.

use crate::automaton::{Automaton, EPSILON_LABEL, RuleBoundary, StateId, Transition};
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::graph::merge::{self, RuleCanonicalMap};
use crate::graph::model::{
    ACTION_EDGE_COLOR, CanonicalMap, DEFAULT_EDGE_COLOR, EMPTY_LABEL_EDGE_COLOR,
    EPSILON_EDGE_COLOR, GraphCollection, GraphEdge, GraphNode, RULE_EDGE_COLOR, RuleGraph,
};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// A recorded (source, transition, target) visit, endpoints canonicalized
/// and display-normalized.
struct Triple<'a> {
    source: StateId,
    transition: &'a Transition,
    target: StateId,
}

/// Converts a grammar automaton into one displayable graph per rule.
pub struct GraphBuilder<'a> {
    automaton: &'a Automaton,
    layout: LayoutConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Process every rule in automaton-declared order.
    ///
    /// Any returned error is a contract violation; partial output must not be
    /// trusted.
    pub fn build(&self) -> Result<GraphCollection> {
        let sentinel = self
            .automaton
            .global_last()
            .ok_or_else(|| Error::automaton("automaton has no states"))?;

        let mut canonical = BTreeMap::new();
        let mut shown: HashSet<StateId> = HashSet::new();
        let mut graphs = Vec::with_capacity(self.automaton.rules.len());

        for (rule_index, boundary) in self.automaton.rules.iter().enumerate() {
            let rule_name = self
                .automaton
                .rule_name(rule_index)
                .ok_or_else(|| Error::automaton(format!("rule {rule_index} has no name")))?;

            let merged = merge::merge(self.automaton, boundary);
            for (original, display) in merged.display_entries() {
                canonical.insert(original, display);
            }

            let graph = self.build_rule(rule_name, boundary, sentinel, &merged, &mut shown)?;
            tracing::debug!(
                rule = rule_name,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "built rule graph"
            );
            graphs.push(graph);
        }

        let collection = GraphCollection {
            graphs,
            canonical: CanonicalMap::new(canonical),
        };
        self.check_coverage(&collection, &shown)?;
        Ok(collection)
    }

    fn build_rule(
        &self,
        rule_name: &str,
        boundary: &RuleBoundary,
        sentinel: StateId,
        merged: &RuleCanonicalMap,
        shown: &mut HashSet<StateId>,
    ) -> Result<RuleGraph> {
        let root = merged.traversal_root();

        let mut queue = VecDeque::from([root]);
        let mut visited: HashSet<(StateId, usize)> = HashSet::new();
        // scratch adjacency, rebuilt per rule, used only for cycle detection
        let mut source_to_target: HashMap<StateId, HashSet<StateId>> = HashMap::new();
        let mut target_to_source: HashMap<StateId, HashSet<StateId>> = HashMap::new();
        let mut triples: Vec<Triple<'_>> = Vec::new();

        while let Some(current) = queue.pop_front() {
            // the traversal root displays as the rule's own start state
            let source = if current == root { boundary.start } else { current };

            for (index, transition) in self.automaton.state(current).transitions.iter().enumerate()
            {
                if !visited.insert((current, index)) {
                    continue;
                }
                let next = merged.representative(transition.effective_target());
                let target = if next == root { boundary.start } else { next };

                source_to_target.entry(source).or_default().insert(target);
                target_to_source.entry(target).or_default().insert(source);
                triples.push(Triple {
                    source,
                    transition,
                    target,
                });
                // traversal does not continue past the rule's stop state
                if next != boundary.stop {
                    queue.push_back(next);
                }
            }
        }

        for triple in &triples {
            if triple.source == triple.target {
                return Err(Error::SelfLoop(triple.source, rule_name.to_string()));
            }
        }

        // the terminal sentinel must never appear as an edge endpoint
        if source_to_target.contains_key(&sentinel) || target_to_source.contains_key(&sentinel) {
            return Err(Error::SentinelReached(sentinel, rule_name.to_string()));
        }

        let mut graph = RuleGraph::new(rule_name.to_string());

        for triple in &triples {
            let label = self.transition_label(triple.transition)?;
            let color = edge_color(triple.transition, &label);
            // A --t1--> B together with B --t2--> A: both edges bend
            let curved = source_to_target
                .get(&triple.target)
                .is_some_and(|targets| targets.contains(&triple.source));

            shown.insert(triple.source);
            shown.insert(triple.target);

            if !graph.contains_node(&triple.source.to_string()) {
                graph.add_node(self.source_node(triple.source, boundary));
            }
            if !graph.contains_node(&triple.target.to_string()) {
                graph.add_node(self.target_node(triple.target, boundary));
            }

            let _ = graph.add_edge(GraphEdge {
                source: triple.source.to_string(),
                target: triple.target.to_string(),
                label,
                show_label: true,
                color: color.to_string(),
                curved,
            });
        }

        Ok(graph)
    }

    /// Resolve the human-readable label of a transition.
    ///
    /// The match is exhaustive over the transition kinds; a payload that does
    /// not resolve against the automaton is an unclassified transition.
    fn transition_label(&self, transition: &Transition) -> Result<String> {
        match transition {
            Transition::Rule { rule_index, .. } => self
                .automaton
                .rule_name(*rule_index)
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::unclassified(format!("rule index {rule_index} out of range"))
                }),
            Transition::Atom { token, .. } => {
                if let Some(vocabulary) = &self.automaton.vocabulary
                    && let Some(name) = vocabulary.symbolic_name(*token)
                {
                    Ok(name.to_string())
                } else {
                    // no vocabulary configured, or no name for this token:
                    // fall back to the generic rendering
                    Ok(transition.display_text())
                }
            }
            Transition::Action { action_index, .. } if self.automaton.is_lexer() => self
                .automaton
                .lexer_actions
                .get(*action_index)
                .map(ToString::to_string)
                .ok_or_else(|| {
                    Error::unclassified(format!("lexer action index {action_index} out of range"))
                }),
            other => Ok(other.display_text()),
        }
    }

    fn source_node(&self, state: StateId, boundary: &RuleBoundary) -> GraphNode {
        let anchored = state == boundary.start;
        GraphNode {
            id: state.to_string(),
            name: state.to_string(),
            x: if anchored { self.layout.start_x } else { self.layout.default_x },
            y: if anchored { self.layout.start_y } else { self.layout.default_y },
            fixed: anchored,
        }
    }

    fn target_node(&self, state: StateId, boundary: &RuleBoundary) -> GraphNode {
        let anchored = state == boundary.stop;
        GraphNode {
            id: state.to_string(),
            name: state.to_string(),
            x: if anchored { self.layout.stop_x } else { self.layout.default_x },
            y: if anchored { self.layout.stop_y } else { self.layout.default_y },
            fixed: anchored,
        }
    }

    /// Every automaton state except the sentinels must have appeared in some
    /// rule graph once all rules are processed.
    fn check_coverage(
        &self,
        collection: &GraphCollection,
        shown: &HashSet<StateId>,
    ) -> Result<()> {
        let first = self.automaton.global_first();
        let last = self.automaton.global_last();

        for state in &self.automaton.states {
            if Some(state.id) == last {
                continue;
            }
            // the global first state only belongs to lexer automatons
            if !self.automaton.is_lexer() && Some(state.id) == first {
                continue;
            }
            let display = collection.canonical.display(state.id);
            if !shown.contains(&display) {
                return Err(Error::IncompleteCoverage(display));
            }
        }
        Ok(())
    }
}

fn edge_color(transition: &Transition, label: &str) -> &'static str {
    match transition {
        Transition::Rule { .. } => RULE_EDGE_COLOR,
        Transition::Epsilon { .. } => EPSILON_EDGE_COLOR,
        Transition::Action { .. } => ACTION_EDGE_COLOR,
        _ if label == EPSILON_LABEL => EMPTY_LABEL_EDGE_COLOR,
        _ => DEFAULT_EDGE_COLOR,
    }
}
