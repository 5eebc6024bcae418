//! State merger
//!
//! Collapses runs of pass-through states (exactly one inbound and one
//! outbound structural connection, the sole outgoing transition being plain
//! epsilon) into the state at the end of the chain, so the rendered graph
//! shows meaningful states only. Merging is scoped to one rule's structural
//! region and never crosses rule boundaries: a rule-call transition continues
//! at its follow state and is itself an edge, not a merge candidate.

use crate::automaton::{Automaton, RuleBoundary, StateId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Original-state to representative-state mapping for one rule.
#[derive(Debug, Clone)]
pub struct RuleCanonicalMap {
    start: StateId,
    start_rep: StateId,
    map: HashMap<StateId, StateId>,
}

impl RuleCanonicalMap {
    /// Raw representative of a state, identity for states outside the region.
    ///
    /// This is what traversal follows; representatives are the states that
    /// actually carry transitions.
    pub fn representative(&self, state: StateId) -> StateId {
        self.map.get(&state).copied().unwrap_or(state)
    }

    /// Displayed representative of a state.
    ///
    /// The rule's start state is never merged away from the outside view: any
    /// state whose representative equals the start's representative displays
    /// as the start itself. Idempotent over the whole domain.
    pub fn display(&self, state: StateId) -> StateId {
        let rep = self.representative(state);
        if rep == self.start_rep { self.start } else { rep }
    }

    /// Where the per-rule traversal begins: the start state's raw
    /// representative, which owns the rule body's first real transitions.
    pub fn traversal_root(&self) -> StateId {
        self.start_rep
    }

    /// All (original, displayed representative) pairs of the rule's region.
    pub fn display_entries(&self) -> impl Iterator<Item = (StateId, StateId)> + '_ {
        self.map.keys().map(|&original| (original, self.display(original)))
    }
}

/// Compute the canonical map for one rule's structural region.
pub fn merge(automaton: &Automaton, rule: &RuleBoundary) -> RuleCanonicalMap {
    let region = discover_region(automaton, rule);
    let in_degrees = region_in_degrees(automaton, rule, &region);

    let mut map = HashMap::with_capacity(region.len());
    for &state in &region {
        map.insert(state, walk(automaton, rule, &in_degrees, state));
    }

    let start_rep = map[&rule.start];
    RuleCanonicalMap {
        start: rule.start,
        start_rep,
        map,
    }
}

/// States reachable from the rule's start without leaving the rule.
///
/// Rule calls contribute their follow state; the stop state is not expanded.
fn discover_region(automaton: &Automaton, rule: &RuleBoundary) -> HashSet<StateId> {
    let mut region = HashSet::new();
    region.insert(rule.start);

    let mut queue = VecDeque::from([rule.start]);
    while let Some(current) = queue.pop_front() {
        if current == rule.stop {
            continue;
        }
        for transition in &automaton.state(current).transitions {
            let next = transition.effective_target();
            if region.insert(next) {
                queue.push_back(next);
            }
        }
    }
    region
}

/// Inbound structural connection counts within the region.
fn region_in_degrees(
    automaton: &Automaton,
    rule: &RuleBoundary,
    region: &HashSet<StateId>,
) -> HashMap<StateId, usize> {
    let mut in_degrees = HashMap::new();
    for &state in region {
        if state == rule.stop {
            continue;
        }
        for transition in &automaton.state(state).transitions {
            *in_degrees.entry(transition.effective_target()).or_insert(0) += 1;
        }
    }
    in_degrees
}

/// Whether a state exists purely to connect two real points.
///
/// The rule's start state is walked forward regardless of inbound count: its
/// inbound edges are rule calls from other rules, outside this region.
fn is_pass_through(
    automaton: &Automaton,
    rule: &RuleBoundary,
    in_degrees: &HashMap<StateId, usize>,
    state: StateId,
) -> bool {
    if state == rule.stop {
        return false;
    }
    let transitions = &automaton.state(state).transitions;
    if transitions.len() != 1 || !transitions[0].is_epsilon() {
        return false;
    }
    state == rule.start || in_degrees.get(&state).copied().unwrap_or(0) == 1
}

/// Follow a pass-through chain to its terminus.
///
/// The seen set stops the walk if an all-epsilon cycle feeds itself; the
/// resulting self-referential edge then surfaces as a self-loop violation at
/// build time.
fn walk(
    automaton: &Automaton,
    rule: &RuleBoundary,
    in_degrees: &HashMap<StateId, usize>,
    state: StateId,
) -> StateId {
    let mut seen = HashSet::new();
    let mut current = state;
    while is_pass_through(automaton, rule, in_degrees, current) {
        if !seen.insert(current) {
            break;
        }
        current = automaton.state(current).transitions[0].effective_target();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{AutomatonState, GrammarKind, Transition};

    fn automaton(states: Vec<AutomatonState>, rules: Vec<RuleBoundary>) -> Automaton {
        let rule_names = (0..rules.len()).map(|i| format!("r{i}")).collect();
        Automaton {
            kind: GrammarKind::Parser,
            states,
            rules,
            rule_names,
            vocabulary: None,
            lexer_actions: vec![],
        }
    }

    /// start --atom--> 3 --eps--> 4 --eps--> stop
    fn chain_automaton() -> (Automaton, RuleBoundary) {
        let rule = RuleBoundary { start: 1, stop: 2 };
        let automaton = automaton(
            vec![
                AutomatonState::new(0, 0).global_first(),
                AutomatonState::new(1, 0)
                    .rule_start()
                    .with_transitions(vec![Transition::Atom { target: 3, token: 1 }]),
                AutomatonState::new(2, 0).rule_stop(),
                AutomatonState::new(3, 0).with_transitions(vec![Transition::Epsilon { target: 4 }]),
                AutomatonState::new(4, 0).with_transitions(vec![Transition::Epsilon { target: 2 }]),
                AutomatonState::new(5, 0).global_last(),
            ],
            vec![rule],
        );
        (automaton, rule)
    }

    #[test]
    fn test_chain_collapses_to_terminus() {
        let (automaton, rule) = chain_automaton();
        let merged = merge(&automaton, &rule);

        assert_eq!(merged.representative(3), 2);
        assert_eq!(merged.representative(4), 2);
        // start has a non-epsilon transition, so it is its own root
        assert_eq!(merged.traversal_root(), 1);
    }

    #[test]
    fn test_start_walked_forward_and_normalized() {
        // start --eps--> 3 --atom--> stop
        let rule = RuleBoundary { start: 1, stop: 2 };
        let automaton = automaton(
            vec![
                AutomatonState::new(0, 0).global_first(),
                AutomatonState::new(1, 0)
                    .rule_start()
                    .with_transitions(vec![Transition::Epsilon { target: 3 }]),
                AutomatonState::new(2, 0).rule_stop(),
                AutomatonState::new(3, 0)
                    .with_transitions(vec![Transition::Atom { target: 2, token: 1 }]),
                AutomatonState::new(4, 0).global_last(),
            ],
            vec![rule],
        );
        let merged = merge(&automaton, &rule);

        // traversal begins at the state owning the real transitions
        assert_eq!(merged.traversal_root(), 3);
        // but callers never see an alternate identity for the start
        assert_eq!(merged.display(1), 1);
        assert_eq!(merged.display(3), 1);
    }

    #[test]
    fn test_display_is_idempotent() {
        let (automaton, rule) = chain_automaton();
        let merged = merge(&automaton, &rule);

        for (original, _) in merged.display_entries() {
            let once = merged.display(original);
            assert_eq!(merged.display(once), once);
        }
    }

    #[test]
    fn test_rule_call_is_not_a_merge_candidate() {
        // start --call r1 (follow 3)--> ; 3 --eps--> stop
        let rules = vec![RuleBoundary { start: 1, stop: 2 }, RuleBoundary { start: 4, stop: 5 }];
        let automaton = automaton(
            vec![
                AutomatonState::new(0, 0).global_first(),
                AutomatonState::new(1, 0).rule_start().with_transitions(vec![Transition::Rule {
                    target: 4,
                    rule_index: 1,
                    follow: 3,
                }]),
                AutomatonState::new(2, 0).rule_stop(),
                AutomatonState::new(3, 0).with_transitions(vec![Transition::Epsilon { target: 2 }]),
                AutomatonState::new(4, 1)
                    .rule_start()
                    .with_transitions(vec![Transition::Atom { target: 5, token: 1 }]),
                AutomatonState::new(5, 1).rule_stop(),
                AutomatonState::new(6, 0).global_last(),
            ],
            rules,
        );
        let merged = merge(&automaton, &automaton.rules[0]);

        // the call edge's source keeps its identity; only the follow chain merges
        assert_eq!(merged.traversal_root(), 1);
        assert_eq!(merged.representative(3), 2);
        // the called rule's states are outside this region
        assert_eq!(merged.representative(4), 4);
        assert!(merged.display_entries().all(|(original, _)| original != 4));
    }

    #[test]
    fn test_epsilon_cycle_terminates() {
        // 3 --eps--> 4 --eps--> 3, entered from the start
        let rule = RuleBoundary { start: 1, stop: 2 };
        let automaton = automaton(
            vec![
                AutomatonState::new(0, 0).global_first(),
                AutomatonState::new(1, 0)
                    .rule_start()
                    .with_transitions(vec![Transition::Atom { target: 3, token: 1 }]),
                AutomatonState::new(2, 0).rule_stop(),
                AutomatonState::new(3, 0).with_transitions(vec![Transition::Epsilon { target: 4 }]),
                AutomatonState::new(4, 0).with_transitions(vec![Transition::Epsilon { target: 3 }]),
                AutomatonState::new(5, 0).global_last(),
            ],
            vec![rule],
        );
        // must not hang; representatives stay within the cycle
        let merged = merge(&automaton, &rule);
        assert!(matches!(merged.representative(3), 3 | 4));
    }
}
