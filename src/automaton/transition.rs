//! Transition representation
//!
//! Transitions form a closed sum type over every kind the automaton builder
//! emits. Labeling is an exhaustive match over this type; a payload that does
//! not resolve against the automaton surfaces as an unclassified-transition
//! error rather than a silent default.

use crate::automaton::StateId;
use serde::{Deserialize, Serialize};

/// Display glyph for plain (epsilon) transitions and empty renderings
pub const EPSILON_LABEL: &str = "ε";

/// A directed edge between two automaton states.
///
/// The source state is implicit: a transition is owned by the state it leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// Invocation of another grammar rule. `target` is the called rule's start
    /// state; `follow` is where control resumes in the calling rule.
    Rule {
        target: StateId,
        rule_index: usize,
        follow: StateId,
    },

    /// Match of a single terminal symbol
    Atom { target: StateId, token: i32 },

    /// Embedded action, referenced by index into the automaton's action table
    Action { target: StateId, action_index: usize },

    /// Plain structural transition consuming no input
    Epsilon { target: StateId },

    /// Match of a contiguous range of terminal symbols
    Range { target: StateId, from: i32, to: i32 },

    /// Match of an explicit set of terminal symbols
    Set { target: StateId, tokens: Vec<i32> },

    /// Match of any terminal symbol
    Wildcard { target: StateId },

    /// Semantic predicate gate
    Predicate {
        target: StateId,
        rule_index: usize,
        pred_index: usize,
    },
}

impl Transition {
    /// The state this transition structurally continues to.
    ///
    /// For rule calls this is the follow state, not the called rule's start:
    /// traversal and merging never leave the current rule.
    pub fn effective_target(&self) -> StateId {
        match *self {
            Transition::Rule { follow, .. } => follow,
            Transition::Atom { target, .. }
            | Transition::Action { target, .. }
            | Transition::Epsilon { target }
            | Transition::Range { target, .. }
            | Transition::Set { target, .. }
            | Transition::Wildcard { target }
            | Transition::Predicate { target, .. } => target,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Transition::Epsilon { .. })
    }

    /// Generic textual rendering, sanitized for display.
    ///
    /// Used wherever no richer label source applies (no vocabulary entry for
    /// an atom, action transitions outside lexer automatons, set/range/
    /// wildcard/predicate kinds).
    pub fn display_text(&self) -> String {
        let text = match self {
            Transition::Rule { rule_index, .. } => format!("rule:{rule_index}"),
            Transition::Atom { token, .. } => token.to_string(),
            Transition::Action { action_index, .. } => format!("action:{action_index}"),
            Transition::Epsilon { .. } => EPSILON_LABEL.to_string(),
            Transition::Range { from, to, .. } => format!("{from}..{to}"),
            Transition::Set { tokens, .. } => {
                let inner = tokens
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{{{inner}}}")
            }
            Transition::Wildcard { .. } => ".".to_string(),
            Transition::Predicate {
                rule_index,
                pred_index,
                ..
            } => format!("pred:{rule_index}:{pred_index}"),
        };
        let sanitized = sanitize_label(&text);
        if sanitized.is_empty() {
            EPSILON_LABEL.to_string()
        } else {
            sanitized
        }
    }
}

/// Normalize control characters so labels are safe to hand to a display layer.
pub fn sanitize_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for chr in text.chars() {
        match chr {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_target_follows_rule_calls() {
        let call = Transition::Rule {
            target: 10,
            rule_index: 2,
            follow: 6,
        };
        assert_eq!(call.effective_target(), 6);

        let atom = Transition::Atom { target: 4, token: 1 };
        assert_eq!(atom.effective_target(), 4);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Transition::Epsilon { target: 0 }.display_text(), EPSILON_LABEL);
        assert_eq!(Transition::Atom { target: 0, token: 7 }.display_text(), "7");
        assert_eq!(
            Transition::Range {
                target: 0,
                from: 97,
                to: 122
            }
            .display_text(),
            "97..122"
        );
        assert_eq!(
            Transition::Set {
                target: 0,
                tokens: vec![1, 3]
            }
            .display_text(),
            "{1,3}"
        );
        assert_eq!(Transition::Wildcard { target: 0 }.display_text(), ".");
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("a\nb\tc"), "a\\nb\\tc");
        assert_eq!(sanitize_label("plain"), "plain");
        assert_eq!(sanitize_label("\u{0007}"), "\\u{0007}");
    }

    #[test]
    fn test_serde_tagging() {
        let t = Transition::Atom { target: 5, token: 3 };
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"kind\":\"atom\""));

        let back: Transition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
