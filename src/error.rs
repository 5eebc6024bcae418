//! This module defines all error types used throughout the application.

use crate::automaton::StateId;
use std::io;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A canonicalized transition whose source equals its target.
    ///
    /// The input contract forbids genuine self-loops; one surviving the merge
    /// pass means the automaton is malformed.
    #[error("self loop on state {0} in rule '{1}'")]
    SelfLoop(StateId, String),

    /// The global terminal sentinel appeared as an edge endpoint.
    #[error("terminal sentinel state {0} reached in rule '{1}'")]
    SentinelReached(StateId, String),

    /// A non-sentinel state never appeared in any rule graph.
    #[error("state {0} does not appear in any rule graph")]
    IncompleteCoverage(StateId),

    /// A transition's payload could not be resolved to a label.
    #[error("unclassified transition: {0}")]
    UnclassifiedTransition(String),

    /// Malformed automaton description
    #[error("Automaton error: {0}")]
    Automaton(String),

    /// Input source errors
    #[error("Source error: {0}")]
    Source(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output formatting/export errors
    #[error("Output error: {0}")]
    Output(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an automaton contract error
    pub fn automaton(msg: impl Into<String>) -> Self {
        Self::Automaton(msg.into())
    }

    /// Create an input source error
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create an unclassified-transition error
    pub fn unclassified(msg: impl Into<String>) -> Self {
        Self::UnclassifiedTransition(msg.into())
    }

    /// Check whether this error is one of the automaton contract violations.
    ///
    /// Any of these means the partial output produced so far must be discarded.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::SelfLoop(..)
                | Error::SentinelReached(..)
                | Error::IncompleteCoverage(..)
                | Error::UnclassifiedTransition(..)
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::custom("test error");
        assert_eq!(err.to_string(), "test error");

        let err = Error::automaton("missing sentinel");
        assert_eq!(err.to_string(), "Automaton error: missing sentinel");
    }

    #[test]
    fn test_contract_violations() {
        assert!(Error::SelfLoop(3, "expr".to_string()).is_contract_violation());
        assert!(Error::IncompleteCoverage(7).is_contract_violation());
        assert!(Error::unclassified("rule index 9 out of range").is_contract_violation());
        assert!(!Error::custom("other").is_contract_violation());
    }

    #[test]
    fn test_violation_messages() {
        let err = Error::SentinelReached(12, "expr".to_string());
        assert_eq!(
            err.to_string(),
            "terminal sentinel state 12 reached in rule 'expr'"
        );
    }
}
