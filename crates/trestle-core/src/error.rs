//! Construction-time errors for grammars and diagram trees.
//!
//! Every [`GrammarError`] is fatal: a render pass that hits one produces no
//! diagrams at all.

use thiserror::Error;

use crate::identifier::Id;

/// Why a rule expression cannot be turned into a diagram node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("sequence has no children")]
    EmptySequence,

    #[error("choice has no alternatives")]
    EmptyChoice,

    #[error("default branch {default} is out of range for {len} alternative(s)")]
    DefaultOutOfRange { default: usize, len: usize },
}

/// Errors raised while defining, looking up, or building productions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("production `{name}` is defined multiple times")]
    DuplicateName { name: Id },

    #[error("unknown production `{name}`")]
    UnknownProduction { name: Id },

    #[error("malformed node in production `{production}` at `{path}`: {reason}")]
    MalformedNode {
        production: Id,
        path: String,
        reason: MalformedReason,
    },
}

impl GrammarError {
    /// Returns a stable code identifying the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            GrammarError::DuplicateName { .. } => "trestle::duplicate_name",
            GrammarError::UnknownProduction { .. } => "trestle::unknown_production",
            GrammarError::MalformedNode { .. } => "trestle::malformed_node",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_display() {
        let err = GrammarError::DuplicateName {
            name: Id::new("digit"),
        };
        assert_eq!(err.to_string(), "production `digit` is defined multiple times");
        assert_eq!(err.code(), "trestle::duplicate_name");
    }

    #[test]
    fn test_malformed_node_display() {
        let err = GrammarError::MalformedNode {
            production: Id::new("digit"),
            path: "choice".to_string(),
            reason: MalformedReason::DefaultOutOfRange { default: 4, len: 2 },
        };
        assert_eq!(
            err.to_string(),
            "malformed node in production `digit` at `choice`: \
             default branch 4 is out of range for 2 alternative(s)"
        );
        assert_eq!(err.code(), "trestle::malformed_node");
    }
}
