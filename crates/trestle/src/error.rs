//! Error types for Trestle operations.
//!
//! This module provides the main error type [`TrestleError`] which wraps
//! the error conditions of a render pass. Construction-time errors
//! ([`TrestleError::Grammar`]) abort the whole pass; attach-time errors are
//! collected per target in the [`RunReport`](crate::render::RunReport).

use std::io;

use thiserror::Error;

use trestle_core::error::GrammarError;

use crate::{backend::BackendError, config::ConfigError, document::DocumentError};

/// The main error type for Trestle operations.
#[derive(Debug, Error)]
pub enum TrestleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown target `{location}`")]
    UnknownTarget { location: String },

    #[error("Render error: {0}")]
    Backend(#[from] BackendError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

impl TrestleError {
    /// Returns a stable code identifying the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            TrestleError::Io(_) => "trestle::io",
            TrestleError::Grammar(err) => err.code(),
            TrestleError::Config(_) => "trestle::config",
            TrestleError::UnknownTarget { .. } => "trestle::unknown_target",
            TrestleError::Backend(_) => "trestle::render",
            TrestleError::Document(_) => "trestle::document",
        }
    }

    /// Returns `true` for errors that abort a render pass before anything is attached.
    pub fn is_construction_error(&self) -> bool {
        matches!(self, TrestleError::Grammar(_) | TrestleError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use trestle_core::identifier::Id;

    use super::*;

    #[test]
    fn test_grammar_error_is_transparent() {
        let err = TrestleError::from(GrammarError::UnknownProduction {
            name: Id::new("expr"),
        });
        assert_eq!(err.to_string(), "unknown production `expr`");
        assert_eq!(err.code(), "trestle::unknown_production");
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_unknown_target_display() {
        let err = TrestleError::UnknownTarget {
            location: "dotted-expr".to_string(),
        };
        assert_eq!(err.to_string(), "unknown target `dotted-expr`");
        assert_eq!(err.code(), "trestle::unknown_target");
        assert!(!err.is_construction_error());
    }
}
