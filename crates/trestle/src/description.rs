//! Structured grammar descriptions.
//!
//! A [`GrammarDescription`] is a configuration object listing tokens and
//! rules as rule expressions. It is not a grammar text format: every
//! combinator is spelled out as a table.
//!
//! ```
//! # use trestle::description::GrammarDescription;
//! let description = GrammarDescription::from_toml_str(r#"
//!     [tokens]
//!     digit = { choice = { default = 1, alternatives = [
//!         { terminal = "'0'" }, { terminal = "..." }, { terminal = "'9'" },
//!     ] } }
//!
//!     [rules]
//!     integer = { sequence = [
//!         { optional = { terminal = "'-'" } },
//!         { one_or_more = { non_terminal = "digit" } },
//!     ] }
//! "#).unwrap();
//!
//! let grammar = description.into_grammar().unwrap();
//! assert_eq!(grammar.len(), 2);
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use trestle_core::{
    error::GrammarError,
    grammar::{Expr, Grammar},
};

use crate::config::ConfigError;

/// Tokens and rules of a grammar, in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrammarDescription {
    #[serde(default)]
    tokens: IndexMap<String, Expr>,

    #[serde(default)]
    rules: IndexMap<String, Expr>,
}

impl GrammarDescription {
    /// Parses a description from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML or an
    /// expression table is not a known combinator.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn tokens(&self) -> &IndexMap<String, Expr> {
        &self.tokens
    }

    pub fn rules(&self) -> &IndexMap<String, Expr> {
        &self.rules
    }

    /// Registers tokens first, then rules.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::DuplicateName`] when a name appears in both tables.
    pub fn into_grammar(self) -> Result<Grammar, GrammarError> {
        debug!(
            tokens = self.tokens.len(),
            rules = self.rules.len();
            "Loading grammar description"
        );

        let mut builder = Grammar::builder();
        for (name, rule) in self.tokens {
            builder.define_token(name.as_str(), rule)?;
        }
        for (name, rule) in self.rules {
            builder.define_production(name.as_str(), rule)?;
        }
        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use trestle_core::{grammar::ProductionKind, identifier::Id};

    use super::*;

    #[test]
    fn test_into_grammar_order_and_kinds() {
        let description = GrammarDescription::from_toml_str(
            r#"
            [tokens]
            letter = { terminal = "'a'..'z', 'A'..'Z', 0xc0..0xff" }
            identifier = { sequence = [
                { choice = { alternatives = [
                    { non_terminal = "letter" }, { terminal = "'$'" }, { terminal = "'_'" },
                ] } },
                { zero_or_more = { non_terminal = "letter" } },
            ] }

            [rules]
            decl = { sequence = [
                { non_terminal = "identifier" },
                { terminal = ":=" },
                { non_terminal = "expr" },
                { terminal = ";" },
            ] }
            "#,
        )
        .unwrap();

        assert_eq!(description.tokens().len(), 2);
        assert_eq!(description.rules().len(), 1);

        let grammar = description.into_grammar().unwrap();
        let names: Vec<String> = grammar.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["letter", "identifier", "decl"]);
        assert_eq!(
            grammar.production("decl").unwrap().kind(),
            ProductionKind::Rule
        );
        assert_eq!(
            grammar.production("letter").unwrap().kind(),
            ProductionKind::Token
        );
    }

    #[test]
    fn test_name_in_both_tables_is_duplicate() {
        let description = GrammarDescription::from_toml_str(
            r#"
            [tokens]
            string = { terminal = "'\"'" }

            [rules]
            string = { terminal = "'\"'" }
            "#,
        )
        .unwrap();

        let err = description.into_grammar().unwrap_err();
        assert_eq!(
            err,
            GrammarError::DuplicateName {
                name: Id::new("string")
            }
        );
    }

    #[test]
    fn test_unknown_combinator_fails_parse() {
        let err = GrammarDescription::from_toml_str(
            r#"
            [rules]
            broken = { repeat = { terminal = "x" } }
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_description() {
        let grammar = GrammarDescription::from_toml_str("")
            .unwrap()
            .into_grammar()
            .unwrap();
        assert!(grammar.is_empty());
    }
}
