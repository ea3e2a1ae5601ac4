//! Grammar model: symbols, rule expressions and productions.
//!
//! A [`Grammar`] is built once through a [`GrammarBuilder`] and is immutable
//! afterwards. Productions keep their declaration order, which is also the
//! order diagrams are built and listed in.
//!
//! # Example
//!
//! ```
//! # use trestle_core::grammar::{Expr, Grammar};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = Grammar::builder();
//! builder.define_token(
//!     "digit",
//!     Expr::choice(1, [Expr::terminal("'0'"), Expr::terminal("..."), Expr::terminal("'9'")]),
//! )?;
//! builder.define_production(
//!     "integer",
//!     Expr::sequence([
//!         Expr::terminal("'-'").optional(),
//!         Expr::non_terminal("digit").one_or_more(),
//!     ]),
//! )?;
//! let grammar = builder.finish();
//!
//! assert_eq!(grammar.len(), 2);
//! assert!(grammar.production("integer").is_ok());
//! # Ok(())
//! # }
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::{error::GrammarError, identifier::Id};

/// A leaf of a rule: literal token text or a reference to another production.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// Literal token text, shown exactly as written (quotes included).
    Terminal(String),
    /// Name of another production.
    NonTerminal(Id),
}

/// Grammar combinators making up the right-hand side of a production.
///
/// Deserializes from externally tagged, snake_case maps such as
/// `{ terminal = "'-'" }`, `{ sequence = [...] }` or
/// `{ choice = { default = 1, alternatives = [...] } }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Concatenation.
    Sequence(Vec<Expr>),
    /// Alternation. `default` is the branch drawn on the main line.
    Choice {
        #[serde(default)]
        default: usize,
        alternatives: Vec<Expr>,
    },
    /// `?`
    Optional(Box<Expr>),
    /// `*`
    ZeroOrMore(Box<Expr>),
    /// `+`
    OneOrMore(Box<Expr>),
    #[serde(untagged)]
    Symbol(Symbol),
}

impl Expr {
    pub fn terminal(text: impl Into<String>) -> Self {
        Expr::Symbol(Symbol::Terminal(text.into()))
    }

    pub fn non_terminal(name: impl Into<Id>) -> Self {
        Expr::Symbol(Symbol::NonTerminal(name.into()))
    }

    pub fn sequence(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Sequence(items.into_iter().collect())
    }

    /// Alternation with `default` as the straight-line branch.
    pub fn choice(default: usize, alternatives: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Choice {
            default,
            alternatives: alternatives.into_iter().collect(),
        }
    }

    pub fn optional(self) -> Self {
        Expr::Optional(Box::new(self))
    }

    pub fn zero_or_more(self) -> Self {
        Expr::ZeroOrMore(Box::new(self))
    }

    pub fn one_or_more(self) -> Self {
        Expr::OneOrMore(Box::new(self))
    }
}

/// Whether a production is a lexical token or a grammar rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProductionKind {
    Token,
    #[default]
    Rule,
}

/// A named grammar rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    name: Id,
    kind: ProductionKind,
    rule: Expr,
}

impl Production {
    pub fn new(name: Id, kind: ProductionKind, rule: Expr) -> Self {
        Self { name, kind, rule }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn kind(&self) -> ProductionKind {
        self.kind
    }

    pub fn rule(&self) -> &Expr {
        &self.rule
    }
}

/// Immutable, ordered set of productions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    productions: IndexMap<Id, Production>,
}

impl Grammar {
    /// Starts a new, empty grammar definition.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// Looks up a production by name.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownProduction`] if no production has this name.
    pub fn production(&self, name: impl Into<Id>) -> Result<&Production, GrammarError> {
        let name = name.into();
        self.productions
            .get(&name)
            .ok_or(GrammarError::UnknownProduction { name })
    }

    pub fn contains(&self, name: impl Into<Id>) -> bool {
        self.productions.contains_key(&name.into())
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }

    /// Iterates productions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Production> {
        self.productions.values()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Production> {
        self.iter()
            .filter(|production| production.kind() == ProductionKind::Token)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Production> {
        self.iter()
            .filter(|production| production.kind() == ProductionKind::Rule)
    }
}

/// Collects productions before freezing them into a [`Grammar`].
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    productions: IndexMap<Id, Production>,
}

impl GrammarBuilder {
    /// Registers a grammar rule.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::DuplicateName`] if `name` is already registered.
    pub fn define_production(
        &mut self,
        name: impl Into<Id>,
        rule: Expr,
    ) -> Result<&mut Self, GrammarError> {
        self.define(name.into(), ProductionKind::Rule, rule)
    }

    /// Registers a lexical token.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::DuplicateName`] if `name` is already registered.
    pub fn define_token(
        &mut self,
        name: impl Into<Id>,
        rule: Expr,
    ) -> Result<&mut Self, GrammarError> {
        self.define(name.into(), ProductionKind::Token, rule)
    }

    fn define(
        &mut self,
        name: Id,
        kind: ProductionKind,
        rule: Expr,
    ) -> Result<&mut Self, GrammarError> {
        if self.productions.contains_key(&name) {
            return Err(GrammarError::DuplicateName { name });
        }
        debug!(production = name.to_string(), kind:?; "Defined production");
        self.productions
            .insert(name, Production::new(name, kind, rule));
        Ok(self)
    }

    pub fn finish(self) -> Grammar {
        Grammar {
            productions: self.productions,
        }
    }
}
