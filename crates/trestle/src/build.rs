//! Translation of grammar rules into diagram trees.
//!
//! [`DiagramBuilder`] maps every grammar combinator onto exactly one
//! [`DiagramNode`] shape. Non-terminals become [`DiagramNode::Ref`] nodes;
//! whether they link anywhere is decided later, at render time.

use indexmap::IndexMap;
use log::{debug, info, trace};

use trestle_core::{
    diagram::DiagramNode,
    error::{GrammarError, MalformedReason},
    grammar::{Expr, Grammar, Production, ProductionKind, Symbol},
    identifier::Id,
};

/// Builds [`DiagramNode`] trees from productions.
///
/// Building is pure and deterministic: the same production always yields a
/// structurally identical tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramBuilder {
    flatten_sequences: bool,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse single-child sequences into their only child.
    pub fn with_flatten_sequences(mut self, flatten: bool) -> Self {
        self.flatten_sequences = flatten;
        self
    }

    /// Builds the diagram tree of one production.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::MalformedNode`] for an empty sequence, an empty
    /// choice, or a choice whose default branch is out of range.
    pub fn build(&self, production: &Production) -> Result<DiagramNode, GrammarError> {
        let mut path = Vec::new();
        let node = self.build_expr(production.name(), production.rule(), &mut path)?;
        trace!(production:% = production.name(), node:?; "Built diagram");
        Ok(node)
    }

    /// Builds every production of `grammar` in declaration order.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed production; no partial result is returned.
    pub fn build_all(&self, grammar: &Grammar) -> Result<BuiltDiagrams, GrammarError> {
        info!(productions = grammar.len(); "Building diagrams");

        let mut diagrams = IndexMap::with_capacity(grammar.len());
        for production in grammar.iter() {
            let node = self.build(production)?;
            debug!(production:% = production.name(), nodes = node.node_count(); "Production built");
            diagrams.insert(
                production.name(),
                BuiltDiagram {
                    kind: production.kind(),
                    node,
                },
            );
        }

        Ok(BuiltDiagrams { diagrams })
    }

    fn build_expr(
        &self,
        production: Id,
        expr: &Expr,
        path: &mut Vec<String>,
    ) -> Result<DiagramNode, GrammarError> {
        let malformed = |path: &[String], kind: &str, reason| {
            let mut segments = path.to_vec();
            segments.push(kind.to_string());
            GrammarError::MalformedNode {
                production,
                path: segments.join("/"),
                reason,
            }
        };

        let node = match expr {
            Expr::Symbol(Symbol::Terminal(text)) => DiagramNode::Literal(text.clone()),
            Expr::Symbol(Symbol::NonTerminal(name)) => DiagramNode::Ref(*name),
            Expr::Sequence(items) => {
                if items.is_empty() {
                    return Err(malformed(
                        path.as_slice(),
                        "sequence",
                        MalformedReason::EmptySequence,
                    ));
                }
                let mut children = self.build_children(production, "sequence", items, path)?;
                if self.flatten_sequences && children.len() == 1 {
                    children.swap_remove(0)
                } else {
                    DiagramNode::Sequence(children)
                }
            }
            Expr::Choice {
                default,
                alternatives,
            } => {
                if alternatives.is_empty() {
                    return Err(malformed(
                        path.as_slice(),
                        "choice",
                        MalformedReason::EmptyChoice,
                    ));
                }
                if *default >= alternatives.len() {
                    return Err(malformed(
                        path.as_slice(),
                        "choice",
                        MalformedReason::DefaultOutOfRange {
                            default: *default,
                            len: alternatives.len(),
                        },
                    ));
                }
                DiagramNode::Choice {
                    default: *default,
                    alternatives: self.build_children(production, "choice", alternatives, path)?,
                }
            }
            Expr::Optional(inner) => DiagramNode::Optional(Box::new(
                self.build_wrapped(production, "optional", inner, path)?,
            )),
            Expr::ZeroOrMore(inner) => DiagramNode::ZeroOrMore(Box::new(
                self.build_wrapped(production, "zero-or-more", inner, path)?,
            )),
            Expr::OneOrMore(inner) => DiagramNode::OneOrMore(Box::new(
                self.build_wrapped(production, "one-or-more", inner, path)?,
            )),
        };

        Ok(node)
    }

    fn build_children(
        &self,
        production: Id,
        kind: &str,
        items: &[Expr],
        path: &mut Vec<String>,
    ) -> Result<Vec<DiagramNode>, GrammarError> {
        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                path.push(format!("{kind}[{idx}]"));
                let child = self.build_expr(production, item, path);
                path.pop();
                child
            })
            .collect()
    }

    fn build_wrapped(
        &self,
        production: Id,
        kind: &str,
        inner: &Expr,
        path: &mut Vec<String>,
    ) -> Result<DiagramNode, GrammarError> {
        path.push(kind.to_string());
        let child = self.build_expr(production, inner, path);
        path.pop();
        child
    }
}

/// A built diagram together with the kind of its production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltDiagram {
    kind: ProductionKind,
    node: DiagramNode,
}

impl BuiltDiagram {
    pub fn kind(&self) -> ProductionKind {
        self.kind
    }

    pub fn node(&self) -> &DiagramNode {
        &self.node
    }
}

/// All diagrams of a grammar, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltDiagrams {
    diagrams: IndexMap<Id, BuiltDiagram>,
}

impl BuiltDiagrams {
    pub fn get(&self, name: impl Into<Id>) -> Option<&BuiltDiagram> {
        self.diagrams.get(&name.into())
    }

    pub fn contains(&self, name: impl Into<Id>) -> bool {
        self.diagrams.contains_key(&name.into())
    }

    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, &BuiltDiagram)> {
        self.diagrams.iter().map(|(name, diagram)| (*name, diagram))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn lit(text: &str) -> DiagramNode {
        DiagramNode::Literal(text.to_string())
    }

    fn digit_grammar() -> Grammar {
        let mut builder = Grammar::builder();
        builder
            .define_token(
                "digit",
                Expr::choice(
                    1,
                    ["'0'", "'1'", "'2'", "'3'", "'4'", "'5'", "'6'", "'7'", "'8'", "'9'"]
                        .map(Expr::terminal),
                ),
            )
            .unwrap()
            .define_token(
                "integer",
                Expr::sequence([
                    Expr::terminal("'-'").optional(),
                    Expr::non_terminal("digit").one_or_more(),
                ]),
            )
            .unwrap();
        builder.finish()
    }

    #[test]
    fn test_build_integer() {
        let grammar = digit_grammar();
        let node = DiagramBuilder::new()
            .build(grammar.production("integer").unwrap())
            .unwrap();

        assert_eq!(
            node,
            DiagramNode::Sequence(vec![
                DiagramNode::Optional(Box::new(lit("'-'"))),
                DiagramNode::OneOrMore(Box::new(DiagramNode::Ref(Id::new("digit")))),
            ])
        );
    }

    #[test]
    fn test_choice_keeps_author_default() {
        let grammar = digit_grammar();
        let node = DiagramBuilder::new()
            .build(grammar.production("digit").unwrap())
            .unwrap();

        match node {
            DiagramNode::Choice {
                default,
                alternatives,
            } => {
                assert_eq!(default, 1);
                assert_eq!(alternatives.len(), 10);
                assert_eq!(alternatives[0], lit("'0'"));
            }
            other => panic!("Expected choice, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_or_more_and_ref_deferred() {
        let production = Production::new(
            Id::new("block"),
            ProductionKind::Rule,
            Expr::sequence([
                Expr::terminal("'{'"),
                Expr::non_terminal("statement").zero_or_more(),
                Expr::terminal("'}'"),
            ]),
        );
        let node = DiagramBuilder::new().build(&production).unwrap();

        // `statement` is not defined anywhere; building still succeeds
        assert_eq!(node.references(), vec![Id::new("statement")]);
        assert_eq!(node.children()[1].kind(), "zero-or-more");
    }

    #[test]
    fn test_out_of_range_default_is_malformed() {
        let production = Production::new(
            Id::new("sign"),
            ProductionKind::Token,
            Expr::choice(2, [Expr::terminal("'+'"), Expr::terminal("'-'")]),
        );
        let err = DiagramBuilder::new().build(&production).unwrap_err();

        assert_eq!(
            err,
            GrammarError::MalformedNode {
                production: Id::new("sign"),
                path: "choice".to_string(),
                reason: MalformedReason::DefaultOutOfRange { default: 2, len: 2 },
            }
        );
    }

    #[test]
    fn test_empty_nodes_are_malformed_with_path() {
        let production = Production::new(
            Id::new("array"),
            ProductionKind::Rule,
            Expr::sequence([
                Expr::terminal("'['"),
                Expr::sequence([]).optional(),
                Expr::terminal("']'"),
            ]),
        );
        let err = DiagramBuilder::new().build(&production).unwrap_err();
        assert_eq!(
            err,
            GrammarError::MalformedNode {
                production: Id::new("array"),
                path: "sequence[1]/optional/sequence".to_string(),
                reason: MalformedReason::EmptySequence,
            }
        );

        let empty_choice = Production::new(
            Id::new("nothing"),
            ProductionKind::Rule,
            Expr::choice(0, []),
        );
        let err = DiagramBuilder::new().build(&empty_choice).unwrap_err();
        assert!(matches!(
            err,
            GrammarError::MalformedNode {
                reason: MalformedReason::EmptyChoice,
                ..
            }
        ));
    }

    #[test]
    fn test_flatten_sequences() {
        let production = Production::new(
            Id::new("letter"),
            ProductionKind::Token,
            Expr::sequence([Expr::terminal("'a'..'z', 'A'..'Z', 0xc0..0xff")]),
        );

        let nested = DiagramBuilder::new().build(&production).unwrap();
        assert_eq!(nested.kind(), "sequence");

        let flat = DiagramBuilder::new()
            .with_flatten_sequences(true)
            .build(&production)
            .unwrap();
        assert_eq!(flat, lit("'a'..'z', 'A'..'Z', 0xc0..0xff"));
    }

    #[test]
    fn test_build_all_preserves_order() {
        let built = DiagramBuilder::new().build_all(&digit_grammar()).unwrap();

        let names: Vec<String> = built.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(names, ["digit", "integer"]);
        assert_eq!(built.get("integer").unwrap().kind(), ProductionKind::Token);
        assert!(built.contains("digit"));
        assert_eq!(built.len(), 2);
    }

    #[test]
    fn test_build_all_fails_fast() {
        let mut builder = Grammar::builder();
        builder
            .define_production("ok", Expr::terminal("'x'"))
            .unwrap()
            .define_production("broken", Expr::sequence([]))
            .unwrap();
        let grammar = builder.finish();

        let err = DiagramBuilder::new().build_all(&grammar).unwrap_err();
        assert!(matches!(err, GrammarError::MalformedNode { production, .. } if production == "broken"));
    }

    fn expr_strategy() -> impl Strategy<Value = Expr> {
        let leaf = prop_oneof![
            "[a-z']{1,6}".prop_map(Expr::terminal),
            "[a-z_]{1,8}".prop_map(|name| Expr::non_terminal(name.as_str())),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4).prop_map(Expr::sequence),
                (prop::collection::vec(inner.clone(), 1..4), any::<prop::sample::Index>())
                    .prop_map(|(alts, idx)| Expr::choice(idx.index(alts.len()), alts)),
                inner.clone().prop_map(Expr::optional),
                inner.clone().prop_map(Expr::zero_or_more),
                inner.prop_map(Expr::one_or_more),
            ]
        })
    }

    /// Building the same production twice yields identical trees.
    fn check_build_is_deterministic(rule: Expr) -> Result<(), TestCaseError> {
        let production = Production::new(Id::new("generated"), ProductionKind::Rule, rule);
        let builder = DiagramBuilder::new();

        let first = builder.build(&production);
        let second = builder.build(&production);

        prop_assert!(first.is_ok());
        prop_assert_eq!(first, second);
        Ok(())
    }

    proptest! {
        #[test]
        fn build_is_deterministic(rule in expr_strategy()) {
            check_build_is_deterministic(rule)?;
        }
    }
}
