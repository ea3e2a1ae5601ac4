//! One-line EBNF rendering.
//!
//! Produces `name ::= expression` with postfix `?`, `*` and `+`, `|` between
//! alternatives, and parentheses only where precedence requires them.

use std::fmt::Write;

use trestle_core::{diagram::DiagramNode, identifier::Id};

use super::{Artifact, ArtifactFormat, Backend, BackendError};
use crate::{
    config::AppConfig,
    render::{Link, LinkTable},
};

/// Binding strength of an expression, from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Choice,
    Sequence,
    Postfix,
    Atom,
}

impl Precedence {
    fn of(node: &DiagramNode) -> Self {
        match node {
            DiagramNode::Literal(_) | DiagramNode::Ref(_) => Precedence::Atom,
            DiagramNode::Optional(_) | DiagramNode::ZeroOrMore(_) | DiagramNode::OneOrMore(_) => {
                Precedence::Postfix
            }
            DiagramNode::Sequence(items) if items.len() == 1 => Precedence::of(&items[0]),
            DiagramNode::Sequence(_) => Precedence::Sequence,
            DiagramNode::Choice { alternatives, .. } if alternatives.len() == 1 => {
                Precedence::of(&alternatives[0])
            }
            DiagramNode::Choice { .. } => Precedence::Choice,
        }
    }
}

/// Writes diagrams as EBNF text.
#[derive(Debug, Clone, Default)]
pub struct EbnfBackend {
    markdown_links: bool,
}

impl EbnfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            markdown_links: config.render().markdown_links(),
        }
    }

    /// Writes resolved references as Markdown links, `[name](href)`.
    pub fn with_markdown_links(mut self, markdown_links: bool) -> Self {
        self.markdown_links = markdown_links;
        self
    }

    fn write_node(
        &self,
        out: &mut String,
        node: &DiagramNode,
        links: &LinkTable<'_>,
    ) -> Result<(), BackendError> {
        match node {
            DiagramNode::Literal(text) => out.push_str(text),
            DiagramNode::Ref(name) => match links.resolve(*name) {
                Link::Href(href) if self.markdown_links => write!(out, "[{name}]({href})")?,
                _ => write!(out, "{name}")?,
            },
            DiagramNode::Sequence(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push(' ');
                    }
                    self.write_operand(out, item, Precedence::Postfix, links)?;
                }
            }
            DiagramNode::Choice { alternatives, .. } => {
                for (idx, alternative) in alternatives.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(" | ");
                    }
                    self.write_operand(out, alternative, Precedence::Sequence, links)?;
                }
            }
            DiagramNode::Optional(child) => {
                self.write_operand(out, child, Precedence::Atom, links)?;
                out.push('?');
            }
            DiagramNode::ZeroOrMore(child) => {
                self.write_operand(out, child, Precedence::Atom, links)?;
                out.push('*');
            }
            DiagramNode::OneOrMore(child) => {
                self.write_operand(out, child, Precedence::Atom, links)?;
                out.push('+');
            }
        }
        Ok(())
    }

    /// Writes `node`, parenthesized if it binds looser than `required`.
    fn write_operand(
        &self,
        out: &mut String,
        node: &DiagramNode,
        required: Precedence,
        links: &LinkTable<'_>,
    ) -> Result<(), BackendError> {
        if Precedence::of(node) < required {
            out.push('(');
            self.write_node(out, node, links)?;
            out.push(')');
        } else {
            self.write_node(out, node, links)?;
        }
        Ok(())
    }
}

impl Backend for EbnfBackend {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Text
    }

    fn draw(
        &self,
        production: Id,
        node: &DiagramNode,
        links: &LinkTable<'_>,
    ) -> Result<Artifact, BackendError> {
        let mut out = String::new();
        write!(out, "{production} ::= ")?;
        self.write_node(&mut out, node, links)?;
        Ok(Artifact::new(production, ArtifactFormat::Text, out))
    }
}
