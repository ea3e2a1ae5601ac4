//! Backend-independent railroad diagram tree.
//!
//! A [`DiagramNode`] tree is finite: recursion between productions is
//! expressed through [`DiagramNode::Ref`], never by embedding one tree in
//! another.

use crate::identifier::Id;

/// One shape of a railroad diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramNode {
    /// Terminal box with literal token text.
    Literal(String),
    /// Non-terminal box naming another production.
    Ref(Id),
    /// Children drawn left to right.
    Sequence(Vec<DiagramNode>),
    /// Alternatives stacked vertically; `default` sits on the main line.
    Choice {
        default: usize,
        alternatives: Vec<DiagramNode>,
    },
    Optional(Box<DiagramNode>),
    ZeroOrMore(Box<DiagramNode>),
    OneOrMore(Box<DiagramNode>),
}

impl DiagramNode {
    /// Stable lowercase name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DiagramNode::Literal(_) => "terminal",
            DiagramNode::Ref(_) => "non-terminal",
            DiagramNode::Sequence(_) => "sequence",
            DiagramNode::Choice { .. } => "choice",
            DiagramNode::Optional(_) => "optional",
            DiagramNode::ZeroOrMore(_) => "zero-or-more",
            DiagramNode::OneOrMore(_) => "one-or-more",
        }
    }

    /// Direct children in drawing order.
    pub fn children(&self) -> &[DiagramNode] {
        match self {
            DiagramNode::Literal(_) | DiagramNode::Ref(_) => &[],
            DiagramNode::Sequence(children) => children,
            DiagramNode::Choice { alternatives, .. } => alternatives,
            DiagramNode::Optional(child)
            | DiagramNode::ZeroOrMore(child)
            | DiagramNode::OneOrMore(child) => std::slice::from_ref(child.as_ref()),
        }
    }

    /// Every referenced production name, depth first, duplicates included.
    pub fn references(&self) -> Vec<Id> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references(&self, names: &mut Vec<Id>) {
        if let DiagramNode::Ref(name) = self {
            names.push(*name);
        }
        for child in self.children() {
            child.collect_references(names);
        }
    }

    /// Total number of nodes in this tree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(DiagramNode::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer() -> DiagramNode {
        DiagramNode::Sequence(vec![
            DiagramNode::Optional(Box::new(DiagramNode::Literal("'-'".to_string()))),
            DiagramNode::OneOrMore(Box::new(DiagramNode::Ref(Id::new("digit")))),
        ])
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(integer().kind(), "sequence");
        assert_eq!(DiagramNode::Ref(Id::new("digit")).kind(), "non-terminal");
        assert_eq!(
            DiagramNode::ZeroOrMore(Box::new(DiagramNode::Literal("x".into()))).kind(),
            "zero-or-more"
        );
    }

    #[test]
    fn test_children() {
        let node = integer();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].kind(), "optional");
        assert_eq!(node.children()[0].children().len(), 1);
        assert!(node.children()[0].children()[0].children().is_empty());
    }

    #[test]
    fn test_references_depth_first() {
        let node = DiagramNode::Choice {
            default: 0,
            alternatives: vec![
                DiagramNode::Ref(Id::new("letter")),
                DiagramNode::Sequence(vec![
                    DiagramNode::Literal("'#'".into()),
                    DiagramNode::Ref(Id::new("identifier")),
                ]),
                DiagramNode::Ref(Id::new("letter")),
            ],
        };
        assert_eq!(
            node.references(),
            vec![Id::new("letter"), Id::new("identifier"), Id::new("letter")]
        );
    }

    #[test]
    fn test_node_count() {
        assert_eq!(integer().node_count(), 5);
        assert_eq!(DiagramNode::Literal("x".into()).node_count(), 1);
    }
}
