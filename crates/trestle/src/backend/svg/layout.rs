//! Railroad layout.
//!
//! Every node is measured into a box with an entry height: the y offset,
//! from the top of the box, at which the main line enters on the left and
//! leaves on the right. Composite nodes place their children relative to
//! their own top-left corner so that the children's main lines connect.

use trestle_core::{
    diagram::DiagramNode,
    geometry::{Insets, Point, Size},
};

use super::text::TextMetrics;

/// Spacing used by the layout, in pixels.
#[derive(Debug, Clone, Copy)]
pub(super) struct Spacing {
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub label_padding: f32,
}

impl Spacing {
    /// Horizontal room a branch needs to leave and rejoin the main line.
    pub fn rail(&self) -> f32 {
        self.horizontal_gap * 2.0
    }
}

/// A measured node with its children placed relative to its top-left corner.
#[derive(Debug)]
pub(super) struct LayoutNode<'a> {
    node: &'a DiagramNode,
    size: Size,
    entry: f32,
    children: Vec<(Point, LayoutNode<'a>)>,
}

impl<'a> LayoutNode<'a> {
    pub fn new(node: &'a DiagramNode, metrics: &TextMetrics, spacing: Spacing) -> Self {
        match node {
            DiagramNode::Literal(text) => Self::leaf(node, text, metrics, spacing),
            DiagramNode::Ref(name) => Self::leaf(node, &name.to_string(), metrics, spacing),
            DiagramNode::Sequence(items) => Self::sequence(node, items, metrics, spacing),
            DiagramNode::Choice {
                default,
                alternatives,
            } => Self::choice(node, *default, alternatives, metrics, spacing),
            DiagramNode::Optional(child) => {
                let child = Self::new(child, metrics, spacing);
                Self::wrapped(node, child, spacing, true, false)
            }
            DiagramNode::OneOrMore(child) => {
                let child = Self::new(child, metrics, spacing);
                Self::wrapped(node, child, spacing, false, true)
            }
            DiagramNode::ZeroOrMore(child) => {
                let child = Self::new(child, metrics, spacing);
                Self::wrapped(node, child, spacing, true, true)
            }
        }
    }

    fn leaf(node: &'a DiagramNode, text: &str, metrics: &TextMetrics, spacing: Spacing) -> Self {
        let padding = spacing.label_padding;
        let size = metrics
            .label_size(text)
            .add_padding(Insets::new(padding / 2.0, padding, padding / 2.0, padding));
        Self {
            node,
            size,
            entry: size.height() / 2.0,
            children: Vec::new(),
        }
    }

    fn sequence(
        node: &'a DiagramNode,
        items: &'a [DiagramNode],
        metrics: &TextMetrics,
        spacing: Spacing,
    ) -> Self {
        let laid: Vec<LayoutNode<'a>> = items
            .iter()
            .map(|item| Self::new(item, metrics, spacing))
            .collect();

        let above = laid.iter().map(|child| child.entry).fold(0.0, f32::max);
        let below = laid
            .iter()
            .map(|child| child.size.height() - child.entry)
            .fold(0.0, f32::max);

        let gaps = laid.len().saturating_sub(1) as f32 * spacing.horizontal_gap;
        let mut row = Size::new(gaps, 0.0);
        let mut x = 0.0;
        let mut children = Vec::with_capacity(laid.len());
        for child in laid {
            let offset = Point::new(x, above - child.entry);
            x += child.size.width() + spacing.horizontal_gap;
            row = row.merge_horizontal(child.size);
            children.push((offset, child));
        }

        Self {
            node,
            size: Size::new(row.width(), above + below),
            entry: above,
            children,
        }
    }

    fn choice(
        node: &'a DiagramNode,
        default: usize,
        alternatives: &'a [DiagramNode],
        metrics: &TextMetrics,
        spacing: Spacing,
    ) -> Self {
        let rail = spacing.rail();
        let default = default.min(alternatives.len().saturating_sub(1));

        let gaps = alternatives.len().saturating_sub(1) as f32 * spacing.vertical_gap;
        let mut stack = Size::new(0.0, gaps);
        let mut y = 0.0;
        let mut entry = 0.0;
        let mut children = Vec::with_capacity(alternatives.len());
        for (idx, alternative) in alternatives.iter().enumerate() {
            let child = Self::new(alternative, metrics, spacing);
            if idx == default {
                entry = y + child.entry;
            }
            stack = stack.merge_vertical(child.size);
            let offset = Point::new(rail, y);
            y += child.size.height() + spacing.vertical_gap;
            children.push((offset, child));
        }

        Self {
            node,
            size: Size::new(stack.width() + rail * 2.0, stack.height()),
            entry,
            children,
        }
    }

    /// One child on the main line, with a bypass above and/or a loop below.
    fn wrapped(
        node: &'a DiagramNode,
        child: LayoutNode<'a>,
        spacing: Spacing,
        bypass: bool,
        repeat: bool,
    ) -> Self {
        let rail = spacing.rail();
        let top = if bypass { spacing.vertical_gap } else { 0.0 };
        let bottom = if repeat { spacing.vertical_gap } else { 0.0 };

        let size = Size::new(
            child.size.width() + rail * 2.0,
            top + child.size.height() + bottom,
        );
        Self {
            node,
            size,
            entry: top + child.entry,
            children: vec![(Point::new(rail, top), child)],
        }
    }

    pub fn node(&self) -> &'a DiagramNode {
        self.node
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Height of the main line, measured from the top of the box.
    pub fn entry(&self) -> f32 {
        self.entry
    }

    /// Children with their offsets from this node's top-left corner.
    pub fn children(&self) -> &[(Point, LayoutNode<'a>)] {
        &self.children
    }
}
