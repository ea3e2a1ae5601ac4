//! SVG railroad diagrams.
//!
//! Each [`DiagramNode`] becomes a `<g>` element whose `class` is the node
//! kind (`terminal`, `non-terminal`, `sequence`, `choice`, `optional`,
//! `zero-or-more`, `one-or-more`). Child nodes are direct child groups in
//! drawing order; rails and loops are `<path class="connector">` elements
//! next to them.
//!
//! ```
//! # use trestle::{backend::{Backend, SvgBackend}, render::{LinkTable, Targets}};
//! # use trestle::{diagram::DiagramNode, identifier::Id};
//! let backend = SvgBackend::default();
//! let targets = Targets::anchored(["digit"]);
//! let links = LinkTable::new(&targets, "#");
//!
//! let node = DiagramNode::OneOrMore(Box::new(DiagramNode::Ref(Id::new("digit"))));
//! let artifact = backend.draw(Id::new("digits"), &node, &links).unwrap();
//!
//! assert!(artifact.content().contains("<svg"));
//! assert!(artifact.content().contains("#digit"));
//! ```

mod layout;
mod text;

use log::trace;
use svg::{
    Document,
    node::element::{self as svg_element, Anchor, Group, Path, Rectangle, path::Data},
};

use trestle_core::{diagram::DiagramNode, geometry::Point, identifier::Id};

use self::{
    layout::{LayoutNode, Spacing},
    text::TextMetrics,
};
use super::{Artifact, ArtifactFormat, Backend, BackendError};
use crate::{
    config::{AppConfig, LayoutConfig, StyleConfig},
    render::{Link, LinkTable},
};

/// Height of the start and end bars, in pixels.
const MARKER_HEIGHT: f32 = 16.0;
/// Corner radius of terminal boxes.
const TERMINAL_RADIUS: f32 = 10.0;

/// Resolved colors and stroke settings.
#[derive(Debug, Clone)]
struct SvgStyle {
    background: Option<String>,
    line: String,
    terminal_fill: String,
    non_terminal_fill: String,
    text: String,
    link: String,
    font_family: String,
    font_size: u16,
    line_width: f32,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            background: None,
            line: "black".to_string(),
            terminal_fill: "lightyellow".to_string(),
            non_terminal_fill: "white".to_string(),
            text: "black".to_string(),
            link: "navy".to_string(),
            font_family: "monospace".to_string(),
            font_size: 14,
            line_width: 2.0,
        }
    }
}

impl SvgStyle {
    fn from_config(style: &StyleConfig) -> Result<Self, String> {
        Ok(Self {
            background: style.background_color()?.map(|color| color.to_string()),
            line: style.line_color()?.to_string(),
            terminal_fill: style.terminal_fill()?.to_string(),
            non_terminal_fill: style.non_terminal_fill()?.to_string(),
            text: style.text_color()?.to_string(),
            link: style.link_color()?.to_string(),
            font_family: style.font_family().to_string(),
            font_size: style.font_size(),
            line_width: style.line_width(),
        })
    }
}

/// Draws railroad diagrams as standalone SVG documents.
#[derive(Debug, Clone)]
pub struct SvgBackend {
    style: SvgStyle,
    metrics: TextMetrics,
    spacing: Spacing,
    padding: f32,
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::with_style(SvgStyle::default(), &LayoutConfig::default())
    }
}

impl SvgBackend {
    /// Creates a backend from the style and layout sections of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Style`] if a configured color is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        let style = SvgStyle::from_config(config.style()).map_err(BackendError::Style)?;
        Ok(Self::with_style(style, config.layout()))
    }

    fn with_style(style: SvgStyle, layout: &LayoutConfig) -> Self {
        let metrics = TextMetrics::new(layout.text_measure(), &style.font_family, style.font_size);
        Self {
            style,
            metrics,
            spacing: Spacing {
                horizontal_gap: layout.horizontal_gap(),
                vertical_gap: layout.vertical_gap(),
                label_padding: layout.label_padding(),
            },
            padding: layout.padding(),
        }
    }

    fn connector(&self, data: Data) -> Path {
        Path::new()
            .set("class", "connector")
            .set("d", data)
            .set("fill", "none")
            .set("stroke", self.style.line.as_str())
            .set("stroke-width", self.style.line_width)
    }

    fn label(&self, text: &str, center: Point, color: &str) -> svg_element::Text {
        svg_element::Text::new(text)
            .set("x", center.x())
            .set("y", center.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.style.font_family.as_str())
            .set("font-size", self.style.font_size)
            .set("fill", color)
    }

    fn draw_box(&self, layout: &LayoutNode<'_>, origin: Point, fill: &str, radius: f32) -> Rectangle {
        Rectangle::new()
            .set("x", origin.x())
            .set("y", origin.y())
            .set("width", layout.size().width())
            .set("height", layout.size().height())
            .set("rx", radius)
            .set("fill", fill)
            .set("stroke", self.style.line.as_str())
            .set("stroke-width", self.style.line_width)
    }

    /// Draws `layout` with its top-left corner at `origin`.
    fn draw_node(&self, layout: &LayoutNode<'_>, origin: Point, links: &LinkTable<'_>) -> Group {
        let group = Group::new().set("class", layout.node().kind());
        let size = layout.size();
        let entry_y = origin.y() + layout.entry();
        let center = Point::new(origin.x() + size.width() / 2.0, entry_y);
        let rail = self.spacing.rail();

        match layout.node() {
            DiagramNode::Literal(text) => group
                .add(self.draw_box(layout, origin, &self.style.terminal_fill, TERMINAL_RADIUS))
                .add(self.label(text, center, &self.style.text)),
            DiagramNode::Ref(name) => {
                let rect = self.draw_box(layout, origin, &self.style.non_terminal_fill, 0.0);
                let label = name.to_string();
                match links.resolve(*name) {
                    Link::Href(href) => group.add(
                        Anchor::new()
                            .set("href", href)
                            .add(rect)
                            .add(self.label(&label, center, &self.style.link)),
                    ),
                    Link::Plain => group
                        .add(rect)
                        .add(self.label(&label, center, &self.style.text)),
                }
            }
            DiagramNode::Sequence(_) => {
                let mut group = group;
                let mut previous_end: Option<f32> = None;
                for (offset, child) in layout.children() {
                    let child_origin = origin.add_point(*offset);
                    if let Some(end) = previous_end {
                        group = group.add(self.connector(
                            Data::new()
                                .move_to((end, entry_y))
                                .horizontal_line_to(child_origin.x()),
                        ));
                    }
                    group = group.add(self.draw_node(child, child_origin, links));
                    previous_end = Some(child_origin.x() + child.size().width());
                }
                group
            }
            DiagramNode::Choice { .. } => {
                let mut group = group;
                let left = origin.x();
                let right = origin.x() + size.width();
                for (offset, child) in layout.children() {
                    let child_origin = origin.add_point(*offset);
                    let branch_y = child_origin.y() + child.entry();
                    let child_end = child_origin.x() + child.size().width();
                    group = group
                        .add(self.connector(
                            Data::new()
                                .move_to((left, entry_y))
                                .horizontal_line_to(left + rail / 2.0)
                                .vertical_line_to(branch_y)
                                .horizontal_line_to(child_origin.x()),
                        ))
                        .add(self.connector(
                            Data::new()
                                .move_to((child_end, branch_y))
                                .horizontal_line_to(right - rail / 2.0)
                                .vertical_line_to(entry_y)
                                .horizontal_line_to(right),
                        ))
                        .add(self.draw_node(child, child_origin, links));
                }
                group
            }
            DiagramNode::Optional(_) | DiagramNode::ZeroOrMore(_) | DiagramNode::OneOrMore(_) => {
                let Some((offset, child)) = layout.children().first() else {
                    return group;
                };
                let child_origin = origin.add_point(*offset);
                let child_end = child_origin.x() + child.size().width();
                let left = origin.x();
                let right = origin.x() + size.width();

                let mut group = group
                    .add(self.connector(
                        Data::new()
                            .move_to((left, entry_y))
                            .horizontal_line_to(child_origin.x()),
                    ))
                    .add(self.connector(
                        Data::new()
                            .move_to((child_end, entry_y))
                            .horizontal_line_to(right),
                    ));

                let bypass = matches!(
                    layout.node(),
                    DiagramNode::Optional(_) | DiagramNode::ZeroOrMore(_)
                );
                let repeat = matches!(
                    layout.node(),
                    DiagramNode::OneOrMore(_) | DiagramNode::ZeroOrMore(_)
                );
                if bypass {
                    let top = origin.y() + self.spacing.vertical_gap / 2.0;
                    group = group.add(self.connector(
                        Data::new()
                            .move_to((left + rail / 2.0, entry_y))
                            .vertical_line_to(top)
                            .horizontal_line_to(right - rail / 2.0)
                            .vertical_line_to(entry_y),
                    ));
                }
                if repeat {
                    let bottom = child_origin.y()
                        + child.size().height()
                        + self.spacing.vertical_gap / 2.0;
                    group = group.add(self.connector(
                        Data::new()
                            .move_to((right - rail / 2.0, entry_y))
                            .vertical_line_to(bottom)
                            .horizontal_line_to(left + rail / 2.0)
                            .vertical_line_to(entry_y),
                    ));
                }
                group.add(self.draw_node(child, child_origin, links))
            }
        }
    }
}

impl Backend for SvgBackend {
    fn format(&self) -> ArtifactFormat {
        ArtifactFormat::Svg
    }

    fn draw(
        &self,
        production: Id,
        node: &DiagramNode,
        links: &LinkTable<'_>,
    ) -> Result<Artifact, BackendError> {
        let layout = LayoutNode::new(node, &self.metrics, self.spacing);
        let lead = self.spacing.rail();
        let padding = self.padding;

        let width = padding * 2.0 + lead * 2.0 + layout.size().width();
        let height = padding * 2.0 + layout.size().height();
        let entry_y = padding + layout.entry();
        let start = padding;
        let end = width - padding;
        let half_marker = MARKER_HEIGHT / 2.0;

        let mut document = Document::new()
            .set("class", "railroad-diagram")
            .set("data-production", production.to_string())
            .set("width", width)
            .set("height", height)
            .set("viewBox", format!("0 0 {width} {height}"));

        if let Some(background) = &self.style.background {
            document = document.add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", background.as_str()),
            );
        }

        let markers = Data::new()
            .move_to((start, entry_y - half_marker))
            .vertical_line_by(MARKER_HEIGHT)
            .move_to((end, entry_y - half_marker))
            .vertical_line_by(MARKER_HEIGHT)
            .move_to((start, entry_y))
            .horizontal_line_to(start + lead)
            .move_to((end - lead, entry_y))
            .horizontal_line_to(end);

        let root = self.draw_node(&layout, Point::new(start + lead, padding), links);
        document = document.add(self.connector(markers)).add(root);

        trace!(production:% = production, width, height; "Drew SVG diagram");
        Ok(Artifact::new(production, ArtifactFormat::Svg, document.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        config::{RenderConfig, StyleConfig, TextMeasure},
        render::{RenderTarget, Targets},
    };

    fn backend() -> SvgBackend {
        let config = AppConfig::new(
            StyleConfig::default(),
            LayoutConfig::default().with_text_measure(TextMeasure::Estimate),
            RenderConfig::default(),
        );
        SvgBackend::from_config(&config).unwrap()
    }

    fn lit(text: &str) -> DiagramNode {
        DiagramNode::Literal(text.to_string())
    }

    /// Classes of the direct child groups of the first group with `class`.
    fn child_group_classes(svg: &str, class: &str) -> Vec<String> {
        let mut depth = 0usize;
        let mut target_depth = None;
        let mut classes = Vec::new();

        for tag in svg.split('<').skip(1) {
            let tag = tag.split('>').next().unwrap_or_default();
            if tag.starts_with("/g") {
                if target_depth == Some(depth) {
                    break;
                }
                depth -= 1;
                continue;
            }
            if !(tag.starts_with("g ") || tag == "g") || tag.ends_with('/') {
                continue;
            }
            depth += 1;
            let tag_class = tag
                .split("class=\"")
                .nth(1)
                .and_then(|rest| rest.split('"').next())
                .unwrap_or_default()
                .to_string();
            match target_depth {
                None if tag_class == class => target_depth = Some(depth),
                Some(parent) if depth == parent + 1 => classes.push(tag_class),
                _ => {}
            }
        }
        classes
    }

    #[test]
    fn test_sequence_children_in_order() {
        let node = DiagramNode::Sequence(vec![
            DiagramNode::Optional(Box::new(lit("'-'"))),
            DiagramNode::OneOrMore(Box::new(DiagramNode::Ref(Id::new("digit")))),
            lit("'.'"),
        ]);
        let targets = Targets::new();
        let links = LinkTable::new(&targets, "#");

        let artifact = backend().draw(Id::new("double"), &node, &links).unwrap();

        assert_eq!(artifact.format(), ArtifactFormat::Svg);
        assert_eq!(
            child_group_classes(artifact.content(), "sequence"),
            ["optional", "one-or-more", "terminal"]
        );
    }

    #[test]
    fn test_resolved_reference_is_link() {
        let node = DiagramNode::Ref(Id::new("dotted_expr"));
        let targets = Targets::new().with(RenderTarget::anchored("dotted_expr"));
        let links = LinkTable::new(&targets, "#");

        let svg = backend()
            .draw(Id::new("affect"), &node, &links)
            .unwrap()
            .content()
            .to_string();

        assert!(svg.contains("<a"));
        assert!(svg.contains("href=\"#dotted-expr\""));
        assert!(svg.contains("dotted_expr"));
    }

    #[test]
    fn test_unresolved_reference_is_plain_label() {
        let node = DiagramNode::Ref(Id::new("expr"));
        let targets = Targets::new();
        let links = LinkTable::new(&targets, "#");

        let svg = backend()
            .draw(Id::new("decl"), &node, &links)
            .unwrap()
            .content()
            .to_string();

        assert!(!svg.contains("<a"));
        assert!(!svg.contains("href"));
        assert!(svg.contains("expr"));
    }

    #[test]
    fn test_choice_draws_every_alternative() {
        let node = DiagramNode::Choice {
            default: 1,
            alternatives: vec![lit("'0'"), lit("'1'"), lit("..."), lit("'9'")],
        };
        let targets = Targets::new();
        let links = LinkTable::new(&targets, "#");

        let svg = backend().draw(Id::new("digit"), &node, &links).unwrap();
        assert_eq!(child_group_classes(svg.content(), "choice").len(), 4);
    }

    #[test]
    fn test_document_attributes_and_background() {
        let config = AppConfig::from_toml_str(
            r#"
            [style]
            background_color = "white"

            [layout]
            text_measure = "estimate"
            "#,
        )
        .unwrap();
        let backend = SvgBackend::from_config(&config).unwrap();
        let targets = Targets::new();
        let links = LinkTable::new(&targets, "#");

        let svg = backend.draw(Id::new("letter"), &lit("'a'..'z'"), &links).unwrap();
        let content = svg.content();

        assert!(content.contains("data-production=\"letter\""));
        assert!(content.contains("viewBox"));
        assert!(content.contains("width=\"100%\""));
        assert!(content.contains("</svg>"));
    }

    fn leaf_strategy() -> impl Strategy<Value = DiagramNode> {
        prop_oneof![
            "[a-z]{1,5}".prop_map(DiagramNode::Literal),
            "[a-z]{1,5}".prop_map(|name| DiagramNode::Ref(Id::new(&name))),
            "[a-z]{1,5}".prop_map(|text| DiagramNode::Optional(Box::new(DiagramNode::Literal(text)))),
        ]
    }

    /// A sequence of n children renders exactly n child groups, in order.
    fn check_sequence_renders_n_children(children: Vec<DiagramNode>) -> Result<(), TestCaseError> {
        let expected: Vec<&str> = children.iter().map(DiagramNode::kind).collect();
        let node = DiagramNode::Sequence(children);
        let targets = Targets::new();
        let links = LinkTable::new(&targets, "#");

        let artifact = backend()
            .draw(Id::new("generated"), &node, &links)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(child_group_classes(artifact.content(), "sequence"), expected);
        Ok(())
    }

    proptest! {
        #[test]
        fn sequence_renders_n_children(children in prop::collection::vec(leaf_strategy(), 1..8)) {
            check_sequence_renders_n_children(children)?;
        }
    }
}
