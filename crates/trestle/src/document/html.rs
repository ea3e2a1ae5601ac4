use indexmap::{IndexMap, map::Entry};
use log::{debug, warn};

use super::{Document, DocumentError};
use crate::backend::{Artifact, ArtifactFormat};

/// An HTML page whose elements with an `id` attribute are target locations.
///
/// Bound artifacts are appended as the last children of their elements when
/// the page is [rendered](HtmlDocument::render); the template itself is never
/// modified. Void elements such as `<img>` cannot hold an artifact and are
/// not locations.
///
/// ```
/// # use trestle::document::{Document, HtmlDocument};
/// let page = HtmlDocument::new(r#"<h2>Tokens</h2><div id="digit"></div><br/>"#);
/// assert!(page.contains("digit"));
/// assert!(!page.contains("integer"));
/// ```
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    template: String,
    anchors: IndexMap<String, usize>,
    bound: IndexMap<String, String>,
}

impl HtmlDocument {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let tags = scan_tags(&template);
        let mut anchors = IndexMap::new();
        for (idx, tag) in tags.iter().enumerate() {
            let Some(id) = &tag.id else {
                continue;
            };
            match anchors.entry(id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(content_end(&tags, idx));
                }
                Entry::Occupied(entry) => {
                    warn!(id = entry.key().as_str(); "Duplicate id in HTML template, keeping the first");
                }
            }
        }
        debug!(anchors = anchors.len(); "HTML template scanned");
        Self {
            template,
            anchors,
            bound: IndexMap::new(),
        }
    }

    /// The `id`s of the page, in document order.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.anchors.keys().map(String::as_str)
    }

    /// Returns the page with every bound artifact inserted.
    pub fn render(&self) -> String {
        let mut insertions: Vec<(usize, &str)> = self
            .bound
            .iter()
            .filter_map(|(location, html)| Some((*self.anchors.get(location)?, html.as_str())))
            .collect();
        insertions.sort_by_key(|(position, _)| *position);

        let extra: usize = insertions.iter().map(|(_, html)| html.len()).sum();
        let mut page = String::with_capacity(self.template.len() + extra);
        let mut cursor = 0;
        for (position, html) in insertions {
            page.push_str(&self.template[cursor..position]);
            page.push_str(html);
            cursor = position;
        }
        page.push_str(&self.template[cursor..]);
        page
    }
}

impl Document for HtmlDocument {
    fn contains(&self, location: &str) -> bool {
        self.anchors.contains_key(location)
    }

    fn bind(&mut self, location: &str, artifact: &Artifact) -> Result<(), DocumentError> {
        if self.bound.contains_key(location) {
            return Err(DocumentError::AlreadyBound {
                location: location.to_string(),
            });
        }
        let html = match artifact.format() {
            ArtifactFormat::Svg => artifact.content().to_string(),
            ArtifactFormat::Text => format!("<code>{}</code>", escape(artifact.content())),
        };
        self.bound.insert(location.to_string(), html);
        Ok(())
    }
}

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// An opening or closing tag spanning `start..end` of the page.
#[derive(Debug, PartialEq, Eq)]
struct Tag {
    name: String,
    closing: bool,
    id: Option<String>,
    start: usize,
    end: usize,
}

/// Opening tags that can hold content, and closing tags, in page order.
///
/// Comments, doctypes, void elements and self-closing tags are skipped.
fn scan_tags(html: &str) -> Vec<Tag> {
    let bytes = html.as_bytes();
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let tag_start = pos + offset;
        let start = tag_start + 1;
        if html[start..].starts_with("!--") {
            pos = match html[start..].find("-->") {
                Some(end) => start + end + 3,
                None => html.len(),
            };
            continue;
        }

        let mut quote = None;
        let mut end = None;
        for (idx, &byte) in bytes.iter().enumerate().skip(start) {
            match (quote, byte) {
                (Some(q), b) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(byte),
                (None, b'>') => {
                    end = Some(idx);
                    break;
                }
                (None, _) => {}
            }
        }
        let Some(end) = end else {
            break;
        };
        pos = end + 1;

        let inner = &html[start..end];
        let (closing, body) = match inner.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, inner),
        };
        if !body
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic())
        {
            continue;
        }
        let name = body
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !closing && (body.trim_end().ends_with('/') || VOID_ELEMENTS.contains(&name.as_str())) {
            continue;
        }
        tags.push(Tag {
            id: (!closing).then(|| attribute(body, "id")).flatten(),
            name,
            closing,
            start: tag_start,
            end: pos,
        });
    }
    tags
}

/// Byte offset where content appended to the element opened by `tags[open]`
/// goes: the start of its closing tag, or just past the opening tag when the
/// element is never closed.
fn content_end(tags: &[Tag], open: usize) -> usize {
    let opening = &tags[open];
    let mut depth = 0usize;
    for tag in &tags[open + 1..] {
        if tag.name != opening.name {
            continue;
        }
        if !tag.closing {
            depth += 1;
        } else if depth == 0 {
            return tag.start;
        } else {
            depth -= 1;
        }
    }
    opening.end
}

/// Value of attribute `name` in the inside of a tag, `div id="x"` say.
fn attribute(inner: &str, name: &str) -> Option<String> {
    let mut rest = inner.trim_start_matches(|c: char| !c.is_whitespace());
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return None;
        }
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let (attr, after) = rest.split_at(name_end);
        let after = after.trim_start();

        let (value, remainder) = match after.strip_prefix('=') {
            Some(value) => {
                let value = value.trim_start();
                match value.chars().next() {
                    Some(q @ ('"' | '\'')) => {
                        let body = &value[1..];
                        let close = body.find(q).unwrap_or(body.len());
                        (&body[..close], body.get(close + 1..).unwrap_or_default())
                    }
                    _ => {
                        let close = value.find(char::is_whitespace).unwrap_or(value.len());
                        value.split_at(close)
                    }
                }
            }
            None if attr.is_empty() => ("", after.get(1..).unwrap_or_default()),
            None => ("", after),
        };

        if attr.eq_ignore_ascii_case(name) {
            return Some(value.to_string());
        }
        rest = remainder;
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
