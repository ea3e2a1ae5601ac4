//! Resolution of non-terminal references into links.

use trestle_core::identifier::Id;

use super::Targets;

/// How a non-terminal box is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// The referenced production has a target; the box links to it.
    Href(String),
    /// No target is registered; the box is a plain label.
    Plain,
}

impl Link {
    pub fn href(&self) -> Option<&str> {
        match self {
            Link::Href(href) => Some(href),
            Link::Plain => None,
        }
    }
}

/// Maps production names to the link of their first render target.
#[derive(Debug, Clone)]
pub struct LinkTable<'a> {
    targets: &'a Targets,
    prefix: &'a str,
}

impl<'a> LinkTable<'a> {
    pub fn new(targets: &'a Targets, prefix: &'a str) -> Self {
        Self { targets, prefix }
    }

    pub fn resolve(&self, name: Id) -> Link {
        match self.targets.link_for(name) {
            Some(location) => Link::Href(format!("{}{location}", self.prefix)),
            None => Link::Plain,
        }
    }

    pub fn is_resolved(&self, name: Id) -> bool {
        self.targets.link_for(name).is_some()
    }
}
