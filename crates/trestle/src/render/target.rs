//! Output targets of a render pass.

use log::debug;

use trestle_core::identifier::Id;

/// Binds a production to an output location (element id, slot name, file stem).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTarget {
    production: Id,
    location: String,
}

impl RenderTarget {
    pub fn new(production: impl Into<Id>, location: impl Into<String>) -> Self {
        Self {
            production: production.into(),
            location: location.into(),
        }
    }

    /// Targets the anchor derived from the production name.
    ///
    /// Underscores become dashes, so `dotted_expr` renders into `dotted-expr`.
    ///
    /// ```
    /// # use trestle::render::RenderTarget;
    /// let target = RenderTarget::anchored("obj_msg_def");
    /// assert_eq!(target.location(), "obj-msg-def");
    /// ```
    pub fn anchored(production: impl Into<Id>) -> Self {
        let production = production.into();
        let location = production.to_string().replace('_', "-");
        Self {
            production,
            location,
        }
    }

    pub fn production(&self) -> Id {
        self.production
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Ordered set of render targets. Several targets may share a production.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    targets: Vec<RenderTarget>,
}

impl Targets {
    pub fn new() -> Self {
        Self::default()
    }

    /// One anchored target per name, in the given order.
    pub fn anchored<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Id>,
    {
        names.into_iter().map(RenderTarget::anchored).collect()
    }

    pub fn push(&mut self, target: RenderTarget) {
        debug!(
            production:% = target.production(),
            location = target.location();
            "Registered render target"
        );
        self.targets.push(target);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, target: RenderTarget) -> Self {
        self.push(target);
        self
    }

    /// Location of the first target registered for `production`.
    pub fn link_for(&self, production: Id) -> Option<&str> {
        self.targets
            .iter()
            .find(|target| target.production() == production)
            .map(RenderTarget::location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderTarget> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<RenderTarget> for Targets {
    fn from_iter<T: IntoIterator<Item = RenderTarget>>(iter: T) -> Self {
        let mut targets = Targets::new();
        for target in iter {
            targets.push(target);
        }
        targets
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a RenderTarget;
    type IntoIter = std::slice::Iter<'a, RenderTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_replaces_underscores() {
        let target = RenderTarget::anchored("object_field_init");
        assert_eq!(target.production(), "object_field_init");
        assert_eq!(target.location(), "object-field-init");
    }

    #[test]
    fn test_link_for_uses_first_target() {
        let targets = Targets::new()
            .with(RenderTarget::new("expr", "expr-main"))
            .with(RenderTarget::new("expr", "expr-appendix"))
            .with(RenderTarget::anchored("statement"));

        assert_eq!(targets.link_for(Id::new("expr")), Some("expr-main"));
        assert_eq!(targets.link_for(Id::new("statement")), Some("statement"));
        assert_eq!(targets.link_for(Id::new("decl")), None);
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn test_anchored_collection_keeps_order() {
        let targets = Targets::anchored(["msg_sel", "decl"]);
        let locations: Vec<&str> = targets.iter().map(RenderTarget::location).collect();
        assert_eq!(locations, ["msg-sel", "decl"]);
    }
}
