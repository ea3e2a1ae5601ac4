//! Outcome of a render pass.

use std::fmt;

use trestle_core::identifier::Id;

use super::RenderTarget;
use crate::TrestleError;

/// A `Ref` whose production has no render target; drawn as a plain label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnresolvedReference {
    production: Id,
    name: Id,
}

impl UnresolvedReference {
    pub fn new(production: Id, name: Id) -> Self {
        Self { production, name }
    }

    /// The production whose diagram contains the reference.
    pub fn production(&self) -> Id {
        self.production
    }

    /// The referenced name.
    pub fn name(&self) -> Id {
        self.name
    }
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` references `{}`, which has no render target",
            self.production, self.name
        )
    }
}

/// A target that could not be attached.
#[derive(Debug)]
pub struct AttachFailure {
    target: RenderTarget,
    error: TrestleError,
}

impl AttachFailure {
    pub fn new(target: RenderTarget, error: TrestleError) -> Self {
        Self { target, error }
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn error(&self) -> &TrestleError {
        &self.error
    }
}

/// What a completed pass attached, what failed, and what degraded.
#[derive(Debug, Default)]
pub struct RunReport {
    attached: Vec<RenderTarget>,
    failures: Vec<AttachFailure>,
    unresolved: Vec<UnresolvedReference>,
}

impl RunReport {
    pub(crate) fn new(unresolved: Vec<UnresolvedReference>) -> Self {
        Self {
            unresolved,
            ..Self::default()
        }
    }

    pub(crate) fn record_attached(&mut self, target: RenderTarget) {
        self.attached.push(target);
    }

    pub(crate) fn record_failure(&mut self, failure: AttachFailure) {
        self.failures.push(failure);
    }

    pub fn attached(&self) -> &[RenderTarget] {
        &self.attached
    }

    pub fn failures(&self) -> &[AttachFailure] {
        &self.failures
    }

    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// `true` when every target attached and every reference resolved.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.unresolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_display() {
        let unresolved = UnresolvedReference::new(Id::new("decl"), Id::new("expr"));
        assert_eq!(
            unresolved.to_string(),
            "`decl` references `expr`, which has no render target"
        );
    }

    #[test]
    fn test_is_clean() {
        let mut report = RunReport::new(Vec::new());
        report.record_attached(RenderTarget::anchored("decl"));
        assert!(report.is_clean());

        report.record_failure(AttachFailure::new(
            RenderTarget::anchored("expr"),
            TrestleError::UnknownTarget {
                location: "expr".to_string(),
            },
        ));
        assert!(!report.is_clean());
        assert_eq!(report.attached().len(), 1);
        assert_eq!(report.failures()[0].target().location(), "expr");
    }
}
