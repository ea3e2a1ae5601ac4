//! The render adapter.
//!
//! A [`Renderer`] takes built diagrams, resolves their references against
//! the registered [`Targets`], hands each tree to a [`Backend`] and collects
//! the artifacts into a [`Rendered`] set. Attaching that set to a
//! [`Document`] completes the pass and yields a [`RunReport`].
//!
//! Missing productions abort the pass. Unresolved references and failed
//! attachments do not; they are reported instead.

mod link;
mod report;
mod target;

pub use link::{Link, LinkTable};
pub use report::{AttachFailure, RunReport, UnresolvedReference};
pub use target::{RenderTarget, Targets};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, trace, warn};

use trestle_core::{diagram::DiagramNode, error::GrammarError, identifier::Id};

use crate::{
    TrestleError,
    backend::{Artifact, Backend},
    build::BuiltDiagrams,
    document::Document,
};

/// Draws diagrams with one backend against one set of targets.
pub struct Renderer<'a> {
    backend: &'a dyn Backend,
    links: LinkTable<'a>,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer whose links point at `targets`.
    ///
    /// `link_prefix` is prepended to each target location, `#` for anchors
    /// within one page.
    pub fn new(backend: &'a dyn Backend, targets: &'a Targets, link_prefix: &'a str) -> Self {
        Self {
            backend,
            links: LinkTable::new(targets, link_prefix),
        }
    }

    pub fn links(&self) -> &LinkTable<'a> {
        &self.links
    }

    /// Draws a single diagram.
    ///
    /// # Errors
    ///
    /// Returns [`TrestleError::Backend`] if the backend fails.
    pub fn render(&self, production: Id, node: &DiagramNode) -> Result<Artifact, TrestleError> {
        trace!(production:% = production, node:? = node; "Rendering diagram");
        Ok(self.backend.draw(production, node, &self.links)?)
    }

    /// The references in `node` that have no render target, in order of first
    /// appearance.
    pub fn unresolved(&self, production: Id, node: &DiagramNode) -> Vec<UnresolvedReference> {
        node.references()
            .into_iter()
            .filter(|name| !self.links.is_resolved(*name))
            .collect::<IndexSet<Id>>()
            .into_iter()
            .map(|name| UnresolvedReference::new(production, name))
            .collect()
    }

    /// Draws the production of every target.
    ///
    /// Each production is drawn once, however many targets it has.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownProduction`] if a target names a
    /// production that was not built, or [`TrestleError::Backend`] if drawing
    /// fails.
    pub fn render_all(
        &self,
        diagrams: &BuiltDiagrams,
        targets: &Targets,
    ) -> Result<Rendered, TrestleError> {
        let mut artifacts: IndexMap<Id, Artifact> = IndexMap::new();
        let mut unresolved = Vec::new();

        for target in targets {
            let production = target.production();
            if artifacts.contains_key(&production) {
                continue;
            }
            let built = diagrams
                .get(production)
                .ok_or(GrammarError::UnknownProduction { name: production })?;

            for reference in self.unresolved(production, built.node()) {
                warn!(
                    production:% = reference.production(),
                    name:% = reference.name();
                    "Reference has no render target, drawing it as plain text"
                );
                unresolved.push(reference);
            }

            let artifact = self.render(production, built.node())?;
            debug!(production:% = production, format:? = artifact.format(); "Diagram rendered");
            artifacts.insert(production, artifact);
        }

        info!(
            artifacts = artifacts.len(),
            targets = targets.len(),
            unresolved = unresolved.len();
            "Render pass complete"
        );
        Ok(Rendered {
            targets: targets.iter().cloned().collect(),
            artifacts,
            unresolved,
        })
    }
}

/// Artifacts of a render pass, waiting to be attached.
#[derive(Debug)]
pub struct Rendered {
    targets: Vec<RenderTarget>,
    artifacts: IndexMap<Id, Artifact>,
    unresolved: Vec<UnresolvedReference>,
}

impl Rendered {
    /// The artifact drawn for `production`, if any target named it.
    pub fn artifact(&self, production: impl Into<Id>) -> Option<&Artifact> {
        self.artifacts.get(&production.into())
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// Binds every target's artifact into `document`.
    ///
    /// A failing target is recorded in the report and the remaining targets
    /// are still attached.
    pub fn attach(self, document: &mut dyn Document) -> RunReport {
        let mut report = RunReport::new(self.unresolved);

        for target in self.targets {
            let Some(artifact) = self.artifacts.get(&target.production()) else {
                continue;
            };
            match artifact.attach_to(document, target.location()) {
                Ok(()) => report.record_attached(target),
                Err(err) => {
                    warn!(
                        production:% = target.production(),
                        location = target.location(),
                        code = err.code();
                        "Failed to attach artifact: {err}"
                    );
                    report.record_failure(AttachFailure::new(target, err));
                }
            }
        }

        info!(
            attached = report.attached().len(),
            failed = report.failures().len();
            "Attach pass complete"
        );
        report
    }
}
