//! Trestle - railroad syntax diagrams from an explicit grammar model.
//!
//! A [`Grammar`](grammar::Grammar) of productions is translated into
//! [`DiagramNode`](diagram::DiagramNode) trees, drawn by a pluggable
//! [`Backend`](backend::Backend) and attached to the named locations of a
//! [`Document`](document::Document).

pub mod backend;
pub mod build;
pub mod config;
pub mod description;
pub mod document;
pub mod render;

mod error;

pub use trestle_core::{color, diagram, geometry, grammar, identifier};

pub use error::TrestleError;

use log::{debug, info, trace};

use backend::Backend;
use build::{BuiltDiagrams, DiagramBuilder};
use config::AppConfig;
use document::Document;
use grammar::Grammar;
use render::{Renderer, RunReport, Targets};

/// Entry point for building and rendering railroad diagrams.
///
/// # Examples
///
/// ```rust
/// use trestle::{
///     Trestle,
///     document::HtmlDocument,
///     grammar::{Expr, Grammar},
///     render::Targets,
/// };
///
/// let mut builder = Grammar::builder();
/// builder
///     .define_token("digit", Expr::choice(0, ["'0'", "'1'"].map(Expr::terminal)))?
///     .define_token(
///         "integer",
///         Expr::sequence([
///             Expr::terminal("'-'").optional(),
///             Expr::non_terminal("digit").one_or_more(),
///         ]),
///     )?;
/// let grammar = builder.finish();
///
/// let mut page = HtmlDocument::new(r#"<div id="digit"></div><div id="integer"></div>"#);
/// let targets = Targets::anchored(["digit", "integer"]);
///
/// let report = Trestle::default().run(&grammar, &targets, &mut page)?;
/// assert!(report.is_clean());
/// assert!(page.render().contains(r##"href="#digit""##));
/// # Ok::<(), trestle::TrestleError>(())
/// ```
#[derive(Debug, Default)]
pub struct Trestle {
    config: AppConfig,
}

impl Trestle {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The diagram builder configured by the layout section.
    pub fn builder(&self) -> DiagramBuilder {
        DiagramBuilder::new().with_flatten_sequences(self.config.layout().flatten_sequences())
    }

    /// Builds the diagram of every production in `grammar`.
    ///
    /// # Errors
    ///
    /// Returns [`TrestleError::Grammar`] for the first malformed production.
    pub fn build(&self, grammar: &Grammar) -> Result<BuiltDiagrams, TrestleError> {
        let diagrams = self.builder().build_all(grammar)?;
        debug!(diagrams = diagrams.len(); "Diagrams built");
        Ok(diagrams)
    }

    /// The backend selected by the render section.
    ///
    /// # Errors
    ///
    /// Returns [`TrestleError::Backend`] if the style configuration is invalid.
    pub fn backend(&self) -> Result<Box<dyn Backend>, TrestleError> {
        Ok(backend::from_config(&self.config)?)
    }

    /// A renderer drawing with `backend` and linking into `targets`.
    pub fn renderer<'a>(&'a self, backend: &'a dyn Backend, targets: &'a Targets) -> Renderer<'a> {
        Renderer::new(backend, targets, self.config.render().link_prefix())
    }

    /// Builds, renders and attaches every target with the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a production is
    /// malformed, or a target names a production that does not exist. Failed
    /// attachments are reported in the [`RunReport`] instead.
    pub fn run(
        &self,
        grammar: &Grammar,
        targets: &Targets,
        document: &mut dyn Document,
    ) -> Result<RunReport, TrestleError> {
        let backend = self.backend()?;
        self.run_with(backend.as_ref(), grammar, targets, document)
    }

    /// Like [`Trestle::run`], drawing with `backend`.
    ///
    /// # Errors
    ///
    /// See [`Trestle::run`].
    pub fn run_with(
        &self,
        backend: &dyn Backend,
        grammar: &Grammar,
        targets: &Targets,
        document: &mut dyn Document,
    ) -> Result<RunReport, TrestleError> {
        info!(targets = targets.len(), format:? = backend.format(); "Starting render pass");
        let diagrams = self.build(grammar)?;
        trace!(diagrams:?; "Built diagrams");

        let rendered = self.renderer(backend, targets).render_all(&diagrams, targets)?;
        let report = rendered.attach(document);

        info!(
            attached = report.attached().len(),
            failed = report.failures().len(),
            unresolved = report.unresolved().len();
            "Render pass finished"
        );
        Ok(report)
    }
}
