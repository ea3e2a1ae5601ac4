//! Rendering backends.
//!
//! A [`Backend`] turns one [`DiagramNode`] tree into an [`Artifact`]. Every
//! backend matches the node variants exhaustively; references are drawn as
//! links or plain labels according to the [`LinkTable`] it is handed.
//!
//! - [`SvgBackend`] - railroad drawings built with the `svg` crate
//! - [`EbnfBackend`] - one-line EBNF notation

pub mod ebnf;
pub mod svg;

pub use self::{ebnf::EbnfBackend, svg::SvgBackend};

use std::fmt;

use log::debug;
use thiserror::Error;

use trestle_core::{diagram::DiagramNode, identifier::Id};

use crate::{
    TrestleError,
    config::{AppConfig, BackendKind},
    document::Document,
    render::LinkTable,
};

/// Errors raised by a backend while setting up or drawing.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid style: {0}")]
    Style(String),

    #[error("failed to format diagram: {0}")]
    Format(#[from] fmt::Error),
}

/// Output format of an [`Artifact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactFormat {
    Svg,
    Text,
}

impl ArtifactFormat {
    /// File extension used when an artifact is written to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Svg => "svg",
            ArtifactFormat::Text => "txt",
        }
    }
}

/// The rendered form of one production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    production: Id,
    format: ArtifactFormat,
    content: String,
}

impl Artifact {
    pub fn new(production: Id, format: ArtifactFormat, content: String) -> Self {
        Self {
            production,
            format,
            content,
        }
    }

    pub fn production(&self) -> Id {
        self.production
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Binds this artifact to `location` in `document`.
    ///
    /// # Errors
    ///
    /// Returns [`TrestleError::UnknownTarget`] if the document has no such
    /// location, or [`TrestleError::Document`] if binding itself fails.
    pub fn attach_to(&self, document: &mut dyn Document, location: &str) -> Result<(), TrestleError> {
        if !document.contains(location) {
            return Err(TrestleError::UnknownTarget {
                location: location.to_string(),
            });
        }
        document.bind(location, self)?;
        debug!(production:% = self.production, location; "Artifact attached");
        Ok(())
    }
}

/// Draws diagram trees into artifacts.
pub trait Backend {
    /// Format of the artifacts this backend produces.
    fn format(&self) -> ArtifactFormat;

    /// Draws the diagram of `production`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the drawing cannot be produced.
    fn draw(
        &self,
        production: Id,
        node: &DiagramNode,
        links: &LinkTable<'_>,
    ) -> Result<Artifact, BackendError>;
}

/// Creates the backend selected by `config`.
///
/// # Errors
///
/// Returns [`BackendError::Style`] if the style configuration is invalid.
pub fn from_config(config: &AppConfig) -> Result<Box<dyn Backend>, BackendError> {
    let backend: Box<dyn Backend> = match config.render().backend() {
        BackendKind::Svg => Box::new(SvgBackend::from_config(config)?),
        BackendKind::Ebnf => Box::new(EbnfBackend::from_config(config)),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{LayoutConfig, RenderConfig, StyleConfig},
        document::MemoryDocument,
    };

    #[test]
    fn test_attach_to_unknown_location() {
        let artifact = Artifact::new(Id::new("decl"), ArtifactFormat::Text, "decl ::= x".into());
        let mut document = MemoryDocument::new().with_slot("decl");

        let err = artifact.attach_to(&mut document, "affect").unwrap_err();
        assert!(matches!(err, TrestleError::UnknownTarget { location } if location == "affect"));

        artifact.attach_to(&mut document, "decl").unwrap();
        assert_eq!(document.get("decl"), Some("decl ::= x"));
    }

    #[test]
    fn test_from_config_selects_backend() {
        let ebnf = AppConfig::new(
            StyleConfig::default(),
            LayoutConfig::default(),
            RenderConfig::default().with_backend(BackendKind::Ebnf),
        );
        assert_eq!(from_config(&ebnf).unwrap().format(), ArtifactFormat::Text);
        assert_eq!(
            from_config(&AppConfig::default()).unwrap().format(),
            ArtifactFormat::Svg
        );
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ArtifactFormat::Svg.extension(), "svg");
        assert_eq!(ArtifactFormat::Text.extension(), "txt");
    }
}
