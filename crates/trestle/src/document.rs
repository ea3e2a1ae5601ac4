//! Output documents that receive rendered artifacts.
//!
//! A [`Document`] exposes named locations. A render pass checks that a
//! location exists when it attaches, so targets may name locations the
//! document lacks; those fail individually.

mod directory;
mod html;
mod memory;

pub use directory::DirectoryDocument;
pub use html::HtmlDocument;
pub use memory::MemoryDocument;

use std::io;

use thiserror::Error;

use crate::backend::Artifact;

/// Errors raised while binding an artifact into a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("location `{location}` is already bound")]
    AlreadyBound { location: String },
}

/// A document with named output locations.
pub trait Document {
    /// Returns `true` if `location` exists in this document.
    fn contains(&self, location: &str) -> bool;

    /// Places `artifact` at `location`.
    ///
    /// Callers check [`Document::contains`] first.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the location is already bound or the
    /// artifact cannot be written.
    fn bind(&mut self, location: &str, artifact: &Artifact) -> Result<(), DocumentError>;
}
