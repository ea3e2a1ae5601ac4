use indexmap::IndexMap;

use super::{Document, DocumentError};
use crate::backend::Artifact;

/// A document made of declared, initially empty slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    slots: IndexMap<String, Option<String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an empty slot named `location`.
    pub fn with_slot(mut self, location: impl Into<String>) -> Self {
        self.slots.insert(location.into(), None);
        self
    }

    /// The content bound to `location`, if any.
    pub fn get(&self, location: &str) -> Option<&str> {
        self.slots.get(location)?.as_deref()
    }

    /// Bound slots with their content, in declaration order.
    pub fn bound(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .filter_map(|(location, content)| Some((location.as_str(), content.as_deref()?)))
    }
}

impl Document for MemoryDocument {
    fn contains(&self, location: &str) -> bool {
        self.slots.contains_key(location)
    }

    fn bind(&mut self, location: &str, artifact: &Artifact) -> Result<(), DocumentError> {
        match self.slots.get_mut(location) {
            Some(Some(_)) => Err(DocumentError::AlreadyBound {
                location: location.to_string(),
            }),
            Some(slot) => {
                *slot = Some(artifact.content().to_string());
                Ok(())
            }
            None => {
                self.slots
                    .insert(location.to_string(), Some(artifact.content().to_string()));
                Ok(())
            }
        }
    }
}
