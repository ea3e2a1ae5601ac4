use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use log::info;

use super::{Document, DocumentError};
use crate::backend::Artifact;

/// Writes each artifact to its own file under a root directory.
///
/// A location is a relative path without extension; `railroad/digit` with an
/// SVG artifact is written to `<root>/railroad/digit.svg`. The location
/// exists when its parent directory does.
#[derive(Debug, Clone)]
pub struct DirectoryDocument {
    root: PathBuf,
}

impl DirectoryDocument {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file path for `location`, or `None` if it would leave the root.
    fn resolve(&self, location: &str) -> Option<PathBuf> {
        let relative = Path::new(location);
        let is_normal = relative.components().next().is_some()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        is_normal.then(|| self.root.join(relative))
    }

    /// Path the artifact for `location` is written to.
    pub fn path_for(&self, location: &str, artifact: &Artifact) -> Option<PathBuf> {
        let path = self.resolve(location)?;
        let mut file_name = path.file_name()?.to_os_string();
        file_name.push(".");
        file_name.push(artifact.format().extension());
        Some(path.with_file_name(file_name))
    }
}

impl Document for DirectoryDocument {
    fn contains(&self, location: &str) -> bool {
        self.resolve(location)
            .and_then(|path| path.parent().map(Path::is_dir))
            .unwrap_or(false)
    }

    fn bind(&mut self, location: &str, artifact: &Artifact) -> Result<(), DocumentError> {
        let Some(path) = self.path_for(location, artifact) else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("location `{location}` is not a relative path"),
            )
            .into());
        };
        if path.exists() {
            return Err(DocumentError::AlreadyBound {
                location: location.to_string(),
            });
        }
        fs::write(&path, artifact.content())?;
        info!(path:? = path; "Diagram written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use trestle_core::identifier::Id;

    use super::*;
    use crate::backend::ArtifactFormat;

    #[test]
    fn test_contains() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("tokens")).unwrap();
        let document = DirectoryDocument::new(dir.path());

        assert!(document.contains("digit"));
        assert!(document.contains("tokens/digit"));
        assert!(!document.contains("rules/decl"));
        assert!(!document.contains("../digit"));
        assert!(!document.contains(""));
    }

    #[test]
    fn test_bind_writes_file_with_extension() {
        let dir = tempdir().unwrap();
        let mut document = DirectoryDocument::new(dir.path());
        let artifact = Artifact::new(Id::new("digit"), ArtifactFormat::Svg, "<svg/>".to_string());

        document.bind("digit", &artifact).unwrap();
        let content = fs::read_to_string(dir.path().join("digit.svg")).unwrap();
        assert_eq!(content, "<svg/>");

        let err = document.bind("digit", &artifact).unwrap_err();
        assert!(matches!(err, DocumentError::AlreadyBound { .. }));
    }
}
