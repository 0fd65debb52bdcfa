//! Manifest sources.
//!
//! The platform shell hands the orchestrator either the manifest text
//! itself or a path to read it from (root-archive policy: path sources are
//! read directly; the archive layer comes up afterwards from the parsed
//! manifest's content root).

use keel_core::error::ManifestError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where manifest text comes from.
#[derive(Debug, Clone)]
pub enum ManifestSource {
    /// Raw manifest text, already in memory.
    Content(String),

    /// Path to a manifest file.
    Path(PathBuf),
}

impl ManifestSource {
    /// Produce the manifest text, reading the file for path sources.
    pub fn read(&self) -> Result<String, ManifestError> {
        match self {
            Self::Content(text) => Ok(text.clone()),
            Self::Path(path) => {
                debug!(path = %path.display(), "Reading manifest file");
                std::fs::read_to_string(path).map_err(|source| ManifestError::UnreadableSource {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

impl From<&str> for ManifestSource {
    fn from(text: &str) -> Self {
        Self::Content(text.to_string())
    }
}

impl From<String> for ManifestSource {
    fn from(text: String) -> Self {
        Self::Content(text)
    }
}

impl From<PathBuf> for ManifestSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ManifestSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_source() {
        let source = ManifestSource::from("app: {}\n");
        assert_eq!(source.read().unwrap(), "app: {}\n");
    }

    #[test]
    fn test_path_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, "app:\n  host_os: {}\n").unwrap();

        let source = ManifestSource::from(path.as_path());
        assert_eq!(source.read().unwrap(), "app:\n  host_os: {}\n");
    }

    #[test]
    fn test_unreadable_path() {
        let source = ManifestSource::Path(PathBuf::from("/definitely/not/here.yaml"));
        let err = source.read().unwrap_err();
        assert!(matches!(err, ManifestError::UnreadableSource { .. }));
    }
}
