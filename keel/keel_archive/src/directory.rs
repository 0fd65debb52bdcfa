//! Directory-rooted archive.

use keel_core::error::ArchiveError;
use keel_core::id::ArchiveId;
use keel_core::traits::{Archive, ArchiveManager, FileBuffer};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A virtual filesystem over a plain directory.
///
/// Relative paths are resolved under the root; rooted paths and any `..`
/// component are rejected so a lookup can never leave the archive.
pub struct DirectoryArchive {
    id: ArchiveId,
    root: PathBuf,
}

impl DirectoryArchive {
    fn resolve(&self, relative: &str) -> Result<PathBuf, ArchiveError> {
        let requested = Path::new(relative);
        if requested.is_absolute() {
            return Err(ArchiveError::OutsideRoot(relative.to_string()));
        }
        for component in requested.components() {
            match component {
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ArchiveError::OutsideRoot(relative.to_string()));
                }
                Component::Normal(_) | Component::CurDir => {}
            }
        }
        Ok(self.root.join(requested))
    }
}

impl Archive for DirectoryArchive {
    fn id(&self) -> ArchiveId {
        self.id
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn file_buffer(&self, relative: &str) -> Result<FileBuffer, ArchiveError> {
        let resolved = self.resolve(relative)?;
        if !resolved.is_file() {
            return Err(ArchiveError::NotFound(relative.to_string()));
        }

        debug!(path = %resolved.display(), "Reading archive file");
        let bytes = std::fs::read(&resolved)?;
        Ok(FileBuffer::new(bytes))
    }
}

/// Factory for [`DirectoryArchive`] handles.
#[derive(Default)]
pub struct DirectoryArchiveManager;

impl DirectoryArchiveManager {
    /// Create the manager.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveManager for DirectoryArchiveManager {
    fn backend_name(&self) -> &'static str {
        "directory"
    }

    fn create_archive(&self, root: &Path) -> Result<Arc<dyn Archive>, ArchiveError> {
        if !root.is_dir() {
            return Err(ArchiveError::CreateFailed {
                root: root.display().to_string(),
                reason: "not an existing directory".to_string(),
            });
        }

        let archive = DirectoryArchive {
            id: ArchiveId::new(),
            root: root.to_path_buf(),
        };
        info!(id = %archive.id, root = %root.display(), "Created directory archive");
        Ok(Arc::new(archive))
    }
}
