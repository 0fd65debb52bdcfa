//! Archive contracts: virtual filesystems over a package or directory.

use crate::error::ArchiveError;
use crate::id::ArchiveId;
use std::path::Path;
use std::sync::Arc;

/// Interface tag archive backends register their manager under.
pub const ARCHIVE_MANAGER_TAG: &str = "archive-manager";

/// An owned file payload read out of an archive.
#[derive(Debug, Clone)]
pub struct FileBuffer {
    bytes: Arc<[u8]>,
}

impl FileBuffer {
    /// Wrap raw bytes read from an archive.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::from(bytes),
        }
    }

    /// The file contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Interpret the payload as UTF-8 text.
    pub fn as_text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }
}

/// A virtual filesystem rooted at a path or package.
///
/// Exactly one archive is produced per manifest load and owned by the
/// orchestrator for the life of the process.
pub trait Archive: Send + Sync {
    /// Identifier of this archive handle.
    fn id(&self) -> ArchiveId;

    /// The root this archive was created from.
    fn root(&self) -> &Path;

    /// Read a file by its path relative to the archive root.
    fn file_buffer(&self, relative: &str) -> Result<FileBuffer, ArchiveError>;
}

/// Factory for archives of one backend kind.
///
/// Backends register an `Arc<dyn ArchiveManager>` in the interface registry
/// under [`ARCHIVE_MANAGER_TAG`], named after the backend (`"directory"`,
/// `"package"`).
pub trait ArchiveManager: Send + Sync {
    /// The backend name this manager registers under.
    fn backend_name(&self) -> &'static str;

    /// Construct an archive rooted at `root`.
    fn create_archive(&self, root: &Path) -> Result<Arc<dyn Archive>, ArchiveError>;
}
