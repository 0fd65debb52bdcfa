//! Error types for the Keel bootstrap runtime.
//!
//! Errors are organized by subsystem, with each subsystem having its own
//! error type. The root `Error` type can wrap any of them, allowing uniform
//! handling at the top level.
//!
//! The split mirrors the failure taxonomy the runtime enforces: manifest
//! shape problems and single-entry failures are recoverable and reported per
//! load attempt; a missing archive manager or an unconstructible root archive
//! aborts bootstrap.

use crate::types::LifecycleState;
use thiserror::Error;

/// Root error type for the Keel system.
#[derive(Debug, Error)]
pub enum Error {
    /// Manifest parsing and shape errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Environment directive errors
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),

    /// Archive construction and access errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Module loading errors
    #[error("Module error: {0}")]
    Module(#[from] ModuleError),

    /// Lifecycle state machine errors
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// General runtime errors
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Convenient result alias for Keel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or slicing a manifest.
///
/// All of these are reported before any environment or module mutation has
/// happened, so a failed load leaves the process untouched.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The document could not be parsed at all
    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    /// A required node is absent
    #[error("Manifest is missing required node `{0}`")]
    MissingNode(String),

    /// `app.host_os` has no subtree for the current host OS
    #[error("Manifest has no host_os entry for `{0}`")]
    HostOsNotFound(String),

    /// The manifest file could not be read at the resolved path
    #[error("Failed to read manifest at {path}: {source}")]
    UnreadableSource {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while formalizing environment directive values.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// A `${VAR}` placeholder referenced a variable the store does not hold
    #[error("Unknown variable `{0}` in value")]
    UnknownVariable(String),
}

/// Errors raised by archive backends and root-archive selection.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No archive-manager capability is resident; fatal to bootstrap
    #[error("No archive manager registered for backend `{0}`")]
    ManagerNotResident(String),

    /// The manifest does not declare a content root; fatal to bootstrap
    #[error("Manifest host section declares no usable CONTENT_ROOT")]
    ContentRootMissing,

    /// The backend could not construct an archive at the given root
    #[error("Failed to create archive rooted at {root}: {reason}")]
    CreateFailed { root: String, reason: String },

    /// A requested file does not exist inside the archive
    #[error("File not found in archive: {0}")]
    NotFound(String),

    /// The requested path would escape the archive root
    #[error("Path escapes archive root: {0}")]
    OutsideRoot(String),

    /// I/O failure while reading archive contents
    #[error("Archive I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading a single module.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The loader has no constructor for the module's file stem
    #[error("No module constructor registered for `{0}`")]
    NoConstructor(String),

    /// The module's constructor ran and failed
    #[error("Module load failed for {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Errors raised by the bootstrap orchestrator's state machine.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// An operation was invoked in the wrong lifecycle state
    #[error("Invalid lifecycle state: expected {expected:?}, actual {actual:?}")]
    InvalidState {
        expected: LifecycleState,
        actual: LifecycleState,
    },

    /// An operation requires `init` to have run first
    #[error("Orchestrator is not initialized")]
    NotInitialized,

    /// `load_manifest` was called after a manifest was already loaded
    #[error("A manifest is already loaded")]
    ManifestAlreadyLoaded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(ManifestError::MissingNode("app".to_string()));
        assert!(err.to_string().contains("`app`"));

        let err = Error::from(ArchiveError::ManagerNotResident("directory".to_string()));
        assert!(err.to_string().contains("directory"));
    }

    #[test]
    fn test_lifecycle_error_states() {
        let err = LifecycleError::InvalidState {
            expected: LifecycleState::Uninitialized,
            actual: LifecycleState::Running,
        };
        let msg = err.to_string();
        assert!(msg.contains("Uninitialized"));
        assert!(msg.contains("Running"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
