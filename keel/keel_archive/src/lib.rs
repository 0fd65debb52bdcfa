//! Keel Archive - directory-backed virtual filesystem
//!
//! Provides the `directory` archive backend: an [`Archive`] over a plain
//! filesystem directory, plus the module constructor that publishes its
//! manager into the interface registry when the backend is loaded as a
//! manifest module.
//!
//! A `package` backend (zip/obb) registers under the same tag from its own
//! module; this crate deliberately knows nothing about it.
//!
//! [`Archive`]: keel_core::traits::Archive

mod directory;
mod module;

pub use directory::{DirectoryArchive, DirectoryArchiveManager};
pub use module::{register_directory_backend, DIRECTORY_BACKEND_NAME, MODULE_STEM};
