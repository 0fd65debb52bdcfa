//! Contracts the runtime consumes its collaborators through.

mod archive;
mod module;
mod tickable;

pub use archive::{Archive, ArchiveManager, FileBuffer, ARCHIVE_MANAGER_TAG};
pub use module::{ModuleContext, ModuleCtor, ModuleLoader};
pub use tickable::Tickable;
