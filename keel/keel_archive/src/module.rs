//! Module constructor for the directory backend.
//!
//! When the manifest lists this backend as a module (for example
//! `./modules/archive_dir.so`), the static module loader resolves the file
//! stem to [`register_directory_backend`] and runs it; the constructor
//! publishes the archive manager so root-archive selection can find it.

use crate::directory::DirectoryArchiveManager;
use keel_core::error::ModuleError;
use keel_core::traits::{ArchiveManager, ModuleContext, ARCHIVE_MANAGER_TAG};
use keel_core::types::MemoryDomain;
use std::sync::Arc;
use tracing::info;

/// File stem the static loader maps to this backend's constructor.
pub const MODULE_STEM: &str = "archive_dir";

/// Instance name the backend registers under.
pub const DIRECTORY_BACKEND_NAME: &str = "directory";

/// Publish the directory archive manager into the interface registry.
pub fn register_directory_backend(ctx: &ModuleContext<'_>) -> Result<(), ModuleError> {
    let manager: Arc<dyn ArchiveManager> = Arc::new(DirectoryArchiveManager::new());

    ctx.memory
        .record_allocation(MemoryDomain::Runtime, std::mem::size_of_val(&manager) as u64);
    ctx.interfaces
        .register(ARCHIVE_MANAGER_TAG, DIRECTORY_BACKEND_NAME, manager);

    info!(backend = DIRECTORY_BACKEND_NAME, "Archive backend resident");
    Ok(())
}
