//! Module loader contract.
//!
//! The module registry records load attempts; the actual mechanics of
//! bringing a module into the process (dynamic linking, static constructor
//! tables, a sandbox) belong to a `ModuleLoader` collaborator.

use crate::capability::InterfaceRegistry;
use crate::error::ModuleError;
use crate::types::MemoryManager;
use std::path::Path;

/// Everything a module sees while it loads: where to publish interfaces and
/// which allocation domain to account against.
pub struct ModuleContext<'a> {
    /// Process-wide interface registry.
    pub interfaces: &'a InterfaceRegistry,

    /// Shared memory-manager handle.
    pub memory: &'a MemoryManager,
}

/// Constructor function a statically-linked module exposes.
pub type ModuleCtor = fn(&ModuleContext<'_>) -> Result<(), ModuleError>;

/// Brings one module into the process.
pub trait ModuleLoader: Send + Sync {
    /// Load the module at `path`, giving it `ctx` to register interfaces
    /// into and the shared allocation domain to participate in.
    fn load(&self, path: &Path, ctx: &ModuleContext<'_>) -> Result<(), ModuleError>;
}
