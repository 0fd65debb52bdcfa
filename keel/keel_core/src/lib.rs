//! # Keel Core
//!
//! `keel_core` provides the fundamental building blocks for the Keel bootstrap
//! runtime: error types, identifier types, the contracts the runtime consumes
//! its collaborators through (archives, module loaders, tickables), the
//! interface registry, and shared data types.
//!
//! ## Crate Structure
//!
//! - **error**: Error hierarchy for all Keel subsystems
//! - **id**: Strongly-typed identifier types
//! - **capability**: Interface registry keyed by tag and optional instance name
//! - **traits**: Contracts for archives, module loaders, and tickables
//! - **types**: Lifecycle and module states, the memory-manager handle
//! - **utils**: Path formalization helpers

pub mod capability;
pub mod error;
pub mod id;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export key types and traits for convenience
pub use capability::InterfaceRegistry;
pub use error::{Error, Result};
pub use id::{ArchiveId, ModuleId, TaskletId};
pub use traits::{Archive, ArchiveManager, ModuleCtor, ModuleLoader, Tickable, ARCHIVE_MANAGER_TAG};
pub use types::{LifecycleState, MemoryDomain, MemoryManager, ModuleState, PlatformHandle};
