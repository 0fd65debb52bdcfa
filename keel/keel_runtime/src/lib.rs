//! Keel Runtime - manifest-driven bootstrap core
//!
//! This crate provides the bootstrap and module-resolution layer of the Keel
//! runtime: manifest loading, environment shaping, module residency, root
//! archive selection, and the init / tick / deinit lifecycle that dispatches
//! frame updates to registered tickables and the job system.

pub mod env;
pub mod manifest;
pub mod module;
pub mod system;

pub use env::{apply_directives, EnvironmentStore};
pub use manifest::{EnvDirective, EnvMode, EnvValue, HostSection, Manifest, ManifestSource};
pub use module::{ModuleRecord, ModuleRegistry, StaticModuleLoader};
pub use system::{backend_hint, Orchestrator, OrchestratorConfig, CONTENT_ROOT_VAR};
