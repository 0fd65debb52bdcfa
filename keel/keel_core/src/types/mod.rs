//! Data types shared across the Keel system.

mod lifecycle;
mod memory;
mod module;

pub use lifecycle::{LifecycleState, PlatformHandle};
pub use memory::{MemoryDomain, MemoryManager};
pub use module::ModuleState;
