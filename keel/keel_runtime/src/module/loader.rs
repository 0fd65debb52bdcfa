//! Static module loader.
//!
//! The stand-in for dynamic linking: module file stems map to constructor
//! functions compiled into the process. Loading `./modules/archive_dir.so`
//! resolves the stem `archive_dir` and runs the registered constructor with
//! the module context.

use keel_core::error::ModuleError;
use keel_core::traits::{ModuleContext, ModuleCtor, ModuleLoader};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Loader resolving module paths to statically-registered constructors.
#[derive(Default)]
pub struct StaticModuleLoader {
    ctors: RwLock<HashMap<String, ModuleCtor>>,
}

impl StaticModuleLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for the given module file stem.
    pub fn register_ctor(&self, stem: &str, ctor: ModuleCtor) {
        debug!(stem, "Registering module constructor");
        self.ctors.write().insert(stem.to_string(), ctor);
    }

    /// Builder-style [`register_ctor`](Self::register_ctor).
    pub fn with_ctor(self, stem: &str, ctor: ModuleCtor) -> Self {
        self.register_ctor(stem, ctor);
        self
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn load(&self, path: &Path, ctx: &ModuleContext<'_>) -> Result<(), ModuleError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ModuleError::NoConstructor(path.display().to_string()))?;

        let ctor = *self
            .ctors
            .read()
            .get(stem)
            .ok_or_else(|| ModuleError::NoConstructor(stem.to_string()))?;

        ctor(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::capability::InterfaceRegistry;
    use keel_core::types::MemoryManager;

    fn marking_ctor(ctx: &ModuleContext<'_>) -> Result<(), ModuleError> {
        ctx.interfaces.register("marker", "loaded", true);
        Ok(())
    }

    fn failing_ctor(_ctx: &ModuleContext<'_>) -> Result<(), ModuleError> {
        Err(ModuleError::LoadFailed {
            path: "mod_bad".to_string(),
            reason: "constructor refused".to_string(),
        })
    }

    #[test]
    fn test_load_by_stem() {
        let loader = StaticModuleLoader::new().with_ctor("mod_a", marking_ctor);
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = ModuleContext {
            interfaces: &interfaces,
            memory: &memory,
        };

        loader.load(Path::new("./modules/mod_a.so"), &ctx).unwrap();
        assert!(interfaces.contains("marker"));
    }

    #[test]
    fn test_unknown_stem() {
        let loader = StaticModuleLoader::new();
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = ModuleContext {
            interfaces: &interfaces,
            memory: &memory,
        };

        let err = loader.load(Path::new("mystery.so"), &ctx).unwrap_err();
        assert!(matches!(err, ModuleError::NoConstructor(stem) if stem == "mystery"));
    }

    #[test]
    fn test_ctor_failure_propagates() {
        let loader = StaticModuleLoader::new().with_ctor("mod_bad", failing_ctor);
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = ModuleContext {
            interfaces: &interfaces,
            memory: &memory,
        };

        let err = loader.load(Path::new("mod_bad.so"), &ctx).unwrap_err();
        assert!(matches!(err, ModuleError::LoadFailed { .. }));
    }
}
