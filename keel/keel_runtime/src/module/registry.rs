//! Process-wide module registry.

use indexmap::IndexMap;
use keel_core::id::ModuleId;
use keel_core::traits::{ModuleContext, ModuleLoader};
use keel_core::types::ModuleState;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Registry entry for one manifest-declared module.
#[derive(Debug, Clone)]
pub struct ModuleRecord {
    /// Identifier assigned when the module was first declared.
    pub id: ModuleId,

    /// Formalized path; the module's identity.
    pub path: String,

    /// Current lifecycle state.
    pub state: ModuleState,
}

/// Records every module load attempt and its outcome.
///
/// Identity is the formalized path. A module that failed to load is not
/// re-attempted within the same bootstrap pass.
pub struct ModuleRegistry {
    records: RwLock<IndexMap<String, ModuleRecord>>,
    loader: Arc<dyn ModuleLoader>,
}

impl ModuleRegistry {
    /// Create a registry delegating loads to `loader`.
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            records: RwLock::new(IndexMap::new()),
            loader,
        }
    }

    /// Load the dynamic library at `path` into the process.
    ///
    /// Returns whether the module is resident afterwards. Failure is logged
    /// here; the caller continues with the remaining entries.
    pub fn load_module_lib(&self, path: &str, ctx: &ModuleContext<'_>) -> bool {
        {
            let records = self.records.read();
            if let Some(record) = records.get(path) {
                match record.state {
                    ModuleState::Resident => {
                        debug!(path, "Module already resident");
                        return true;
                    }
                    ModuleState::Failed => {
                        debug!(path, "Module previously failed, not re-attempting");
                        return false;
                    }
                    ModuleState::Declared | ModuleState::Loading => {}
                }
            }
        }

        let id = {
            let mut records = self.records.write();
            let record = records.entry(path.to_string()).or_insert(ModuleRecord {
                id: ModuleId::new(),
                path: path.to_string(),
                state: ModuleState::Declared,
            });
            record.state = ModuleState::Loading;
            record.id
        };

        match self.loader.load(Path::new(path), ctx) {
            Ok(()) => {
                self.set_state(path, ModuleState::Resident);
                info!(%id, path, "Module resident");
                true
            }
            Err(err) => {
                self.set_state(path, ModuleState::Failed);
                error!(%id, path, %err, "Module load failed");
                false
            }
        }
    }

    fn set_state(&self, path: &str, state: ModuleState) {
        if let Some(record) = self.records.write().get_mut(path) {
            record.state = state;
        }
    }

    /// Record for `path`, if any attempt was made.
    pub fn record(&self, path: &str) -> Option<ModuleRecord> {
        self.records.read().get(path).cloned()
    }

    /// All records, in first-declared order.
    pub fn records(&self) -> Vec<ModuleRecord> {
        self.records.read().values().cloned().collect()
    }

    /// Number of resident modules.
    pub fn resident_count(&self) -> usize {
        self.records
            .read()
            .values()
            .filter(|r| r.state == ModuleState::Resident)
            .count()
    }

    /// Number of modules any load was attempted for.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no load was ever attempted.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::StaticModuleLoader;
    use keel_core::capability::InterfaceRegistry;
    use keel_core::error::ModuleError;
    use keel_core::traits::ModuleContext;
    use keel_core::types::MemoryManager;

    fn ok_ctor(_ctx: &ModuleContext<'_>) -> Result<(), ModuleError> {
        Ok(())
    }

    fn failing_ctor(_ctx: &ModuleContext<'_>) -> Result<(), ModuleError> {
        Err(ModuleError::LoadFailed {
            path: "mod_bad".to_string(),
            reason: "no".to_string(),
        })
    }

    fn test_ctx<'a>(
        interfaces: &'a InterfaceRegistry,
        memory: &'a MemoryManager,
    ) -> ModuleContext<'a> {
        ModuleContext { interfaces, memory }
    }

    #[test]
    fn test_load_success_and_failure() {
        let loader = Arc::new(
            StaticModuleLoader::new()
                .with_ctor("mod_a", ok_ctor)
                .with_ctor("mod_bad", failing_ctor),
        );
        let registry = ModuleRegistry::new(loader);
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = test_ctx(&interfaces, &memory);

        assert!(registry.load_module_lib("./mod_a.so", &ctx));
        assert!(!registry.load_module_lib("./mod_bad.so", &ctx));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resident_count(), 1);
        assert_eq!(
            registry.record("./mod_a.so").unwrap().state,
            ModuleState::Resident
        );
        assert_eq!(
            registry.record("./mod_bad.so").unwrap().state,
            ModuleState::Failed
        );
    }

    #[test]
    fn test_no_reattempt_after_failure() {
        let loader = Arc::new(StaticModuleLoader::new().with_ctor("mod_bad", failing_ctor));
        let registry = ModuleRegistry::new(loader);
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = test_ctx(&interfaces, &memory);

        assert!(!registry.load_module_lib("mod_bad.so", &ctx));
        assert!(!registry.load_module_lib("mod_bad.so", &ctx));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resident_is_idempotent() {
        let loader = Arc::new(StaticModuleLoader::new().with_ctor("mod_a", ok_ctor));
        let registry = ModuleRegistry::new(loader);
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = test_ctx(&interfaces, &memory);

        assert!(registry.load_module_lib("mod_a.so", &ctx));
        assert!(registry.load_module_lib("mod_a.so", &ctx));
        assert_eq!(registry.resident_count(), 1);
    }
}
