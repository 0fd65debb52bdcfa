//! Loader driver: walks the manifest module list.

use super::registry::ModuleRegistry;
use crate::env::EnvironmentStore;
use crate::manifest::HostSection;
use keel_core::traits::ModuleContext;
use keel_core::utils::formalize;
use tracing::{info, warn};

/// Load every module the host section declares, in list order, and return
/// how many ended up resident.
///
/// An entry whose formalized path contains the main module's stem is the
/// host itself and is skipped; one entry failing to load does not halt the
/// rest.
pub fn load_manifest_modules(
    registry: &ModuleRegistry,
    host: &HostSection,
    main_module_stem: &str,
    store: &EnvironmentStore,
    ctx: &ModuleContext<'_>,
) -> usize {
    let mut resident = 0;

    for raw in &host.modules {
        let formalized = match formalize(raw, |name| store.get(name)) {
            Ok(path) => path,
            Err(err) => {
                warn!(entry = %raw, %err, "Skipping module entry");
                continue;
            }
        };

        if formalized.contains(main_module_stem) {
            info!(path = %formalized, "Skipping self-referential module entry");
            continue;
        }

        info!(path = %formalized, "Loading module lib");
        if registry.load_module_lib(&formalized, ctx) {
            resident += 1;
        }
    }

    resident
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::module::StaticModuleLoader;
    use keel_core::capability::InterfaceRegistry;
    use keel_core::error::ModuleError;
    use keel_core::types::{MemoryManager, ModuleState};
    use std::sync::Arc;

    fn ok_ctor(_ctx: &ModuleContext<'_>) -> Result<(), ModuleError> {
        Ok(())
    }

    #[test]
    fn test_main_module_skipped_everywhere() {
        let yaml = r#"
app:
  host_os:
    linux:
      modules:
        - "./main_module.so"
        - "./mod_a.so"
        - "./lib/main_module.so"
"#;
        let manifest = Manifest::from_text(yaml).unwrap();
        let host = manifest.host_section("linux").unwrap();

        let loader = Arc::new(StaticModuleLoader::new().with_ctor("mod_a", ok_ctor));
        let registry = ModuleRegistry::new(loader);
        let store = EnvironmentStore::new();
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = ModuleContext {
            interfaces: &interfaces,
            memory: &memory,
        };

        let resident = load_manifest_modules(&registry, host, "main_module", &store, &ctx);

        assert_eq!(resident, 1);
        assert_eq!(registry.len(), 1, "only mod_a reaches the registry");
        assert_eq!(
            registry.record("./mod_a.so").unwrap().state,
            ModuleState::Resident
        );
    }

    #[test]
    fn test_one_failure_does_not_halt() {
        let yaml = r#"
app:
  host_os:
    linux:
      modules:
        - "./missing_ctor.so"
        - "./mod_a.so"
"#;
        let manifest = Manifest::from_text(yaml).unwrap();
        let host = manifest.host_section("linux").unwrap();

        let loader = Arc::new(StaticModuleLoader::new().with_ctor("mod_a", ok_ctor));
        let registry = ModuleRegistry::new(loader);
        let store = EnvironmentStore::new();
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = ModuleContext {
            interfaces: &interfaces,
            memory: &memory,
        };

        let resident = load_manifest_modules(&registry, host, "main_module", &store, &ctx);

        assert_eq!(resident, 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.record("./missing_ctor.so").unwrap().state,
            ModuleState::Failed
        );
    }

    #[test]
    fn test_paths_formalized_before_identity() {
        let yaml = r#"
app:
  host_os:
    linux:
      modules:
        - "${MODULE_DIR}/mod_a.so"
"#;
        let manifest = Manifest::from_text(yaml).unwrap();
        let host = manifest.host_section("linux").unwrap();

        let loader = Arc::new(StaticModuleLoader::new().with_ctor("mod_a", ok_ctor));
        let registry = ModuleRegistry::new(loader);
        let store = EnvironmentStore::new();
        store.set("MODULE_DIR", "./modules");
        let interfaces = InterfaceRegistry::new();
        let memory = MemoryManager::new("test");
        let ctx = ModuleContext {
            interfaces: &interfaces,
            memory: &memory,
        };

        load_manifest_modules(&registry, host, "main_module", &store, &ctx);
        assert!(registry.record("./modules/mod_a.so").is_some());
    }
}
