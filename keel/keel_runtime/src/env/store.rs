//! Process environment table, modeled as an explicit value.
//!
//! Environment mutation is process-global state in spirit, but the store is
//! passed into the resolver and module driver explicitly so tests can inject
//! an isolated table per case. The shell seeds one from the real process
//! environment.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::trace;

/// A table of environment entries with interior mutability.
#[derive(Default)]
pub struct EnvironmentStore {
    vars: RwLock<HashMap<String, String>>,
}

impl EnvironmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from the current process environment.
    ///
    /// Entries that are not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }

    /// Current value of `name`, if set.
    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.read().get(name).cloned()
    }

    /// Set `name` to `value`, replacing any prior value.
    pub fn set(&self, name: &str, value: &str) {
        trace!(name, value, "Setting environment entry");
        self.vars
            .write()
            .insert(name.to_string(), value.to_string());
    }

    /// Whether `name` is set.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.read().contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.vars.read().is_empty()
    }

    /// A copy of the full table, for diffing in tests and diagnostics.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.vars.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let store = EnvironmentStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("FOO"), None);

        store.set("FOO", "bar");
        assert_eq!(store.get("FOO"), Some("bar".to_string()));
        assert!(store.contains("FOO"));
        assert_eq!(store.len(), 1);

        store.set("FOO", "baz");
        assert_eq!(store.get("FOO"), Some("baz".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_isolated_stores() {
        let a = EnvironmentStore::new();
        let b = EnvironmentStore::new();
        a.set("ONLY_A", "1");
        assert!(!b.contains("ONLY_A"));
    }

    #[test]
    fn test_from_process_carries_entries() {
        // PATH is about the only entry safe to assume in any environment
        std::env::set_var("KEEL_STORE_SEED_PROBE", "yes");
        let store = EnvironmentStore::from_process();
        assert_eq!(
            store.get("KEEL_STORE_SEED_PROBE"),
            Some("yes".to_string())
        );
        std::env::remove_var("KEEL_STORE_SEED_PROBE");
    }
}
