//! Interface registry: dynamic capability lookup by tag and optional name.
//!
//! Loaded modules publish the interfaces they provide under a stable string
//! tag (not a language type) plus an instance name; consumers look them up by
//! the same tag, optionally pinning a specific instance. Callers therefore
//! depend only on the capability set they need, never on a backend's
//! concrete type.
//!
//! Handles are stored as `Arc<dyn Any + Send + Sync>`. Trait-object handles
//! are registered as `Arc<dyn Trait>` values (a sized type) and recovered
//! with [`InterfaceRegistry::get_cloned`].

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

struct NamedHandle {
    name: String,
    handle: Arc<dyn Any + Send + Sync>,
}

/// Registry mapping interface tags to named polymorphic handles.
///
/// Registration order per tag is preserved; an unnamed lookup returns the
/// first registrant for the tag.
#[derive(Default)]
pub struct InterfaceRegistry {
    entries: RwLock<HashMap<String, Vec<NamedHandle>>>,
}

impl InterfaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `instance` under `tag` with the given instance `name`.
    ///
    /// Duplicate registrations are kept in order; lookups return the first
    /// match, so the earliest registrant wins a contested name.
    pub fn register<T>(&self, tag: &str, name: &str, instance: T)
    where
        T: Send + Sync + 'static,
    {
        debug!(tag, name, "Registering interface");
        self.entries
            .write()
            .entry(tag.to_string())
            .or_default()
            .push(NamedHandle {
                name: name.to_string(),
                handle: Arc::new(instance),
            });
    }

    /// Look up an interface by tag, optionally by instance name.
    ///
    /// Returns the stored handle if its concrete type is `T`.
    pub fn get<T>(&self, tag: &str, name: Option<&str>) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let entries = self.entries.read();
        let handles = entries.get(tag)?;
        let found = match name {
            Some(name) => handles.iter().find(|h| h.name == name),
            None => handles.first(),
        }?;
        found.handle.clone().downcast::<T>().ok()
    }

    /// Look up an interface and clone it out of its registry cell.
    ///
    /// The usual shape for trait objects: register an `Arc<dyn Trait>` and
    /// recover it here with `T = Arc<dyn Trait>`.
    pub fn get_cloned<T>(&self, tag: &str, name: Option<&str>) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.get::<T>(tag, name).map(|handle| (*handle).clone())
    }

    /// Whether any handle is registered under `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.entries
            .read()
            .get(tag)
            .is_some_and(|handles| !handles.is_empty())
    }

    /// Instance names registered under `tag`, in registration order.
    pub fn names(&self, tag: &str) -> Vec<String> {
        self.entries
            .read()
            .get(tag)
            .map(|handles| handles.iter().map(|h| h.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    struct French;
    impl Greeter for French {
        fn greet(&self) -> String {
            "bonjour".to_string()
        }
    }

    #[test]
    fn test_register_and_get_concrete() {
        let registry = InterfaceRegistry::new();
        registry.register("counter", "main", 41u64);

        let value = registry.get::<u64>("counter", Some("main")).unwrap();
        assert_eq!(*value, 41);
        assert!(registry.get::<u32>("counter", Some("main")).is_none());
    }

    #[test]
    fn test_unnamed_lookup_returns_first() {
        let registry = InterfaceRegistry::new();
        registry.register("greeter", "en", Arc::new(English) as Arc<dyn Greeter>);
        registry.register("greeter", "fr", Arc::new(French) as Arc<dyn Greeter>);

        let greeter = registry
            .get_cloned::<Arc<dyn Greeter>>("greeter", None)
            .unwrap();
        assert_eq!(greeter.greet(), "hello");

        let greeter = registry
            .get_cloned::<Arc<dyn Greeter>>("greeter", Some("fr"))
            .unwrap();
        assert_eq!(greeter.greet(), "bonjour");
    }

    #[test]
    fn test_missing_lookups() {
        let registry = InterfaceRegistry::new();
        assert!(!registry.contains("greeter"));
        assert!(registry
            .get_cloned::<Arc<dyn Greeter>>("greeter", None)
            .is_none());

        registry.register("greeter", "en", Arc::new(English) as Arc<dyn Greeter>);
        assert!(registry.contains("greeter"));
        assert!(registry
            .get_cloned::<Arc<dyn Greeter>>("greeter", Some("de"))
            .is_none());
        assert_eq!(registry.names("greeter"), vec!["en".to_string()]);
    }
}
