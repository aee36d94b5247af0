//! Provider registry — the injector's only shared mutable state.
//!
//! Maps [`TypeKey`] to [`Provider`]. Every access takes the lock for the
//! duration of a single map operation; the lock is never held across a
//! construction, so resolution may recurse freely.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{AlreadyRegisteredError, AmanahError, Result};
use crate::key::TypeKey;
use crate::provider::{ConstructorFn, Instance, Provider};

/// Stores all providers. Providers are inserted by `register` and never
/// removed; the invariant that a provider's key equals its map key holds
/// by construction.
pub(crate) struct Registry {
    providers: RwLock<HashMap<TypeKey, Provider>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a provider.
    ///
    /// # Errors
    /// [`AmanahError::AlreadyRegistered`] if the key is taken; the map is
    /// left unchanged.
    pub fn register(&self, provider: Provider) -> Result<()> {
        let mut providers = self.providers.write();
        let key = provider.key().clone();

        if providers.contains_key(&key) {
            return Err(AmanahError::AlreadyRegistered(AlreadyRegisteredError {
                key,
            }));
        }

        debug!(key = %key, "registered provider");
        providers.insert(key, provider);
        Ok(())
    }

    /// Membership test. Total, never fails.
    pub fn is_registered(&self, key: &TypeKey) -> bool {
        self.providers.read().contains_key(key)
    }

    /// Snapshot of a provider: its constructor handle plus the cached
    /// singleton, if any. `None` if the key is unregistered.
    pub fn lookup(&self, key: &TypeKey) -> Option<(ConstructorFn, Option<Instance>)> {
        self.providers
            .read()
            .get(key)
            .map(|provider| (provider.constructor(), provider.cached()))
    }

    /// Stores the singleton for `key`, first writer wins, and returns
    /// the stored value. `None` if the key is unregistered.
    pub fn populate(&self, key: &TypeKey, instance: Instance) -> Option<Instance> {
        self.providers
            .read()
            .get(key)
            .map(|provider| provider.populate(instance))
    }

    /// Returns `true` if a singleton has been stored for `key`.
    pub fn is_populated(&self, key: &TypeKey) -> bool {
        self.providers
            .read()
            .get(key)
            .is_some_and(Provider::is_populated)
    }

    /// Type names of all registered providers (for suggestions).
    pub fn registered_names(&self) -> Vec<&'static str> {
        self.providers
            .read()
            .keys()
            .map(TypeKey::type_name)
            .collect()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Database;

    fn make_provider(key: TypeKey) -> Provider {
        Provider::new(key, Arc::new(|_| Ok(Arc::new(Database) as Instance)))
    }

    #[test]
    fn register_and_lookup() {
        let registry = Registry::new();
        let key = TypeKey::of::<Database>();

        registry.register(make_provider(key.clone())).unwrap();

        assert!(registry.is_registered(&key));
        let (_, cached) = registry.lookup(&key).unwrap();
        assert!(cached.is_none());
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Registry::new();
        let key = TypeKey::of::<Database>();

        registry.register(make_provider(key.clone())).unwrap();
        let err = registry.register(make_provider(key.clone())).unwrap_err();

        assert!(matches!(err, AmanahError::AlreadyRegistered(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_unregistered_is_none() {
        let registry = Registry::new();
        assert!(registry.lookup(&TypeKey::of::<Database>()).is_none());
    }

    #[test]
    fn populate_first_writer_wins() {
        let registry = Registry::new();
        let key = TypeKey::of::<Database>();
        registry.register(make_provider(key.clone())).unwrap();

        let first: Instance = Arc::new(Database);
        let stored = registry.populate(&key, first.clone()).unwrap();
        assert!(Arc::ptr_eq(&stored, &first));

        let stored = registry.populate(&key, Arc::new(Database)).unwrap();
        assert!(Arc::ptr_eq(&stored, &first));
        assert!(registry.is_populated(&key));
    }

    #[test]
    fn populate_unregistered_is_none() {
        let registry = Registry::new();
        let key = TypeKey::of::<Database>();
        assert!(registry.populate(&key, Arc::new(Database)).is_none());
        assert!(!registry.is_populated(&key));
    }
}
