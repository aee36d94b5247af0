//! # The Injector — heart of Amanah
//!
//! A reflective singleton dependency injection container: register
//! constructible types, declare their constructor parameters through a
//! [`MetadataSource`], and resolve fully wired instances on demand.
//!
//! # Architecture
//! ```text
//! DeclarationTable ──new()──> Injector
//!                                │
//!                    register / get / instantiate
//!                                │
//!                                ▼
//!                        Registry (providers)
//! ```
//!
//! # Examples
//! ```rust
//! use amanah_container::injector::Injector;
//! use amanah_container::key::TypeKey;
//! use amanah_container::metadata::DeclarationTable;
//! use std::sync::Arc;
//!
//! struct Database;
//! struct UserRepository {
//!     db: Arc<Database>,
//! }
//!
//! let metadata = DeclarationTable::new()
//!     .declare::<Database>(vec![])
//!     .declare::<UserRepository>(vec![TypeKey::of::<Database>()]);
//!
//! let injector = Injector::new(Arc::new(metadata));
//! injector.register::<Database>(|_| Ok(Database)).unwrap();
//! injector
//!     .register::<UserRepository>(|args| {
//!         Ok(UserRepository { db: args.arg::<Database>(0)? })
//!     })
//!     .unwrap();
//!
//! let repo: Arc<UserRepository> = injector.get().unwrap();
//! assert!(Arc::ptr_eq(&repo.db, &injector.get::<Database>().unwrap()));
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use tracing::{trace, warn};

use amanah_support::rendering::suggest_similar;

use crate::error::{AmanahError, CircularDependencyError, NotRegisteredError, Result};
use crate::key::TypeKey;
use crate::metadata::MetadataSource;
use crate::provider::{Args, ConstructorFn, Instance, Provider};
use crate::registry::Registry;

/// Thread-safe singleton dependency injection container.
///
/// Owns the provider registry and an injected [`MetadataSource`]. The
/// injector is an explicitly constructed object: whoever boots the
/// system owns the one instance and hands it (or an `Arc` of it) to
/// consumers. There is no ambient global container.
///
/// # Concurrency
/// All operations take `&self`. The registry lock is never held across a
/// construction, so callers racing to resolve the same singleton may
/// each build a candidate; the first stored value wins and every caller
/// observes it.
///
/// # Cycle detection
/// Only *direct* self-references are rejected: a type listing itself as
/// a constructor parameter fails with
/// [`AmanahError::CircularDependency`]. A multi-hop cycle (A requires B,
/// B requires A) is not detected and recurses until the stack is
/// exhausted. Keep dependency graphs acyclic.
pub struct Injector {
    registry: Registry,
    metadata: Arc<dyn MetadataSource>,
}

impl Injector {
    /// Creates an empty injector backed by the given metadata source.
    pub fn new(metadata: Arc<dyn MetadataSource>) -> Self {
        Self {
            registry: Registry::new(),
            metadata,
        }
    }

    /// Registers a provider for `T`.
    ///
    /// The constructor receives the resolved parameter instances in
    /// declaration order and builds a `T`. Registration constructs
    /// nothing; the constructor runs on first resolution.
    ///
    /// # Errors
    /// [`AmanahError::AlreadyRegistered`] if `T` already has a provider;
    /// the registry is left unchanged.
    pub fn register<T>(
        &self,
        constructor: impl Fn(Args<'_>) -> Result<T> + Send + Sync + 'static,
    ) -> Result<()>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        let constructor: ConstructorFn = Arc::new(move |args| {
            let value = constructor(args)?;
            Ok(Arc::new(value) as Instance)
        });

        self.registry.register(Provider::new(key, constructor))
    }

    /// Returns `true` if `T` has a provider. Total, never fails.
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.registry.is_registered(&TypeKey::of::<T>())
    }

    /// Returns the singleton instance of `T`, constructing and caching
    /// it on first request.
    ///
    /// Every call returns a clone of the same `Arc`. A failed resolution
    /// leaves the provider unpopulated and safe to retry.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        downcast::<T>(self.get_key(&TypeKey::of::<T>(), None)?)
    }

    /// Constructs a brand-new instance of `T`, bypassing its singleton
    /// cache entirely.
    ///
    /// The cache for `T` is neither read nor written; dependencies are
    /// still resolved through [`get`](Injector::get) and therefore
    /// shared.
    pub fn instantiate<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        downcast::<T>(self.instantiate_key(&TypeKey::of::<T>())?)
    }

    /// Resolves the declared constructor parameters of `T`, in
    /// declaration order.
    ///
    /// Element `i` is the singleton for parameter `i`; callers rely on
    /// this positional correspondence.
    pub fn resolve_dependencies<T: Send + Sync + 'static>(&self) -> Result<Vec<Instance>> {
        self.resolve_dependencies_key(&TypeKey::of::<T>())
    }

    /// Singleton resolution by key.
    fn get_key(&self, key: &TypeKey, required_by: Option<&TypeKey>) -> Result<Instance> {
        let Some((constructor, cached)) = self.registry.lookup(key) else {
            return Err(self.not_registered(key, required_by));
        };

        if let Some(instance) = cached {
            trace!(key = %key, "singleton cache hit");
            return Ok(instance);
        }

        let resolved = self.resolve_dependencies_key(key)?;
        let built = constructor(Args::new(key, &resolved))?;
        trace!(key = %key, "singleton constructed");

        // Providers are never removed, so the key is still present; the
        // first stored instance wins if another caller raced us here.
        self.registry
            .populate(key, built)
            .ok_or_else(|| self.not_registered(key, required_by))
    }

    /// Fresh construction by key; never touches the cache for `key`.
    fn instantiate_key(&self, key: &TypeKey) -> Result<Instance> {
        let Some((constructor, _)) = self.registry.lookup(key) else {
            return Err(self.not_registered(key, None));
        };

        let resolved = self.resolve_dependencies_key(key)?;
        trace!(key = %key, "constructing transient instance");
        constructor(Args::new(key, &resolved))
    }

    /// Resolves the declaration for `key` into ordered instances.
    fn resolve_dependencies_key(&self, key: &TypeKey) -> Result<Vec<Instance>> {
        let params = self.metadata.param_types(key);
        let mut resolved = Vec::with_capacity(params.len());

        for param in &params {
            if param == key {
                warn!(key = %key, "direct self-dependency detected");
                return Err(AmanahError::CircularDependency(CircularDependencyError {
                    key: key.clone(),
                }));
            }

            resolved.push(self.get_key(param, Some(key))?);
        }

        Ok(resolved)
    }

    fn not_registered(&self, key: &TypeKey, required_by: Option<&TypeKey>) -> AmanahError {
        let names = self.registry.registered_names();
        AmanahError::NotRegistered(NotRegisteredError {
            requested: key.clone(),
            required_by: required_by.cloned(),
            suggestions: suggest_similar(key.type_name(), &names, 3),
        })
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("registered", &self.registry.len())
            .finish()
    }
}

fn downcast<T: Send + Sync + 'static>(instance: Instance) -> Result<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| AmanahError::ConstructionFailed {
            key: TypeKey::of::<T>(),
            source: format!("type mismatch: expected {}", type_name::<T>()).into(),
        })
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::Injector;
    pub use crate::error::{AmanahError, Result};
    pub use crate::key::TypeKey;
    pub use crate::metadata::{DeclarationTable, MetadataSource};
    pub use crate::provider::{Args, Instance};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
