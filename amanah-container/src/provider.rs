//! Provider records and construction plumbing.
//!
//! A [`Provider`] binds a [`TypeKey`] to its constructor and, lazily,
//! its cached singleton instance. Constructors receive their resolved
//! dependencies positionally through [`Args`].

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{AmanahError, Result};
use crate::key::TypeKey;

/// A resolved, shared instance. Singletons are handed out as clones of
/// the same `Arc`; transients are fresh `Arc`s per call.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Type alias for constructor functions.
///
/// A constructor takes the resolved arguments (declaration order) and
/// returns a type-erased instance or an error.
///
/// `Arc` rather than `Box`: constructors are cloned out of the registry
/// so the registry lock never spans a construction.
pub type ConstructorFn = Arc<dyn Fn(Args<'_>) -> Result<Instance> + Send + Sync>;

/// Positional, typed access to a constructor's resolved arguments.
///
/// Index `i` corresponds to parameter `i` of the declaration supplied by
/// the metadata source.
///
/// # Examples
/// ```rust,ignore
/// injector.register::<UserRepository>(|args| {
///     Ok(UserRepository { db: args.arg::<Database>(0)? })
/// })?;
/// ```
pub struct Args<'a> {
    consumer: &'a TypeKey,
    resolved: &'a [Instance],
}

impl<'a> Args<'a> {
    pub(crate) fn new(consumer: &'a TypeKey, resolved: &'a [Instance]) -> Self {
        Self { consumer, resolved }
    }

    /// Number of resolved arguments.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Returns `true` if the constructor takes no arguments.
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Returns the argument at `index`, downcast to `D`.
    ///
    /// # Errors
    /// [`AmanahError::ConstructionFailed`] if `index` is out of range or
    /// the resolved instance is not a `D`.
    pub fn arg<D: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<D>> {
        let instance = self.resolved.get(index).cloned().ok_or_else(|| {
            AmanahError::ConstructionFailed {
                key: self.consumer.clone(),
                source: format!(
                    "constructor argument {index} out of range ({} resolved)",
                    self.resolved.len()
                )
                .into(),
            }
        })?;

        instance
            .downcast::<D>()
            .map_err(|_| AmanahError::ConstructionFailed {
                key: self.consumer.clone(),
                source: format!("constructor argument {index} is not a {}", type_name::<D>())
                    .into(),
            })
    }
}

/// A registry entry binding a type key to its constructor and (lazily)
/// its singleton instance.
///
/// The instance cell transitions exactly once from empty to populated,
/// on the first successful singleton resolution. Nothing outside the
/// registry writes it, and a failed resolution leaves it empty.
pub struct Provider {
    key: TypeKey,
    constructor: ConstructorFn,
    instance: OnceCell<Instance>,
}

impl Provider {
    /// Creates an unpopulated provider.
    pub fn new(key: TypeKey, constructor: ConstructorFn) -> Self {
        Self {
            key,
            constructor,
            instance: OnceCell::new(),
        }
    }

    /// The key this provider was registered under.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Clones out the constructor handle.
    pub fn constructor(&self) -> ConstructorFn {
        Arc::clone(&self.constructor)
    }

    /// The cached singleton, if one has been stored.
    pub fn cached(&self) -> Option<Instance> {
        self.instance.get().cloned()
    }

    /// Returns `true` once a singleton has been stored.
    pub fn is_populated(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Stores `instance` if the cell is still empty and returns the
    /// stored value either way. The first writer wins; later candidates
    /// are dropped.
    pub fn populate(&self, instance: Instance) -> Instance {
        self.instance.get_or_init(|| instance).clone()
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("key", &self.key)
            .field("populated", &self.is_populated())
            .finish()
    }
}
