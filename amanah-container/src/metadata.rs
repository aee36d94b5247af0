//! Constructor metadata sources.
//!
//! The injector never discovers constructor parameter types itself.
//! They come from an injected [`MetadataSource`]: a pure mapping from a
//! type key to the ordered list of type keys its constructor requires.
//! In the absence of runtime reflection this is an explicit declaration
//! table, typically built once at bootstrap.

use std::collections::HashMap;

use crate::key::TypeKey;

/// Supplies the ordered constructor parameter types for registered types.
///
/// Implementations must be pure: the same key always yields the same
/// declaration. The injector re-queries on every resolution pass and
/// never caches declarations.
pub trait MetadataSource: Send + Sync {
    /// Ordered constructor parameter types for `key`, one entry per
    /// parameter, in declaration order.
    ///
    /// A type with no known declaration has no parameters; return an
    /// empty list rather than failing.
    fn param_types(&self, key: &TypeKey) -> Vec<TypeKey>;
}

/// An explicit constructor declaration table.
///
/// The hand-written equivalent of decorator-attached parameter metadata:
/// each constructible type declares its parameter types up front.
///
/// # Examples
/// ```
/// use amanah_container::key::TypeKey;
/// use amanah_container::metadata::{DeclarationTable, MetadataSource};
///
/// struct Database;
/// struct UserRepository;
///
/// let table = DeclarationTable::new()
///     .declare::<Database>(vec![])
///     .declare::<UserRepository>(vec![TypeKey::of::<Database>()]);
///
/// let params = table.param_types(&TypeKey::of::<UserRepository>());
/// assert_eq!(params, vec![TypeKey::of::<Database>()]);
/// ```
#[derive(Debug, Default)]
pub struct DeclarationTable {
    params: HashMap<TypeKey, Vec<TypeKey>>,
}

impl DeclarationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Declares the ordered constructor parameters of `T`.
    ///
    /// Declaring the same type again replaces the previous declaration.
    pub fn declare<T: ?Sized + 'static>(mut self, params: Vec<TypeKey>) -> Self {
        self.params.insert(TypeKey::of::<T>(), params);
        self
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl MetadataSource for DeclarationTable {
    fn param_types(&self, key: &TypeKey) -> Vec<TypeKey> {
        self.params.get(key).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;
    struct Cache;
    struct UserRepository;

    #[test]
    fn declared_order_is_preserved() {
        let table = DeclarationTable::new().declare::<UserRepository>(vec![
            TypeKey::of::<Database>(),
            TypeKey::of::<Cache>(),
        ]);

        let params = table.param_types(&TypeKey::of::<UserRepository>());
        assert_eq!(
            params,
            vec![TypeKey::of::<Database>(), TypeKey::of::<Cache>()]
        );
    }

    #[test]
    fn undeclared_type_has_no_params() {
        let table = DeclarationTable::new();
        assert!(table.param_types(&TypeKey::of::<Database>()).is_empty());
    }

    #[test]
    fn redeclaration_replaces() {
        let table = DeclarationTable::new()
            .declare::<UserRepository>(vec![TypeKey::of::<Database>()])
            .declare::<UserRepository>(vec![TypeKey::of::<Cache>()]);

        assert_eq!(
            table.param_types(&TypeKey::of::<UserRepository>()),
            vec![TypeKey::of::<Cache>()]
        );
        assert_eq!(table.len(), 1);
    }
}
