//! Error types for injector operations.
//!
//! Every failure carries the offending [`TypeKey`] so the caller can see
//! which type broke the wiring, not just that something did.

use std::fmt;

use amanah_support::rendering::{render_chain, shorten_type_name};

use crate::key::TypeKey;

/// Main error type for all injector operations.
#[derive(Debug, thiserror::Error)]
pub enum AmanahError {
    /// Requested type was never registered.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// A type's declared dependency list names the type itself.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// A constructor failed, or produced a value of the wrong type.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: TypeKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Type was already registered under the same key.
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),
}

/// Error when a type was requested but never registered.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The type that was requested.
    pub requested: TypeKey,
    /// The type whose resolution required it, if any.
    pub required_by: Option<TypeKey>,
    /// Registered type names that look similar ("did you mean?").
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider not registered: {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: call register::<{}>() before resolving it",
            shorten_type_name(self.requested.type_name())
        )
    }
}

/// Error when a type declares itself as one of its own constructor
/// parameters.
#[derive(Debug)]
pub struct CircularDependencyError {
    /// The self-referential type.
    pub key: TypeKey,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = shorten_type_name(self.key.type_name());
        write!(
            f,
            "Circular dependency found during instantiation of {}:\n  {}",
            self.key,
            render_chain(&[name.as_str(), name.as_str()]),
        )?;
        write!(
            f,
            "\n  Hint: a type cannot appear in its own constructor parameter list"
        )
    }
}

/// Error when registering a type that already has a provider.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub key: TypeKey,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider already registered: {}", self.key)
    }
}

/// Convenient Result type for injector operations.
pub type Result<T> = std::result::Result<T, AmanahError>;
