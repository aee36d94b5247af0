//! Core container implementation for Amanah DI.

pub mod error;
pub mod injector;
pub mod key;
pub mod metadata;
pub mod provider;
mod registry;

pub use error::{AmanahError, Result};
pub use injector::{Injector, prelude};
pub use key::TypeKey;
pub use metadata::{DeclarationTable, MetadataSource};
