//! # Amanah — Reflective Singleton DI for Rust
//!
//! A small IoC container: register constructible types, declare their
//! constructor parameters through an explicit metadata source, and
//! resolve fully wired singleton (or transient) instances on demand.

pub use amanah_container::*;
pub use amanah_support::*;
