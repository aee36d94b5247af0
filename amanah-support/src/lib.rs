//! # Amanah Support
//!
//! Shared utilities for the Amanah DI container.
//!
//! This crate provides:
//! - Text rendering for error messages (dependency chains, type names)
//! - "Did you mean?" suggestion helpers

pub mod rendering;
