//! Vortex Core - Domain types and traits
//!
//! This crate provides the foundational types shared by the rest of the
//! Vortex Config workspace: the `ConfigValue`/`ConfigMap` tree used to
//! represent both individual documents and merged configuration, the
//! format parsers/serializers for YAML, JSON and `.properties`, a generic
//! deep-merge primitive, and the `VortexError` type.
//!
//! Resolution-pipeline concerns (profile expression evaluation, profile
//! group expansion, placeholder substitution, import resolution) live in
//! `vortex-resolver`, which depends on this crate.

pub mod config;
pub mod error;
pub mod format;
pub mod merge;

pub use config::{ConfigMap, ConfigValue};
pub use error::{Result, VortexError};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }

    #[test]
    fn crate_compiles() {
        let v = version();
        assert!(!v.is_empty(), "Version should not be empty");
    }
}
