//! # Vortex Resolver
//!
//! Spring Boot style configuration resolution: discovers
//! `application*.{yml,yaml,properties}` files across a project's resource
//! roots, splices `spring.config.import` chains, expands
//! `spring.profiles.group.*` aliases, filters documents by their
//! `spring.config.activate.on-profile` expression, merges the survivors in
//! order with per-leaf source attribution, and resolves `${...}`
//! placeholders against the merged tree, an environment overlay, and
//! Cloud Foundry's `VCAP_*` variables.
//!
//! ## Example
//!
//! ```ignore
//! use vortex_resolver::{resolve, ResolveOptions};
//! use indexmap::IndexMap;
//! use std::path::PathBuf;
//!
//! let options = ResolveOptions {
//!     project_path: PathBuf::from("."),
//!     profiles: vec!["prod".to_string()],
//!     extra_resource_roots: Vec::new(),
//!     include_test: false,
//!     env: IndexMap::new(),
//! };
//! let result = resolve(&options)?;
//! # Ok::<(), vortex_resolver::ResolveError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod expr;
pub mod imports;
pub mod merger;
pub mod model;
pub mod parser;
pub mod placeholders;
pub mod profiles;
pub mod resolver;
pub mod vcap;

pub use error::ResolveError;
pub use expr::{ExprError, ProfileExpr};
pub use model::{ConfigDocument, ConfigSource, ResolverResult, Warning, WarningCategory};
pub use resolver::{resolve, ResolveOptions};

// Re-export vortex_core for consumers
pub use vortex_core;
