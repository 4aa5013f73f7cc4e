//! Error types for the resolution pipeline.

use std::path::PathBuf;

/// Errors that can occur while resolving a Spring Boot style configuration tree.
///
/// Every variant that is fatal (see `exit_code`) corresponds to an entry in
/// the CLI's exit-code table; the CLI boundary never re-derives that mapping,
/// it just calls [`ResolveError::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The given project path does not exist or is not a directory.
    #[error("project path '{0}' does not exist or is not a directory")]
    ProjectNotFound(PathBuf),

    /// Failed to parse a configuration file (malformed YAML, bad escape, etc).
    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A `spring.profiles.group.*` expansion formed a cycle.
    #[error("circular profile group: {chain}")]
    ProfileGroupCycle { chain: String },

    /// A `spring.config.import` chain formed a cycle.
    #[error("circular config import: {chain}")]
    ImportCycle { chain: String },

    /// A required (non-`optional:`) import could not be resolved.
    #[error("could not resolve required import '{target}': {reason}")]
    ImportNotFound { target: String, reason: String },

    /// Generic I/O failure reading a file that was expected to be readable.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Creates a [`ResolveError::Parse`].
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`ResolveError::ProfileGroupCycle`] from the offending chain.
    pub fn profile_group_cycle(chain: impl Into<String>) -> Self {
        Self::ProfileGroupCycle {
            chain: chain.into(),
        }
    }

    /// Creates a [`ResolveError::ImportCycle`] from the offending chain.
    pub fn import_cycle(chain: impl Into<String>) -> Self {
        Self::ImportCycle {
            chain: chain.into(),
        }
    }

    /// Creates a [`ResolveError::ImportNotFound`].
    pub fn import_not_found(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImportNotFound {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`ResolveError::Io`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this is a cycle of any kind (profile group or import).
    pub fn is_cycle(&self) -> bool {
        matches!(
            self,
            Self::ProfileGroupCycle { .. } | Self::ImportCycle { .. }
        )
    }

    /// Maps this error onto the process exit code described in the CLI's
    /// error handling design: 1 for a bad invocation (missing project), 2
    /// for everything else (these are all configuration-level failures).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ProjectNotFound(_) => 1,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ResolveError::ProjectNotFound("x".into()).exit_code(), 1);
        assert_eq!(ResolveError::parse("a.yml", "bad").exit_code(), 2);
        assert_eq!(
            ResolveError::profile_group_cycle("a -> b -> a").exit_code(),
            2
        );
    }

    #[test]
    fn test_is_cycle() {
        assert!(ResolveError::profile_group_cycle("a -> a").is_cycle());
        assert!(ResolveError::import_cycle("x -> x").is_cycle());
        assert!(!ResolveError::parse("f", "r").is_cycle());
    }

    #[test]
    fn test_display() {
        let err = ResolveError::import_not_found("file:missing.yml", "no such file");
        assert!(err.to_string().contains("missing.yml"));
    }
}
