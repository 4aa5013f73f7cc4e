//! CLI-level error type: wraps a [`vortex_resolver::ResolveError`] or an
//! invocation-time failure (bad arguments, unwritable output directory)
//! and maps either onto the process exit code documented for this binary.

use std::path::PathBuf;

use thiserror::Error;
use vortex_resolver::ResolveError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("could not create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write output file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid --env entry '{0}', expected KEY=VALUE")]
    BadEnvEntry(String),

    #[error("could not read env file '{path}': {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// 1 for a malformed invocation, 2 for a configuration-level failure
    /// that bubbled up from the resolver; matches the resolver's own
    /// exit-code table exactly for the `Resolve` variant.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Resolve(e) => e.exit_code(),
            CliError::BadEnvEntry(_) => 1,
            CliError::OutputDir { .. } | CliError::Write { .. } | CliError::EnvFile { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_exit_code_passthrough() {
        let err = CliError::Resolve(ResolveError::ProjectNotFound(PathBuf::from("x")));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_bad_env_entry_is_user_error() {
        let err = CliError::BadEnvEntry("no-equals-sign".to_string());
        assert_eq!(err.exit_code(), 1);
    }
}
