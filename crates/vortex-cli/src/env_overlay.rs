//! Builds the environment overlay the resolver uses for placeholder
//! fallback and VCAP extraction.
//!
//! Precedence, lowest to highest: `--env-file` entries (later files win
//! over earlier ones), the process environment (unless
//! `--no-system-env`), then explicit `--env KEY=VAL` overrides.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::CliError;

/// Builds the overlay from the three sources in increasing precedence.
pub fn build(
    env_files: &[std::path::PathBuf],
    include_system_env: bool,
    overrides: &[String],
) -> Result<IndexMap<String, String>, CliError> {
    let mut overlay = IndexMap::new();

    for path in env_files {
        for (key, value) in read_env_file(path)? {
            overlay.insert(key, value);
        }
    }

    if include_system_env {
        for (key, value) in std::env::vars() {
            overlay.insert(key, value);
        }
    }

    for entry in overrides {
        let (key, value) = split_override(entry)?;
        overlay.insert(key, value);
    }

    Ok(overlay)
}

fn read_env_file(path: &Path) -> Result<IndexMap<String, String>, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = dotenv_parser::parse_dotenv(&raw).unwrap_or_default();
    Ok(parsed.into_iter().collect())
}

fn split_override(entry: &str) -> Result<(String, String), CliError> {
    entry
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| CliError::BadEnvEntry(entry.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_overrides_win_over_env_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(".env");
        std::fs::write(&file, "FOO=from_file\n").unwrap();

        let overlay = build(&[file], false, &["FOO=from_override".to_string()]).unwrap();
        assert_eq!(overlay.get("FOO").map(String::as_str), Some("from_override"));
    }

    #[test]
    fn test_later_env_file_wins() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.env");
        let second = dir.path().join("b.env");
        std::fs::write(&first, "FOO=a\n").unwrap();
        std::fs::write(&second, "FOO=b\n").unwrap();

        let overlay = build(&[first, second], false, &[]).unwrap();
        assert_eq!(overlay.get("FOO").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_no_system_env_excludes_process_vars() {
        unsafe {
            std::env::set_var("VORTEX_CLI_TEST_VAR", "1");
        }
        let overlay = build(&[], false, &[]).unwrap();
        assert!(!overlay.contains_key("VORTEX_CLI_TEST_VAR"));
        unsafe {
            std::env::remove_var("VORTEX_CLI_TEST_VAR");
        }
    }

    #[test]
    fn test_bad_override_entry_is_rejected() {
        let err = build(&[], false, &["no-equals-here".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
