//! Enumerates `application*.{yml,yaml,properties}` files under resource roots.

use std::path::{Path, PathBuf};

/// A file found by discovery, tagged with the kind of root it came from.
///
/// `is_main` distinguishes main resources (`src/main/resources` plus any
/// user-supplied `--resources` roots) from test resources
/// (`src/test/resources`, only loaded with `--include-test`), because only
/// main-resource base documents may declare `spring.profiles.group.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub is_main: bool,
}

/// Discovers configuration files across main and test resource roots.
///
/// Main roots are enumerated in the order supplied (the conventional
/// `src/main/resources` root is expected to already be the first element);
/// test roots are always enumerated last, matching the "applied last"
/// loading order from the discovery contract. Within a single root, entries
/// are sorted lexicographically so that two equivalent filesystems produce
/// identical output.
pub fn discover(main_roots: &[PathBuf], test_roots: &[PathBuf]) -> Vec<DiscoveredFile> {
    let mut files = Vec::new();
    for root in main_roots {
        for path in discover_root(root) {
            tracing::trace!(file = %path.display(), "discovered main resource");
            files.push(DiscoveredFile { path, is_main: true });
        }
    }
    for root in test_roots {
        for path in discover_root(root) {
            tracing::trace!(file = %path.display(), "discovered test resource");
            files.push(DiscoveredFile {
                path,
                is_main: false,
            });
        }
    }
    tracing::debug!(count = files.len(), "resource discovery complete");
    files
}

/// The standard main-resources root for a project directory.
pub fn default_main_root(project_path: &Path) -> PathBuf {
    project_path.join("src").join("main").join("resources")
}

/// The standard test-resources root for a project directory.
pub fn default_test_root(project_path: &Path) -> PathBuf {
    project_path.join("src").join("test").join("resources")
}

const PATTERNS: &[&str] = &[
    "application.yml",
    "application.yaml",
    "application.properties",
    "application-*.yml",
    "application-*.yaml",
    "application-*.properties",
];

fn discover_root(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for pattern in PATTERNS {
        let glob_pattern = root.join(pattern);
        let Some(pattern_str) = glob_pattern.to_str() else {
            continue;
        };
        let Ok(paths) = glob::glob(pattern_str) else {
            continue;
        };
        for entry in paths.flatten() {
            if entry.is_file() {
                found.push(entry);
            }
        }
    }
    found.sort();
    found.dedup();
    found
}

/// Extracts the profile suffix from a discovered file name: the portion
/// between the leading `application-` and the final extension. Returns
/// `None` for the unsuffixed `application.*` base files.
pub fn profile_suffix(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("application-").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_discover_sorts_lexicographically() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "application-prod.yml");
        touch(dir.path(), "application.yml");
        touch(dir.path(), "application-dev.yml");

        let files = discover(&[dir.path().to_path_buf()], &[]);
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "application-dev.yml",
                "application-prod.yml",
                "application.yml"
            ]
        );
        assert!(files.iter().all(|f| f.is_main));
    }

    #[test]
    fn test_test_roots_come_last() {
        let main_dir = tempdir().unwrap();
        let test_dir = tempdir().unwrap();
        touch(main_dir.path(), "application.yml");
        touch(test_dir.path(), "application-test.yml");

        let files = discover(
            &[main_dir.path().to_path_buf()],
            &[test_dir.path().to_path_buf()],
        );
        assert_eq!(files.len(), 2);
        assert!(files[0].is_main);
        assert!(!files[1].is_main);
    }

    #[test]
    fn test_missing_root_yields_no_files() {
        let files = discover(&[PathBuf::from("/does/not/exist")], &[]);
        assert!(files.is_empty());
    }

    #[test]
    fn test_ignores_unrelated_files() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "application.yml");
        touch(dir.path(), "logback.xml");
        touch(dir.path(), "other-app.yml");

        let files = discover(&[dir.path().to_path_buf()], &[]);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_profile_suffix() {
        assert_eq!(
            profile_suffix(Path::new("application-prod.yml")),
            Some("prod".to_string())
        );
        assert_eq!(profile_suffix(Path::new("application.yml")), None);
        assert_eq!(
            profile_suffix(Path::new("application-prod.properties")),
            Some("prod".to_string())
        );
    }
}
