//! Orchestrates the full resolution pipeline: discover, parse, splice
//! imports, expand profile groups, filter by activation, merge with source
//! attribution, overlay environment and VCAP, then resolve placeholders.

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};

use crate::discovery;
use crate::error::ResolveError;
use crate::model::{ConfigDocument, ConfigSource, ResolverResult, Warning, WarningCategory};
use crate::{imports, merger, parser, placeholders, profiles, vcap};

/// Everything the resolver needs that isn't baked into the configuration
/// files themselves.
pub struct ResolveOptions {
    /// Root of the project to resolve; `src/main/resources` (and, if
    /// `include_test`, `src/test/resources`) are resolved relative to it.
    pub project_path: PathBuf,
    /// Requested profile names, pre-group-expansion, in CLI order.
    pub profiles: Vec<String>,
    /// Additional main-resource roots, applied after the conventional one.
    pub extra_resource_roots: Vec<PathBuf>,
    /// Whether to also load `src/test/resources`, applied last.
    pub include_test: bool,
    /// The environment overlay (process env, `--env-file`, `--env`), already
    /// merged by the caller; consumed for both placeholder resolution and
    /// `VCAP_APPLICATION`/`VCAP_SERVICES` extraction.
    pub env: IndexMap<String, String>,
}

/// Runs the full pipeline and returns the merged, placeholder-resolved
/// configuration plus its source map, warnings, and active profile list.
pub fn resolve(options: &ResolveOptions) -> Result<ResolverResult, ResolveError> {
    tracing::info!(project = %options.project_path.display(), profiles = ?options.profiles, "resolving effective configuration");

    if !options.project_path.is_dir() {
        tracing::error!(project = %options.project_path.display(), "project path is not a directory");
        return Err(ResolveError::ProjectNotFound(options.project_path.clone()));
    }

    let mut main_roots = vec![discovery::default_main_root(&options.project_path)];
    main_roots.extend(options.extra_resource_roots.iter().cloned());
    let test_roots = if options.include_test {
        vec![discovery::default_test_root(&options.project_path)]
    } else {
        Vec::new()
    };

    let discovered = discovery::discover(&main_roots, &test_roots);
    let mut all_roots = main_roots.clone();
    all_roots.extend(test_roots.iter().cloned());

    let mut documents = Vec::new();
    let mut warnings = Vec::new();
    for file in &discovered {
        let parsed = parser::parse_file(file)?;
        warnings.extend(parsed.warnings);
        documents.extend(parsed.documents);
    }
    tracing::debug!(documents = documents.len(), "parsed documents before import expansion");

    let (documents, import_warnings) = imports::expand_imports(documents, &all_roots)?;
    warnings.extend(import_warnings);

    let groups = profiles::collect_groups(&documents);
    let active_list = profiles::expand_profiles(&options.profiles, &groups)?;
    let active_set: IndexSet<String> = active_list.iter().cloned().collect();
    tracing::debug!(active = ?active_list, "active profile set expanded");

    warnings.extend(unknown_profile_warnings(&options.profiles, &documents, &groups));

    let applicable = profiles::filter_applicable(documents, &active_set);
    tracing::debug!(applicable = applicable.len(), "documents applicable under active profiles");
    let (mut merged, mut sources) = merger::merge(&applicable);

    let mut vcap_tree = vcap::build_vcap_tree(&options.env);
    if !vcap_tree.is_empty() {
        for (top_key, value) in &vcap_tree {
            let source = ConfigSource::new(vcap_source_file(top_key), 0);
            record_vcap_leaf_sources(value, &format!("vcap.{top_key}"), &source, &mut sources);
        }

        let vcap_value = merged.as_inner_mut().entry("vcap".to_string());
        match vcap_value {
            indexmap::map::Entry::Occupied(mut existing) => {
                if let vortex_core::ConfigValue::Object(existing_map) = existing.get_mut() {
                    for (k, v) in vcap_tree.drain(..) {
                        existing_map.insert(k, v);
                    }
                }
            },
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(vortex_core::ConfigValue::Object(vcap_tree));
            },
        }
    }

    let placeholder_warnings = placeholders::resolve(merged.as_inner_mut(), &options.env);
    warnings.extend(placeholder_warnings);

    tracing::info!(warnings = warnings.len(), "resolution complete");
    Ok(ResolverResult {
        config: merged,
        sources,
        warnings,
        active_profiles: active_list,
    })
}

/// The synthetic source file attributed to a `vcap.*` leaf, named after the
/// environment variable that actually contributed it.
fn vcap_source_file(top_key: &str) -> &'static str {
    match top_key {
        "application" => "VCAP_APPLICATION",
        "services" => "VCAP_SERVICES",
        _ => "VCAP",
    }
}

/// Records a source entry for every leaf newly introduced at or beneath
/// `path` within the injected `vcap.*` subtree, mirroring the leaf-recording
/// rule the ordinary document merge uses so every `vcap.*` leaf also gets
/// exactly one entry in the source map.
fn record_vcap_leaf_sources(
    value: &vortex_core::ConfigValue,
    path: &str,
    source: &ConfigSource,
    sources: &mut IndexMap<String, ConfigSource>,
) {
    match value {
        vortex_core::ConfigValue::Object(map) => {
            if map.is_empty() {
                sources.insert(path.to_string(), source.clone());
            } else {
                for (key, child) in map {
                    record_vcap_leaf_sources(child, &format!("{path}.{key}"), source, sources);
                }
            }
        },
        _ => {
            sources.insert(path.to_string(), source.clone());
        },
    }
}

/// A requested profile is "unknown" if it names neither a group nor any
/// identifier referenced by a document's activation expression.
fn unknown_profile_warnings(requested: &[String], documents: &[ConfigDocument], groups: &crate::profiles::GroupTable) -> Vec<Warning> {
    let mut known: IndexSet<String> = IndexSet::new();
    for key in groups.keys() {
        known.insert(key.clone());
    }
    for members in groups.values() {
        known.extend(members.iter().cloned());
    }
    for document in documents {
        if let Some(expr) = &document.activation {
            expr.collect_idents(&mut known);
        }
    }

    requested
        .iter()
        .filter(|name| !known.contains(*name))
        .map(|name| {
            Warning::new(
                WarningCategory::UnknownProfile,
                format!("requested profile '{name}' matches no document or group"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &std::path::Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_s1_basic_override_end_to_end() {
        let project = tempdir().unwrap();
        write(
            project.path(),
            "src/main/resources/application.yml",
            "server:\n  port: 8080\napp:\n  name: demo\n",
        );
        write(
            project.path(),
            "src/main/resources/application-prod.yml",
            "server:\n  port: 80\n",
        );

        let options = ResolveOptions {
            project_path: project.path().to_path_buf(),
            profiles: vec!["prod".to_string()],
            extra_resource_roots: Vec::new(),
            include_test: false,
            env: IndexMap::new(),
        };
        let result = resolve(&options).unwrap();
        assert_eq!(result.config.get("server.port").unwrap().as_i64(), Some(80));
        assert_eq!(result.config.get("app.name").unwrap().as_str(), Some("demo"));
        assert_eq!(result.active_profiles, vec!["prod".to_string()]);
    }

    #[test]
    fn test_project_not_found_is_fatal_with_exit_code_one() {
        let options = ResolveOptions {
            project_path: PathBuf::from("/does/not/exist/ever"),
            profiles: vec!["prod".to_string()],
            extra_resource_roots: Vec::new(),
            include_test: false,
            env: IndexMap::new(),
        };
        let err = resolve(&options).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_unknown_profile_warns_but_does_not_fail() {
        let project = tempdir().unwrap();
        write(project.path(), "src/main/resources/application.yml", "a: 1\n");

        let options = ResolveOptions {
            project_path: project.path().to_path_buf(),
            profiles: vec!["ghost".to_string()],
            extra_resource_roots: Vec::new(),
            include_test: false,
            env: IndexMap::new(),
        };
        let result = resolve(&options).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.category == WarningCategory::UnknownProfile));
    }

    #[test]
    fn test_s5_placeholder_resolution_end_to_end() {
        let project = tempdir().unwrap();
        write(
            project.path(),
            "src/main/resources/application.yml",
            "database:\n  host: localhost\n  url: \"jdbc:postgresql://${database.host}:5432/app\"\n",
        );

        let options = ResolveOptions {
            project_path: project.path().to_path_buf(),
            profiles: vec![],
            extra_resource_roots: Vec::new(),
            include_test: false,
            env: IndexMap::new(),
        };
        let result = resolve(&options).unwrap();
        assert_eq!(
            result.config.get("database.url").unwrap().as_str(),
            Some("jdbc:postgresql://localhost:5432/app")
        );
    }

    #[test]
    fn test_include_test_adds_test_resources_last() {
        let project = tempdir().unwrap();
        write(project.path(), "src/main/resources/application.yml", "a: 1\nb: 1\n");
        write(project.path(), "src/test/resources/application.yml", "b: 2\n");

        let options = ResolveOptions {
            project_path: project.path().to_path_buf(),
            profiles: vec![],
            extra_resource_roots: Vec::new(),
            include_test: true,
            env: IndexMap::new(),
        };
        let result = resolve(&options).unwrap();
        assert_eq!(result.config.get("a").unwrap().as_i64(), Some(1));
        assert_eq!(result.config.get("b").unwrap().as_i64(), Some(2));
    }

    #[test]
    fn test_vcap_services_merged_into_config() {
        let project = tempdir().unwrap();
        write(project.path(), "src/main/resources/application.yml", "a: 1\n");

        let mut env = IndexMap::new();
        env.insert(
            "VCAP_SERVICES".to_string(),
            r#"{"postgresql":[{"name":"my-db","credentials":{"uri":"postgres://x"}}]}"#.to_string(),
        );

        let options = ResolveOptions {
            project_path: project.path().to_path_buf(),
            profiles: vec![],
            extra_resource_roots: Vec::new(),
            include_test: false,
            env,
        };
        let result = resolve(&options).unwrap();
        assert_eq!(
            result.config.get("vcap.services.my-db.credentials.uri").unwrap().as_str(),
            Some("postgres://x")
        );
        assert_eq!(
            result.sources.get("vcap.services.my-db.credentials.uri").map(|s| s.file.as_path()),
            Some(std::path::Path::new("VCAP_SERVICES"))
        );
    }
}
