//! Ordered deep merge with a parallel source-attribution map.
//!
//! Builds on `vortex_core::merge`'s recursion shape but threads a
//! [`crate::model::ConfigSource`] alongside every merge decision instead of
//! letting the overlay silently win.

use indexmap::IndexMap;
use vortex_core::{ConfigMap, ConfigValue};

use crate::model::{ConfigDocument, ConfigSource};

/// Folds `documents` left to right into a merged tree and a parallel
/// dot-path to source map, per the Merger contract:
/// - mapping × mapping recurses key-wise,
/// - any × scalar replaces (displaced subtrees lose their source entries),
/// - any × sequence replaces as a whole (sequences are never merged),
/// - scalar × mapping replaces (the tree wins).
pub fn merge(documents: &[ConfigDocument]) -> (ConfigMap, IndexMap<String, ConfigSource>) {
    let mut accumulator = ConfigMap::new();
    let mut sources: IndexMap<String, ConfigSource> = IndexMap::new();

    for document in documents {
        let source = document.source();
        tracing::trace!(file = %source.file.display(), index = source.document_index, "merging document");
        merge_object(
            accumulator.as_inner_mut(),
            document.content.as_inner(),
            "",
            &source,
            &mut sources,
        );
    }

    (accumulator, sources)
}

fn merge_object(
    base: &mut IndexMap<String, ConfigValue>,
    overlay: &IndexMap<String, ConfigValue>,
    prefix: &str,
    source: &ConfigSource,
    sources: &mut IndexMap<String, ConfigSource>,
) {
    for (key, overlay_value) in overlay {
        let path = join_path(prefix, key);
        match base.get_mut(key) {
            Some(base_value) => merge_value(base_value, overlay_value, &path, source, sources),
            None => {
                base.insert(key.clone(), overlay_value.clone());
                record_leaf_sources(overlay_value, &path, source, sources);
            },
        }
    }
}

fn merge_value(
    base: &mut ConfigValue,
    overlay: &ConfigValue,
    path: &str,
    source: &ConfigSource,
    sources: &mut IndexMap<String, ConfigSource>,
) {
    match (&mut *base, overlay) {
        (ConfigValue::Object(base_map), ConfigValue::Object(overlay_map)) => {
            merge_object(base_map, overlay_map, path, source, sources);
        },
        // Any × Sequence, Any × Scalar, Scalar × Mapping: replace wholesale.
        (_, _) => {
            remove_subpaths(sources, path);
            *base = overlay.clone();
            record_leaf_sources(base, path, source, sources);
        },
    }
}

/// Records a source entry for every leaf newly introduced at or beneath
/// `path`. A sequence is attributed as a single leaf at `path` itself,
/// never per-element, per the "sequences are replaced as a unit" rule.
fn record_leaf_sources(
    value: &ConfigValue,
    path: &str,
    source: &ConfigSource,
    sources: &mut IndexMap<String, ConfigSource>,
) {
    match value {
        ConfigValue::Object(map) => {
            if map.is_empty() {
                sources.insert(path.to_string(), clone_source(source));
            } else {
                for (key, child) in map {
                    record_leaf_sources(child, &join_path(path, key), source, sources);
                }
            }
        },
        _ => {
            sources.insert(path.to_string(), clone_source(source));
        },
    }
}

/// Removes every recorded source at or beneath `path` — used when a
/// mapping subtree is displaced by a scalar/sequence/new mapping.
fn remove_subpaths(sources: &mut IndexMap<String, ConfigSource>, path: &str) {
    let prefix = format!("{path}.");
    sources.retain(|key, _| key != path && !key.starts_with(&prefix));
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn clone_source(source: &ConfigSource) -> ConfigSource {
    ConfigSource {
        file: source.file.clone(),
        document_index: source.document_index,
        line: source.line,
    }
}
