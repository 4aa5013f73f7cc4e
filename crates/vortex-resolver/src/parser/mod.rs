//! Reads `application*.{yml,yaml,properties}` files into a list of
//! [`ConfigDocument`]s, extracting each document's activation directive.

mod properties;
mod yaml;

use indexmap::IndexMap;
use vortex_core::ConfigValue;

use crate::discovery::{profile_suffix, DiscoveredFile};
use crate::error::ResolveError;
use crate::expr::ProfileExpr;
use crate::model::{ConfigDocument, Warning, WarningCategory};

/// The outcome of parsing one file: the documents it contributed (after
/// dropping any that violate a restriction) plus any warnings raised along
/// the way.
pub struct ParsedFile {
    pub documents: Vec<ConfigDocument>,
    pub warnings: Vec<Warning>,
}

/// Parses a single discovered file into its constituent documents.
pub fn parse_file(file: &DiscoveredFile) -> Result<ParsedFile, ResolveError> {
    tracing::trace!(file = %file.path.display(), "reading config file");
    let raw = std::fs::read_to_string(&file.path)
        .map_err(|e| ResolveError::io(&file.path, e))?;

    let extension = file
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let raw_documents = match extension.as_str() {
        "yml" | "yaml" => yaml::split_documents(&raw, &file.path)?,
        "properties" => properties::split_sections(&raw, &file.path)?,
        other => {
            return Err(ResolveError::parse(
                &file.path,
                format!("unsupported extension '{other}'"),
            ))
        },
    };

    let implicit_profile = profile_suffix(&file.path);
    let mut documents = Vec::with_capacity(raw_documents.len());
    let mut warnings = Vec::new();

    for (index, mut content) in raw_documents.into_iter().enumerate() {
        let extracted = extract_activation(&mut content, &file.path, index);
        warnings.extend(extracted.warnings);
        if extracted.drop_document {
            continue;
        }

        let activation = extracted
            .activation
            .or_else(|| implicit_profile.clone().map(ProfileExpr::Ident));

        // A document can be profile-specific either via an explicit
        // `on-profile` (already checked inside `extract_activation`) or via
        // the `application-<profile>.*` filename convention, which
        // `extract_activation` has no visibility into. Re-check the group
        // restriction here so a filename-implied profile document is held
        // to the same rule as an explicitly activated one.
        if activation.is_some() && extracted.activation.is_none() {
            if let Some(warning) = strip_group_if_present(&mut content, &file.path, index) {
                warnings.push(warning);
            }
        }

        documents.push(ConfigDocument {
            content,
            activation,
            on_cloud_platform: extracted.on_cloud_platform,
            source_file: file.path.clone(),
            document_index: index,
            is_main: file.is_main,
        });
    }

    Ok(ParsedFile {
        documents,
        warnings,
    })
}

struct ExtractedActivation {
    activation: Option<ProfileExpr>,
    on_cloud_platform: Option<String>,
    drop_document: bool,
    warnings: Vec<Warning>,
}

fn extract_activation(
    content: &mut vortex_core::ConfigMap,
    path: &std::path::Path,
    index: usize,
) -> ExtractedActivation {
    let mut warnings = Vec::new();

    let on_cloud_platform = remove_path(content, &["spring", "config", "activate", "on-cloud-platform"])
        .and_then(|v| v.as_str().map(str::to_string));
    if let Some(platform) = &on_cloud_platform {
        tracing::debug!(path = %path.display(), index, platform, "on-cloud-platform recorded as unconditionally active");
        warnings.push(Warning::new(
            WarningCategory::CloudPlatform,
            format!(
                "{}#{index}: on-cloud-platform '{platform}' is recorded but treated as unconditionally active (no platform hint supplied)",
                path.display()
            ),
        ));
    }

    let on_profile_raw = remove_path(content, &["spring", "config", "activate", "on-profile"]);

    let mut activation = None;
    let mut drop_document = false;

    if let Some(raw) = on_profile_raw {
        let raw_str = match &raw {
            ConfigValue::String(s) => s.clone(),
            other => format!("{other:?}"),
        };
        match ProfileExpr::parse(&raw_str) {
            Ok(expr) => activation = Some(expr),
            Err(e) => {
                tracing::warn!(path = %path.display(), index, expr = %raw_str, error = %e, "invalid profile expression, dropping document");
                warnings.push(Warning::new(
                    WarningCategory::RestrictionViolation,
                    format!(
                        "{}#{index}: invalid profile expression '{raw_str}': {e} (document dropped)",
                        path.display()
                    ),
                ));
                drop_document = true;
            },
        }
    }

    if activation.is_some() && !drop_document {
        let conflicts_with_active_list = contains_path(content, &["spring", "profiles", "active"])
            || contains_path(content, &["spring", "profiles", "include"]);
        if conflicts_with_active_list {
            tracing::warn!(path = %path.display(), index, "on-profile combined with profiles.active/include, dropping document");
            warnings.push(Warning::new(
                WarningCategory::RestrictionViolation,
                format!(
                    "{}#{index}: spring.config.activate.on-profile cannot be combined with spring.profiles.active/include in the same document (document dropped)",
                    path.display()
                ),
            ));
            drop_document = true;
        }

        if let Some(warning) = strip_group_if_present(content, path, index) {
            warnings.push(warning);
        }
    }

    ExtractedActivation {
        activation,
        on_cloud_platform,
        drop_document,
        warnings,
    }
}

/// Removes `spring.profiles.group.*` from `content` if present, returning a
/// restriction-violation warning. Used both for documents carrying an
/// explicit `on-profile` and for documents whose activation comes only from
/// the `application-<profile>.*` filename convention — either way, a
/// profile-specific document may not define groups.
fn strip_group_if_present(
    content: &mut vortex_core::ConfigMap,
    path: &std::path::Path,
    index: usize,
) -> Option<Warning> {
    if !contains_path(content, &["spring", "profiles", "group"]) {
        return None;
    }
    remove_path(content, &["spring", "profiles", "group"]);
    tracing::warn!(path = %path.display(), index, "spring.profiles.group.* stripped from profile-specific document");
    Some(Warning::new(
        WarningCategory::RestrictionViolation,
        format!(
            "{}#{index}: spring.profiles.group.* is not allowed in a profile-specific document (directive dropped)",
            path.display()
        ),
    ))
}

fn remove_path(content: &mut vortex_core::ConfigMap, path: &[&str]) -> Option<ConfigValue> {
    remove_path_rec(content.as_inner_mut(), path)
}

fn remove_path_rec(map: &mut IndexMap<String, ConfigValue>, path: &[&str]) -> Option<ConfigValue> {
    if path.len() == 1 {
        return map.shift_remove(path[0]);
    }
    match map.get_mut(path[0]) {
        Some(ConfigValue::Object(inner)) => remove_path_rec(inner, &path[1..]),
        _ => None,
    }
}

fn contains_path(content: &vortex_core::ConfigMap, path: &[&str]) -> bool {
    get_path(content.as_inner(), path).is_some()
}

fn get_path<'a>(map: &'a IndexMap<String, ConfigValue>, path: &[&str]) -> Option<&'a ConfigValue> {
    let value = map.get(*path.first()?)?;
    if path.len() == 1 {
        return Some(value);
    }
    match value {
        ConfigValue::Object(inner) => get_path(inner, &path[1..]),
        _ => None,
    }
}
