//! `spring.config.import` resolution: splices imported documents into the
//! document stream immediately after the importing document, transitively,
//! with cycle detection over the absolute paths on the current import stack.

use std::path::{Path, PathBuf};

use vortex_core::ConfigValue;

use crate::discovery::DiscoveredFile;
use crate::error::ResolveError;
use crate::model::{ConfigDocument, Warning, WarningCategory};
use crate::parser;

/// One `spring.config.import` entry, decoded into its scheme and target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ImportTarget {
    File(String),
    Classpath(String),
}

struct ParsedImport {
    target: ImportTarget,
    optional: bool,
    raw: String,
}

/// Expands every `spring.config.import` directive found in `documents`,
/// splicing each import's documents immediately after the importing
/// document. Classpath imports are resolved against `resource_roots` in
/// order; file imports are resolved relative to the importing file's
/// directory.
pub fn expand_imports(
    documents: Vec<ConfigDocument>,
    resource_roots: &[PathBuf],
) -> Result<(Vec<ConfigDocument>, Vec<Warning>), ResolveError> {
    let mut warnings = Vec::new();
    let mut result = Vec::with_capacity(documents.len());

    for mut document in documents {
        let imports = take_imports(&mut document)?;
        result.push(document);

        for import in imports {
            let mut stack = vec![result.last().unwrap().source_file.clone()];
            expand_one_import(&import, &mut stack, resource_roots, &mut result, &mut warnings)?;
        }
    }

    Ok((result, warnings))
}

fn expand_one_import(
    import: &ParsedImport,
    stack: &mut Vec<PathBuf>,
    resource_roots: &[PathBuf],
    result: &mut Vec<ConfigDocument>,
    warnings: &mut Vec<Warning>,
) -> Result<(), ResolveError> {
    let resolved = match &import.target {
        ImportTarget::File(rel) => {
            let base = stack.last().unwrap().parent().map(Path::to_path_buf).unwrap_or_default();
            Some(base.join(rel))
        },
        ImportTarget::Classpath(rel) => resource_roots
            .iter()
            .map(|root| root.join(rel))
            .find(|candidate| candidate.is_file()),
    };

    let resolved = match resolved.filter(|p| p.is_file()) {
        Some(path) => path,
        None => {
            if import.optional {
                tracing::warn!(import = %import.raw, "optional import could not be resolved, skipping");
                warnings.push(Warning::new(
                    WarningCategory::ImportNotFound,
                    format!("optional import '{}' could not be resolved", import.raw),
                ));
                return Ok(());
            }
            tracing::error!(import = %import.raw, "required import could not be resolved");
            return Err(ResolveError::import_not_found(
                &import.raw,
                "no matching file found",
            ));
        },
    };

    let canonical = std::fs::canonicalize(&resolved).unwrap_or(resolved.clone());
    if stack.iter().any(|p| p == &canonical) {
        let mut chain: Vec<String> = stack.iter().map(|p| p.display().to_string()).collect();
        chain.push(canonical.display().to_string());
        let chain = chain.join(" -> ");
        tracing::error!(chain = %chain, "import cycle detected");
        return Err(ResolveError::import_cycle(chain));
    }

    tracing::debug!(file = %resolved.display(), "splicing imported document");
    let file = DiscoveredFile {
        path: resolved.clone(),
        is_main: true,
    };
    let parsed = parser::parse_file(&file)?;
    warnings.extend(parsed.warnings);

    stack.push(canonical);
    for mut sub_document in parsed.documents {
        let sub_imports = take_imports(&mut sub_document)?;
        result.push(sub_document);
        for sub_import in sub_imports {
            expand_one_import(&sub_import, stack, resource_roots, result, warnings)?;
        }
    }
    stack.pop();

    Ok(())
}

/// Removes `spring.config.import` from the document's content and decodes
/// it into an ordered list of imports (scalar or sequence of strings).
fn take_imports(document: &mut ConfigDocument) -> Result<Vec<ParsedImport>, ResolveError> {
    let Some(raw) = remove_import_key(&mut document.content) else {
        return Ok(Vec::new());
    };

    let raw_strings: Vec<String> = match raw {
        ConfigValue::String(s) => vec![s],
        ConfigValue::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                ConfigValue::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    raw_strings.into_iter().map(|s| parse_import_entry(&s)).collect()
}

fn parse_import_entry(raw: &str) -> Result<ParsedImport, ResolveError> {
    let (optional, rest) = match raw.strip_prefix("optional:") {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let target = if let Some(path) = rest.strip_prefix("file:") {
        ImportTarget::File(path.to_string())
    } else if let Some(path) = rest.strip_prefix("classpath:") {
        ImportTarget::Classpath(path.to_string())
    } else {
        ImportTarget::File(rest.to_string())
    };

    Ok(ParsedImport {
        target,
        optional,
        raw: raw.to_string(),
    })
}

fn remove_import_key(content: &mut vortex_core::ConfigMap) -> Option<ConfigValue> {
    match content.as_inner_mut().get_mut("spring") {
        Some(ConfigValue::Object(spring)) => match spring.get_mut("config") {
            Some(ConfigValue::Object(config)) => config.shift_remove("import"),
            _ => None,
        },
        _ => None,
    }
}
