//! Emits the merged configuration as a YAML document annotated with
//! `# From: <file>` source-attribution comments.
//!
//! Grounded on `vortex_core::config::map::ConfigMap::to_yaml` for the base
//! serialization, but walked manually here (rather than handed straight to
//! `serde_yaml`) so that per-key comments can be interleaved with the
//! emitted structure.

use std::path::Path;

use indexmap::IndexMap;
use vortex_core::ConfigValue;
use vortex_resolver::ConfigSource;

/// Renders `config` as an annotated YAML document.
///
/// When every leaf beneath a mapping key shares one source, a block
/// comment `# From: <path>` precedes the mapping and no further inline
/// comments are emitted beneath it. When leaves diverge, each leaf gets its
/// own inline `# <path>` comment.
pub fn render(
    config: &vortex_core::ConfigMap,
    sources: &IndexMap<String, ConfigSource>,
    base: &Path,
) -> String {
    let mut out = String::new();
    emit_object(&mut out, config.as_inner(), "", 0, sources, base, false);
    out
}

fn emit_object(
    out: &mut String,
    map: &IndexMap<String, ConfigValue>,
    prefix: &str,
    indent: usize,
    sources: &IndexMap<String, ConfigSource>,
    base: &Path,
    suppress_comments: bool,
) {
    for (key, value) in map {
        let path = join_path(prefix, key);
        let pad = "  ".repeat(indent);

        match value {
            ConfigValue::Object(child) if !child.is_empty() => {
                let uniform = uniform_source(&path, sources);
                let block = uniform.filter(|_| !suppress_comments);
                if let Some(source) = block {
                    out.push_str(&format!("{pad}# From: {}\n", source.relative_to(base).display()));
                }
                out.push_str(&format!("{pad}{key}:\n"));
                emit_object(
                    out,
                    child,
                    &path,
                    indent + 1,
                    sources,
                    base,
                    suppress_comments || block.is_some(),
                );
            },
            _ => emit_leaf(out, key, value, &path, &pad, sources, base, suppress_comments),
        }
    }
}

fn emit_leaf(
    out: &mut String,
    key: &str,
    value: &ConfigValue,
    path: &str,
    pad: &str,
    sources: &IndexMap<String, ConfigSource>,
    base: &Path,
    suppress_comments: bool,
) {
    let comment = if suppress_comments {
        None
    } else {
        sources
            .get(path)
            .map(|source| format!("  # {}", source.relative_to(base).display()))
    };

    match value {
        ConfigValue::Array(items) if is_scalar_sequence(items) => {
            let rendered = items.iter().map(scalar_to_yaml).collect::<Vec<_>>().join(", ");
            out.push_str(&format!(
                "{pad}{key}: [{rendered}]{}\n",
                comment.unwrap_or_default()
            ));
        },
        ConfigValue::Array(items) => {
            out.push_str(&format!("{pad}{key}:{}\n", comment.unwrap_or_default()));
            let item_indent = pad.len() / 2;
            for item in items {
                emit_sequence_item(out, item, item_indent);
            }
        },
        ConfigValue::Object(_) => {
            // Empty mapping: the path exists but has no children.
            out.push_str(&format!("{pad}{key}: {{}}{}\n", comment.unwrap_or_default()));
        },
        scalar => {
            out.push_str(&format!("{pad}{key}: {}{}\n", scalar_to_yaml(scalar), comment.unwrap_or_default()));
        },
    }
}

/// Sequences are attributed to their containing path as a whole, so
/// elements inside a sequence never carry their own source comments —
/// nested objects here are rendered plain, with no lookups against the
/// source map.
fn emit_sequence_item(out: &mut String, item: &ConfigValue, indent: usize) {
    let pad = "  ".repeat(indent);
    match item {
        ConfigValue::Object(map) => {
            out.push_str(&format!("{pad}  -\n"));
            emit_plain_object(out, map, indent + 2);
        },
        other => out.push_str(&format!("{pad}  - {}\n", scalar_to_yaml(other))),
    }
}

fn emit_plain_object(out: &mut String, map: &IndexMap<String, ConfigValue>, indent: usize) {
    let pad = "  ".repeat(indent);
    for (key, value) in map {
        match value {
            ConfigValue::Object(child) if !child.is_empty() => {
                out.push_str(&format!("{pad}{key}:\n"));
                emit_plain_object(out, child, indent + 1);
            },
            ConfigValue::Array(items) if is_scalar_sequence(items) => {
                let rendered = items.iter().map(scalar_to_yaml).collect::<Vec<_>>().join(", ");
                out.push_str(&format!("{pad}{key}: [{rendered}]\n"));
            },
            ConfigValue::Array(items) => {
                out.push_str(&format!("{pad}{key}:\n"));
                for item in items {
                    emit_sequence_item(out, item, indent);
                }
            },
            scalar => out.push_str(&format!("{pad}{key}: {}\n", scalar_to_yaml(scalar))),
        }
    }
}

fn is_scalar_sequence(items: &[ConfigValue]) -> bool {
    items
        .iter()
        .all(|item| !matches!(item, ConfigValue::Object(_) | ConfigValue::Array(_)))
}

fn scalar_to_yaml(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Null => "null".to_string(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Integer(i) => i.to_string(),
        ConfigValue::Float(f) => f.into_inner().to_string(),
        ConfigValue::String(s) => quote_if_needed(s),
        ConfigValue::Array(items) => {
            format!("[{}]", items.iter().map(scalar_to_yaml).collect::<Vec<_>>().join(", "))
        },
        ConfigValue::Object(_) => "{}".to_string(),
    }
}

/// Quotes a string scalar when it would otherwise be ambiguous in YAML
/// (looks like a number/bool/null, is empty, or contains `: ` / `#`).
fn quote_if_needed(s: &str) -> String {
    let needs_quoting = s.is_empty()
        || s.parse::<f64>().is_ok()
        || matches!(s, "true" | "false" | "null" | "~")
        || s.contains(": ")
        || s.contains('#')
        || s.starts_with(['[', '{', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`']);

    if needs_quoting {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        s.to_string()
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Returns the single source shared by every leaf beneath `path`, or `None`
/// if leaves diverge (or there are none).
fn uniform_source<'a>(path: &str, sources: &'a IndexMap<String, ConfigSource>) -> Option<&'a ConfigSource> {
    let prefix = format!("{path}.");
    let mut under = sources
        .iter()
        .filter(|(key, _)| key.as_str() == path || key.starts_with(&prefix))
        .map(|(_, source)| source);

    let first = under.next()?;
    if under.all(|source| source == first) {
        Some(first)
    } else {
        None
    }
}
