//! `${name}` / `${name:default}` placeholder resolution.
//!
//! Resolution order per placeholder is: the merged configuration tree, then
//! an environment overlay (case-insensitive, with `.`/`-` folded to `_`),
//! then the literal default (which may itself contain placeholders).
//! Placeholders are resolved to a fixed point, bounded by `max_iterations`,
//! with cycle detection over the chain of placeholder names visited while
//! following a reference to its target.

use indexmap::IndexMap;
use vortex_core::ConfigValue;

use crate::model::{Warning, WarningCategory};

const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Resolves every `${...}` placeholder reachable from `tree`, mutating it
/// in place. Returns the warnings raised for unresolved placeholders and
/// cycles (both are left as the literal `${...}` text, never an error).
pub fn resolve(tree: &mut IndexMap<String, ConfigValue>, env: &IndexMap<String, String>) -> Vec<Warning> {
    resolve_with_iterations(tree, env, DEFAULT_MAX_ITERATIONS)
}

pub fn resolve_with_iterations(
    tree: &mut IndexMap<String, ConfigValue>,
    env: &IndexMap<String, String>,
    max_iterations: usize,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for pass in 0..max_iterations {
        let snapshot = ConfigValue::Object(tree.clone());
        let mut changed = false;
        for value in tree.values_mut() {
            resolve_value(value, &snapshot, env, &mut changed, &mut warnings);
        }
        tracing::trace!(pass, changed, "placeholder resolution pass");
        if !changed {
            break;
        }
    }

    collect_unresolved(tree, &mut warnings);
    warnings
}

fn resolve_value(
    value: &mut ConfigValue,
    root: &ConfigValue,
    env: &IndexMap<String, String>,
    changed: &mut bool,
    warnings: &mut Vec<Warning>,
) {
    match value {
        ConfigValue::String(s) => {
            if let Some(resolved) = resolve_string(s, root, env, warnings) {
                if resolved != *value {
                    *changed = true;
                }
                *value = resolved;
            }
        },
        ConfigValue::Array(items) => {
            for item in items {
                resolve_value(item, root, env, changed, warnings);
            }
        },
        ConfigValue::Object(map) => {
            for child in map.values_mut() {
                resolve_value(child, root, env, changed, warnings);
            }
        },
        _ => {},
    }
}

/// Resolves placeholders within one string value. If the entire string is a
/// single `${...}` reference, the replacement value's own type is
/// preserved (scalar re-typing); otherwise the replacement is interpolated
/// as a string.
fn resolve_string(s: &str, root: &ConfigValue, env: &IndexMap<String, String>, warnings: &mut Vec<Warning>) -> Option<ConfigValue> {
    let (start, end, inner) = find_innermost_placeholder(s)?;
    let (name, default) = split_default(inner);

    let mut visiting = Vec::new();
    let replacement = match resolve_reference(name, root, env, &mut visiting) {
        Ok(Some(v)) => v,
        Ok(None) => match default {
            Some(d) => parse_scalar(d),
            None => {
                tracing::warn!(placeholder = name, "placeholder could not be resolved and has no default");
                return None;
            },
        },
        Err(()) => {
            tracing::warn!(placeholder = name, "placeholder reference cycle, left unresolved");
            warnings.push(Warning::new(
                WarningCategory::PlaceholderCycle,
                format!("placeholder '{name}' forms a reference cycle; left unresolved"),
            ));
            return None;
        },
    };

    let is_whole_string = start == 0 && end == s.len();
    if is_whole_string {
        Some(replacement)
    } else {
        let replacement_str = scalar_to_string(&replacement);
        let mut out = String::with_capacity(s.len());
        out.push_str(&s[..start]);
        out.push_str(&replacement_str);
        out.push_str(&s[end..]);
        Some(ConfigValue::String(out))
    }
}

/// Resolves `name` against the tree/environment, following whole-string
/// single-placeholder aliases transitively. `visiting` tracks the chain of
/// names followed so far; re-entering a name already on it is a cycle.
fn resolve_reference(
    name: &str,
    root: &ConfigValue,
    env: &IndexMap<String, String>,
    visiting: &mut Vec<String>,
) -> Result<Option<ConfigValue>, ()> {
    if visiting.iter().any(|v| v == name) {
        return Err(());
    }
    visiting.push(name.to_string());

    let result = match lookup_path(root, name) {
        Some(ConfigValue::String(s)) => match find_innermost_placeholder(s) {
            Some((0, end, inner)) if end == s.len() => {
                let (alias, default) = split_default(inner);
                match resolve_reference(alias, root, env, visiting)? {
                    Some(v) => Some(v),
                    None => default.map(parse_scalar),
                }
            },
            _ => Some(ConfigValue::String(s.clone())),
        },
        Some(other) => Some(other.clone()),
        None => lookup_env(name, env).map(ConfigValue::String),
    };

    visiting.pop();
    Ok(result)
}

/// Finds the innermost `${...}` span (no nested `${` inside it), so that
/// nested placeholders like `${outer:${inner}}` resolve inside-out.
fn find_innermost_placeholder(s: &str) -> Option<(usize, usize, &str)> {
    let mut last_open = None;
    let bytes = s.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'$' && bytes[i + 1] == b'{' {
            last_open = Some(i);
        }
        i += 1;
    }
    let open = last_open?;
    let close_rel = s[open..].find('}')?;
    let close = open + close_rel;
    Some((open, close + 1, &s[open + 2..close]))
}

fn split_default(inner: &str) -> (&str, Option<&str>) {
    match inner.find(':') {
        Some(idx) => (&inner[..idx], Some(&inner[idx + 1..])),
        None => (inner, None),
    }
}

fn lookup_path<'a>(root: &'a ConfigValue, path: &str) -> Option<&'a ConfigValue> {
    let mut current = root;
    for part in path.split('.') {
        match current {
            ConfigValue::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Environment overlay lookup: `database.url` matches `DATABASE_URL`, and
/// `database-url` matches it too, case-insensitively.
fn lookup_env(name: &str, env: &IndexMap<String, String>) -> Option<String> {
    let normalized: String = name
        .chars()
        .map(|c| if c == '.' || c == '-' { '_' } else { c })
        .collect();
    env.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(&normalized))
        .map(|(_, v)| v.clone())
}

/// Parses a literal default string into its native scalar type, so that a
/// whole-string placeholder falling back to its default gets the same
/// typing as one resolved from the tree (int, then float, then bool, else
/// left as a string).
fn parse_scalar(s: &str) -> ConfigValue {
    if let Ok(i) = s.parse::<i64>() {
        ConfigValue::Integer(i)
    } else if let Ok(f) = s.parse::<f64>() {
        ConfigValue::Float(ordered_float::OrderedFloat(f))
    } else if let Ok(b) = s.parse::<bool>() {
        ConfigValue::Bool(b)
    } else {
        ConfigValue::String(s.to_string())
    }
}

fn scalar_to_string(value: &ConfigValue) -> String {
    match value {
        ConfigValue::String(s) => s.clone(),
        ConfigValue::Integer(i) => i.to_string(),
        ConfigValue::Float(f) => f.to_string(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Null => String::new(),
        _ => String::new(),
    }
}

fn collect_unresolved(tree: &IndexMap<String, ConfigValue>, warnings: &mut Vec<Warning>) {
    for value in tree.values() {
        collect_unresolved_value(value, warnings);
    }
}

fn collect_unresolved_value(value: &ConfigValue, warnings: &mut Vec<Warning>) {
    match value {
        ConfigValue::String(s) if s.contains("${") => {
            warnings.push(Warning::new(
                WarningCategory::UnresolvedPlaceholder,
                format!("value '{s}' still contains an unresolved placeholder after the iteration limit"),
            ));
        },
        ConfigValue::Array(items) => {
            for item in items {
                collect_unresolved_value(item, warnings);
            }
        },
        ConfigValue::Object(map) => {
            for child in map.values() {
                collect_unresolved_value(child, warnings);
            }
        },
        _ => {},
    }
}
