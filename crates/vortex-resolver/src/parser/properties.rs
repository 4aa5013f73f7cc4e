//! `.properties` multi-section parsing: document splitting, line
//! continuations, escape handling, and dotted/indexed key nesting.

use std::path::Path;

use indexmap::IndexMap;
use vortex_core::{ConfigMap, ConfigValue};

use crate::error::ResolveError;

/// Splits a properties file's raw text into sections on a full line of
/// exactly `#---` or `!---`, then parses each section into a [`ConfigMap`].
pub fn split_sections(raw: &str, path: &Path) -> Result<Vec<ConfigMap>, ResolveError> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed == "#---" || trimmed == "!---" {
            chunks.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    chunks.push(current);

    if chunks.len() > 1 && chunks.last().is_some_and(|c| c.trim().is_empty()) {
        chunks.pop();
    }

    let mut documents = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.into_iter().enumerate() {
        documents.push(
            parse_section(&chunk)
                .map_err(|reason| ResolveError::parse(path, format!("document {index}: {reason}")))?,
        );
    }
    Ok(documents)
}

fn parse_section(raw: &str) -> Result<ConfigMap, String> {
    let mut root = IndexMap::new();

    for logical_line in join_continuations(raw) {
        let trimmed = logical_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let (raw_key, raw_value) = split_property_line(trimmed)
            .ok_or_else(|| format!("missing '=' or ':' separator in '{trimmed}'"))?;

        let key = unescape(raw_key.trim());
        let value = unescape(raw_value.trim());
        let segments = parse_key_segments(&key);
        insert_path(&mut root, &segments, ConfigValue::String(value));
    }

    Ok(ConfigMap::from_inner(root))
}

/// Joins Java-properties-style line continuations: a line ending in an odd
/// number of backslashes continues onto the next line, which has its
/// leading whitespace stripped.
fn join_continuations(input: &str) -> Vec<String> {
    let mut logical_lines = Vec::new();
    let mut lines = input.lines().peekable();
    while let Some(line) = lines.next() {
        let mut combined = line.to_string();
        while ends_with_odd_backslashes(&combined) {
            combined.pop();
            match lines.next() {
                Some(next) => combined.push_str(next.trim_start()),
                None => break,
            }
        }
        logical_lines.push(combined);
    }
    logical_lines
}

fn ends_with_odd_backslashes(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits on the first unescaped `=` or `:`.
fn split_property_line(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (byte_pos, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            return Some((&line[..byte_pos], &line[byte_pos + c.len_utf8()..]));
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(':') => out.push(':'),
            Some('=') => out.push('='),
            Some(' ') => out.push(' '),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    },
                }
            },
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

struct Segment {
    name: String,
    index: Option<usize>,
}

fn parse_key_segments(key: &str) -> Vec<Segment> {
    key.split('.')
        .map(|part| match part.find('[') {
            Some(open) if part.ends_with(']') => {
                let name = part[..open].to_string();
                let idx_str = &part[open + 1..part.len() - 1];
                match idx_str.parse::<usize>() {
                    Ok(idx) => Segment {
                        name,
                        index: Some(idx),
                    },
                    Err(_) => Segment {
                        name: part.to_string(),
                        index: None,
                    },
                }
            },
            _ => Segment {
                name: part.to_string(),
                index: None,
            },
        })
        .collect()
}

fn ensure_len(vec: &mut Vec<ConfigValue>, len: usize) {
    while vec.len() < len {
        vec.push(ConfigValue::Null);
    }
}

fn insert_path(map: &mut IndexMap<String, ConfigValue>, segments: &[Segment], value: ConfigValue) {
    let seg = &segments[0];
    if segments.len() == 1 {
        match seg.index {
            None => {
                map.insert(seg.name.clone(), value);
            },
            Some(idx) => {
                let entry = map
                    .entry(seg.name.clone())
                    .or_insert_with(|| ConfigValue::Array(Vec::new()));
                if !matches!(entry, ConfigValue::Array(_)) {
                    *entry = ConfigValue::Array(Vec::new());
                }
                if let ConfigValue::Array(vec) = entry {
                    ensure_len(vec, idx + 1);
                    vec[idx] = value;
                }
            },
        }
        return;
    }

    match seg.index {
        None => {
            let entry = map
                .entry(seg.name.clone())
                .or_insert_with(|| ConfigValue::Object(IndexMap::new()));
            if !matches!(entry, ConfigValue::Object(_)) {
                *entry = ConfigValue::Object(IndexMap::new());
            }
            if let ConfigValue::Object(inner) = entry {
                insert_path(inner, &segments[1..], value);
            }
        },
        Some(idx) => {
            let entry = map
                .entry(seg.name.clone())
                .or_insert_with(|| ConfigValue::Array(Vec::new()));
            if !matches!(entry, ConfigValue::Array(_)) {
                *entry = ConfigValue::Array(Vec::new());
            }
            if let ConfigValue::Array(vec) = entry {
                ensure_len(vec, idx + 1);
                if !matches!(vec[idx], ConfigValue::Object(_)) {
                    vec[idx] = ConfigValue::Object(IndexMap::new());
                }
                if let ConfigValue::Object(inner) = &mut vec[idx] {
                    insert_path(inner, &segments[1..], value);
                }
            }
        },
    }
}
