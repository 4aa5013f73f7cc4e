//! Pluggable post-resolution analyzers.
//!
//! Validation/security/lint post-processors are pluggable sinks: they
//! observe the `ResolverResult` and never mutate it, driven by rule sets
//! that are data tables keyed by property paths and versioned
//! independently of the resolver itself. This crate defines that
//! extension point (the [`Analyzer`] trait plus an [`Issue`] the pipeline
//! can render) and ships one concrete analyzer exercising it, rather than
//! a full validation/security/lint rule pack.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vortex_core::ConfigMap;
use vortex_resolver::ConfigSource;

/// How serious a finding is. `Severity` ordering (`Info < Warning < Error`)
/// lets a caller filter (e.g. "fail the build on anything `Error`").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A single finding produced by an [`Analyzer`], anchored to the dot-path
/// it concerns. Serializable so a caller (the CLI, or a future rule-table
/// loader) can emit or persist findings as data rather than text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub path: String,
    pub severity: Severity,
    pub message: String,
    pub rule: &'static str,
}

impl Issue {
    pub fn new(rule: &'static str, path: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            severity,
            message: message.into(),
            rule,
        }
    }
}

/// A read-only observer of a resolved configuration tree and its source
/// attribution. Analyzers never mutate the tree they're handed; they
/// produce an ordered list of [`Issue`]s for the caller to act on.
pub trait Analyzer {
    /// A short, stable name identifying this analyzer's rule table.
    fn name(&self) -> &'static str;

    /// Inspects `config`/`sources` and returns any findings, in a
    /// deterministic order (same inputs, same output).
    fn analyze(&self, config: &ConfigMap, sources: &IndexMap<String, ConfigSource>) -> Vec<Issue>;
}

/// Flags every leaf whose value still contains a literal `${...}` after
/// placeholder resolution — i.e. every path the resolver itself already
/// warned about, surfaced here as a queryable, rule-table-driven finding
/// instead of a one-off warning string.
pub struct UnresolvedPlaceholderAnalyzer;

impl Analyzer for UnresolvedPlaceholderAnalyzer {
    fn name(&self) -> &'static str {
        "unresolved-placeholder"
    }

    fn analyze(&self, config: &ConfigMap, _sources: &IndexMap<String, ConfigSource>) -> Vec<Issue> {
        let mut issues = Vec::new();
        walk(config.as_inner(), "", &mut issues, self.name());
        issues
    }
}

fn walk(
    map: &IndexMap<String, vortex_core::ConfigValue>,
    prefix: &str,
    issues: &mut Vec<Issue>,
    rule: &'static str,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            vortex_core::ConfigValue::Object(child) => walk(child, &path, issues, rule),
            vortex_core::ConfigValue::String(s) if s.contains("${") => {
                issues.push(Issue::new(
                    rule,
                    path,
                    Severity::Warning,
                    format!("value still contains an unresolved placeholder: {s}"),
                ));
            },
            _ => {},
        }
    }
}
