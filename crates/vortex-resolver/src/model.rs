//! Typed records shared across the resolution pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use vortex_core::ConfigMap;

use crate::expr::ProfileExpr;

/// A pointer back to where a merged value came from: a file, the index of
/// the document within that file, and (when known) a line number.
///
/// Sources are value objects — two sources are equal iff their path and
/// document index match, regardless of line.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub file: PathBuf,
    pub document_index: usize,
    pub line: Option<usize>,
}

impl ConfigSource {
    /// Creates a source pointing at a whole document (no line known yet).
    pub fn new(file: impl Into<PathBuf>, document_index: usize) -> Self {
        Self {
            file: file.into(),
            document_index,
            line: None,
        }
    }

    /// Attaches a line number to this source.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// The source file path relative to `base`, falling back to the
    /// absolute path if it is not a descendant of `base`.
    pub fn relative_to(&self, base: &Path) -> PathBuf {
        self.file
            .strip_prefix(base)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.file.clone())
    }
}

impl PartialEq for ConfigSource {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file && self.document_index == other.document_index
    }
}

impl Eq for ConfigSource {}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file.display(), self.document_index)
    }
}

/// A single logical document produced by parsing one YAML document, or one
/// `#---`-delimited section of a `.properties` file.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    /// The document's own key/value tree, with activation directives
    /// already stripped out.
    pub content: ConfigMap,
    /// `None` means unconditionally active.
    pub activation: Option<ProfileExpr>,
    /// `spring.config.activate.on-cloud-platform`, parsed but otherwise inert.
    pub on_cloud_platform: Option<String>,
    /// Absolute path of the file this document came from.
    pub source_file: PathBuf,
    /// Position within the file (0-based).
    pub document_index: usize,
    /// Whether this document was discovered under a main resource root
    /// (as opposed to a test resource root).
    pub is_main: bool,
}

impl ConfigDocument {
    /// The [`ConfigSource`] that identifies this whole document.
    pub fn source(&self) -> ConfigSource {
        ConfigSource::new(self.source_file.clone(), self.document_index)
    }

    /// True if this is the base document (index 0) of an unsuffixed
    /// `application.{yml,yaml,properties}` file — the only place
    /// `spring.profiles.group.*` may legally be declared.
    pub fn is_base_document(&self) -> bool {
        self.document_index == 0 && self.activation.is_none() && {
            self.source_file
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|stem| stem == "application")
                .unwrap_or(false)
        }
    }

    /// Whether this document applies given the active profile set.
    pub fn is_applicable(&self, active: &IndexSet<String>) -> bool {
        match &self.activation {
            None => true,
            Some(expr) => expr.eval(active),
        }
    }
}

/// The category a [`Warning`] belongs to, used to group diagnostics when
/// they are printed at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    RestrictionViolation,
    UnknownProfile,
    UnresolvedPlaceholder,
    PlaceholderCycle,
    ImportNotFound,
    CloudPlatform,
}

impl WarningCategory {
    /// A short, stable label used as the group heading when warnings are
    /// printed to standard error.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RestrictionViolation => "restriction violation",
            Self::UnknownProfile => "unknown profile",
            Self::UnresolvedPlaceholder => "unresolved placeholder",
            Self::PlaceholderCycle => "placeholder cycle",
            Self::ImportNotFound => "optional import not found",
            Self::CloudPlatform => "cloud platform",
        }
    }
}

/// A single diagnostic accumulated during resolution. Warnings never abort
/// the pipeline; they are collected and reported at the end of the run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub category: WarningCategory,
    pub message: String,
}

impl Warning {
    pub fn new(category: WarningCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category.label(), self.message)
    }
}

/// Groups a warning list by category, preserving first-seen category order
/// and within-category insertion order.
pub fn group_warnings(warnings: &[Warning]) -> IndexMap<WarningCategory, Vec<&Warning>> {
    let mut grouped: IndexMap<WarningCategory, Vec<&Warning>> = IndexMap::new();
    for warning in warnings {
        grouped.entry(warning.category).or_default().push(warning);
    }
    grouped
}

/// The final output of the resolution pipeline.
#[derive(Debug, Clone)]
pub struct ResolverResult {
    /// The merged configuration tree.
    pub config: ConfigMap,
    /// Flat dot-path to source-document map. Every leaf path in `config`
    /// has an entry here.
    pub sources: IndexMap<String, ConfigSource>,
    /// Diagnostics accumulated along the way; never fatal.
    pub warnings: Vec<Warning>,
    /// The fully expanded, ordered, duplicate-suppressed active profile list.
    pub active_profiles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_equality_ignores_line() {
        let a = ConfigSource::new("application.yml", 0).with_line(3);
        let b = ConfigSource::new("application.yml", 0).with_line(99);
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_source_display() {
        let source = ConfigSource::new("application-prod.yml", 1);
        assert_eq!(source.to_string(), "application-prod.yml#1");
    }

    #[test]
    fn test_is_base_document() {
        let doc = ConfigDocument {
            content: ConfigMap::new(),
            activation: None,
            on_cloud_platform: None,
            source_file: PathBuf::from("application.yml"),
            document_index: 0,
            is_main: true,
        };
        assert!(doc.is_base_document());

        let profiled = ConfigDocument {
            source_file: PathBuf::from("application-prod.yml"),
            ..doc.clone()
        };
        assert!(!profiled.is_base_document());
    }

    #[test]
    fn test_group_warnings_preserves_order() {
        let warnings = vec![
            Warning::new(WarningCategory::UnknownProfile, "a"),
            Warning::new(WarningCategory::UnresolvedPlaceholder, "b"),
            Warning::new(WarningCategory::UnknownProfile, "c"),
        ];
        let grouped = group_warnings(&warnings);
        let keys: Vec<_> = grouped.keys().collect();
        assert_eq!(
            keys,
            vec![
                &WarningCategory::UnknownProfile,
                &WarningCategory::UnresolvedPlaceholder
            ]
        );
        assert_eq!(grouped[&WarningCategory::UnknownProfile].len(), 2);
    }
}
