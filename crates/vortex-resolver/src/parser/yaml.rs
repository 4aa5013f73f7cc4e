//! YAML multi-document splitting.

use std::path::Path;

use vortex_core::ConfigMap;

use crate::error::ResolveError;

/// Splits a YAML file's raw text on `---` document separator lines, in
/// declaration order, and parses each chunk into a [`ConfigMap`].
///
/// An entirely empty document is kept (it may carry an activation
/// directive, however pointless that is in practice), except for a
/// trailing empty chunk produced by a final separator with nothing after
/// it, which is simply not a document and is dropped.
pub fn split_documents(raw: &str, path: &Path) -> Result<Vec<ConfigMap>, ResolveError> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in raw.lines() {
        if line.trim_end() == "---" {
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
        if chunk.trim().is_empty() {
            documents.push(ConfigMap::new());
            continue;
        }
        let map = ConfigMap::from_yaml(&chunk)
            .map_err(|e| ResolveError::parse(path, format!("document {index}: {e}")))?;
        documents.push(map);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p() -> PathBuf {
        PathBuf::from("application.yml")
    }

    #[test]
    fn test_single_document() {
        let docs = split_documents("server:\n  port: 8080\n", &p()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("server.port").unwrap().as_i64(), Some(8080));
    }

    #[test]
    fn test_multi_document_order() {
        let raw = "server:\n  port: 8080\n---\nserver:\n  port: 9000\n---\nserver:\n  port: 80\n";
        let docs = split_documents(raw, &p()).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].get("server.port").unwrap().as_i64(), Some(8080));
        assert_eq!(docs[1].get("server.port").unwrap().as_i64(), Some(9000));
        assert_eq!(docs[2].get("server.port").unwrap().as_i64(), Some(80));
    }

    #[test]
    fn test_trailing_separator_dropped() {
        let raw = "a: 1\n---\n";
        let docs = split_documents(raw, &p()).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_middle_empty_document_is_kept() {
        let raw = "a: 1\n---\n---\nb: 2\n";
        let docs = split_documents(raw, &p()).unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[1].is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let raw = "a: [unterminated\n";
        let err = split_documents(raw, &p()).unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }));
    }
}
