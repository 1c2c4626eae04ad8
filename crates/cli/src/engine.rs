//! Wiring of the scanner, resolver and index used by every command.

use anyhow::{Context, Result};
use modlink_indexer::ReferenceIndex;
use modlink_protocol::{EditorDocument, TokioFileSystem};
use modlink_resolver::NodeResolver;
use modlink_scanner::{Language, RequireScanner};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn reference_index() -> Arc<ReferenceIndex> {
    Arc::new(ReferenceIndex::with_store(
        Arc::new(RequireScanner::new()),
        Arc::new(NodeResolver::new(TokioFileSystem)),
    ))
}

/// Canonical path and current text of `path`.
pub async fn read_document(path: &Path) -> Result<(PathBuf, String)> {
    let path = tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok((path, text))
}

pub fn editor_document(path: &Path, text: String) -> EditorDocument {
    EditorDocument::new(path, Language::from_path(path).as_str(), text)
}

/// Refuse files whose references are not tracked.
pub fn ensure_tracked(document: &EditorDocument) -> Result<()> {
    if document.is_tracked() {
        Ok(())
    } else {
        anyhow::bail!(
            "{} is not a JavaScript file",
            document.path().display()
        )
    }
}
