use std::path::{Path, PathBuf};

/// Language id of the documents whose references are tracked.
pub const JAVASCRIPT_LANGUAGE_ID: &str = "javascript";

/// Snapshot of an editor document as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocument {
    pub path: PathBuf,
    pub language_id: String,
    pub text: String,
}

impl EditorDocument {
    pub fn new(path: impl Into<PathBuf>, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language_id: language_id.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether module references in this document are tracked at all.
    pub fn is_tracked(&self) -> bool {
        self.language_id == JAVASCRIPT_LANGUAGE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_javascript_documents_are_tracked() {
        assert!(EditorDocument::new("/p/a.js", "javascript", "").is_tracked());
        assert!(!EditorDocument::new("/p/a.rs", "rust", "").is_tracked());
    }
}
