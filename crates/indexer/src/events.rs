use crate::links::DocumentLink;
use std::path::{Path, PathBuf};

/// Published after every change to the index that consumers can observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// A resolution pass committed for `generation`
    Resolved {
        document: PathBuf,
        generation: u64,
        links: Vec<DocumentLink>,
        unresolvable: usize,
    },
    /// The remediation-action provider was registered (`true`) or disposed (`false`)
    RemediationChanged { document: PathBuf, available: bool },
    /// The document's index entry was discarded
    Dropped { document: PathBuf },
}

impl IndexEvent {
    pub fn document(&self) -> &Path {
        match self {
            IndexEvent::Resolved { document, .. }
            | IndexEvent::RemediationChanged { document, .. }
            | IndexEvent::Dropped { document } => document.as_path(),
        }
    }
}
