use crate::document::{DocumentIndex, RemediationState};
use crate::reference::ModuleReference;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Per-document reference indexes, keyed by document path.
///
/// Generations come from one store-wide counter, so a document that is dropped and
/// re-created never reuses a generation an in-flight pass may still hold.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<PathBuf, DocumentIndex>,
    last_generation: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the index for `document`, returning its new generation.
    pub fn rescan(&mut self, document: &Path, references: Vec<ModuleReference>) -> u64 {
        self.last_generation += 1;
        let generation = self.last_generation;
        match self.documents.get_mut(document) {
            Some(existing) => existing.replace(generation, references),
            None => {
                self.documents.insert(
                    document.to_path_buf(),
                    DocumentIndex::new(generation, references),
                );
            }
        }
        generation
    }

    pub fn get(&self, document: &Path) -> Option<&DocumentIndex> {
        self.documents.get(document)
    }

    pub(crate) fn get_mut(&mut self, document: &Path) -> Option<&mut DocumentIndex> {
        self.documents.get_mut(document)
    }

    pub fn remove(&mut self, document: &Path) -> Option<DocumentIndex> {
        self.documents.remove(document)
    }

    /// Documents whose remediation-action provider is registered, sorted.
    pub fn remediation_documents(&self) -> Vec<PathBuf> {
        let mut documents: Vec<PathBuf> = self
            .documents
            .iter()
            .filter(|(_, index)| index.remediation() == RemediationState::Registered)
            .map(|(path, _)| path.clone())
            .collect();
        documents.sort();
        documents
    }

    pub fn contains(&self, document: &Path) -> bool {
        self.documents.contains_key(document)
    }

}
