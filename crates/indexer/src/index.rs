use crate::document::RemediationState;
use crate::error::{IndexerError, Result};
use crate::events::IndexEvent;
use crate::links::{document_links, remediation_actions, DocumentLink, RemediationAction};
use crate::reference::{ModuleReference, Target};
use crate::store::DocumentStore;
use futures::future::join_all;
use modlink_protocol::{Resolver, Scanner};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Shared handle to the per-document store.
pub type SharedStore = Arc<Mutex<DocumentStore>>;

/// How a resolution pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Results were published for `generation`
    Committed {
        generation: u64,
        resolved: usize,
        unresolvable: usize,
    },
    /// A newer rescan replaced the references this pass started from
    Stale { generation: u64, current: u64 },
    /// The document was dropped while the pass was running
    Untracked,
}

/// Point-in-time copy of one document's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub generation: u64,
    pub resolved: bool,
    pub references: Vec<ModuleReference>,
}

/// Keeps each tracked document's module references and their resolution in step
/// with the document text.
///
/// Resolution results are published only when the generation captured at the start
/// of the pass is still current; a late pass for superseded text is discarded.
pub struct ReferenceIndex {
    store: SharedStore,
    scanner: Arc<dyn Scanner>,
    resolver: Arc<dyn Resolver>,
    events: broadcast::Sender<IndexEvent>,
}

impl ReferenceIndex {
    pub fn new(store: SharedStore, scanner: Arc<dyn Scanner>, resolver: Arc<dyn Resolver>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            scanner,
            resolver,
            events,
        }
    }

    pub fn with_store(scanner: Arc<dyn Scanner>, resolver: Arc<dyn Resolver>) -> Self {
        Self::new(Arc::new(Mutex::new(DocumentStore::new())), scanner, resolver)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.events.subscribe()
    }

    /// Replace the document's references with those found in `text`.
    /// Returns the generation of the new reference list.
    pub fn rescan(&self, document: &Path, text: &str) -> Result<u64> {
        let scanned = self
            .scanner
            .find_all(text)
            .map_err(|e| IndexerError::ScanError(format!("{}: {e}", document.display())))?;
        let references = scanned
            .into_iter()
            .map(|r| ModuleReference::pending(r.start, r.name))
            .collect();
        let generation = self.lock().rescan(document, references);
        log::debug!("Rescanned {} (generation {generation})", document.display());
        Ok(generation)
    }

    /// Resolve every reference of the current generation concurrently and publish
    /// the results if no newer rescan happened meanwhile.
    pub async fn resolve_all(&self, document: &Path) -> ResolveOutcome {
        let (generation, names) = {
            let store = self.lock();
            let Some(index) = store.get(document) else {
                return ResolveOutcome::Untracked;
            };
            let names: Vec<String> = index.references().iter().map(|r| r.name.clone()).collect();
            (index.generation(), names)
        };

        let resolutions = join_all(
            names
                .iter()
                .map(|name| self.resolver.resolve(name, document)),
        )
        .await;

        let mut store = self.lock();
        let Some(index) = store.get_mut(document) else {
            log::debug!("Discarding resolution for dropped {}", document.display());
            return ResolveOutcome::Untracked;
        };
        if index.generation() != generation {
            log::debug!(
                "Discarding stale resolution for {} (generation {generation}, current {})",
                document.display(),
                index.generation()
            );
            return ResolveOutcome::Stale {
                generation,
                current: index.generation(),
            };
        }

        let transition = index.commit(resolutions);
        let links = document_links(index);
        let unresolvable = index
            .references()
            .iter()
            .filter(|r| r.target.is_unresolvable())
            .count();
        let resolved = links.len();

        let _ = self.events.send(IndexEvent::Resolved {
            document: document.to_path_buf(),
            generation,
            links,
            unresolvable,
        });
        if let Some(available) = transition {
            log::info!(
                "Remediation actions {} for {}",
                if available { "available" } else { "withdrawn" },
                document.display()
            );
            let _ = self.events.send(IndexEvent::RemediationChanged {
                document: document.to_path_buf(),
                available,
            });
        }

        ResolveOutcome::Committed {
            generation,
            resolved,
            unresolvable,
        }
    }

    /// Rescan then resolve.
    pub async fn refresh(&self, document: &Path, text: &str) -> Result<ResolveOutcome> {
        self.rescan(document, text)?;
        Ok(self.resolve_all(document).await)
    }

    /// Target of the reference covering `offset`.
    ///
    /// `Some(Target::Unresolvable)` means the reference is known to be missing;
    /// `None` means no reference covers the offset or resolution is in progress.
    pub fn lookup(&self, document: &Path, offset: usize) -> Option<Target> {
        self.lock().get(document)?.lookup(offset)
    }

    /// Discard all state for `document`. Safe to call for untracked documents.
    pub fn drop_document(&self, document: &Path) -> bool {
        let mut store = self.lock();
        let Some(removed) = store.remove(document) else {
            return false;
        };
        if removed.remediation() == RemediationState::Registered {
            let _ = self.events.send(IndexEvent::RemediationChanged {
                document: document.to_path_buf(),
                available: false,
            });
        }
        let _ = self.events.send(IndexEvent::Dropped {
            document: document.to_path_buf(),
        });
        log::debug!("Dropped index for {}", document.display());
        true
    }

    pub fn is_tracked(&self, document: &Path) -> bool {
        self.lock().contains(document)
    }

    pub fn snapshot(&self, document: &Path) -> Option<DocumentSnapshot> {
        let store = self.lock();
        let index = store.get(document)?;
        Some(DocumentSnapshot {
            generation: index.generation(),
            resolved: index.is_resolved(),
            references: index.references().to_vec(),
        })
    }

    pub fn links(&self, document: &Path) -> Vec<DocumentLink> {
        self.lock().get(document).map(document_links).unwrap_or_default()
    }

    pub fn remediation_actions(&self, document: &Path) -> Vec<RemediationAction> {
        self.lock()
            .get(document)
            .map(remediation_actions)
            .unwrap_or_default()
    }

    /// Documents that currently have a remediation-action provider registered.
    pub fn documents_needing_remediation(&self) -> Vec<PathBuf> {
        self.lock().remediation_documents()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
