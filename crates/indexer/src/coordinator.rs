use crate::error::{IndexerError, Result};
use crate::events::IndexEvent;
use crate::index::{ReferenceIndex, ResolveOutcome};
use async_trait::async_trait;
use log::{debug, warn};
use modlink_protocol::{DocumentRefresher, EditorDocument};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant};

const COMMAND_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
pub struct CoordinatorConfig {
    /// Quiet period after the last text change before the active document is refreshed
    pub debounce: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
        }
    }
}

/// Document and editor lifecycle notifications from the host.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// Focus moved to another editor, or to none
    ActiveEditorChanged(Option<EditorDocument>),
    /// A document's text changed; carries the new snapshot
    TextChanged(EditorDocument),
    /// A document was opened; `visible` when it is shown in some editor
    DocumentOpened {
        document: EditorDocument,
        visible: bool,
    },
    DocumentClosed(PathBuf),
}

enum CoordinatorCommand {
    Editor(EditorEvent),
    Refresh(PathBuf),
    Shutdown,
}

/// Turns editor lifecycle events into index rescans, resolves and drops.
///
/// Runs as a single task; text changes are debounced by one process-wide timer that
/// every new change resets.
#[derive(Clone)]
pub struct LifecycleCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    command_tx: mpsc::Sender<CoordinatorCommand>,
    index: Arc<ReferenceIndex>,
}

impl LifecycleCoordinator {
    /// Spawn the coordinator loop on the current tokio runtime.
    pub fn start(index: Arc<ReferenceIndex>, config: CoordinatorConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        spawn_coordinator_loop(index.clone(), config, command_rx);
        Self {
            inner: Arc::new(CoordinatorInner { command_tx, index }),
        }
    }

    pub async fn notify(&self, event: EditorEvent) -> Result<()> {
        self.send(CoordinatorCommand::Editor(event)).await
    }

    /// Rescan and resolve `document` from its latest known text.
    pub async fn request_refresh(&self, document: &Path) -> Result<()> {
        self.send(CoordinatorCommand::Refresh(document.to_path_buf()))
            .await
    }

    #[must_use]
    pub fn index(&self) -> &Arc<ReferenceIndex> {
        &self.inner.index
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.inner.index.subscribe()
    }

    async fn send(&self, command: CoordinatorCommand) -> Result<()> {
        self.inner
            .command_tx
            .send(command)
            .await
            .map_err(|_| IndexerError::CoordinatorClosed)
    }
}

#[async_trait]
impl DocumentRefresher for LifecycleCoordinator {
    async fn refresh(&self, document: &Path) {
        if let Err(err) = self.request_refresh(document).await {
            warn!("Failed to refresh {}: {err}", document.display());
        }
    }
}

impl Drop for LifecycleCoordinator {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.inner.command_tx.try_send(CoordinatorCommand::Shutdown);
        }
    }
}

/// Single-slot cancellable timer.
#[derive(Debug)]
struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the quiet period; a pending deadline is replaced, not stacked.
    fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn clear(&mut self) {
        self.deadline = None;
    }
}

#[derive(Default)]
struct EditorState {
    /// Latest text of every open document
    documents: HashMap<PathBuf, EditorDocument>,
    active: Option<PathBuf>,
}

impl EditorState {
    fn remember(&mut self, document: EditorDocument) -> &EditorDocument {
        let path = document.path.clone();
        self.documents.insert(path.clone(), document);
        &self.documents[&path]
    }

    fn active_document(&self) -> Option<&EditorDocument> {
        self.documents.get(self.active.as_ref()?)
    }
}

fn spawn_coordinator_loop(
    index: Arc<ReferenceIndex>,
    config: CoordinatorConfig,
    mut command_rx: mpsc::Receiver<CoordinatorCommand>,
) {
    tokio::spawn(async move {
        let mut timer = DebounceTimer::new(config.debounce);
        let mut state = EditorState::default();

        loop {
            let deadline = timer.deadline();

            tokio::select! {
                command = command_rx.recv() => {
                    match command {
                        Some(CoordinatorCommand::Editor(event)) => {
                            handle_editor_event(&index, &mut state, &mut timer, event);
                        }
                        Some(CoordinatorCommand::Refresh(path)) => {
                            match state.documents.get(&path) {
                                Some(document) => refresh_document(&index, document),
                                None => debug!("Refresh skipped for untracked {}", path.display()),
                            }
                        }
                        Some(CoordinatorCommand::Shutdown) | None => break,
                    }
                }
                () = async {
                    if let Some(deadline) = deadline {
                        time::sleep_until(deadline).await;
                    }
                }, if deadline.is_some() => {
                    timer.clear();
                    if let Some(document) = state.active_document() {
                        refresh_document(&index, document);
                    }
                }
            }
        }
        debug!("Lifecycle coordinator stopped");
    });
}

fn handle_editor_event(
    index: &Arc<ReferenceIndex>,
    state: &mut EditorState,
    timer: &mut DebounceTimer,
    event: EditorEvent,
) {
    match event {
        EditorEvent::ActiveEditorChanged(Some(document)) => {
            state.active = Some(document.path.clone());
            let document = state.remember(document);
            refresh_document(index, document);
        }
        EditorEvent::ActiveEditorChanged(None) => {
            state.active = None;
        }
        EditorEvent::TextChanged(document) => {
            state.remember(document);
            timer.arm();
        }
        EditorEvent::DocumentOpened { document, visible } => {
            let document = state.remember(document);
            if visible {
                refresh_document(index, document);
            }
        }
        EditorEvent::DocumentClosed(path) => {
            state.documents.remove(&path);
            index.drop_document(&path);
        }
    }
}

/// Rescan in place so generations follow event order, then resolve on a separate
/// task; overlapping passes are settled by the generation check at commit.
fn refresh_document(index: &Arc<ReferenceIndex>, document: &EditorDocument) {
    if !document.is_tracked() {
        return;
    }
    if let Err(err) = index.rescan(&document.path, &document.text) {
        warn!("{err}");
        return;
    }

    let index = index.clone();
    let path = document.path.clone();
    tokio::spawn(async move {
        match index.resolve_all(&path).await {
            ResolveOutcome::Committed {
                generation,
                resolved,
                unresolvable,
            } => debug!(
                "Resolved {} (generation {generation}): {resolved} linked, {unresolvable} missing",
                path.display()
            ),
            outcome => debug!("Resolution for {} not applied: {outcome:?}", path.display()),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn debounce_timer_rearms_instead_of_stacking() {
        let mut timer = DebounceTimer::new(Duration::from_millis(200));
        assert!(timer.deadline().is_none());

        timer.arm();
        let first = timer.deadline().expect("armed");
        time::sleep(Duration::from_millis(5)).await;
        timer.arm();
        let second = timer.deadline().expect("armed");
        assert!(second > first);

        timer.clear();
        assert!(timer.deadline().is_none());
    }
}
