use async_trait::async_trait;
use modlink_indexer::{CoordinatorConfig, EditorEvent, IndexEvent, LifecycleCoordinator, ReferenceIndex};
use modlink_protocol::{DocumentRefresher, EditorDocument, Resolution, Resolver};
use modlink_scanner::RequireScanner;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::timeout;

/// Resolves names present in `existing`, counting every call.
#[derive(Default)]
struct CountingResolver {
    calls: AtomicUsize,
    existing: Mutex<HashSet<String>>,
}

impl CountingResolver {
    fn add(&self, name: &str) {
        self.existing.lock().expect("lock").insert(name.to_string());
    }
}

#[async_trait]
impl Resolver for CountingResolver {
    async fn resolve(&self, name: &str, _from_file: &Path) -> Resolution {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.existing.lock().expect("lock").contains(name) {
            Resolution::Resolved(PathBuf::from("/proj").join(name))
        } else {
            Resolution::NotFound
        }
    }
}

fn start(resolver: Arc<CountingResolver>) -> LifecycleCoordinator {
    let index = Arc::new(ReferenceIndex::with_store(
        Arc::new(RequireScanner::new()),
        resolver,
    ));
    LifecycleCoordinator::start(
        index,
        CoordinatorConfig {
            debounce: Duration::from_millis(80),
        },
    )
}

fn js(path: &str, text: &str) -> EditorDocument {
    EditorDocument::new(path, "javascript", text)
}

async fn next_event(events: &mut broadcast::Receiver<IndexEvent>) -> IndexEvent {
    timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("event within timeout")
        .expect("channel open")
}

async fn next_resolved(events: &mut broadcast::Receiver<IndexEvent>) -> u64 {
    loop {
        if let IndexEvent::Resolved { generation, .. } = next_event(events).await {
            return generation;
        }
    }
}

#[tokio::test]
async fn activating_an_editor_indexes_it_immediately() {
    let resolver = Arc::new(CountingResolver::default());
    resolver.add("./foo");
    let coordinator = start(resolver);
    let mut events = coordinator.subscribe();

    coordinator
        .notify(EditorEvent::ActiveEditorChanged(Some(js("/proj/a.js", "require('./foo')"))))
        .await
        .expect("notify");
    next_resolved(&mut events).await;

    let links = coordinator.index().links(Path::new("/proj/a.js"));
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, PathBuf::from("/proj/./foo"));
}

#[tokio::test]
async fn burst_of_edits_yields_one_pass() {
    let resolver = Arc::new(CountingResolver::default());
    let coordinator = start(resolver.clone());
    let mut events = coordinator.subscribe();
    let path = "/proj/a.js";

    coordinator
        .notify(EditorEvent::ActiveEditorChanged(Some(js(path, "require('v0')"))))
        .await
        .expect("notify");
    let first = next_resolved(&mut events).await;
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);

    for version in 1..=5 {
        coordinator
            .notify(EditorEvent::TextChanged(js(path, &format!("require('v{version}')"))))
            .await
            .expect("notify");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let second = next_resolved(&mut events).await;
    assert!(second > first);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);

    let snapshot = coordinator.index().snapshot(Path::new(path)).expect("tracked");
    assert_eq!(snapshot.references[0].name, "v5");
}

#[tokio::test]
async fn closing_a_document_drops_its_index() {
    let coordinator = start(Arc::new(CountingResolver::default()));
    let mut events = coordinator.subscribe();
    let path = PathBuf::from("/proj/a.js");

    coordinator
        .notify(EditorEvent::DocumentOpened {
            document: js("/proj/a.js", "require('missing')"),
            visible: true,
        })
        .await
        .expect("notify");
    next_resolved(&mut events).await;
    assert!(coordinator.index().is_tracked(&path));

    coordinator
        .notify(EditorEvent::DocumentClosed(path.clone()))
        .await
        .expect("notify");
    assert_eq!(
        next_event(&mut events).await,
        IndexEvent::RemediationChanged {
            document: path.clone(),
            available: true
        }
    );
    assert_eq!(
        next_event(&mut events).await,
        IndexEvent::RemediationChanged {
            document: path.clone(),
            available: false
        }
    );
    assert_eq!(next_event(&mut events).await, IndexEvent::Dropped { document: path.clone() });
    assert!(!coordinator.index().is_tracked(&path));
}

#[tokio::test]
async fn hidden_and_foreign_documents_are_not_indexed() {
    let coordinator = start(Arc::new(CountingResolver::default()));

    coordinator
        .notify(EditorEvent::DocumentOpened {
            document: js("/proj/hidden.js", "require('x')"),
            visible: false,
        })
        .await
        .expect("notify");
    coordinator
        .notify(EditorEvent::ActiveEditorChanged(Some(EditorDocument::new(
            "/proj/lib.rs",
            "rust",
            "require('x')",
        ))))
        .await
        .expect("notify");
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(!coordinator.index().is_tracked(Path::new("/proj/hidden.js")));
    assert!(!coordinator.index().is_tracked(Path::new("/proj/lib.rs")));
}

#[tokio::test]
async fn refresh_after_creating_a_module_withdraws_remediation() {
    let resolver = Arc::new(CountingResolver::default());
    let coordinator = start(resolver.clone());
    let mut events = coordinator.subscribe();
    let path = PathBuf::from("/proj/a.js");

    coordinator
        .notify(EditorEvent::ActiveEditorChanged(Some(js("/proj/a.js", "require('./util')"))))
        .await
        .expect("notify");
    next_resolved(&mut events).await;
    assert_eq!(
        next_event(&mut events).await,
        IndexEvent::RemediationChanged {
            document: path.clone(),
            available: true
        }
    );

    resolver.add("./util");
    DocumentRefresher::refresh(&coordinator, &path).await;
    next_resolved(&mut events).await;
    assert_eq!(
        next_event(&mut events).await,
        IndexEvent::RemediationChanged {
            document: path.clone(),
            available: false
        }
    );
    assert!(coordinator.index().remediation_actions(&path).is_empty());
}
