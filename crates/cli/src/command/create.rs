use crate::engine;
use crate::host::TerminalHost;
use crate::CreateArgs;
use anyhow::{Context, Result};
use log::{debug, info};
use modlink_indexer::{CoordinatorConfig, EditorEvent, IndexEvent, LifecycleCoordinator};
use modlink_protocol::{ScaffoldSettings, TokioFileSystem};
use modlink_scaffold::{CreationOutcome, ScaffoldOrchestrator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const REFRESH_WAIT: Duration = Duration::from_secs(2);

pub async fn run(args: CreateArgs) -> Result<ExitCode> {
    let document = absolute(&args.from)?;
    let base_dir = document
        .parent()
        .with_context(|| format!("{} has no parent directory", document.display()))?;

    let mut settings = match &args.config {
        Some(path) => ScaffoldSettings::load(path)?,
        None => ScaffoldSettings::discover(base_dir)?,
    };
    if let Some(package_type) = args.package_type {
        settings.package_type = package_type;
    }

    let coordinator =
        LifecycleCoordinator::start(engine::reference_index(), CoordinatorConfig::default());
    let mut events = coordinator.subscribe();
    // Track the requesting file so the post-creation refresh has its text.
    let baseline = match tokio::fs::read_to_string(&document).await {
        Ok(text) => {
            let editor_document = engine::editor_document(&document, text);
            let tracked = editor_document.is_tracked();
            coordinator
                .notify(EditorEvent::ActiveEditorChanged(Some(editor_document)))
                .await?;
            if tracked {
                initial_generation(&coordinator, &mut events, &document).await
            } else {
                None
            }
        }
        Err(err) => {
            debug!("Not tracking {}: {err}", document.display());
            None
        }
    };

    let orchestrator = ScaffoldOrchestrator::new(
        Arc::new(TokioFileSystem),
        Arc::new(TerminalHost::new(args.open)),
        Arc::new(coordinator.clone()),
        settings,
    );
    debug!(
        "Creating with package type {:?}",
        orchestrator.settings().package_type
    );

    match orchestrator
        .create_module(args.name.as_deref(), &document)
        .await
    {
        CreationOutcome::Created(files) => {
            for file in &files {
                println!("{}", file.display());
            }
            if let Some(baseline) = baseline {
                report_remaining(&mut events, &document, baseline).await;
            }
            Ok(ExitCode::SUCCESS)
        }
        CreationOutcome::Aborted => {
            info!("Nothing created");
            Ok(ExitCode::SUCCESS)
        }
        CreationOutcome::Failed(_) => Ok(ExitCode::from(1)),
    }
}

/// Generation of the pass that indexed `document` before anything was created.
///
/// When that pass is slow, the generation of its rescan is used instead, so a late
/// commit is still recognised as predating the creation.
async fn initial_generation(
    coordinator: &LifecycleCoordinator,
    events: &mut broadcast::Receiver<IndexEvent>,
    document: &Path,
) -> Option<u64> {
    match tokio::time::timeout(REFRESH_WAIT, next_resolution(events, document, 0)).await {
        Ok(resolved) => resolved.map(|(generation, _)| generation),
        Err(_) => {
            debug!("Initial resolution of {} not observed", document.display());
            coordinator
                .index()
                .snapshot(document)
                .map(|snapshot| snapshot.generation)
        }
    }
}

/// Generation and unresolvable count of the next pass for `document` committed
/// after generation `after`.
async fn next_resolution(
    events: &mut broadcast::Receiver<IndexEvent>,
    document: &Path,
    after: u64,
) -> Option<(u64, usize)> {
    loop {
        match events.recv().await {
            Ok(event) if event.document() != document => {}
            Ok(IndexEvent::Resolved {
                generation,
                unresolvable,
                ..
            }) if generation > after => return Some((generation, unresolvable)),
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// Wait for the refresh triggered by the creation and log what is still missing.
async fn report_remaining(
    events: &mut broadcast::Receiver<IndexEvent>,
    document: &Path,
    baseline: u64,
) {
    match tokio::time::timeout(REFRESH_WAIT, next_resolution(events, document, baseline)).await {
        Ok(Some((_, 0))) => info!("All module references in {} resolve", document.display()),
        Ok(Some((_, missing))) => info!(
            "{missing} module reference(s) in {} still missing",
            document.display()
        ),
        Ok(None) | Err(_) => debug!("No refresh of {} observed", document.display()),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(path) => Ok(path),
        Err(_) => std::path::absolute(path)
            .with_context(|| format!("cannot resolve {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(document: &str, generation: u64, unresolvable: usize) -> IndexEvent {
        IndexEvent::Resolved {
            document: PathBuf::from(document),
            generation,
            links: Vec::new(),
            unresolvable,
        }
    }

    #[tokio::test]
    async fn passes_from_before_the_creation_are_skipped() {
        let (tx, mut rx) = broadcast::channel(8);
        tx.send(resolved("/proj/a.js", 1, 1)).expect("send");
        tx.send(resolved("/proj/b.js", 4, 2)).expect("send");
        tx.send(resolved("/proj/a.js", 3, 0)).expect("send");

        let next = next_resolution(&mut rx, Path::new("/proj/a.js"), 1).await;
        assert_eq!(next, Some((3, 0)));
    }

    #[tokio::test]
    async fn closed_channel_ends_the_wait() {
        let (tx, mut rx) = broadcast::channel::<IndexEvent>(8);
        drop(tx);
        assert_eq!(next_resolution(&mut rx, Path::new("/proj/a.js"), 0).await, None);
    }
}
