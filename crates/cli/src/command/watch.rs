use crate::engine;
use crate::report;
use crate::WatchArgs;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use modlink_indexer::{CoordinatorConfig, EditorEvent, LifecycleCoordinator};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

const WATCH_CHANNEL_CAPACITY: usize = 64;

pub async fn run(args: WatchArgs) -> Result<ExitCode> {
    let (path, text) = engine::read_document(&args.file).await?;
    let document = engine::editor_document(&path, text);
    engine::ensure_tracked(&document)?;
    let parent = path
        .parent()
        .with_context(|| format!("{} has no parent directory", path.display()))?
        .to_path_buf();

    let coordinator = LifecycleCoordinator::start(
        engine::reference_index(),
        CoordinatorConfig {
            debounce: Duration::from_millis(args.debounce_ms),
        },
    );
    let mut index_events = coordinator.subscribe();

    let (fs_tx, mut fs_rx) = mpsc::channel::<notify::Result<Event>>(WATCH_CHANNEL_CAPACITY);
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = fs_tx.blocking_send(res);
        },
        NotifyConfig::default(),
    )
    .context("watcher init failed")?;
    // Editors often save by replacing the file, so watch its directory.
    watcher
        .watch(&parent, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", parent.display()))?;

    let mut latest_text = document.text.clone();
    coordinator
        .notify(EditorEvent::ActiveEditorChanged(Some(document)))
        .await?;
    info!("Watching {} (Ctrl-C to stop)", path.display());

    loop {
        tokio::select! {
            Some(res) = fs_rx.recv() => {
                match res {
                    Ok(event) if touches(&event, &path) => {
                        if matches!(event.kind, EventKind::Access(_)) {
                            continue;
                        }
                        match tokio::fs::read_to_string(&path).await {
                            Ok(text) if text == latest_text => {}
                            Ok(text) => {
                                latest_text = text.clone();
                                coordinator
                                    .notify(EditorEvent::TextChanged(engine::editor_document(&path, text)))
                                    .await?;
                            }
                            Err(err) => debug!("Skipping change to {}: {err}", path.display()),
                        }
                    }
                    Ok(_) => {}
                    Err(err) => warn!("watch error: {err}"),
                }
            }
            event = index_events.recv() => {
                match event {
                    Ok(event) => report::print_event(&event, &latest_text),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Missed {skipped} index events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }

    coordinator
        .notify(EditorEvent::DocumentClosed(path))
        .await?;
    Ok(ExitCode::SUCCESS)
}

fn touches(event: &Event, path: &Path) -> bool {
    event.paths.iter().any(|p| p == path)
}
