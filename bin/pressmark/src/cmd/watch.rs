//! Watch command - republish on change while serving the target

use std::{net::SocketAddr, path::PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use pressmark_generator::{FileOutcome, Publisher, publish};
use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
};

use crate::server::{create_router, shutdown_signal};

/// Capacity of the event queue between the watcher and the publish task.
const EVENT_QUEUE: usize = 256;

/// How a change is republished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
    /// Republish only the changed files.
    Fast,
    /// Republish the whole tree.
    Reindex,
}

/// Whether an event kind can change published output.
pub fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Apply one file system event to the published tree.
///
/// Template changes reload the templates and republish everything. Events
/// for directories, the target tree and paths outside the source are
/// dropped.
pub fn handle_event(
    publisher: &mut Publisher,
    mode: WatchMode,
    event: &Event,
) -> publish::Result<()> {
    let paths: Vec<PathBuf> = event
        .paths
        .iter()
        .filter(|p| !p.is_dir() && !publisher.is_target_path(p))
        .filter(|p| publisher.relative_path(p).is_some())
        .cloned()
        .collect();

    if paths.is_empty() {
        return Ok(());
    }

    if paths.iter().any(|p| publisher.is_template_path(p)) {
        tracing::info!("templates changed, republishing everything");
        publisher.reload_templates()?;
        publisher.publish_all()?;
        return Ok(());
    }

    match mode {
        WatchMode::Reindex => {
            tracing::info!(kind = ?event.kind, "change detected, republishing everything");
            publisher.publish_all()?;
        }
        WatchMode::Fast => {
            for path in &paths {
                let Some(relative) = publisher.relative_path(path) else {
                    continue;
                };
                let outcome = publisher.publish_one(&relative)?;
                if outcome != FileOutcome::Ignored {
                    println!("  ↻ {} ({outcome:?})", relative.display());
                }
            }
        }
    }

    Ok(())
}

/// Watch the source tree and serve the target tree until Ctrl-C.
pub async fn run(publisher: Publisher, mode: WatchMode, port: u16) -> Result<()> {
    let source_root = publisher.source_root().to_path_buf();
    let target_root = publisher.target_root().to_path_buf();
    tracing::info!(?source_root, ?target_root, port, ?mode, "Starting watch mode");

    let (event_tx, event_rx) = mpsc::channel::<Event>(EVENT_QUEUE);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) if is_relevant(&event.kind) => {
                let _ = event_tx.blocking_send(event);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "file watcher error"),
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    watcher
        .watch(&source_root, RecursiveMode::Recursive)
        .wrap_err_with(|| format!("Failed to watch {}", source_root.display()))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let publish_task = tokio::spawn(publish_loop(publisher, mode, event_rx, shutdown_rx));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Serving {} at http://{addr}", target_root.display());
    println!("  Watching {}", source_root.display());
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, create_router(&target_root))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    drop(watcher);
    let _ = shutdown_tx.send(true);
    publish_task.await.wrap_err("Publish task failed")?;

    tracing::info!("watch mode stopped");
    Ok(())
}

/// Single consumer of file events; owns the publisher.
async fn publish_loop(
    mut publisher: Publisher,
    mode: WatchMode,
    mut events: mpsc::Receiver<Event>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;
            event = events.recv() => {
                let Some(event) = event else { break };
                let result = tokio::task::block_in_place(|| handle_event(&mut publisher, mode, &event));
                if let Err(e) = result {
                    tracing::error!(error = %e, "republish failed");
                    eprintln!("  ✗ Republish failed: {e}");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    tracing::debug!("publish task finished");
}
