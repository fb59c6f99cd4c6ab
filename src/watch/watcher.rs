// src/watch/watcher.rs

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::graph::TemplateFilter;
use crate::types::ChangeKind;
use crate::watch::path_utils::{rebase_on_root, relative_str};
use crate::watch::settle::SettleBuffer;

/// Stabilisation settings for the watcher.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// A path must be quiet this long before it is reported.
    pub stability_threshold: Duration,
    /// How often pending paths are checked.
    pub poll_interval: Duration,
}

impl WatchOptions {
    pub fn from_config(cfg: &crate::config::model::WatchSection) -> Self {
        Self {
            stability_threshold: Duration::from_millis(cfg.stability_threshold_ms),
            poll_interval: Duration::from_millis(cfg.poll_interval_ms.max(1)),
        }
    }
}

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Map a notify event kind onto the change kinds the engine cares about.
///
/// Access and metadata-only events are dropped.
pub fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Added),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(ChangeKind::Changed),
        EventKind::Remove(_) => Some(ChangeKind::Removed),
        _ => None,
    }
}

/// Watch `root` recursively and send one `RuntimeEvent::FileChanged` per
/// settled template change.
///
/// - `root` should be canonical; event paths are re-anchored onto it.
/// - `filter` keeps only paths with the template extension.
/// - `runtime_tx` is the channel into the runtime loop.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: TemplateFilter,
    options: WatchOptions,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // The callback runs on notify's thread; fall back to stderr.
                    eprintln!("pugwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("pugwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(
        root = ?root,
        pattern = %format!("**/*.{}", filter.extension()),
        "file watcher started"
    );

    tokio::spawn(async move {
        let mut settle = SettleBuffer::new(options.stability_threshold);
        let mut ticker = tokio::time::interval(options.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                maybe_event = event_rx.recv() => {
                    let Some(event) = maybe_event else {
                        break;
                    };
                    let Some(kind) = classify(&event.kind) else {
                        continue;
                    };
                    for path in event.paths {
                        let Some(rel) = relative_str(&root, &path) else {
                            warn!("could not relativize path {:?} against root {:?}", path, root);
                            continue;
                        };
                        if !filter.matches(&rel) {
                            continue;
                        }
                        if let Some(path) = rebase_on_root(&root, &path) {
                            debug!(?path, ?kind, "pending template change");
                            settle.note(&path, kind, Instant::now());
                        }
                    }
                }
                _ = ticker.tick() => {
                    for (path, kind) in settle.drain_settled(Instant::now()) {
                        if let Err(err) = runtime_tx
                            .send(RuntimeEvent::FileChanged { path, kind })
                            .await
                        {
                            // Runtime is gone; no point keeping the watcher loop alive.
                            warn!("failed to send RuntimeEvent::FileChanged: {err}");
                            return;
                        }
                    }
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
