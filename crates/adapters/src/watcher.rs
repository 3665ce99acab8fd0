// SPDX-License-Identifier: MIT

//! Directory watcher over the jobs directory. Every filesystem event
//! triggers a full reconcile; bursts (editor atomic-save patterns:
//! write-temp + rename) are coalesced by a short idle debounce so a
//! single edit doesn't fire the reconciler multiple times.

use std::path::Path;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

const DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to start directory watcher: {0}")]
    Notify(#[from] notify::Error),
}

/// Handle kept alive for the lifetime of the watch; dropping it stops
/// watching.
pub struct DirectoryWatch {
    _watcher: RecommendedWatcher,
}

/// Start watching `dir` recursively. Every coalesced burst of change
/// events sends one `()` on the returned receiver.
pub fn watch(dir: &Path) -> Result<(DirectoryWatch, mpsc::Receiver<()>), WatchError> {
    let (raw_tx, raw_rx) = mpsc::channel(256);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if res.is_ok() {
            let _ = raw_tx.blocking_send(());
        }
    })?;
    watcher.watch(dir, RecursiveMode::Recursive)?;

    let (debounced_tx, debounced_rx) = mpsc::channel(8);
    tokio::spawn(debounce_loop(raw_rx, debounced_tx));

    Ok((DirectoryWatch { _watcher: watcher }, debounced_rx))
}

async fn debounce_loop(mut raw_rx: mpsc::Receiver<()>, debounced_tx: mpsc::Sender<()>) {
    while raw_rx.recv().await.is_some() {
        loop {
            match tokio::time::timeout(DEBOUNCE, raw_rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_elapsed) => break,
            }
        }
        if debounced_tx.send(()).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
