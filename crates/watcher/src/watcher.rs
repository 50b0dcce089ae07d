// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursively watches the data root for out-of-band artifact writes
//! (anything not produced through the cache's own save path — an
//! operator editing a file by hand, a sibling process, a restored
//! backup) and invalidates the affected cache entries.

use std::path::PathBuf;
use std::sync::Arc;

use loom_cache::ProjectCacheManager;
use loom_storage::LockManager;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::apply::apply;

/// Owns the underlying OS watch handle and the background task draining
/// its events. Dropping this stops both.
pub struct DataRootWatcher {
    _watcher: RecommendedWatcher,
    _task: tokio::task::JoinHandle<()>,
}

impl DataRootWatcher {
    /// Starts watching `data_root` recursively. Events are routed through
    /// [`crate::route::classify_relative`] and applied against `cache`.
    pub fn start(
        data_root: PathBuf,
        cache: Arc<ProjectCacheManager>,
        locks: Arc<LockManager>,
    ) -> Result<Self, notify::Error> {
        let (tx, mut rx) = mpsc::unbounded_channel::<notify::Event>();

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            match res {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(e) => warn!(error = %e, "filesystem watch error"),
            }
        })?;
        watcher.watch(&data_root, RecursiveMode::Recursive)?;
        info!(data_root = %data_root.display(), "started data root watcher");

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                for path in event.paths {
                    apply(&cache, &locks, &data_root, &path);
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            _task: task,
        })
    }
}

impl Drop for DataRootWatcher {
    fn drop(&mut self) {
        self._task.abort();
    }
}
