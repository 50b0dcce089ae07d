// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-tier locking: a re-entrant intra-process lock per project, and an
//! inter-process file lock per artifact. Acquisition order is always
//! inter-process first, then intra-process; guards release in reverse.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use loom_core::{CoreError, CoreResult, ProjectId};
use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// An acquired exclusive file lock. Released on drop.
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Blocks indefinitely until the lock is acquired.
    pub fn acquire(path: impl Into<PathBuf>) -> CoreResult<Self> {
        Self::acquire_with_timeout(path, None)
    }

    /// Acquires the lock, polling until `timeout` elapses. `None` blocks
    /// indefinitely. On expiry returns `UnallowedFileOperation`.
    pub fn acquire_with_timeout(path: impl Into<PathBuf>, timeout: Option<Duration>) -> CoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)?;

        match timeout {
            None => {
                file.lock_exclusive()?;
            }
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                loop {
                    match file.try_lock_exclusive() {
                        Ok(()) => break,
                        Err(_) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
                        Err(_) => {
                            return Err(CoreError::UnallowedFileOperation(path.display().to_string()))
                        }
                    }
                }
            }
        }

        Ok(Self { file, path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl std::fmt::Debug for FileLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLock").field("path", &self.path).finish()
    }
}

/// Owns one re-entrant lock per project id, handed out lazily.
///
/// A re-entrant lock is required because a pipeline stage running under a
/// project's lock may recursively call back into code that also acquires
/// the same project's lock (e.g. a cache adapter invalidation triggered
/// from within a save that the caller already holds the lock for).
#[derive(Default)]
pub struct LockManager {
    projects: Mutex<HashMap<ProjectId, Arc<ReentrantMutex<()>>>>,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn project_lock(&self, project_id: &ProjectId) -> Arc<ReentrantMutex<()>> {
        self.projects
            .lock()
            .entry(project_id.clone())
            .or_insert_with(|| Arc::new(ReentrantMutex::new(())))
            .clone()
    }

    /// Acquires only the intra-process project lock. Re-entrant: the same
    /// thread may acquire it again while already holding it.
    pub fn acquire_project(&self, project_id: &ProjectId) -> CoreResult<ProjectGuardOwned> {
        let lock = self.project_lock(project_id);
        Ok(ProjectGuardOwned { lock, file: None })
    }

    /// Acquires the inter-process file lock for `artifact_path` first,
    /// then the intra-process project lock, returning a guard that
    /// releases both in reverse order when dropped.
    ///
    /// `timeout` bounds the file-lock wait only; the intra-process lock
    /// is always acquired without a timeout once the file lock is held.
    pub fn acquire(
        &self,
        project_id: &ProjectId,
        artifact_path: &Path,
        timeout: Option<Duration>,
    ) -> CoreResult<ProjectGuardOwned> {
        let lock_path = artifact_lock_path(artifact_path);
        let file = FileLock::acquire_with_timeout(lock_path, timeout)?;
        let project_lock = self.project_lock(project_id);
        Ok(ProjectGuardOwned {
            lock: project_lock,
            file: None,
        }
        .with_file(file))
    }
}

fn artifact_lock_path(artifact_path: &Path) -> PathBuf {
    let mut name = artifact_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(".lock");
    artifact_path.with_file_name(name)
}

/// Owned handle to a project's re-entrant lock, used to defer acquiring
/// the guard itself until `lock()` is called (so callers can hold the
/// `Arc` across an `await` point without holding the non-Send guard).
pub struct ProjectGuardOwned {
    lock: Arc<ReentrantMutex<()>>,
    file: Option<FileLock>,
}

impl ProjectGuardOwned {
    fn with_file(mut self, file: FileLock) -> Self {
        self.file = Some(file);
        self
    }

    /// Blocks until the project's re-entrant lock is held and returns a
    /// scoped guard. The file lock (if any) outlives the returned guard
    /// and is released only when `self` is dropped.
    pub fn lock(&self) -> ReentrantMutexGuard<'_, ()> {
        self.lock.lock()
    }
}

impl std::ops::Drop for ProjectGuardOwned {
    fn drop(&mut self) {
        // file dropped after lock Arc's last use here; explicit for clarity.
        self.file.take();
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
