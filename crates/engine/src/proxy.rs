// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-job handle (`TaskProxy`, component C5) injected as the first
//! argument to every job body: structured log append, status transition,
//! cooperative cancellation check, and terminal result publication.
//!
//! A proxy never writes [`crate::task_engine::TaskEngine`]'s shared results
//! map directly — every mutation is applied to a local working copy of the
//! [`TaskRecord`] and then pushed onto a channel the engine's receiver loop
//! drains. This decouples job bodies (which may run on a blocking-pool
//! thread) from the map's lock and lets the engine drop updates from a job
//! that has since been superseded (see `generation` below).

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::Path;

use loom_core::{now_ms, CoreError, CoreResult, TaskData, TaskId, TaskRecord, TaskStatus};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::cancel::CancellationToken;

/// One snapshot of a task's record, tagged with the generation of the
/// submission that produced it. The engine's receiver loop applies this
/// update only if `generation` still matches the task id's current
/// generation — a stale generation means the job was superseded (e.g. by
/// conflict policy `Cancel`) and its updates are dropped.
pub struct StatusUpdate {
    pub task_id: TaskId,
    pub generation: u64,
    pub record: TaskRecord,
}

pub struct TaskProxy {
    task_id: TaskId,
    generation: u64,
    record: Mutex<TaskRecord>,
    cancel: CancellationToken,
    tx: UnboundedSender<StatusUpdate>,
    log_file: Mutex<Option<File>>,
}

impl TaskProxy {
    pub(crate) fn new(
        task_id: TaskId,
        generation: u64,
        initial: TaskRecord,
        cancel: CancellationToken,
        tx: UnboundedSender<StatusUpdate>,
    ) -> Self {
        Self {
            task_id,
            generation,
            record: Mutex::new(initial),
            cancel,
            tx,
            log_file: Mutex::new(None),
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Appends a `Pending` log entry and flushes.
    pub fn log_pending(&self, message: impl Into<String>) {
        self.push(TaskStatus::Pending, message.into());
    }

    /// Appends a `Success`-tagged log entry and flushes. Does not itself
    /// attach a result payload; stages use this for intermediate progress
    /// messages and call [`Self::success`] once, at the end, to terminate
    /// the task with its data.
    pub fn log_success(&self, message: impl Into<String>) {
        self.push(TaskStatus::Success, message.into());
    }

    /// Appends a `Failed`-tagged log entry and flushes.
    pub fn log_error(&self, message: impl Into<String>) {
        self.push(TaskStatus::Failed, message.into());
    }

    /// Terminates the task: attaches `data`, transitions to `Success`, and
    /// flushes.
    pub fn success(&self, data: TaskData) {
        let message = "task completed";
        {
            let mut record = self.record.lock();
            record.succeed(data, message, now_ms());
        }
        self.flush();
    }

    /// Raises [`CoreError::TaskStop`] if this task's cancellation token has
    /// been set. Every long-running stage must call this at safe points —
    /// cancellation is cooperative, not preemptive.
    pub fn check_stop(&self) -> CoreResult<()> {
        if self.cancel.is_set() {
            Err(CoreError::TaskStop)
        } else {
            Ok(())
        }
    }

    /// Runs `f`, re-pointing per-task logging at `log_file` for the
    /// duration if given. On return:
    /// - `Ok(data)` is recorded via [`Self::success`].
    /// - `Err(CoreError::TaskStop)` is recorded as `Failed` with a
    ///   "cancelled" log entry — the sentinel is never surfaced further.
    /// - any other `Err` is recorded as `Failed` with the error's message.
    ///
    /// Mirrors a scoped `with proxy.context(log_file):` block: the caller
    /// never sees the error, only the task record it left behind.
    pub fn context<F>(&self, log_file: Option<&Path>, f: F)
    where
        F: FnOnce(&Self) -> CoreResult<TaskData>,
    {
        if let Some(path) = log_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => *self.log_file.lock() = Some(file),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to open task log file"),
            }
        }

        let result = f(self);
        self.log_file.lock().take();

        match result {
            Ok(data) => self.success(data),
            Err(CoreError::TaskStop) => self.log_error("cancelled"),
            Err(e) => self.log_error(e.to_string()),
        }
    }

    fn push(&self, status: TaskStatus, message: String) {
        self.write_log_line(status, &message);
        {
            let mut record = self.record.lock();
            record.push_log(status, message, now_ms());
        }
        self.flush();
    }

    fn write_log_line(&self, status: TaskStatus, message: &str) {
        let mut guard = self.log_file.lock();
        if let Some(file) = guard.as_mut() {
            let _ = writeln!(file, "{} [{:?}] {}", now_ms(), status, message);
        }
    }

    fn flush(&self) {
        let record = self.record.lock().clone();
        let _ = self.tx.send(StatusUpdate {
            task_id: self.task_id.clone(),
            generation: self.generation,
            record,
        });
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
