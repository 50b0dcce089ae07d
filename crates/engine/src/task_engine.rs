// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task scheduler (component C6): submit, conflict-resolve, run on a
//! bounded worker pool, fan-in status updates from proxies, and answer
//! queries by task id.
//!
//! # Generations
//!
//! Every submission that actually schedules a job is assigned a
//! monotonically increasing `generation` number for its `task_id`. A
//! [`crate::proxy::StatusUpdate`] is applied to the results map only if its
//! generation still matches the task id's *currently active* generation.
//! This is what makes policy `Cancel` safe under races: the superseded
//! job's eventual "cancelled" update can arrive after the new job has
//! already made progress, and must not clobber it (`SPEC_FULL.md` §8,
//! invariant 6).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use loom_core::{now_ms, CoreResult, ProjectId, TaskData, TaskId, TaskRecord};
use parking_lot::Mutex as SyncMutex;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cancel::CancellationToken;
use crate::proxy::{StatusUpdate, TaskProxy};

/// Worker-pool size and other runtime knobs. Default of two workers bounds
/// peak memory of concurrently-running topic jobs (`SPEC_FULL.md` §9, open
/// question); operators who want more parallelism raise it explicitly.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub worker_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { worker_count: 2 }
    }
}

/// What a caller asks [`TaskEngine::invalidate`] to act on.
#[derive(Debug, Clone)]
pub enum TaskSelector {
    Id(TaskId),
    /// Every task id conventionally scoped to a project, per
    /// [`loom_core::TaskId::belongs_to`].
    Project(ProjectId),
    All,
}

struct EngineState {
    results: HashMap<TaskId, TaskRecord>,
    active: HashMap<TaskId, (CancellationToken, u64)>,
}

impl EngineState {
    fn matches(&self, task_id: &TaskId, selector: &TaskSelector) -> bool {
        match selector {
            TaskSelector::Id(id) => id == task_id,
            TaskSelector::Project(project_id) => task_id.belongs_to(project_id),
            TaskSelector::All => true,
        }
    }
}

/// In-process job scheduler. Holds the results map, per-task cancellation
/// tokens, and a bounded pool of worker tasks; a dedicated receiver task
/// drains proxy status updates into the results map.
pub struct TaskEngine {
    state: Arc<SyncMutex<EngineState>>,
    tx: UnboundedSender<StatusUpdate>,
    semaphore: Arc<Semaphore>,
    workers: SyncMutex<JoinSet<()>>,
    receiver: Option<tokio::task::JoinHandle<()>>,
    next_generation: AtomicU64,
}

impl TaskEngine {
    pub fn new(config: EngineConfig) -> Self {
        let state = Arc::new(SyncMutex::new(EngineState {
            results: HashMap::new(),
            active: HashMap::new(),
        }));
        let (tx, mut rx) = unbounded_channel::<StatusUpdate>();

        let receiver_state = state.clone();
        let receiver = tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                let mut guard = receiver_state.lock();
                let still_current = guard
                    .active
                    .get(&update.task_id)
                    .is_some_and(|(_, gen)| *gen == update.generation);
                if still_current {
                    guard.results.insert(update.task_id.clone(), update.record);
                }
            }
        });

        Self {
            state,
            tx,
            semaphore: Arc::new(Semaphore::new(config.worker_count.max(1))),
            workers: SyncMutex::new(JoinSet::new()),
            receiver: Some(receiver),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Submits `job` under `task_id`. Returns `false` without scheduling
    /// anything if an in-flight task with the same id exists and `policy`
    /// says to leave it alone (`Ignore`, or the reserved `Queue`).
    ///
    /// `job` runs on the blocking worker pool (bounded to
    /// `config.worker_count` concurrent jobs) with a fresh [`TaskProxy`] as
    /// its only argument; its first visible effect is the transition to
    /// `Pending`.
    pub fn add_task<F>(
        &self,
        task_id: TaskId,
        idle_message: impl Into<String>,
        policy: loom_core::ConflictPolicy,
        job: F,
    ) -> bool
    where
        F: FnOnce(&TaskProxy) -> CoreResult<TaskData> + Send + 'static,
    {
        use loom_core::ConflictPolicy;

        let mut guard = self.state.lock();
        if let Some(existing) = guard.results.get(&task_id) {
            if existing.status.is_in_flight() {
                match policy {
                    ConflictPolicy::Ignore | ConflictPolicy::Queue => return false,
                    ConflictPolicy::Cancel => {
                        if let Some((token, _)) = guard.active.remove(&task_id) {
                            token.cancel();
                        }
                    }
                }
            }
        }

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        let record = TaskRecord::idle(idle_message, now_ms());
        guard.results.insert(task_id.clone(), record.clone());
        guard.active.insert(task_id.clone(), (cancel.clone(), generation));
        drop(guard);

        let proxy = TaskProxy::new(task_id, generation, record, cancel, self.tx.clone());
        let semaphore = self.semaphore.clone();
        self.workers.lock().spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let proxy = tokio::task::spawn_blocking(move || {
                proxy.log_pending("worker started");
                if proxy.check_stop().is_ok() {
                    proxy.context(None, job);
                }
                proxy
            })
            .await;
            drop(proxy);
        });

        true
    }

    /// Signals cancellation for every task matching `selector`, drops its
    /// scheduler entry (so late status updates are dropped by the receiver
    /// loop), and — if `clear` — removes its result record too.
    pub fn invalidate(&self, selector: TaskSelector, clear: bool) {
        let mut guard = self.state.lock();
        let matching: Vec<TaskId> = guard
            .active
            .keys()
            .filter(|id| guard.matches(id, &selector))
            .cloned()
            .collect();
        for task_id in matching {
            if let Some((token, _)) = guard.active.remove(&task_id) {
                token.cancel();
            }
            if clear {
                guard.results.remove(&task_id);
            }
        }
    }

    /// The current observable state of `task_id`, if any submission has
    /// ever created one.
    pub fn get(&self, task_id: &TaskId) -> Option<TaskRecord> {
        self.state.lock().results.get(task_id).cloned()
    }

    /// True while `task_id` has an active (Idle/Pending) submission whose
    /// scheduler entry has not been invalidated.
    pub fn is_active(&self, task_id: &TaskId) -> bool {
        self.state.lock().active.contains_key(task_id)
    }

    /// Sets every outstanding cancellation token, waits for every worker
    /// task to finish, then closes the status-update channel and waits for
    /// the receiver loop to drain and exit.
    pub async fn shutdown(self) {
        self.invalidate(TaskSelector::All, false);

        let mut workers = std::mem::replace(&mut *self.workers.lock(), JoinSet::new());
        while let Some(result) = workers.join_next().await {
            let _ = result;
        }

        let TaskEngine { tx, receiver, .. } = self;
        drop(tx);
        if let Some(handle) = receiver {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "task_engine_tests.rs"]
mod tests;
