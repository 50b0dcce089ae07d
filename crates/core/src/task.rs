// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared, observable record of a submitted task: status, append-only
//! log, and an optional result payload.

use serde::{Deserialize, Serialize};

/// Lifecycle of a submitted task. `Idle` on creation, `Pending` once a
/// worker picks it up, then one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Idle,
    Pending,
    Success,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, TaskStatus::Idle | TaskStatus::Pending)
    }
}

/// One append-only entry in a task's log. Readers observe these in the
/// order they were appended (see `loom_engine::TaskEngine`'s receiver loop).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLog {
    pub status: TaskStatus,
    pub message: String,
    pub timestamp_ms: u64,
}

impl TaskLog {
    pub fn new(status: TaskStatus, message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            status,
            message: message.into(),
            timestamp_ms,
        }
    }
}

/// What a submitter should do when a task with the same id is already
/// in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the existing task alone; the new submission is dropped.
    Ignore,
    /// Cancel the existing task and replace it with the new submission.
    /// Newest submissions win against conflicting in-flight work.
    Cancel,
    /// Reserved: run the new submission after the current one finishes.
    /// Not produced by any first-generation caller.
    Queue,
}

/// A kind-specific result payload attached to a terminal `Success` record.
/// Deliberately a narrow sum type rather than an open `serde_json::Value` —
/// each adapter in `loom_cache` knows exactly which variant it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskData {
    Empty,
    Topics(crate::topic::TopicResult),
    Evaluation(crate::topic::EvaluationMetrics),
    Experiment(crate::topic::ExperimentResult),
}

/// The shared state of one submitted task, as observed by any reader of the
/// task engine's results map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub status: TaskStatus,
    pub logs: Vec<TaskLog>,
    pub data: Option<TaskData>,
}

impl TaskRecord {
    pub fn idle(message: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            status: TaskStatus::Idle,
            logs: vec![TaskLog::new(TaskStatus::Idle, message, timestamp_ms)],
            data: None,
        }
    }

    pub fn push_log(&mut self, status: TaskStatus, message: impl Into<String>, timestamp_ms: u64) {
        self.status = status;
        self.logs.push(TaskLog::new(status, message, timestamp_ms));
    }

    pub fn succeed(&mut self, data: TaskData, message: impl Into<String>, timestamp_ms: u64) {
        self.data = Some(data);
        self.push_log(TaskStatus::Success, message, timestamp_ms);
    }

    pub fn fail(&mut self, message: impl Into<String>, timestamp_ms: u64) {
        self.push_log(TaskStatus::Failed, message, timestamp_ms);
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
