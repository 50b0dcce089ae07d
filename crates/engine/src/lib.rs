// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loom-engine: the in-process task scheduler (C6) and the per-job proxy
//! (C5) it injects into every job body. Accepts user-triggered long jobs,
//! runs them on a bounded worker pool, streams log/status updates back to
//! the foreground via the shared results map, supports cooperative
//! cancellation, and enforces per-task-id conflict policies.

pub mod cancel;
pub mod error;
pub mod proxy;
pub mod task_engine;

pub use cancel::CancellationToken;
pub use error::{EngineError, EngineResult};
pub use proxy::{StatusUpdate, TaskProxy};
pub use task_engine::{EngineConfig, TaskEngine, TaskSelector};
