// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loom-cache: per-project, per-artifact-kind in-memory caching backed by
//! `loom_storage`'s atomic writes and two-tier locking.

pub mod adapters;
pub mod manager;
pub mod policy_cache;

pub use adapters::{
    ConfigAdapter, EvaluationAdapter, ExperimentAdapter, ModelAdapter, TopicAdapter, VectorKind,
    VectorsAdapter, WorkspaceAdapter,
};
pub use manager::{ProjectCache, ProjectCacheManager};
pub use policy_cache::PolicyCache;
