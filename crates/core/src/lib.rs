// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loom-core: shared domain types for the project execution and state plane
//! — identifiers, schema, task records, topic results, and error kinds.

pub mod config;
pub mod error;
pub mod id;
pub mod ids;
pub mod schema;
pub mod task;
pub mod time_fmt;
pub mod topic;
pub mod vectors;
pub mod workspace;

pub use config::{DataSchema, DataSource, ProjectConfig, ProjectMetadata, CONFIG_VERSION};
pub use error::{CoreError, CoreResult, MissingColumn};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use ids::{ProjectId, TaskId};
pub use schema::{
    ColumnCommon, ColumnType, DocumentEmbeddingMethod, GeospatialRole, SchemaColumn,
    TextPreprocessingConfig, TopicModelingConfig,
};
pub use task::{ConflictPolicy, TaskData, TaskLog, TaskRecord, TaskStatus};
pub use time_fmt::{format_elapsed, format_elapsed_ms, now_ms};
pub use topic::{EvaluationMetrics, ExperimentResult, Topic, TopicModelingResult, TopicResult, TrialResult};
pub use vectors::DocumentVectors;
pub use workspace::Workspace;
