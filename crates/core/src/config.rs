// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A project's persisted configuration record (`config.json`): metadata,
//! data-source descriptor, and the typed column schema.

use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;
use crate::schema::SchemaColumn;

/// Current `config.json` schema version. Bumped when the on-disk shape
/// changes in a way that needs migration; this crate does not implement
/// migration, it only records the version it wrote.
pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// How the raw rows were produced. The core stores and round-trips this
/// descriptor; it never opens or parses the underlying file — reading
/// `csv`/`parquet`/`excel` sources is an external collaborator's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSource {
    Csv { path: String },
    Parquet { path: String },
    Excel { path: String, sheet: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSchema {
    pub columns: Vec<SchemaColumn>,
}

impl DataSchema {
    pub fn column(&self, name: &str) -> Option<&SchemaColumn> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Mutable counterpart to [`Self::column`]. Used by the experiment
    /// driver to apply a hyperparameter candidate to a cloned config
    /// without touching any other column.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut SchemaColumn> {
        self.columns.iter_mut().find(|c| c.name() == name)
    }

    /// All non-internal textual columns, in schema order.
    pub fn textual_columns(&self) -> impl Iterator<Item = &SchemaColumn> {
        self.columns
            .iter()
            .filter(|c| !c.common().internal && c.column_type() == crate::schema::ColumnType::Textual)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project_id: ProjectId,
    pub metadata: ProjectMetadata,
    pub source: DataSource,
    pub data_schema: DataSchema,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
