// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The processed project table: rows plus named columns, including the
//! internal companion columns (`(Preprocessed)`, `(Topic)`, ...) the
//! pipeline stages add alongside user-visible ones.
//!
//! Column values are kept as [`serde_json::Value`] rather than a typed
//! columnar representation — the statistics and regression math that
//! would otherwise consume typed columns are an external collaborator's
//! concern (see `SPEC_FULL.md` §1 Non-goals); this crate only needs to
//! carry values through the pipeline and persist them.

use serde::{Deserialize, Serialize};

/// A rectangular, row-order-preserving table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl Workspace {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_values(&self, name: &str) -> Option<Vec<&serde_json::Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Appends a new column, filling every row with `null` unless
    /// `values` supplies one entry per row. If the column already
    /// exists its values are overwritten in place instead.
    pub fn set_column(&mut self, name: &str, values: Vec<serde_json::Value>) {
        debug_assert_eq!(values.len(), self.rows.len());
        if let Some(idx) = self.column_index(name) {
            for (row, value) in self.rows.iter_mut().zip(values) {
                row[idx] = value;
            }
        } else {
            self.columns.push(name.to_string());
            for (row, value) in self.rows.iter_mut().zip(values) {
                row.push(value);
            }
        }
    }

    /// Rows where `column` is non-null and, for strings, non-empty.
    pub fn non_empty_row_indices(&self, column: &str) -> Vec<usize> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| match &row[idx] {
                serde_json::Value::Null => false,
                serde_json::Value::String(s) => !s.is_empty(),
                _ => true,
            })
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
