// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for the project/task/column address space.

use crate::define_id;

define_id! {
    /// A project's filesystem-safe identifier; also its directory name under the data root.
    pub struct ProjectId;
}

define_id! {
    /// Identifies a submitted task. Conventionally `<project_id>__<kind>__<column>`.
    pub struct TaskId;
}

impl TaskId {
    /// Builds the conventional `<project>__<kind>__<column>` task id.
    pub fn scoped(project_id: &ProjectId, kind: &str, column: &str) -> Self {
        Self::new(format!("{}__{}__{}", project_id.as_str(), kind, column))
    }

    /// True if this id was built with `scoped` for the given project.
    pub fn belongs_to(&self, project_id: &ProjectId) -> bool {
        self.0.starts_with(project_id.as_str())
            && self.0[project_id.as_str().len()..].starts_with("__")
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
