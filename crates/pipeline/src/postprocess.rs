// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Final shape of a topic-modeling run, before it's written to the
//! project's persisted [`loom_core::TopicResult`]. Kept as its own type so
//! the evaluation collaborator (and the experiment driver, which never
//! writes a [`loom_core::TopicResult`] to disk) can consume it directly.

use loom_core::Topic;

#[derive(Debug, Clone)]
pub struct PostprocessResult {
    pub topics: Vec<Topic>,
    pub hierarchy: Option<Topic>,
    pub document_topic_assignments: Vec<i32>,
}

impl PostprocessResult {
    pub fn valid_count(&self) -> usize {
        self.document_topic_assignments.iter().filter(|&&t| t >= 0).count()
    }

    pub fn outlier_count(&self) -> usize {
        self.document_topic_assignments.iter().filter(|&&t| t < 0).count()
    }
}
