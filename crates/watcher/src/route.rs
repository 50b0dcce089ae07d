// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure classification of a changed path (relative to a project's data
//! directory) into the cache invalidation it implies. Kept free of any
//! filesystem or cache access so it can be exhaustively unit tested.

use loom_storage::decode_column;

/// What a changed path under a project directory should invalidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationTarget {
    Config,
    Workspace,
    Column(String),
    /// `.lock` sentinel files, `userdata/`, or anything else not cached.
    Ignore,
}

/// Classifies `relative`, a path already stripped of the project's own
/// directory segment (e.g. `topics/<b64>.json`, not
/// `data/<project_id>/topics/<b64>.json`).
pub fn classify_relative(relative: &std::path::Path) -> InvalidationTarget {
    let mut components = relative.components();
    let Some(first) = components.next() else {
        return InvalidationTarget::Ignore;
    };
    let first = first.as_os_str().to_string_lossy();

    if relative.extension().is_some_and(|ext| ext == "lock") {
        return InvalidationTarget::Ignore;
    }

    match first.as_ref() {
        "config.json" => InvalidationTarget::Config,
        "workspace.parquet" => InvalidationTarget::Workspace,
        "userdata" => InvalidationTarget::Ignore,
        "topics" => column_from_file_stem(relative),
        "bertopic" | "embedding" => column_from_dir_segment(components.next()),
        "evaluation" => column_from_evaluation_file(relative),
        _ => InvalidationTarget::Ignore,
    }
}

fn column_from_file_stem(relative: &std::path::Path) -> InvalidationTarget {
    match relative.file_stem().and_then(|s| s.to_str()).and_then(decode_column) {
        Some(column) => InvalidationTarget::Column(column),
        None => InvalidationTarget::Ignore,
    }
}

fn column_from_dir_segment(segment: Option<std::path::Component<'_>>) -> InvalidationTarget {
    let encoded = segment.map(|c| c.as_os_str().to_string_lossy().into_owned());
    match encoded.as_deref().and_then(decode_column) {
        Some(column) => InvalidationTarget::Column(column),
        None => InvalidationTarget::Ignore,
    }
}

fn column_from_evaluation_file(relative: &std::path::Path) -> InvalidationTarget {
    let stem = match relative.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem,
        None => return InvalidationTarget::Ignore,
    };
    let encoded = stem
        .strip_prefix("topic_evaluation_")
        .or_else(|| stem.strip_prefix("topic_experiment_"));
    match encoded.and_then(decode_column) {
        Some(column) => InvalidationTarget::Column(column),
        None => InvalidationTarget::Ignore,
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
