// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a raw filesystem event path into a project id plus a relative
//! path, then applies the invalidation the [`crate::route`] classifier
//! derives from it.

use std::path::Path;

use loom_cache::ProjectCacheManager;
use loom_core::ProjectId;
use loom_storage::LockManager;
use tracing::debug;

use crate::route::{classify_relative, InvalidationTarget};

/// Splits an absolute event path into `(project_id, relative_path)`,
/// given the watched data root. Returns `None` for paths outside any
/// project directory (e.g. the data root itself, or a sibling file).
pub fn split_project_path<'a>(data_root: &Path, path: &'a Path) -> Option<(ProjectId, &'a Path)> {
    let relative = path.strip_prefix(data_root).ok()?;
    let mut components = relative.components();
    let project_dir = components.next()?.as_os_str().to_str()?;
    let rest = components.as_path();
    if rest.as_os_str().is_empty() {
        return None;
    }
    Some((ProjectId::new(project_dir), rest))
}

/// Applies the invalidation implied by one changed path. Acquires the
/// project's intra-process lock first, so a concurrent cache save can't
/// race with the invalidation it's meant to supersede.
pub fn apply(cache: &ProjectCacheManager, locks: &LockManager, data_root: &Path, path: &Path) {
    let Some((project_id, relative)) = split_project_path(data_root, path) else {
        return;
    };
    let target = classify_relative(relative);
    if target == InvalidationTarget::Ignore {
        return;
    }

    let guard = match locks.acquire_project(&project_id) {
        Ok(guard) => guard,
        Err(_) => return,
    };
    let _held = guard.lock();

    let project_cache = cache.get(&project_id);
    match target {
        InvalidationTarget::Config => project_cache.invalidate_config(),
        InvalidationTarget::Workspace => project_cache.invalidate_workspace(),
        InvalidationTarget::Column(column) => project_cache.invalidate_column(&column),
        InvalidationTarget::Ignore => unreachable!(),
    }
    debug!(project_id = project_id.as_str(), path = %relative.display(), "invalidated cache entry from watcher event");
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;
