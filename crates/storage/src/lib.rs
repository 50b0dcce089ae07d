// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loom-storage: path derivation and two-tier locking for project
//! artifacts under the data root.

pub mod locks;
pub mod paths;

pub use locks::{FileLock, LockManager, ProjectGuardOwned};
pub use paths::{decode_column, encode_column, PathManager};
