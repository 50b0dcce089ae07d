// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A one-shot cancellation signal, observed cooperatively by stage code via
//! [`CancellationToken::is_set`] / [`crate::TaskProxy::check_stop`].
//!
//! Deliberately not an exception: per `SPEC_FULL.md` §4.6/9, cancellation in
//! this engine is an explicit flag checked at safe points, not something
//! that interrupts a running computation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
