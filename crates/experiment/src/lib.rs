// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loom-experiment: the hyperparameter-search driver (component C8). A
//! higher-order consumer of `loom_pipeline`'s stages: it runs the shared
//! Load/Preprocess prefix once, then re-runs stages 3–7 once per candidate
//! with `can_save = false`, scoring each trial and persisting the growing
//! [`loom_core::ExperimentResult`] after every one so partial progress
//! survives cancellation or a crash (`SPEC_FULL.md` §4.8, scenario S6).

pub mod candidate;
pub mod driver;

pub use candidate::{CandidateSampler, FloatRange, GridSampler, HyperparameterCandidate, HyperparameterConstraint, IntRange};
pub use driver::run_experiment;
