//! stagehand-lib: staged, idempotent source builds.
//!
//! A run acquires a versioned source archive, unpacks it, configures, compiles
//! and installs it into `{root}/{version}/{variant}/{toolchain}`:
//! - `resolve`: version inference, toolchain discovery, deterministic paths
//! - `stage`: stage markers and the guard that skips completed work
//! - `execute`: the pipeline controller and its external collaborators
//! - `env`: the process environment every external tool runs with

pub mod cancel;
pub mod config;
pub mod consts;
pub mod env;
pub mod execute;
pub mod resolve;
pub mod stage;

pub use cancel::CancelToken;
pub use config::{BuildConfig, Variant};
pub use execute::{BuildPlan, Pipeline, PipelineError, PipelineFailure, PipelineReport};
pub use stage::{Stage, StageMarker, StageOutcome};
