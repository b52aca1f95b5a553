//! Types for pipeline execution.
//!
//! This module defines the error taxonomy, the failure and report types a run
//! ends in, and the resolved plan shared by every stage.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::config::BuildConfig;
use crate::env::ProcessEnv;
use crate::resolve::{ResolvedPaths, ToolchainRef};
use crate::stage::{Stage, StageMarker, StageOutcome};

/// Errors that abort a pipeline run. Every variant is fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// A required external tool is not installed.
  #[error("required tool not found: {tool} (searched PATH for {candidates})")]
  MissingDependency { tool: String, candidates: String },

  /// Transport failure, or the archive is absent after downloading.
  #[error("download failed for {url}: {message}")]
  Download { url: String, message: String },

  /// The sentinel is absent after extraction.
  #[error("extraction verification failed: {} not found", sentinel.display())]
  ExtractionVerification { sentinel: PathBuf },

  /// Discovery found no toolchain.
  #[error("no toolchain found under {} matching {pattern}", root.display())]
  ToolchainNotFound { root: PathBuf, pattern: String },

  /// A stage ran but its marker is still absent.
  #[error("{stage} stage finished but {} does not exist", marker.display())]
  StagePostcondition { stage: Stage, marker: PathBuf },

  /// An external program could not be started.
  #[error("failed to start {program}: {source}")]
  CommandSpawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// The HTTP client could not be constructed.
  #[error("failed to initialize HTTP client: {0}")]
  HttpClient(#[source] reqwest::Error),

  /// The search path could not be assembled.
  #[error("cannot build PATH: {0}")]
  SearchPath(#[from] std::env::JoinPathsError),

  /// I/O error on a specific path.
  #[error("io error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The cancellation token was tripped between stages.
  #[error("cancelled before {stage} stage")]
  Cancelled { stage: Stage },
}

impl PipelineError {
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

/// The absorbing failed state: the stage that failed and why.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {error}")]
pub struct PipelineFailure {
  pub stage: Stage,
  #[source]
  pub error: PipelineError,
}

impl PipelineFailure {
  /// Process exit status for a failed run.
  pub fn exit_code(&self) -> i32 {
    1
  }
}

/// Outcome of every stage of a completed run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
  pub stages: Vec<(Stage, StageOutcome)>,
  pub install_dir: PathBuf,
}

impl PipelineReport {
  pub fn record(&mut self, stage: Stage, outcome: StageOutcome) {
    self.stages.push((stage, outcome));
  }

  pub fn outcome(&self, stage: Stage) -> Option<StageOutcome> {
    self.stages.iter().find(|(s, _)| *s == stage).map(|(_, o)| *o)
  }

  /// True when every stage was skipped because its marker already existed.
  pub fn all_skipped(&self) -> bool {
    !self.stages.is_empty() && self.stages.iter().all(|(_, o)| *o == StageOutcome::Skipped)
  }
}

/// Everything resolved before the first side effect.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
  pub version: String,
  pub toolchain: ToolchainRef,
  pub paths: ResolvedPaths,
  #[serde(skip)]
  pub env: ProcessEnv,
}

impl BuildPlan {
  pub fn archive_marker(&self) -> StageMarker {
    StageMarker::archive(&self.paths.archive)
  }

  pub fn sentinel_marker(&self, config: &BuildConfig) -> StageMarker {
    StageMarker::sentinel(config.sentinel_in(&self.paths.extracted_dir))
  }

  pub fn install_marker(&self) -> StageMarker {
    StageMarker::install_tree(&self.paths.install_dir)
  }
}
