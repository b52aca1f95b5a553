//! Pipeline stages and the idempotency guard around them.
//!
//! A stage is considered complete when its marker path exists. The guard skips
//! the action when the marker is already there, otherwise runs it and checks the
//! marker again afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::execute::types::PipelineError;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
  Prepare,
  Extract,
  Configure,
  Compile,
  Install,
}

impl Stage {
  pub const ORDER: [Stage; 5] = [
    Stage::Prepare,
    Stage::Extract,
    Stage::Configure,
    Stage::Compile,
    Stage::Install,
  ];

  /// The stage that follows this one, or `None` after `Install`.
  pub fn next(self) -> Option<Stage> {
    match self {
      Stage::Prepare => Some(Stage::Extract),
      Stage::Extract => Some(Stage::Configure),
      Stage::Configure => Some(Stage::Compile),
      Stage::Compile => Some(Stage::Install),
      Stage::Install => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Stage::Prepare => "prepare",
      Stage::Extract => "extract",
      Stage::Configure => "configure",
      Stage::Compile => "compile",
      Stage::Install => "install",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
  /// The downloaded source archive.
  Archive,
  /// A file inside the extracted tree.
  Sentinel,
  /// The installed tree.
  InstallTree,
}

/// A path whose existence means a stage already completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageMarker {
  pub kind: MarkerKind,
  pub path: PathBuf,
}

impl StageMarker {
  pub fn archive(path: impl Into<PathBuf>) -> Self {
    Self {
      kind: MarkerKind::Archive,
      path: path.into(),
    }
  }

  pub fn sentinel(path: impl Into<PathBuf>) -> Self {
    Self {
      kind: MarkerKind::Sentinel,
      path: path.into(),
    }
  }

  pub fn install_tree(path: impl Into<PathBuf>) -> Self {
    Self {
      kind: MarkerKind::InstallTree,
      path: path.into(),
    }
  }

  pub fn exists(&self) -> bool {
    marker_exists(&self.path)
  }

  /// Error reported when this marker is still absent after its action ran.
  pub fn missing_error(&self, stage: Stage, source_url: &str) -> PipelineError {
    match self.kind {
      MarkerKind::Archive => PipelineError::Download {
        url: source_url.to_string(),
        message: format!("{} absent after download", self.path.display()),
      },
      MarkerKind::Sentinel => PipelineError::ExtractionVerification {
        sentinel: self.path.clone(),
      },
      MarkerKind::InstallTree => PipelineError::StagePostcondition {
        stage,
        marker: self.path.clone(),
      },
    }
  }

  /// Removes whatever a failed action left at the marker path.
  fn remove_partial(&self) {
    let result = if self.path.is_dir() {
      std::fs::remove_dir_all(&self.path)
    } else {
      std::fs::remove_file(&self.path)
    };
    match result {
      Ok(()) => info!(path = %self.path.display(), "removed partial artifact"),
      Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove partial artifact"),
    }
  }
}

/// Whether a stage marker is present.
pub fn marker_exists(path: &Path) -> bool {
  path.exists()
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
  /// The action executed and the postcondition held.
  Ran,
  /// The marker already existed.
  Skipped,
  /// Dry run: the action was only logged.
  DryRun,
}

/// When the marker is re-checked after the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Postcondition {
  /// Right after the action.
  Verify,
  /// By a later stage sharing the same marker.
  Deferred,
}

/// A guarded stage action.
pub struct Guard<'a> {
  stage: Stage,
  marker: &'a StageMarker,
  source_url: &'a str,
  postcondition: Postcondition,
  dry_run: bool,
}

impl<'a> Guard<'a> {
  pub fn new(stage: Stage, marker: &'a StageMarker) -> Self {
    Self {
      stage,
      marker,
      source_url: "",
      postcondition: Postcondition::Verify,
      dry_run: false,
    }
  }

  /// URL named in the error when an archive marker is missing.
  pub fn source_url(mut self, url: &'a str) -> Self {
    self.source_url = url;
    self
  }

  pub fn postcondition(mut self, postcondition: Postcondition) -> Self {
    self.postcondition = postcondition;
    self
  }

  pub fn dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  /// Runs `action` unless the marker already exists.
  ///
  /// On failure, anything the action left at the marker path is removed so a
  /// later run does not mistake it for a finished artifact. The marker cannot
  /// have existed beforehand, otherwise the action would have been skipped.
  pub fn run<F>(self, description: &str, action: F) -> Result<StageOutcome, PipelineError>
  where
    F: FnOnce() -> Result<(), PipelineError>,
  {
    let stage = self.stage;
    let marker = self.marker;

    if marker.exists() {
      info!(%stage, marker = %marker.path.display(), "marker present, skipping {description}");
      return Ok(StageOutcome::Skipped);
    }

    if self.dry_run {
      info!(%stage, marker = %marker.path.display(), "dry run: would {description}");
      return Ok(StageOutcome::DryRun);
    }

    info!(%stage, "{description}");
    if let Err(e) = action() {
      if marker.exists() {
        marker.remove_partial();
      }
      return Err(e);
    }

    if self.postcondition == Postcondition::Verify && !marker.exists() {
      return Err(marker.missing_error(stage, self.source_url));
    }

    Ok(StageOutcome::Ran)
  }
}

/// Skips `action` if `marker` exists, otherwise runs it and verifies the marker.
pub fn run_guarded<F>(stage: Stage, marker: &StageMarker, action: F) -> Result<StageOutcome, PipelineError>
where
  F: FnOnce() -> Result<(), PipelineError>,
{
  Guard::new(stage, marker).run(stage.as_str(), action)
}
