//! Archive extraction through 7-Zip.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::consts::EXTRACTOR_CANDIDATES;
use crate::env::ProcessEnv;
use crate::execute::types::PipelineError;
use crate::resolve::archive::intermediate_tar_name;

/// Unpacks a source archive.
pub trait Extractor {
  /// Fails with `MissingDependency` when the utility cannot be found.
  fn ensure_available(&self, env: &ProcessEnv) -> Result<(), PipelineError>;

  /// Unpacks `archive` into `out_dir`. Success is judged by the caller's
  /// sentinel check, not by the utility's exit status.
  fn extract(&self, archive: &Path, out_dir: &Path, env: &ProcessEnv) -> Result<(), PipelineError>;
}

/// The `7z` command line utility.
#[derive(Debug, Clone)]
pub struct SevenZip {
  candidates: Vec<String>,
}

impl Default for SevenZip {
  fn default() -> Self {
    Self {
      candidates: EXTRACTOR_CANDIDATES.iter().map(|s| s.to_string()).collect(),
    }
  }
}

impl SevenZip {
  /// Searches for the given program names, in order, instead of the defaults.
  pub fn with_candidates<I, S>(candidates: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      candidates: candidates.into_iter().map(Into::into).collect(),
    }
  }

  fn locate(&self, env: &ProcessEnv) -> Result<PathBuf, PipelineError> {
    self
      .candidates
      .iter()
      .find_map(|name| env.find_program(name))
      .ok_or_else(|| PipelineError::MissingDependency {
        tool: self.candidates.first().cloned().unwrap_or_default(),
        candidates: self.candidates.join(", "),
      })
  }

  fn extract_once(&self, program: &Path, archive: &Path, out_dir: &Path, env: &ProcessEnv) -> Result<(), PipelineError> {
    let mut out_flag = OsString::from("-o");
    out_flag.push(out_dir);

    let mut command = Command::new(program);
    command
      .arg("x")
      .arg("-y")
      .arg(out_flag)
      .arg(archive)
      .stdout(Stdio::null());
    env.apply(&mut command);

    debug!(program = %program.display(), archive = %archive.display(), out_dir = %out_dir.display(), "spawning extractor");

    let status = command.status().map_err(|e| PipelineError::CommandSpawn {
      program: program.display().to_string(),
      source: e,
    })?;

    if !status.success() {
      warn!(archive = %archive.display(), code = ?status.code(), "extractor exited with failure");
    }

    Ok(())
  }
}

impl Extractor for SevenZip {
  fn ensure_available(&self, env: &ProcessEnv) -> Result<(), PipelineError> {
    let program = self.locate(env)?;
    debug!(program = %program.display(), "found extractor");
    Ok(())
  }

  fn extract(&self, archive: &Path, out_dir: &Path, env: &ProcessEnv) -> Result<(), PipelineError> {
    let program = self.locate(env)?;
    info!(archive = %archive.display(), out_dir = %out_dir.display(), "extracting archive");
    self.extract_once(&program, archive, out_dir, env)?;

    // Compressed tarballs unpack to a .tar first.
    let file_name = archive.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    if let Some(tar_name) = intermediate_tar_name(&file_name) {
      let tar = out_dir.join(tar_name);
      if tar.exists() {
        self.extract_once(&program, &tar, out_dir, env)?;
        std::fs::remove_file(&tar).map_err(|e| PipelineError::io(&tar, e))?;
      }
    }

    Ok(())
  }
}
