//! Process environment handed to every external tool.
//!
//! The environment is a value computed once per run and applied explicitly to
//! each `Command`; the tool's own process environment is never modified.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::consts::PINNED_LOCALE;
use crate::execute::types::PipelineError;
use crate::resolve::ToolchainRef;

/// Search path and pinned variables for external invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEnv {
  search_path: Vec<PathBuf>,
  joined_path: OsString,
  vars: BTreeMap<&'static str, String>,
}

impl ProcessEnv {
  /// Directories searched for executables, highest priority first.
  pub fn search_path(&self) -> &[PathBuf] {
    &self.search_path
  }

  pub fn vars(&self) -> &BTreeMap<&'static str, String> {
    &self.vars
  }

  /// Sets `PATH` and the pinned variables on `command`.
  pub fn apply(&self, command: &mut Command) {
    command.env("PATH", &self.joined_path);
    for (key, value) in &self.vars {
      command.env(key, value);
    }
  }

  /// Resolves `program` against this environment's search path.
  pub fn find_program(&self, program: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(program, Some(&self.joined_path), cwd).ok()
  }
}

/// Assembles a [`ProcessEnv`].
///
/// Toolchain `bin` and `opt/bin` go ahead of every inherited directory so that
/// toolchain executables shadow system ones of the same name.
pub struct ProcessEnvBuilder<'a> {
  toolchain: &'a ToolchainRef,
  base_path: Option<OsString>,
  locale: String,
}

impl<'a> ProcessEnvBuilder<'a> {
  pub fn new(toolchain: &'a ToolchainRef) -> Self {
    Self {
      toolchain,
      base_path: std::env::var_os("PATH"),
      locale: PINNED_LOCALE.to_string(),
    }
  }

  /// Replaces the inherited `PATH` the toolchain directories are layered over.
  pub fn base_path(mut self, path: Option<OsString>) -> Self {
    self.base_path = path;
    self
  }

  pub fn locale(mut self, locale: impl Into<String>) -> Self {
    self.locale = locale.into();
    self
  }

  pub fn build(self) -> Result<ProcessEnv, PipelineError> {
    let mut search_path = vec![self.toolchain.bin_dir(), self.toolchain.opt_bin_dir()];
    if let Some(base) = &self.base_path {
      search_path.extend(std::env::split_paths(base).filter(|p| !p.as_os_str().is_empty()));
    }

    let joined_path = std::env::join_paths(&search_path)?;

    let mut vars = BTreeMap::new();
    vars.insert("LANG", self.locale.clone());
    vars.insert("LC_ALL", self.locale);

    debug!(path = ?joined_path, ?vars, "process environment");

    Ok(ProcessEnv {
      search_path,
      joined_path,
      vars,
    })
  }
}
