//! External build commands.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;
use tracing::debug;

use crate::env::ProcessEnv;
use crate::execute::types::PipelineError;

/// One external invocation: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
  pub program: PathBuf,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl CommandSpec {
  pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Whether `program` is a bare name to be looked up on the search path.
  fn is_bare(&self) -> bool {
    self.program.components().count() == 1 && !self.program.is_absolute()
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.display())?;
    for arg in &self.args {
      write!(f, " {arg}")?;
    }
    Ok(())
  }
}

/// Runs external commands to completion.
pub trait CommandRunner {
  /// Blocks until the command exits and returns its exit code (`None` when
  /// terminated by a signal). Only failing to start is an error.
  fn run(&self, spec: &CommandSpec, env: &ProcessEnv) -> Result<Option<i32>, PipelineError>;
}

/// Spawns real processes, inheriting stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, spec: &CommandSpec, env: &ProcessEnv) -> Result<Option<i32>, PipelineError> {
    let program = resolve_program(spec, env);

    let mut command = Command::new(&program);
    command.args(&spec.args).current_dir(&spec.cwd);
    env.apply(&mut command);

    debug!(cmd = %spec, program = %program.display(), cwd = %spec.cwd.display(), "spawning process");

    let status = command.status().map_err(|e| PipelineError::CommandSpawn {
      program: spec.program.display().to_string(),
      source: e,
    })?;

    Ok(status.code())
  }
}

/// Bare names resolve against the constructed search path so that toolchain
/// executables win over same-named ones on the caller's `PATH`.
fn resolve_program(spec: &CommandSpec, env: &ProcessEnv) -> PathBuf {
  if spec.is_bare() {
    if let Some(found) = env.find_program(&spec.program.to_string_lossy()) {
      return found;
    }
  }
  spec.program.clone()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::env::ProcessEnvBuilder;
  use crate::resolve::ToolchainRef;
  use tempfile::TempDir;

  fn env(temp: &TempDir) -> ProcessEnv {
    ProcessEnvBuilder::new(&ToolchainRef::from_dir(temp.path().join("mingw810_64")))
      .build()
      .unwrap()
  }

  #[test]
  fn display_joins_program_and_args() {
    let spec = CommandSpec::new("make", "/w/build").arg("-j8").arg("install");
    assert_eq!(spec.to_string(), "make -j8 install");
  }

  #[test]
  fn bare_and_path_programs() {
    assert!(CommandSpec::new("make", "/").is_bare());
    assert!(!CommandSpec::new("/w/source/qt/configure", "/").is_bare());
    assert!(!CommandSpec::new("qt/configure", "/").is_bare());
  }

  #[test]
  fn missing_program_is_spawn_error() {
    let temp = TempDir::new().unwrap();
    let spec = CommandSpec::new(temp.path().join("does-not-exist"), temp.path());

    let result = SystemRunner.run(&spec, &env(&temp));

    assert!(matches!(result, Err(PipelineError::CommandSpawn { .. })));
  }

  #[test]
  #[cfg(unix)]
  fn returns_exit_code_without_failing() {
    let temp = TempDir::new().unwrap();
    let spec = CommandSpec::new("/bin/sh", temp.path()).args(["-c", "exit 3"]);

    let code = SystemRunner.run(&spec, &env(&temp)).unwrap();

    assert_eq!(code, Some(3));
  }

  #[test]
  #[cfg(unix)]
  fn runs_in_cwd_with_pinned_locale() {
    let temp = TempDir::new().unwrap();
    let spec = CommandSpec::new("/bin/sh", temp.path()).args(["-c", "echo \"$LANG:$LC_ALL\" > locale.txt"]);

    SystemRunner.run(&spec, &env(&temp)).unwrap();

    let written = std::fs::read_to_string(temp.path().join("locale.txt")).unwrap();
    assert_eq!(written.trim(), "C:C");
  }
}
