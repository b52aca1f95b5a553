//! Toolchain discovery.
//!
//! Candidates live at `<root>/*/Tools/<prefix>*/bin/<compiler>`. All matches are
//! sorted and the last one wins. This is a heuristic: directory names usually
//! embed a version or architecture (`mingw730_64`, `mingw810_32`) and the
//! lexicographically greatest tends to be the newest, but nothing parses or
//! compares versions, so `mingw1000` sorts before `mingw810`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::consts::{COMPILER_EXE, TOOLCHAIN_PREFIX};
use crate::execute::types::PipelineError;

/// Depth of the compiler executable below the search root.
const COMPILER_DEPTH: usize = 5;

/// A resolved toolchain directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainRef {
  pub dir: PathBuf,
  /// Leaf name of `dir`; becomes the last segment of the install path.
  pub name: String,
}

impl ToolchainRef {
  pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
    let dir = dir.into();
    let name = dir
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| dir.to_string_lossy().into_owned());
    Self { dir, name }
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.dir.join("bin")
  }

  pub fn opt_bin_dir(&self) -> PathBuf {
    self.dir.join("opt").join("bin")
  }
}

/// Where and what to look for during discovery.
#[derive(Debug, Clone)]
pub struct ToolchainSearch {
  pub root: PathBuf,
  pub prefix: String,
  pub compiler: String,
}

impl ToolchainSearch {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      prefix: TOOLCHAIN_PREFIX.to_string(),
      compiler: COMPILER_EXE.to_string(),
    }
  }

  /// Human-readable glob of what is searched for.
  pub fn pattern(&self) -> String {
    format!("*/Tools/{}*/bin/{}", self.prefix, self.compiler)
  }

  /// All compiler executables matching the pattern, sorted.
  pub fn candidates(&self) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(&self.root)
      .max_depth(COMPILER_DEPTH)
      .follow_links(true)
      .into_iter()
      .filter_entry(|entry| self.matches_level(entry.depth(), entry.file_name()))
      .filter_map(Result::ok)
      .filter(|entry| entry.depth() == COMPILER_DEPTH && !entry.file_type().is_dir())
      .map(|entry| entry.into_path())
      .collect();
    // Plain string order, not component order: `Qt` must sort before `Qt-6`.
    found.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    found
  }

  /// Picks the last candidate and returns the toolchain two levels above it.
  pub fn locate(&self) -> Result<ToolchainRef, PipelineError> {
    let candidates = self.candidates();
    debug!(root = %self.root.display(), count = candidates.len(), ?candidates, "toolchain candidates");

    let dir = candidates
      .last()
      .and_then(|exe| exe.parent())
      .and_then(Path::parent)
      .ok_or_else(|| PipelineError::ToolchainNotFound {
        root: self.root.clone(),
        pattern: self.pattern(),
      })?;

    let toolchain = ToolchainRef::from_dir(dir);
    info!(toolchain = %toolchain.dir.display(), "selected toolchain");
    Ok(toolchain)
  }

  fn matches_level(&self, depth: usize, name: &OsStr) -> bool {
    match depth {
      0 | 1 => true,
      2 => name == "Tools",
      3 => name.to_string_lossy().starts_with(&self.prefix),
      4 => name == "bin",
      COMPILER_DEPTH => name == self.compiler.as_str(),
      _ => false,
    }
  }
}

/// Uses `explicit` when given; otherwise runs discovery.
pub fn resolve_toolchain(explicit: Option<&Path>, search: &ToolchainSearch) -> Result<ToolchainRef, PipelineError> {
  match explicit {
    Some(dir) => {
      debug!(toolchain = %dir.display(), "using explicit toolchain");
      Ok(ToolchainRef::from_dir(dir))
    }
    None => search.locate(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  fn install_compiler(root: &Path, relative: &str) {
    let exe = root.join(relative);
    fs::create_dir_all(exe.parent().unwrap()).unwrap();
    fs::write(&exe, b"").unwrap();
  }

  #[test]
  fn selects_lexicographically_last_candidate() {
    let temp = TempDir::new().unwrap();
    install_compiler(temp.path(), "X/Tools/mingw730/bin/gcc.exe");
    install_compiler(temp.path(), "Y/Tools/mingw810_32/bin/gcc.exe");

    let toolchain = ToolchainSearch::new(temp.path()).locate().unwrap();

    assert_eq!(toolchain.dir, temp.path().join("Y/Tools/mingw810_32"));
    assert_eq!(toolchain.name, "mingw810_32");
  }

  #[test]
  fn orders_candidates_by_full_path_string() {
    let temp = TempDir::new().unwrap();
    install_compiler(temp.path(), "Qt/Tools/mingw810_64/bin/gcc.exe");
    install_compiler(temp.path(), "Qt-6/Tools/mingw730_64/bin/gcc.exe");

    let search = ToolchainSearch::new(temp.path());
    let toolchain = search.locate().unwrap();

    // "Qt/" > "Qt-" as strings, though `Qt` < `Qt-6` as path components.
    assert_eq!(toolchain.dir, temp.path().join("Qt/Tools/mingw810_64"));
    assert_eq!(
      search.candidates(),
      vec![
        temp.path().join("Qt-6/Tools/mingw730_64/bin/gcc.exe"),
        temp.path().join("Qt/Tools/mingw810_64/bin/gcc.exe"),
      ]
    );
  }

  #[test]
  fn ignores_non_matching_layouts() {
    let temp = TempDir::new().unwrap();
    install_compiler(temp.path(), "X/Tools/mingw730/bin/gcc.exe");
    install_compiler(temp.path(), "Z/Tools/llvm/bin/gcc.exe");
    install_compiler(temp.path(), "Z/Other/mingw900/bin/gcc.exe");
    install_compiler(temp.path(), "Z/Tools/mingw900/lib/gcc.exe");
    install_compiler(temp.path(), "Z/Tools/mingw900/bin/clang.exe");

    let candidates = ToolchainSearch::new(temp.path()).candidates();

    assert_eq!(candidates, vec![temp.path().join("X/Tools/mingw730/bin/gcc.exe")]);
  }

  #[test]
  fn no_candidates_is_an_error() {
    let temp = TempDir::new().unwrap();
    let result = ToolchainSearch::new(temp.path()).locate();
    assert!(matches!(result, Err(PipelineError::ToolchainNotFound { .. })));
  }

  #[test]
  fn missing_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    let result = ToolchainSearch::new(temp.path().join("absent")).locate();
    assert!(matches!(result, Err(PipelineError::ToolchainNotFound { .. })));
  }

  #[test]
  fn explicit_dir_skips_discovery() {
    let temp = TempDir::new().unwrap();
    // Empty search root: discovery would fail.
    let search = ToolchainSearch::new(temp.path());
    let explicit = PathBuf::from("/toolchains/mingw810_64");

    let toolchain = resolve_toolchain(Some(&explicit), &search).unwrap();

    assert_eq!(toolchain.dir, explicit);
    assert_eq!(toolchain.name, "mingw810_64");
  }

  #[test]
  fn bin_dirs() {
    let toolchain = ToolchainRef::from_dir("/t/mingw810_64");
    assert_eq!(toolchain.bin_dir(), PathBuf::from("/t/mingw810_64/bin"));
    assert_eq!(toolchain.opt_bin_dir(), PathBuf::from("/t/mingw810_64/opt/bin"));
  }
}
