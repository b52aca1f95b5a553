//! Build configuration assembled once per run.
//!
//! Defaults follow the same precedence everywhere: an explicit value wins, then
//! the matching `STAGEHAND_*` environment variable, then the built-in default.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{
  APP_NAME, DEFAULT_SENTINEL, DEFAULT_SOURCE_URL, DEFAULT_VARIANT, ENV_ROOT, ENV_TOOLCHAIN_ROOT, ENV_URL,
  ENV_WORK_DIR,
};

/// Build flavor tag. Becomes a path segment of the install directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Variant(pub String);

/// Linkage implied by a variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
  Shared,
  Static,
  /// Unrecognized tag; no linkage flag is passed to configure.
  Unspecified,
}

impl Variant {
  pub fn new(tag: impl Into<String>) -> Self {
    Self(tag.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn linkage(&self) -> Linkage {
    match self.0.to_ascii_lowercase().as_str() {
      "dynamic" | "shared" => Linkage::Shared,
      "static" => Linkage::Static,
      _ => Linkage::Unspecified,
    }
  }
}

impl Default for Variant {
  fn default() -> Self {
    Self::new(DEFAULT_VARIANT)
  }
}

impl fmt::Display for Variant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Inputs to a pipeline run. Never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct BuildConfig {
  /// Location of the source archive.
  pub source_url: String,

  /// Root under which `{version}/{variant}/{toolchain}` install trees live.
  pub root_dir: PathBuf,

  /// Scratch area holding `source/` and `build/`.
  pub work_dir: PathBuf,

  pub variant: Variant,

  /// Explicit version; when set, inference from the file name is skipped.
  pub version: Option<String>,

  /// Explicit toolchain directory; when set, discovery is skipped.
  pub toolchain_dir: Option<PathBuf>,

  /// Where toolchain discovery searches (`<root>/*/Tools/mingw*/bin/gcc.exe`).
  pub toolchain_root: PathBuf,

  /// Marker file expected inside the extracted tree, relative to its top directory.
  pub sentinel: PathBuf,

  /// Extra flags appended after the fixed configure option set.
  pub configure_args: Vec<String>,

  /// Parallel jobs handed to the compile command.
  pub jobs: usize,

  pub pause_on_exit: bool,

  /// Log stage actions without executing them.
  pub dry_run: bool,
}

impl BuildConfig {
  /// Returns a config with every field at its default except the three paths
  /// that locate the run.
  pub fn new(source_url: impl Into<String>, root_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
    Self {
      source_url: source_url.into(),
      root_dir: root_dir.into(),
      work_dir: work_dir.into(),
      ..Self::default()
    }
  }

  /// Path of the sentinel inside a given extracted tree.
  pub fn sentinel_in(&self, extracted_dir: &Path) -> PathBuf {
    extracted_dir.join(&self.sentinel)
  }
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      source_url: default_source_url(),
      root_dir: default_root_dir(),
      work_dir: default_work_dir(),
      variant: Variant::default(),
      version: None,
      toolchain_dir: None,
      toolchain_root: default_toolchain_root(),
      sentinel: PathBuf::from(DEFAULT_SENTINEL),
      configure_args: Vec::new(),
      jobs: default_jobs(),
      pause_on_exit: true,
      dry_run: false,
    }
  }
}

pub fn default_source_url() -> String {
  std::env::var(ENV_URL).unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string())
}

pub fn default_root_dir() -> PathBuf {
  if let Ok(path) = std::env::var(ENV_ROOT) {
    return PathBuf::from(path);
  }

  builtin_root_dir()
}

#[cfg(windows)]
fn builtin_root_dir() -> PathBuf {
  PathBuf::from(r"C:\Qt")
}

#[cfg(not(windows))]
fn builtin_root_dir() -> PathBuf {
  PathBuf::from("/opt/qt")
}

/// Work directory: `work/` next to the running executable.
pub fn default_work_dir() -> PathBuf {
  if let Ok(path) = std::env::var(ENV_WORK_DIR) {
    return PathBuf::from(path);
  }

  std::env::current_exe()
    .ok()
    .and_then(|exe| exe.parent().map(|dir| dir.join("work")))
    .unwrap_or_else(|| PathBuf::from(APP_NAME).join("work"))
}

pub fn default_toolchain_root() -> PathBuf {
  if let Ok(path) = std::env::var(ENV_TOOLCHAIN_ROOT) {
    return PathBuf::from(path);
  }

  builtin_toolchain_root()
}

#[cfg(windows)]
fn builtin_toolchain_root() -> PathBuf {
  PathBuf::from(r"C:\Qt")
}

#[cfg(not(windows))]
fn builtin_toolchain_root() -> PathBuf {
  PathBuf::from("/opt/Qt")
}

pub fn default_jobs() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use temp_env::with_vars;

  #[test]
  fn variant_linkage_is_case_insensitive() {
    assert_eq!(Variant::new("Dynamic").linkage(), Linkage::Shared);
    assert_eq!(Variant::new("static").linkage(), Linkage::Static);
    assert_eq!(Variant::new("STATIC").linkage(), Linkage::Static);
    assert_eq!(Variant::new("Debug").linkage(), Linkage::Unspecified);
  }

  #[test]
  fn default_variant_is_dynamic() {
    assert_eq!(Variant::default().as_str(), "Dynamic");
  }

  #[test]
  #[serial]
  fn env_vars_override_defaults() {
    with_vars(
      [
        (ENV_URL, Some("https://mirror.example/qt-everywhere-src-6.2.0.tar.xz")),
        (ENV_ROOT, Some("/custom/root")),
        (ENV_WORK_DIR, Some("/custom/work")),
        (ENV_TOOLCHAIN_ROOT, Some("/custom/tools")),
      ],
      || {
        let config = BuildConfig::default();
        assert_eq!(config.source_url, "https://mirror.example/qt-everywhere-src-6.2.0.tar.xz");
        assert_eq!(config.root_dir, PathBuf::from("/custom/root"));
        assert_eq!(config.work_dir, PathBuf::from("/custom/work"));
        assert_eq!(config.toolchain_root, PathBuf::from("/custom/tools"));
      },
    );
  }

  #[test]
  #[serial]
  fn defaults_without_env() {
    with_vars(
      [
        (ENV_URL, None::<&str>),
        (ENV_ROOT, None::<&str>),
        (ENV_WORK_DIR, None::<&str>),
      ],
      || {
        let config = BuildConfig::default();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.root_dir, builtin_root_dir());
        assert!(config.work_dir.ends_with("work"));
        assert!(config.pause_on_exit);
        assert!(!config.dry_run);
        assert!(config.version.is_none());
        assert!(config.toolchain_dir.is_none());
        assert!(config.jobs >= 1);
      },
    );
  }

  #[test]
  fn explicit_paths_keep_other_defaults() {
    let config = BuildConfig::new("https://example.com/a.zip", "/opt/product", "/tmp/work");
    assert_eq!(config.root_dir, PathBuf::from("/opt/product"));
    assert_eq!(config.variant, Variant::default());
    assert_eq!(config.sentinel_in(Path::new("/tmp/work/source/a")), PathBuf::from("/tmp/work/source/a/configure"));
  }
}
