//! Well-known locations for one pipeline run.

use std::path::PathBuf;

use serde::Serialize;

use super::archive::strip_archive_extension;
use crate::config::BuildConfig;

/// Every location the stages read or write.
///
/// A pure function of `BuildConfig`, the source file name, the resolved version
/// and the toolchain leaf name. Re-running with the same inputs always lands on
/// the same paths, which is what lets the stage markers carry over between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
  /// Final segment of the source URL.
  pub source_file_name: String,
  /// `{work}/source`
  pub source_dir: PathBuf,
  /// `{work}/source/{source_file_name}`
  pub archive: PathBuf,
  /// `{work}/source/{source_file_name minus archive extension}`
  pub extracted_dir: PathBuf,
  /// `{work}/build`
  pub build_dir: PathBuf,
  /// `{root}/{version}/{variant}/{toolchain}`
  pub install_dir: PathBuf,
}

impl ResolvedPaths {
  pub fn resolve(config: &BuildConfig, source_file_name: &str, version: &str, toolchain_name: &str) -> Self {
    let source_dir = config.work_dir.join("source");
    Self {
      source_file_name: source_file_name.to_string(),
      archive: source_dir.join(source_file_name),
      extracted_dir: source_dir.join(strip_archive_extension(source_file_name)),
      source_dir,
      build_dir: config.work_dir.join("build"),
      install_dir: config
        .root_dir
        .join(version)
        .join(config.variant.as_str())
        .join(toolchain_name),
    }
  }
}
