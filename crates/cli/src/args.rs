//! Options shared by every subcommand, and their mapping onto `BuildConfig`.

use std::path::PathBuf;

use clap::{ArgAction, Args};

use stagehand_lib::config::{
  BuildConfig, Variant, default_jobs, default_root_dir, default_source_url, default_toolchain_root, default_work_dir,
};
use stagehand_lib::consts::{DEFAULT_SENTINEL, DEFAULT_VARIANT};

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
  /// Source archive URL [env: STAGEHAND_URL]
  #[arg(long)]
  pub url: Option<String>,

  /// Root directory for install trees [env: STAGEHAND_ROOT]
  #[arg(long)]
  pub root_dir: Option<PathBuf>,

  /// Scratch directory for source and build trees [env: STAGEHAND_WORK_DIR]
  #[arg(long)]
  pub work_dir: Option<PathBuf>,

  /// Build variant; Dynamic/Shared or Static select the linkage
  #[arg(long, default_value = DEFAULT_VARIANT)]
  pub variant: String,

  /// Version to install under, instead of inferring it from the archive name
  #[arg(long = "source-version", value_name = "VERSION")]
  pub version: Option<String>,

  /// Toolchain directory, skipping discovery
  #[arg(long)]
  pub toolchain_dir: Option<PathBuf>,

  /// Where to search for toolchains [env: STAGEHAND_TOOLCHAIN_ROOT]
  #[arg(long)]
  pub toolchain_root: Option<PathBuf>,

  /// File that must exist in the extracted tree, relative to its top directory
  #[arg(long, default_value = DEFAULT_SENTINEL)]
  pub sentinel: PathBuf,

  /// Extra argument for the configure script (repeatable)
  #[arg(long = "configure-arg", value_name = "ARG", allow_hyphen_values = true)]
  pub configure_args: Vec<String>,

  /// Parallel compile jobs (default: available cores)
  #[arg(short, long)]
  pub jobs: Option<usize>,

  /// Log every stage action without executing it
  #[arg(long)]
  pub dry_run: bool,

  /// Do not wait for a key press before exiting
  #[arg(long = "no-pause", action = ArgAction::SetFalse)]
  pub pause: bool,
}

impl BuildArgs {
  /// Flags win over `STAGEHAND_*` variables, which win over built-in defaults.
  pub fn into_config(self) -> BuildConfig {
    BuildConfig {
      source_url: self.url.unwrap_or_else(default_source_url),
      root_dir: self.root_dir.unwrap_or_else(default_root_dir),
      work_dir: self.work_dir.unwrap_or_else(default_work_dir),
      variant: Variant::new(self.variant),
      version: self.version,
      toolchain_dir: self.toolchain_dir,
      toolchain_root: self.toolchain_root.unwrap_or_else(default_toolchain_root),
      sentinel: self.sentinel,
      configure_args: self.configure_args,
      jobs: self.jobs.unwrap_or_else(default_jobs).max(1),
      pause_on_exit: self.pause,
      dry_run: self.dry_run,
    }
  }
}
