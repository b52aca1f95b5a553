//! Implementation of the `stagehand build` command.
//!
//! Runs the full pipeline, skipping every stage whose marker is already present.

use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use stagehand_lib::{BuildConfig, Pipeline};

use crate::output::{format_duration, print_info, print_stage, print_stat, print_success, print_warning};

/// Execute the build command.
///
/// A failed stage surfaces as the returned error; the caller turns it into a
/// single diagnostic line and exit status 1.
pub fn cmd_build(config: BuildConfig) -> Result<()> {
  let dry_run = config.dry_run;
  debug!(?config, "starting build");

  let pipeline = Pipeline::with_defaults(config)?;
  let started = Instant::now();
  let report = pipeline.run()?;

  for (stage, outcome) in &report.stages {
    print_stage(*stage, *outcome);
  }
  println!();

  if dry_run {
    print_warning("Dry run: nothing was downloaded, extracted or built");
  } else if report.all_skipped() {
    print_info("Nothing to do, every stage was already complete");
  } else {
    print_success(&format!("Build complete in {}", format_duration(started.elapsed())));
  }
  print_stat("Installed to", &report.install_dir.display().to_string());

  Ok(())
}
