//! Prints what a build would resolve to, without touching the filesystem.

use anyhow::Result;

use stagehand_lib::{BuildConfig, Pipeline};

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_paths(config: BuildConfig, format: OutputFormat) -> Result<()> {
  let pipeline = Pipeline::with_defaults(config)?;
  let plan = pipeline.plan()?;

  if format.is_json() {
    return print_json(&plan);
  }

  print_stat("Version", &plan.version);
  print_stat("Toolchain", &plan.toolchain.dir.display().to_string());
  print_stat("Archive", &plan.paths.archive.display().to_string());
  print_stat("Source", &plan.paths.extracted_dir.display().to_string());
  print_stat("Build", &plan.paths.build_dir.display().to_string());
  print_stat("Install", &plan.paths.install_dir.display().to_string());
  print_stat("PATH", &plan.env.search_path().iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" "));

  Ok(())
}
