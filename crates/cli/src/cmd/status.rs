//! Status command implementation.
//!
//! Reports which stage markers exist and where the next build would resume.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use stagehand_lib::execute::marker_status;
use stagehand_lib::stage::MarkerKind;
use stagehand_lib::{BuildConfig, Pipeline};

use crate::output::{self, OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_status(config: BuildConfig, format: OutputFormat) -> Result<()> {
  let pipeline = Pipeline::with_defaults(config)?;
  let plan = pipeline.plan()?;
  let markers = marker_status(&plan, pipeline.config());
  let resume_at = markers.iter().find(|(_, _, present)| !present).map(|(stage, _, _)| *stage);

  if format.is_json() {
    let items: Vec<_> = markers
      .iter()
      .map(|(stage, marker, present)| {
        serde_json::json!({ "stage": stage, "kind": marker.kind, "path": marker.path, "present": present })
      })
      .collect();
    let json_output = serde_json::json!({
      "version": plan.version,
      "toolchain": plan.toolchain.name,
      "install_dir": plan.paths.install_dir,
      "markers": items,
      "resume_at": resume_at,
    });
    return print_json(&json_output);
  }

  print_info(&format!("{} ({}, {})", plan.version, pipeline.config().variant, plan.toolchain.name));
  for (_, marker, present) in &markers {
    let label = match marker.kind {
      MarkerKind::Archive => "archive",
      MarkerKind::Sentinel => "extracted",
      MarkerKind::InstallTree => "installed",
    };
    if *present {
      println!(
        "  {} {:<9} {}",
        output::symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
        label,
        marker.path.display()
      );
    } else {
      println!(
        "  {} {:<9} {}",
        output::symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()),
        label,
        "missing".if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    }
  }
  println!();

  match resume_at {
    Some(stage) => print_stat("Next build resumes at", stage.as_str()),
    None => print_success("Installed, nothing left to do"),
  }

  Ok(())
}
