//! Pipeline controller.
//!
//! Runs `Prepare → Extract → Configure → Compile → Install` strictly in order.
//! The first error moves the run into the failed state: the failing stage and
//! its error are returned and nothing already completed is rolled back. A
//! re-run resumes on its own because every stage is guarded by a marker.

pub mod actions;
pub mod commands;
pub mod types;

use std::ffi::OsString;
use std::fs;

use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::BuildConfig;
use crate::env::ProcessEnvBuilder;
use crate::resolve::{ResolvedPaths, ToolchainSearch, resolve_toolchain, resolve_version, source_file_name};
use crate::stage::{Guard, Postcondition, Stage, StageMarker, StageOutcome};

pub use actions::{CommandRunner, CommandSpec, Extractor, Fetcher, HttpFetcher, SevenZip, SystemRunner};
pub use types::{BuildPlan, PipelineError, PipelineFailure, PipelineReport};

/// Drives one build through all stages.
pub struct Pipeline<F, X, R> {
  config: BuildConfig,
  fetcher: F,
  extractor: X,
  runner: R,
  cancel: Option<CancelToken>,
  base_path: Option<Option<OsString>>,
}

impl Pipeline<HttpFetcher, SevenZip, SystemRunner> {
  /// Pipeline wired to the network, 7-Zip and real processes.
  pub fn with_defaults(config: BuildConfig) -> Result<Self, PipelineError> {
    Ok(Self::new(config, HttpFetcher::new()?, SevenZip::default(), SystemRunner))
  }
}

impl<F, X, R> Pipeline<F, X, R>
where
  F: Fetcher,
  X: Extractor,
  R: CommandRunner,
{
  pub fn new(config: BuildConfig, fetcher: F, extractor: X, runner: R) -> Self {
    Self {
      config,
      fetcher,
      extractor,
      runner,
      cancel: None,
      base_path: None,
    }
  }

  /// Checks `token` before each stage and stops with `Cancelled` once tripped.
  pub fn with_cancel(mut self, token: CancelToken) -> Self {
    self.cancel = Some(token);
    self
  }

  /// Layers the toolchain over `path` instead of the inherited `PATH`.
  pub fn with_base_path(mut self, path: Option<OsString>) -> Self {
    self.base_path = Some(path);
    self
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  /// Resolves toolchain, version, paths and environment without side effects.
  pub fn plan(&self) -> Result<BuildPlan, PipelineError> {
    let search = ToolchainSearch::new(&self.config.toolchain_root);
    let toolchain = resolve_toolchain(self.config.toolchain_dir.as_deref(), &search)?;

    let file_name = source_file_name(&self.config.source_url);
    let version = resolve_version(self.config.version.as_deref(), &file_name);
    let paths = ResolvedPaths::resolve(&self.config, &file_name, &version, &toolchain.name);

    let mut builder = ProcessEnvBuilder::new(&toolchain);
    if let Some(base) = &self.base_path {
      builder = builder.base_path(base.clone());
    }
    let env = builder.build()?;

    Ok(BuildPlan {
      version,
      toolchain,
      paths,
      env,
    })
  }

  /// Runs every stage. Returns the per-stage report, or the failed state.
  pub fn run(&self) -> Result<PipelineReport, PipelineFailure> {
    let mut report = PipelineReport::default();

    self.checkpoint(Stage::Prepare)?;
    let (plan, outcome) = self.prepare().map_err(|e| self.fail(Stage::Prepare, e))?;
    report.record(Stage::Prepare, outcome);

    let mut next = Stage::Prepare.next();
    while let Some(stage) = next {
      self.checkpoint(stage)?;
      let outcome = self.run_stage(stage, &plan).map_err(|e| self.fail(stage, e))?;
      report.record(stage, outcome);
      next = stage.next();
    }

    info!(install_dir = %plan.paths.install_dir.display(), "pipeline complete");
    report.install_dir = plan.paths.install_dir;
    Ok(report)
  }

  fn checkpoint(&self, stage: Stage) -> Result<(), PipelineFailure> {
    match &self.cancel {
      Some(token) if token.is_cancelled() => Err(self.fail(stage, PipelineError::Cancelled { stage })),
      _ => Ok(()),
    }
  }

  fn fail(&self, stage: Stage, error: PipelineError) -> PipelineFailure {
    debug!(%stage, error = %error, "pipeline failed");
    PipelineFailure { stage, error }
  }

  /// Resolves inputs, checks the extractor, creates directories and downloads.
  fn prepare(&self) -> Result<(BuildPlan, StageOutcome), PipelineError> {
    let plan = self.plan()?;
    info!(
      version = %plan.version,
      toolchain = %plan.toolchain.dir.display(),
      install_dir = %plan.paths.install_dir.display(),
      "resolved build"
    );

    if let Err(e) = self.extractor.ensure_available(&plan.env) {
      if !self.config.dry_run {
        return Err(e);
      }
      warn!(error = %e, "dry run: extractor unavailable");
    }

    if self.config.dry_run {
      info!(source_dir = %plan.paths.source_dir.display(), build_dir = %plan.paths.build_dir.display(), "dry run: would create directories");
    } else {
      for dir in [&plan.paths.source_dir, &plan.paths.build_dir] {
        fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
      }
    }

    let marker = plan.archive_marker();
    let outcome = self
      .guard(Stage::Prepare, &marker)
      .run("download source archive", || {
        self.fetcher.fetch(&self.config.source_url, &plan.paths.archive)
      })?;

    Ok((plan, outcome))
  }

  fn run_stage(&self, stage: Stage, plan: &BuildPlan) -> Result<StageOutcome, PipelineError> {
    let paths = &plan.paths;
    match stage {
      // Runs first, in `prepare`, because it produces the plan.
      Stage::Prepare => Ok(StageOutcome::Skipped),
      Stage::Extract => {
        let marker = plan.sentinel_marker(&self.config);
        self.guard(stage, &marker).run("extract source archive", || {
          self.extractor.extract(&paths.archive, &paths.source_dir, &plan.env)
        })
      }
      Stage::Configure => {
        let spec = commands::configure_command(&self.config, paths);
        self.run_build_command(stage, plan, &spec, Postcondition::Deferred)
      }
      Stage::Compile => {
        let spec = commands::compile_command(&self.config, paths);
        self.run_build_command(stage, plan, &spec, Postcondition::Deferred)
      }
      Stage::Install => {
        let spec = commands::install_command(paths);
        self.run_build_command(stage, plan, &spec, Postcondition::Verify)
      }
    }
  }

  /// Configure, compile and install all skip once the install tree exists.
  fn run_build_command(
    &self,
    stage: Stage,
    plan: &BuildPlan,
    spec: &CommandSpec,
    postcondition: Postcondition,
  ) -> Result<StageOutcome, PipelineError> {
    let marker = plan.install_marker();
    let description = format!("run {spec}");
    self
      .guard(stage, &marker)
      .postcondition(postcondition)
      .run(&description, || {
        let code = self.runner.run(spec, &plan.env)?;
        if code != Some(0) {
          warn!(%stage, cmd = %spec, ?code, "command exited with failure");
        }
        Ok(())
      })
  }

  fn guard<'a>(&'a self, stage: Stage, marker: &'a StageMarker) -> Guard<'a> {
    Guard::new(stage, marker)
      .source_url(&self.config.source_url)
      .dry_run(self.config.dry_run)
  }
}

/// Marker state of a resolved plan, stage by stage.
pub fn marker_status(plan: &BuildPlan, config: &BuildConfig) -> Vec<(Stage, StageMarker, bool)> {
  let install = plan.install_marker();
  [
    (Stage::Prepare, plan.archive_marker()),
    (Stage::Extract, plan.sentinel_marker(config)),
    (Stage::Install, install),
  ]
  .into_iter()
  .map(|(stage, marker)| {
    let present = marker.exists();
    (stage, marker, present)
  })
  .collect()
}
