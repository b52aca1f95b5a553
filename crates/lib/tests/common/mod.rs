//! Recording fakes for the pipeline's external collaborators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use stagehand_lib::env::ProcessEnv;
use stagehand_lib::execute::actions::{CommandRunner, CommandSpec, Extractor, Fetcher};
use stagehand_lib::resolve::strip_archive_extension;
use stagehand_lib::{BuildConfig, CancelToken, Pipeline, PipelineError};
use tempfile::TempDir;

pub const SOURCE_URL: &str = "https://download.example.com/single/qt-everywhere-src-5.15.2.zip";

/// Every collaborator call, in order.
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub struct FakeFetcher {
  log: CallLog,
  pub fail_midway: bool,
  pub cancel_on_fetch: Option<CancelToken>,
}

impl Fetcher for FakeFetcher {
  fn fetch(&self, url: &str, dest: &Path) -> Result<(), PipelineError> {
    self.log.borrow_mut().push(format!("fetch {url}"));
    if let Some(token) = &self.cancel_on_fetch {
      token.cancel();
    }
    fs::write(dest, b"partial").map_err(|e| PipelineError::io(dest, e))?;
    if self.fail_midway {
      return Err(PipelineError::Download {
        url: url.to_string(),
        message: "connection reset".to_string(),
      });
    }
    fs::write(dest, b"complete archive").map_err(|e| PipelineError::io(dest, e))
  }
}

pub struct FakeExtractor {
  log: CallLog,
  pub available: bool,
  pub writes_sentinel: bool,
}

impl Extractor for FakeExtractor {
  fn ensure_available(&self, _env: &ProcessEnv) -> Result<(), PipelineError> {
    if self.available {
      Ok(())
    } else {
      Err(PipelineError::MissingDependency {
        tool: "7z".to_string(),
        candidates: "7z, 7za".to_string(),
      })
    }
  }

  fn extract(&self, archive: &Path, out_dir: &Path, _env: &ProcessEnv) -> Result<(), PipelineError> {
    let name = archive.file_name().unwrap().to_string_lossy().into_owned();
    self.log.borrow_mut().push(format!("extract {name}"));
    let tree = out_dir.join(strip_archive_extension(&name));
    fs::create_dir_all(&tree).unwrap();
    if self.writes_sentinel {
      fs::write(tree.join("configure"), b"#!/bin/sh\n").unwrap();
    }
    Ok(())
  }
}

pub struct FakeRunner {
  log: CallLog,
  /// Created when the install command runs.
  pub install_dir: Option<PathBuf>,
}

impl CommandRunner for FakeRunner {
  fn run(&self, spec: &CommandSpec, _env: &ProcessEnv) -> Result<Option<i32>, PipelineError> {
    let program = spec.program.file_name().unwrap().to_string_lossy().into_owned();
    self.log.borrow_mut().push(format!("{program} {}", spec.args.join(" ")).trim().to_string());
    if spec.args == ["install"] {
      if let Some(dir) = &self.install_dir {
        fs::create_dir_all(dir.join("bin")).unwrap();
      }
    }
    Ok(Some(0))
  }
}

/// Temporary root, work and toolchain directories plus a shared call log.
pub struct Harness {
  pub temp: TempDir,
  pub log: CallLog,
}

impl Harness {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
      log: Rc::new(RefCell::new(Vec::new())),
    }
  }

  pub fn root_dir(&self) -> PathBuf {
    self.temp.path().join("root")
  }

  pub fn work_dir(&self) -> PathBuf {
    self.temp.path().join("work")
  }

  pub fn toolchain_dir(&self) -> PathBuf {
    self.temp.path().join("qt/Qt5.15.2/Tools/mingw810_64")
  }

  pub fn archive(&self) -> PathBuf {
    self.work_dir().join("source/qt-everywhere-src-5.15.2.zip")
  }

  pub fn sentinel(&self) -> PathBuf {
    self.work_dir().join("source/qt-everywhere-src-5.15.2/configure")
  }

  pub fn install_dir(&self) -> PathBuf {
    self.root_dir().join("5.15.2/Dynamic/mingw810_64")
  }

  pub fn config(&self) -> BuildConfig {
    let mut config = BuildConfig::new(SOURCE_URL, self.root_dir(), self.work_dir());
    config.toolchain_dir = Some(self.toolchain_dir());
    config.toolchain_root = self.temp.path().join("qt");
    config.jobs = 4;
    config
  }

  pub fn fetcher(&self) -> FakeFetcher {
    FakeFetcher {
      log: self.log.clone(),
      fail_midway: false,
      cancel_on_fetch: None,
    }
  }

  pub fn extractor(&self) -> FakeExtractor {
    FakeExtractor {
      log: self.log.clone(),
      available: true,
      writes_sentinel: true,
    }
  }

  pub fn runner(&self) -> FakeRunner {
    FakeRunner {
      log: self.log.clone(),
      install_dir: Some(self.install_dir()),
    }
  }

  pub fn pipeline(&self, config: BuildConfig) -> Pipeline<FakeFetcher, FakeExtractor, FakeRunner> {
    self.pipeline_with(config, self.fetcher(), self.extractor(), self.runner())
  }

  pub fn pipeline_with(
    &self,
    config: BuildConfig,
    fetcher: FakeFetcher,
    extractor: FakeExtractor,
    runner: FakeRunner,
  ) -> Pipeline<FakeFetcher, FakeExtractor, FakeRunner> {
    Pipeline::new(config, fetcher, extractor, runner).with_base_path(None)
  }

  pub fn calls(&self) -> Vec<String> {
    self.log.borrow().clone()
  }

  pub fn clear_calls(&self) {
    self.log.borrow_mut().clear();
  }

  pub fn ran(&self, prefix: &str) -> bool {
    self.calls().iter().any(|c| c.starts_with(prefix))
  }
}

/// Places a fake compiler at `<root>/<relative>`.
pub fn install_compiler(root: &Path, relative: &str) {
  let exe = root.join(relative);
  fs::create_dir_all(exe.parent().unwrap()).unwrap();
  fs::write(exe, b"").unwrap();
}
