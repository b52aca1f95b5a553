//! Configure, compile and install invocations.

use crate::config::{BuildConfig, Linkage};
use crate::consts::{CONFIGURE_SCRIPT, MAKE_PROGRAM};
use crate::execute::actions::CommandSpec;
use crate::resolve::ResolvedPaths;

/// Fixed configure option set, followed by any user-supplied extras.
pub fn configure_flags(config: &BuildConfig, paths: &ResolvedPaths) -> Vec<String> {
  let mut flags: Vec<String> = vec![
    "-prefix".into(),
    paths.install_dir.to_string_lossy().into_owned(),
    "-opensource".into(),
    "-confirm-license".into(),
    "-release".into(),
  ];

  match config.variant.linkage() {
    Linkage::Shared => flags.push("-shared".into()),
    Linkage::Static => {
      flags.push("-static".into());
      flags.push("-static-runtime".into());
    }
    Linkage::Unspecified => {}
  }

  if cfg!(windows) {
    flags.extend(["-platform".into(), "win32-g++".into()]);
  }

  flags.extend(
    [
      "-nomake",
      "examples",
      "-nomake",
      "tests",
      "-skip",
      "qtwebengine",
      "-qt-zlib",
      "-qt-libpng",
      "-qt-libjpeg",
      "-qt-pcre",
      "-qt-freetype",
    ]
    .map(String::from),
  );

  flags.extend(config.configure_args.iter().cloned());
  flags
}

pub fn configure_command(config: &BuildConfig, paths: &ResolvedPaths) -> CommandSpec {
  CommandSpec::new(paths.extracted_dir.join(CONFIGURE_SCRIPT), &paths.build_dir).args(configure_flags(config, paths))
}

pub fn compile_command(config: &BuildConfig, paths: &ResolvedPaths) -> CommandSpec {
  CommandSpec::new(MAKE_PROGRAM, &paths.build_dir).arg(format!("-j{}", config.jobs.max(1)))
}

pub fn install_command(paths: &ResolvedPaths) -> CommandSpec {
  CommandSpec::new(MAKE_PROGRAM, &paths.build_dir).arg("install")
}
