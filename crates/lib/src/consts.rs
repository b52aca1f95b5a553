//! Well-known names and defaults.

pub const APP_NAME: &str = "stagehand";

/// Release archive fetched when no `--url` is given.
pub const DEFAULT_SOURCE_URL: &str =
  "https://download.qt.io/archive/qt/5.15/5.15.2/single/qt-everywhere-src-5.15.2.zip";

pub const DEFAULT_VARIANT: &str = "Dynamic";

/// Marker expected inside the extracted tree, relative to its top directory.
pub const DEFAULT_SENTINEL: &str = "configure";

pub const ENV_URL: &str = "STAGEHAND_URL";
pub const ENV_ROOT: &str = "STAGEHAND_ROOT";
pub const ENV_WORK_DIR: &str = "STAGEHAND_WORK_DIR";
pub const ENV_TOOLCHAIN_ROOT: &str = "STAGEHAND_TOOLCHAIN_ROOT";

/// Toolchain directories under `<root>/*/Tools/` start with this prefix.
pub const TOOLCHAIN_PREFIX: &str = "mingw";

/// Compiler executable whose presence identifies a toolchain.
pub const COMPILER_EXE: &str = "gcc.exe";

/// Locale pinned for every external process.
pub const PINNED_LOCALE: &str = "C";

#[cfg(windows)]
pub const CONFIGURE_SCRIPT: &str = "configure.bat";
#[cfg(not(windows))]
pub const CONFIGURE_SCRIPT: &str = "configure";

#[cfg(windows)]
pub const MAKE_PROGRAM: &str = "mingw32-make";
#[cfg(not(windows))]
pub const MAKE_PROGRAM: &str = "make";

/// Extraction utilities, in order of preference.
pub const EXTRACTOR_CANDIDATES: &[&str] = &["7z", "7za"];
