//! Input resolution.
//!
//! Everything here is a pure function of its arguments except toolchain
//! discovery, which reads the filesystem under the configured search root.

pub mod archive;
pub mod paths;
pub mod toolchain;
pub mod version;

pub use archive::{source_file_name, strip_archive_extension};
pub use paths::ResolvedPaths;
pub use toolchain::{ToolchainRef, ToolchainSearch, resolve_toolchain};
pub use version::{STRIP_RULES, StripRule, infer_version, resolve_version};
