mod build;
mod paths;
mod status;

pub use build::cmd_build;
pub use paths::cmd_paths;
pub use status::cmd_status;
