mod args;
mod cmd;
mod output;
mod prompts;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stagehand_lib::PipelineFailure;
use tracing_subscriber::EnvFilter;

use args::BuildArgs;
use cmd::{cmd_build, cmd_paths, cmd_status};
use output::{OutputFormat, print_error};

/// stagehand - staged, resumable source builds
#[derive(Parser)]
#[command(name = "stagehand")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Download, extract, configure, compile and install, skipping finished stages
  Build {
    #[command(flatten)]
    args: BuildArgs,
  },

  /// Show which stages are complete and where the next build resumes
  Status {
    #[command(flatten)]
    args: BuildArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Print the resolved version, toolchain, paths and environment
  Paths {
    #[command(flatten)]
    args: BuildArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let pause = pause_requested(&cli.command);
  let result = match cli.command {
    Commands::Build { args } => cmd_build(args.into_config()),
    Commands::Status { args, format } => cmd_status(args.into_config(), format),
    Commands::Paths { args, format } => cmd_paths(args.into_config(), format),
  };

  let code = match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&e.to_string());
      let status = e.downcast_ref::<PipelineFailure>().map_or(1, PipelineFailure::exit_code);
      ExitCode::from(u8::try_from(status).unwrap_or(1))
    }
  };

  if pause {
    if let Err(e) = prompts::pause_before_exit() {
      tracing::debug!(error = %e, "pause prompt failed");
    }
  }

  code
}

/// Only `build` waits for a key press; the read-only commands never do.
fn pause_requested(command: &Commands) -> bool {
  match command {
    Commands::Build { args } => args.pause,
    Commands::Status { .. } | Commands::Paths { .. } => false,
  }
}

/// `RUST_LOG` overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool) {
  let default = if verbose {
    "stagehand=debug,stagehand_lib=debug,info"
  } else {
    "stagehand=info,stagehand_lib=info,warn"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
