//! Entry point for dcmanon's CLI tool.

mod args;
mod commands;
mod utils;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{anonymize_command, print_actions_command};

#[derive(Parser)]
#[command(
  name = "dcmanon",
  bin_name = "dcmanon",
  version = env!("CARGO_PKG_VERSION"),
  about = "dcmanon is a CLI tool for anonymizing DICOM JSON records using the \
    DICOM confidentiality profiles",
  max_term_width = 80
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  #[command(about = anonymize_command::ABOUT)]
  Anonymize(anonymize_command::AnonymizeArgs),

  #[command(about = print_actions_command::ABOUT)]
  PrintActions(print_actions_command::PrintActionsArgs),
}

fn main() -> Result<(), ()> {
  let cli = Cli::parse();

  init_logging();

  match cli.command {
    Commands::Anonymize(args) => anonymize_command::run(&args),
    Commands::PrintActions(args) => print_actions_command::run(&args),
  }
}

/// Sets up logging to stderr. The log level is controlled by the `RUST_LOG`
/// environment variable and defaults to warnings only.
///
fn init_logging() {
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}
