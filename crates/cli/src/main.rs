use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

/// forge - build automation for the forge workspace
#[derive(Parser)]
#[command(name = "forge")]
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
  /// Regenerate derived sources (license inventory, version resources)
  Generate,

  /// Run the format gate and clippy over the workspace
  Lint,

  /// Scan the dependency tree for known vulnerabilities
  Vulncheck,

  /// Run the test suite with coverage conversion
  Test,

  /// Build the release binary for the configured target
  Build,

  /// Remove generated build artifacts
  Clean,

  /// Show version, commit, and build information
  Info {
    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
    .without_time()
    .init();
  tracing::debug!(verbose = cli.verbose, "logging initialized");

  let result = match cli.command {
    Commands::Generate => cmd::cmd_generate(),
    Commands::Lint => cmd::cmd_lint(),
    Commands::Vulncheck => cmd::cmd_vulncheck(),
    Commands::Test => cmd::cmd_test(),
    Commands::Build => cmd::cmd_build(),
    Commands::Clean => cmd::cmd_clean(),
    Commands::Info { json } => cmd::cmd_info(json),
  };

  if let Err(e) = result {
    output::print_error(&format!("{e:#}"));
    std::process::exit(1);
  }
}
