//! Implementation of the `forge clean` command.

use std::path::Path;

use anyhow::{Context, Result};

use forge_lib::tasks::Builder;
use forge_platform::Platform;

use crate::output::print_success;

/// Execute the clean command: remove generated artifacts in the workspace.
pub fn cmd_clean() -> Result<()> {
  let platform = Platform::detect().context("Unsupported build target")?;
  let builder = Builder::new(platform).context("Failed to configure build target")?;

  builder.clean(Path::new(".")).context("Clean failed")?;

  print_success("Cleanup completed");
  Ok(())
}
