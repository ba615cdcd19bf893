//! Implementation of the `forge build` command.

use std::time::Instant;

use anyhow::{Context, Result};

use forge_lib::tasks::Builder;

use crate::output::{format_duration, print_success};

/// Execute the build command.
///
/// Produces `dist/<product>_<os>_<arch>[.exe]` with version, commit,
/// timestamp, and build mode embedded.
pub fn cmd_build() -> Result<()> {
  let started = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    let mut builder = Builder::detect().await.context("Failed to configure build target")?;
    builder.build().await.context("Build failed")
  })?;

  print_success(&format!(
    "Binary build completed in {}",
    format_duration(started.elapsed())
  ));
  Ok(())
}
