//! Implementation of the `forge lint` command.

use std::time::Instant;

use anyhow::{Context, Result};

use forge_lib::tasks::Builder;

use crate::output::{format_duration, print_success};

/// Execute the lint command: the pinned format gate plus clippy.
pub fn cmd_lint() -> Result<()> {
  let started = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    let mut builder = Builder::detect().await.context("Failed to configure build target")?;
    builder.lint().await.context("Lint failed")
  })?;

  print_success(&format!(
    "Lint completed in {}",
    format_duration(started.elapsed())
  ));
  Ok(())
}
