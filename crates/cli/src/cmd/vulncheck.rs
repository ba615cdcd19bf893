//! Implementation of the `forge vulncheck` command.

use std::time::Instant;

use anyhow::{Context, Result};

use forge_lib::tasks::Builder;

use crate::output::{format_duration, print_success};

/// Execute the vulnerability check against the dependency tree.
pub fn cmd_vulncheck() -> Result<()> {
  let started = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    let mut builder = Builder::detect().await.context("Failed to configure build target")?;
    builder.vulncheck().await.context("Vulnerability check failed")
  })?;

  print_success(&format!(
    "Vulnerability check completed in {}",
    format_duration(started.elapsed())
  ));
  Ok(())
}
