//! Implementation of the `forge generate` command.

use std::time::Instant;

use anyhow::{Context, Result};

use forge_lib::tasks::Builder;

use crate::output::{format_duration, print_success};

/// Execute the generate command.
///
/// Refreshes derived files: the third-party license inventory and the
/// Windows version resource inputs.
pub fn cmd_generate() -> Result<()> {
  let started = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    let mut builder = Builder::detect().await.context("Failed to configure build target")?;
    builder.generate().await.context("Generate failed")
  })?;

  print_success(&format!(
    "Generate completed in {}",
    format_duration(started.elapsed())
  ));
  Ok(())
}
