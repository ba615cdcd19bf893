//! The lint task: format gate plus clippy over the workspace.

use tracing::info;

use crate::{exec, resolver};

use super::{Builder, TaskError};

impl Builder {
  /// Run the pinned format gate, then clippy with warnings denied.
  pub async fn lint(&mut self) -> Result<(), TaskError> {
    info!(env = ?self.env(), "running lint");
    self.install_tools().await?;

    let env = self.env();
    let dprint = self.tool("dprint")?;
    exec::run(&dprint, ["check"], &env)
      .await
      .map_err(|source| TaskError::Step {
        step: "dprint check",
        source,
      })?;

    let cargo = resolver::cargo_command();
    exec::run(
      &cargo,
      [
        "clippy",
        "--workspace",
        "--all-targets",
        "--locked",
        "--",
        "-D",
        "warnings",
      ],
      &env,
    )
    .await
    .map_err(|source| TaskError::Step {
      step: "cargo clippy",
      source,
    })?;

    info!("lint completed");
    Ok(())
  }
}
