//! The vulnerability-check task.

use tracing::info;

use crate::exec;

use super::{Builder, TaskError};

impl Builder {
  /// Scan the dependency tree for advisories with the pinned auditor.
  pub async fn vulncheck(&mut self) -> Result<(), TaskError> {
    info!(env = ?self.env(), "running vulnerability check");
    self.install_tools().await?;

    let env = self.env();
    let audit = self.tool("cargo-audit")?;
    exec::run(&audit, ["audit"], &env)
      .await
      .map_err(|source| TaskError::Step {
        step: "cargo-audit",
        source,
      })?;

    info!("vulnerability check completed");
    Ok(())
  }
}
