//! Windows version-resource stub compilation.

use std::path::PathBuf;

use tracing::info;

use forge_platform::{Arch, Os};

use crate::{consts, exec};

use super::{Builder, TaskError};

impl Builder {
  /// Compile the version resource stub for Windows targets; no-op elsewhere.
  ///
  /// Removes any stale stub first so a failed compile cannot leave an
  /// outdated resource behind for the linker to pick up.
  pub(crate) async fn ensure_resource(&self) -> Result<(), TaskError> {
    if self.platform.os != Os::Windows {
      return Ok(());
    }

    let output = self.resource_path();
    match std::fs::remove_file(&output) {
      Ok(()) => {}
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(source) => {
        return Err(TaskError::Remove { path: output, source });
      }
    }

    let windres = self.windres_command().await;
    let env = self.env();
    let output_arg = output.to_string_lossy().into_owned();
    exec::run(
      &windres,
      [
        "--input",
        consts::VERSIONINFO_RC,
        "--output-format",
        "coff",
        "--output",
        output_arg.as_str(),
      ],
      &env,
    )
    .await
    .map_err(|source| TaskError::Step {
      step: "windres",
      source,
    })?;

    info!(path = %output.display(), "resource stub generated");
    Ok(())
  }

  fn resource_path(&self) -> PathBuf {
    PathBuf::from(format!("crates/cli/resource_{}.res", self.platform.arch))
  }

  /// Prefer the MinGW-prefixed windres when present, matching the cross
  /// compiler selection.
  async fn windres_command(&self) -> String {
    let prefix = match self.platform.arch {
      Arch::X86 => consts::MINGW_PREFIX_X86,
      _ => consts::MINGW_PREFIX_X86_64,
    };
    let prefixed = format!("{prefix}-windres");
    if exec::probe(&prefixed).await {
      prefixed
    } else {
      "windres".to_string()
    }
  }
}
