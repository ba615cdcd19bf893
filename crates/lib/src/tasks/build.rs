//! The build task: release compile with embedded build metadata.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::metadata::BuildMetadata;
use crate::{consts, exec, resolver};

use super::{Builder, TaskError};

impl Builder {
  /// Produce `dist/<product>_<os>_<arch>[.exe]` for the configured target.
  ///
  /// The release compile runs with the four `FORGE_BUILD_*` variables set so
  /// forge-buildinfo embeds the version, commit, timestamp, and build mode.
  pub async fn build(&mut self) -> Result<(), TaskError> {
    info!(env = ?self.env(), "building binary");
    self.print_toolchain().await;
    self.install_tools().await?;

    info!(path = consts::DIST_DIR, "creating output directory");
    std::fs::create_dir_all(consts::DIST_DIR).map_err(|source| TaskError::CreateDir {
      path: PathBuf::from(consts::DIST_DIR),
      source,
    })?;

    let target_file = Path::new(consts::DIST_DIR).join(self.target_filename());
    match std::fs::remove_file(&target_file) {
      Ok(()) => info!(path = %target_file.display(), "removed existing artifact"),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(source) => {
        return Err(TaskError::Remove {
          path: target_file,
          source,
        });
      }
    }

    self.ensure_resource().await?;

    let meta = BuildMetadata::collect(Path::new("."));
    let mut env = self.env();
    env.extend(meta.env());
    env.insert("RUSTFLAGS".to_string(), self.rustflags());

    let features = self.features();
    let mut args: Vec<String> = [
      "build",
      "--release",
      "--locked",
      "--package",
      consts::MAIN_PACKAGE,
      "--features",
      &features,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.extend(self.extra_flags.iter().cloned());

    debug!(?args, "building with args");
    let cargo = resolver::cargo_command();
    exec::run(&cargo, &args, &env)
      .await
      .map_err(|source| TaskError::Step {
        step: "cargo build",
        source,
      })?;

    let built = self.built_binary();
    if !built.is_file() {
      return Err(TaskError::MissingArtifact { path: built });
    }
    std::fs::copy(&built, &target_file).map_err(|source| TaskError::Copy {
      from: built,
      to: target_file.clone(),
      source,
    })?;

    info!(path = %target_file.display(), "binary build completed");
    Ok(())
  }

  /// Where cargo leaves the release binary for the configured target.
  fn built_binary(&self) -> PathBuf {
    Path::new("target")
      .join(self.platform.rust_triple())
      .join("release")
      .join(format!("{}{}", consts::PRODUCT_NAME, self.platform.exe_suffix()))
  }

  /// Toolchain diagnostics printed before release builds, best effort.
  async fn print_toolchain(&self) {
    let cargo = resolver::cargo_command();
    match exec::output(&cargo, ["version", "--verbose"], &self.env()).await {
      Ok(out) => println!("{out}"),
      Err(e) => debug!(error = %e, "failed to query cargo version"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resolver::ToolResolver;
  use forge_platform::{Arch, Os, Platform};

  fn builder_for(os: Os, arch: Arch) -> Builder {
    let platform = Platform::new(os, arch);
    Builder {
      platform,
      extra_features: Vec::new(),
      extra_flags: Vec::new(),
      extra_rustflags: String::new(),
      cross_cc: None,
      tools: ToolResolver::with_bin_dirs(platform, Vec::new()),
    }
  }

  #[test]
  fn built_binary_lives_under_target_triple() {
    let builder = builder_for(Os::Windows, Arch::X86_64);
    assert_eq!(
      builder.built_binary(),
      PathBuf::from("target/x86_64-pc-windows-gnu/release/forge.exe")
    );

    let builder = builder_for(Os::Linux, Arch::Aarch64);
    assert_eq!(
      builder.built_binary(),
      PathBuf::from("target/aarch64-unknown-linux-gnu/release/forge")
    );
  }
}
