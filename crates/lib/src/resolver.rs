//! Tool resolution and installation.
//!
//! Given a [`ToolSpec`], the resolver returns a usable path to the tool's
//! executable, installing it first when nothing is found. Lookups probe four
//! candidate locations: each base binary directory directly, plus its
//! OS/arch-qualified subdirectory:
//!
//! - `<base>/<name>-<version>`
//! - `<base>/<os>_<arch>/<name>-<version>`
//!
//! Installs land under the plain tool name and are renamed in place to the
//! version-qualified filename, so every later invocation hits the probe fast
//! path. Resolved paths are cached for the lifetime of the resolver.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use forge_platform::{Platform, paths};

use crate::exec;
use crate::tools::{ToolKind, ToolSpec};

/// Errors that can occur while resolving or installing a tool.
#[derive(Debug, Error)]
pub enum ToolError {
  /// Tool directories could not be resolved.
  #[error("failed to resolve tool directories: {0}")]
  Paths(#[from] paths::PathsError),

  /// The installer script could not be fetched.
  #[error("failed to fetch installer for '{name}' from '{url}': {message}")]
  FetchInstaller {
    name: &'static str,
    url: &'static str,
    message: String,
  },

  /// The package manager or installer script exited with an error.
  #[error("failed to install tool '{name}': {source}")]
  Install {
    name: &'static str,
    #[source]
    source: exec::ExecError,
  },

  /// No binary found at any candidate path.
  #[error("failed to locate tool '{name}' (looked for '{filename}')")]
  NotFound { name: &'static str, filename: String },

  /// The freshly installed binary could not be renamed.
  #[error("failed to rename '{from}' to '{to}' for tool '{name}': {source}")]
  Promote {
    name: &'static str,
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Locates or installs external helper tools and caches their paths.
#[derive(Debug)]
pub struct ToolResolver {
  platform: Platform,
  bin_dirs: Vec<PathBuf>,
  cache: BTreeMap<&'static str, PathBuf>,
}

impl ToolResolver {
  /// Resolver probing the standard cargo binary directories.
  pub fn new(platform: Platform) -> Result<Self, ToolError> {
    Ok(Self::with_bin_dirs(platform, paths::tool_bin_dirs()?))
  }

  /// Resolver probing an explicit set of base binary directories.
  pub fn with_bin_dirs(platform: Platform, bin_dirs: Vec<PathBuf>) -> Self {
    Self {
      platform,
      bin_dirs,
      cache: BTreeMap::new(),
    }
  }

  /// Path of a previously resolved tool.
  pub fn path(&self, name: &str) -> Option<&Path> {
    self.cache.get(name).map(PathBuf::as_path)
  }

  /// Resolve every tool in `specs`, stopping at the first failure.
  pub async fn ensure_all(
    &mut self,
    specs: &'static [ToolSpec],
    env: &BTreeMap<String, String>,
  ) -> Result<(), ToolError> {
    for spec in specs {
      self.ensure(spec, env).await?;
    }
    Ok(())
  }

  /// Resolve one tool, installing it when absent.
  ///
  /// Safe to call repeatedly; after a successful install later calls are
  /// no-ops beyond the path probe.
  pub async fn ensure(
    &mut self,
    spec: &'static ToolSpec,
    env: &BTreeMap<String, String>,
  ) -> Result<PathBuf, ToolError> {
    if let Some(path) = self.cache.get(spec.name) {
      return Ok(path.clone());
    }

    if let Some(path) = self.locate(&spec.versioned_filename(self.platform)) {
      info!(tool = spec.name, path = %path.display(), "tool found");
      self.cache.insert(spec.name, path.clone());
      return Ok(path);
    }

    info!(tool = spec.name, version = spec.version, "tool not found, installing");
    self.install(spec, env).await?;

    let path = self.promote(spec)?;
    info!(tool = spec.name, path = %path.display(), "tool installed");
    self.cache.insert(spec.name, path.clone());
    Ok(path)
  }

  /// First candidate path at which `filename` exists.
  fn locate(&self, filename: &str) -> Option<PathBuf> {
    for candidate in self.candidates(filename) {
      if candidate.is_file() {
        return Some(candidate);
      }
      debug!(path = %candidate.display(), "no match");
    }
    None
  }

  fn candidates(&self, filename: &str) -> Vec<PathBuf> {
    let tag = self.platform.dir_tag();
    let mut out = Vec::with_capacity(self.bin_dirs.len() * 2);
    for base in &self.bin_dirs {
      out.push(base.join(filename));
      out.push(base.join(&tag).join(filename));
    }
    out
  }

  async fn install(&self, spec: &ToolSpec, env: &BTreeMap<String, String>) -> Result<(), ToolError> {
    match spec.kind {
      ToolKind::Registry => {
        let cargo = cargo_command();
        let args = [
          "install",
          spec.source,
          "--version",
          spec.version,
          "--locked",
          "--force",
        ];
        exec::run(&cargo, args, env)
          .await
          .map_err(|source| ToolError::Install { name: spec.name, source })
      }
      ToolKind::Script => self.install_from_script(spec, env).await,
    }
  }

  /// Fetch the installer script and pipe it to a shell, targeting the first
  /// base binary directory.
  async fn install_from_script(&self, spec: &ToolSpec, env: &BTreeMap<String, String>) -> Result<(), ToolError> {
    let script = fetch_installer(spec).await?;
    let bindir = self.bin_dirs.first().cloned().unwrap_or_default();

    let (shell, args) = install_command(&bindir, spec.version);
    exec::run_with_stdin(shell, &args, env, &script)
      .await
      .map_err(|source| ToolError::Install { name: spec.name, source })
  }

  /// Locate a fresh install under its plain name and rename it to the
  /// version-qualified name.
  fn promote(&self, spec: &ToolSpec) -> Result<PathBuf, ToolError> {
    let plain = spec.plain_filename(self.platform);
    let Some(installed) = self.locate(&plain) else {
      return Err(ToolError::NotFound {
        name: spec.name,
        filename: plain,
      });
    };

    let versioned = installed.with_file_name(spec.versioned_filename(self.platform));
    std::fs::rename(&installed, &versioned).map_err(|source| ToolError::Promote {
      name: spec.name,
      from: installed,
      to: versioned.clone(),
      source,
    })?;
    Ok(versioned)
  }
}

/// The cargo binary to shell out to; cargo exports its own path as `$CARGO`.
pub fn cargo_command() -> String {
  std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string())
}

async fn fetch_installer(spec: &ToolSpec) -> Result<Vec<u8>, ToolError> {
  debug!(tool = spec.name, url = spec.source, "fetching installer script");

  let response = reqwest::get(spec.source)
    .await
    .map_err(|e| ToolError::FetchInstaller {
      name: spec.name,
      url: spec.source,
      message: e.to_string(),
    })?;

  if !response.status().is_success() {
    return Err(ToolError::FetchInstaller {
      name: spec.name,
      url: spec.source,
      message: format!("HTTP {}", response.status()),
    });
  }

  let bytes = response.bytes().await.map_err(|e| ToolError::FetchInstaller {
    name: spec.name,
    url: spec.source,
    message: e.to_string(),
  })?;
  Ok(bytes.to_vec())
}

#[cfg(unix)]
fn install_command(bindir: &Path, version: &str) -> (&'static str, Vec<String>) {
  (
    "sh",
    vec![
      "-s".to_string(),
      "--".to_string(),
      "-b".to_string(),
      bindir.display().to_string(),
      version.to_string(),
    ],
  )
}

#[cfg(windows)]
fn install_command(bindir: &Path, version: &str) -> (&'static str, Vec<String>) {
  // PowerShell installer shims take the target directory and version from
  // the environment rather than positional arguments.
  let _ = (bindir, version);
  (
    "powershell",
    vec![
      "-NoProfile".to_string(),
      "-ExecutionPolicy".to_string(),
      "Bypass".to_string(),
      "-Command".to_string(),
      "-".to_string(),
    ],
  )
}
