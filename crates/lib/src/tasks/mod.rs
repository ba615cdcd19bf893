//! Build lifecycle tasks.
//!
//! Each task is a sequential pipeline on [`Builder`]: ensure the external
//! tools are installed, compose an environment map and an argument list,
//! invoke the external program, report. The first error aborts the task;
//! there are no retries and no partial-failure recovery.

mod build;
mod clean;
mod generate;
mod lint;
mod resource;
mod test;
mod vulncheck;

pub use clean::clean_globs;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use forge_platform::{Arch, Os, Platform};

use crate::exec::{self, ExecError};
use crate::resolver::{ToolError, ToolResolver};
use crate::{consts, metadata};

/// Errors that can occur while running a task.
#[derive(Debug, Error)]
pub enum TaskError {
  /// The build target could not be determined.
  #[error("unsupported build target '{triple}'")]
  UnsupportedTarget { triple: String },

  /// Tool resolution or installation failed.
  #[error("failed to install tools: {0}")]
  Tools(#[from] ToolError),

  /// An external pipeline step failed.
  #[error("failed to run {step}: {source}")]
  Step {
    step: &'static str,
    #[source]
    source: ExecError,
  },

  /// The artifact output directory could not be created.
  #[error("failed to create output directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A stale or matched file could not be removed.
  #[error("failed to remove '{path}': {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A generated file could not be written.
  #[error("failed to write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A cleanup glob did not parse.
  #[error("failed to glob pattern '{pattern}': {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  /// A glob match could not be read.
  #[error("failed to read glob match: {0}")]
  Glob(#[from] glob::GlobError),

  /// The compile finished but produced no binary where expected.
  #[error("missing build artifact '{path}'")]
  MissingArtifact { path: PathBuf },

  /// The built binary could not be copied into the output directory.
  #[error("failed to copy '{from}' to '{to}': {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Per-invocation task configuration: the build target, extra cargo inputs,
/// and the resolved-tool cache. Created once per task run and discarded at
/// process exit.
#[derive(Debug)]
pub struct Builder {
  pub platform: Platform,
  pub extra_features: Vec<String>,
  pub extra_flags: Vec<String>,
  pub extra_rustflags: String,
  cross_cc: Option<String>,
  tools: ToolResolver,
}

impl Builder {
  /// Builder for `platform` without probing the host for cross toolchains.
  pub fn new(platform: Platform) -> Result<Self, TaskError> {
    Ok(Self {
      platform,
      extra_features: Vec::new(),
      extra_flags: Vec::new(),
      extra_rustflags: String::new(),
      cross_cc: None,
      tools: ToolResolver::new(platform)?,
    })
  }

  /// Builder for the detected build target, with cross-compiler probing.
  pub async fn detect() -> Result<Self, TaskError> {
    let platform = Platform::detect().ok_or_else(|| TaskError::UnsupportedTarget {
      triple: std::env::var("CARGO_BUILD_TARGET")
        .unwrap_or_else(|_| format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)),
    })?;

    let mut builder = Self::new(platform)?;
    builder.cross_cc = probe_cross_cc(platform).await;
    Ok(builder)
  }

  /// Environment for child tool invocations.
  ///
  /// Always carries the target triple and the build-env selector; darwin
  /// targets get deployment-target and SDK overrides, Windows targets get
  /// the MinGW cross compiler when one answered the probe.
  pub fn env(&self) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(
      "CARGO_BUILD_TARGET".to_string(),
      self.platform.rust_triple().to_string(),
    );
    env.insert("BUILD_ENV".to_string(), metadata::build_env());

    if self.platform.os == Os::MacOs {
      let min = format!("-mmacosx-version-min={}", consts::MACOS_MIN_VERSION);
      env.insert("MACOSX_DEPLOYMENT_TARGET".to_string(), consts::MACOS_MIN_VERSION.to_string());
      env.insert("CFLAGS".to_string(), min.clone());
      env.insert("LDFLAGS".to_string(), min);
      // MACOS_SDK_VERSION can be 10.15, 11.0, 14.5, 15.0 etc.
      env.insert(
        "SDKROOT".to_string(),
        macos_sdk(&std::env::var("MACOS_SDK_VERSION").unwrap_or_default()),
      );
    }

    if self.platform.os == Os::Windows {
      if let Some(cc) = &self.cross_cc {
        env.insert("CC".to_string(), cc.clone());
        env.insert(linker_var(self.platform), cc.clone());
      }
    }

    env
  }

  /// Flags for product compiles: inherited `RUSTFLAGS`, caller extras,
  /// symbol stripping, and static C-runtime linking on Linux and Windows
  /// targets unless `FORGE_STATIC=0`.
  pub fn rustflags(&self) -> String {
    let mut flags = std::env::var("RUSTFLAGS").unwrap_or_default();
    if !self.extra_rustflags.is_empty() {
      flags.push(' ');
      flags.push_str(&self.extra_rustflags);
    }
    flags.push_str(" -C strip=symbols");

    let static_os = matches!(self.platform.os, Os::Linux | Os::Windows);
    if static_os && std::env::var("FORGE_STATIC").as_deref() != Ok("0") {
      flags.push_str(" -C target-feature=+crt-static");
    }

    flags.trim().to_string()
  }

  /// Cargo features for product compiles: the build-env feature plus extras.
  pub fn features(&self) -> String {
    let mut features = vec![metadata::build_env()];
    features.extend(self.extra_features.iter().cloned());
    features.join(",")
  }

  /// Artifact filename, e.g. `forge_windows_x86_64.exe`.
  pub fn target_filename(&self) -> String {
    format!(
      "{}_{}_{}{}",
      consts::PRODUCT_NAME,
      self.platform.os,
      self.platform.arch,
      self.platform.exe_suffix()
    )
  }

  pub(crate) async fn install_tools(&mut self) -> Result<(), TaskError> {
    let env = self.env();
    self.tools.ensure_all(crate::tools::TOOLS, &env).await?;
    Ok(())
  }

  /// Path of a tool resolved by a preceding `install_tools`.
  pub(crate) fn tool(&self, name: &'static str) -> Result<String, TaskError> {
    self
      .tools
      .path(name)
      .map(|p| p.to_string_lossy().into_owned())
      .ok_or(TaskError::Tools(ToolError::NotFound {
        name,
        filename: name.to_string(),
      }))
  }
}

/// Resolved SDK path for the requested macOS SDK version, or empty when the
/// SDK is not installed.
fn macos_sdk(version: &str) -> String {
  let sdk_path = format!("/Library/Developer/CommandLineTools/SDKs/MacOSX{version}.sdk");
  if std::path::Path::new(&sdk_path).exists() {
    sdk_path
  } else {
    debug!(path = %sdk_path, "SDK path does not exist");
    String::new()
  }
}

/// Cargo's per-target linker override variable, e.g.
/// `CARGO_TARGET_X86_64_PC_WINDOWS_GNU_LINKER`.
fn linker_var(platform: Platform) -> String {
  format!(
    "CARGO_TARGET_{}_LINKER",
    platform.rust_triple().to_uppercase().replace('-', "_")
  )
}

/// MinGW C compiler for Windows targets when one is installed on the host.
async fn probe_cross_cc(platform: Platform) -> Option<String> {
  if platform.os != Os::Windows {
    return None;
  }

  let prefix = match platform.arch {
    Arch::X86 => consts::MINGW_PREFIX_X86,
    _ => consts::MINGW_PREFIX_X86_64,
  };
  let cc = format!("{prefix}-gcc");
  if exec::probe(&cc).await { Some(cc) } else { None }
}
