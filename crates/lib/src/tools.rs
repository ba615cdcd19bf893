//! Static descriptors for the external helper tools forge depends on.

use forge_platform::Platform;

/// How a tool is installed when no existing binary is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
  /// Installed from the registry via `cargo install`.
  Registry,
  /// Installer script fetched from the source URL and piped to a shell.
  Script,
}

/// A required external tool, pinned to a version.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
  pub name: &'static str,
  pub source: &'static str,
  pub version: &'static str,
  pub kind: ToolKind,
}

impl ToolSpec {
  /// Filename as produced by the package manager or installer script.
  pub fn plain_filename(&self, platform: Platform) -> String {
    format!("{}{}", self.name, platform.exe_suffix())
  }

  /// Version-qualified filename the resolver promotes installs to.
  pub fn versioned_filename(&self, platform: Platform) -> String {
    format!("{}-{}{}", self.name, self.version, platform.exe_suffix())
  }
}

/// Tools required by the task pipelines.
pub const TOOLS: &[ToolSpec] = &[
  ToolSpec {
    name: "cargo-about",
    source: "cargo-about",
    version: "0.6.4",
    kind: ToolKind::Registry,
  },
  ToolSpec {
    name: "dprint",
    source: "https://dprint.dev/install.sh",
    version: "0.47.2",
    kind: ToolKind::Script,
  },
  ToolSpec {
    name: "grcov",
    source: "grcov",
    version: "0.8.19",
    kind: ToolKind::Registry,
  },
  ToolSpec {
    name: "cargo-audit",
    source: "cargo-audit",
    version: "0.21.1",
    kind: ToolKind::Registry,
  },
];

#[cfg(test)]
mod tests {
  use super::*;
  use forge_platform::{Platform, arch::Arch, os::Os};

  #[test]
  fn versioned_filename_has_exe_suffix_on_windows() {
    let spec = &TOOLS[2];
    assert_eq!(spec.name, "grcov");

    let windows = Platform::new(Os::Windows, Arch::X86_64);
    assert_eq!(spec.versioned_filename(windows), format!("grcov-{}.exe", spec.version));
    assert_eq!(spec.plain_filename(windows), "grcov.exe");

    let linux = Platform::new(Os::Linux, Arch::X86_64);
    assert_eq!(spec.versioned_filename(linux), format!("grcov-{}", spec.version));
    assert_eq!(spec.plain_filename(linux), "grcov");
  }

  #[test]
  fn tool_names_are_unique() {
    for (i, a) in TOOLS.iter().enumerate() {
      for b in &TOOLS[i + 1..] {
        assert_ne!(a.name, b.name);
      }
    }
  }
}
