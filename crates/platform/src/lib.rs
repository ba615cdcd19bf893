//! forge-platform: build-target model for the forge task runner
//!
//! Identifies the operating system and CPU architecture a task targets,
//! maps the pair to a Rust target triple, and resolves the directories
//! external helper tools are installed into.

pub mod arch;
pub mod os;
pub mod paths;

use std::fmt;

pub use arch::Arch;
pub use os::Os;
use tracing::debug;

/// Build target combining architecture and OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub os: Os,
  pub arch: Arch,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Detect the host platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      os: Os::current()?,
      arch: Arch::current()?,
    })
  }

  /// Detect the build target
  ///
  /// Honors the `CARGO_BUILD_TARGET` triple when set, falling back to the
  /// host platform.
  pub fn detect() -> Option<Self> {
    match std::env::var("CARGO_BUILD_TARGET") {
      Ok(triple) if !triple.is_empty() => {
        debug!(triple, "target taken from CARGO_BUILD_TARGET");
        Self::from_triple(&triple)
      }
      _ => Self::current(),
    }
  }

  /// Parse a Rust target triple into a platform identifier
  ///
  /// Returns `None` for triples naming an unsupported OS or architecture
  pub fn from_triple(triple: &str) -> Option<Self> {
    let arch = match triple.split('-').next()? {
      "x86_64" => Arch::X86_64,
      "i686" | "i586" => Arch::X86,
      "aarch64" => Arch::Aarch64,
      _ => return None,
    };
    let os = if triple.contains("-windows") {
      Os::Windows
    } else if triple.contains("-apple") || triple.contains("-darwin") {
      Os::MacOs
    } else if triple.contains("-linux") {
      Os::Linux
    } else {
      return None;
    };
    Some(Self { os, arch })
  }

  /// The Rust target triple this platform compiles for
  ///
  /// Windows targets use the GNU ABI so the MinGW cross toolchain can link
  /// them from any host.
  pub fn rust_triple(&self) -> &'static str {
    match (self.os, self.arch) {
      (Os::Linux, Arch::X86_64) => "x86_64-unknown-linux-gnu",
      (Os::Linux, Arch::X86) => "i686-unknown-linux-gnu",
      (Os::Linux, Arch::Aarch64) => "aarch64-unknown-linux-gnu",
      (Os::MacOs, Arch::X86_64) => "x86_64-apple-darwin",
      (Os::MacOs, Arch::X86) => "i686-apple-darwin",
      (Os::MacOs, Arch::Aarch64) => "aarch64-apple-darwin",
      (Os::Windows, Arch::X86_64) => "x86_64-pc-windows-gnu",
      (Os::Windows, Arch::X86) => "i686-pc-windows-gnu",
      (Os::Windows, Arch::Aarch64) => "aarch64-pc-windows-msvc",
    }
  }

  /// Subdirectory tag for OS/arch-qualified tool directories (e.g. `windows_x86_64`)
  pub fn dir_tag(&self) -> String {
    format!("{}_{}", self.os, self.arch)
  }

  /// Executable filename suffix for binaries targeting this platform
  pub fn exe_suffix(&self) -> &'static str {
    self.os.exe_suffix()
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.rust_triple())
  }
}

/// True when running with elevated privileges
#[cfg(unix)]
pub fn is_elevated() -> bool {
  nix::unistd::geteuid().is_root() || std::env::var("SUDO_USER").map(|u| !u.is_empty()).unwrap_or(false)
}

/// True when running with elevated privileges
///
/// `net session` succeeds only in an elevated shell.
#[cfg(windows)]
pub fn is_elevated() -> bool {
  std::process::Command::new("net")
    .arg("session")
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .status()
    .map(|s| s.success())
    .unwrap_or(false)
}
