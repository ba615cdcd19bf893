//! Compile-time configuration for the forge build runner.

/// Product name, used for artifact filenames.
pub const PRODUCT_NAME: &str = "forge";

/// Product version stamped into release binaries.
// Keep in sync with the compiled-in default in forge-buildinfo.
pub const PRODUCT_VERSION: &str = "0.7.0";

/// Workspace package that produces the distributed binary.
pub const MAIN_PACKAGE: &str = "forge-cli";

/// Output directory for release artifacts.
pub const DIST_DIR: &str = "dist";

/// Minimum macOS version for darwin targets.
pub const MACOS_MIN_VERSION: &str = "10.15";

/// MinGW cross toolchain prefixes for Windows targets.
pub const MINGW_PREFIX_X86_64: &str = "x86_64-w64-mingw32";
pub const MINGW_PREFIX_X86: &str = "i686-w64-mingw32";

/// Application manifest embedded into the Windows version resource.
pub const WINDOWS_MANIFEST: &str = "resources/windows/app.manifest";

/// Version resource script, rendered by generate and compiled by windres.
pub const VERSIONINFO_RC: &str = "crates/cli/versioninfo.rc";

/// Template consumed by cargo-about and the inventory it renders.
pub const ABOUT_TEMPLATE: &str = "about.hbs";
pub const THIRD_PARTY_FILE: &str = "third_party.html";

/// Files produced by builds and tests, removed by clean.
pub const CLEANUP_GLOBS: &[&str] = &[
  "*cover.out",
  "*.log",
  "*.profraw",
  "crates/cli/versioninfo.rc",
  "crates/cli/resource_*.res",
  "third_party.html",
  "dist/forge_*",
];
