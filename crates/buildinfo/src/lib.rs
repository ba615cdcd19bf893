//! forge-buildinfo: build metadata embedded into forge binaries.
//!
//! Each field carries a compiled-in default that release builds overwrite
//! through the `FORGE_BUILD_*` environment variables forwarded by the build
//! script. Accessors are read-only; nothing here is computed at runtime.

// Keep in sync with `PRODUCT_VERSION` in forge-lib.
const DEFAULT_VERSION: &str = "0.7.0";
const DEFAULT_COMMIT: &str = "0000000000000000000000000000000000000000";
const DEFAULT_BUILD_TIME: &str = "1970-01-01T00:00:00Z";
const DEFAULT_BUILD_MODE: &str = "production";

/// Product version, overwritten while releasing.
pub fn version() -> &'static str {
  option_env!("FORGE_BUILD_VERSION").unwrap_or(DEFAULT_VERSION)
}

/// Commit id of the sources the binary was built from, overwritten while releasing.
pub fn commit() -> &'static str {
  option_env!("FORGE_BUILD_COMMIT").unwrap_or(DEFAULT_COMMIT)
}

/// RFC 3339 timestamp of the build, overwritten while releasing.
pub fn build_time() -> &'static str {
  option_env!("FORGE_BUILD_TIME").unwrap_or(DEFAULT_BUILD_TIME)
}

/// Build mode the binary was produced in, either "dev" or "production".
pub fn build_mode() -> &'static str {
  mode_or_default(option_env!("FORGE_BUILD_MODE").unwrap_or(DEFAULT_BUILD_MODE))
}

fn mode_or_default(mode: &'static str) -> &'static str {
  if mode.is_empty() { DEFAULT_BUILD_MODE } else { mode }
}
