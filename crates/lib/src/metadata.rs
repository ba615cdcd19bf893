//! Build metadata stamped into release binaries.
//!
//! The build task computes these four values and exports them through the
//! environment of the release compile; the forge-buildinfo build script
//! forwards them into the binary, overwriting its compiled-in defaults.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::consts;

/// Fallback commit id when the workspace is not a git checkout.
const UNKNOWN_COMMIT: &str = "0000000000000000000000000000000000000000";

/// Metadata for one build: version, commit id, timestamp, and build mode.
#[derive(Debug, Clone)]
pub struct BuildMetadata {
  pub version: String,
  pub commit: String,
  pub time: String,
  pub mode: String,
}

impl BuildMetadata {
  /// Collect metadata for a build started now from the checkout at `root`.
  pub fn collect(root: &Path) -> Self {
    Self {
      version: consts::PRODUCT_VERSION.to_string(),
      commit: head_commit(root),
      time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
      mode: build_env(),
    }
  }

  /// Environment variables consumed by the forge-buildinfo build script.
  pub fn env(&self) -> BTreeMap<String, String> {
    BTreeMap::from([
      ("FORGE_BUILD_VERSION".to_string(), self.version.clone()),
      ("FORGE_BUILD_COMMIT".to_string(), self.commit.clone()),
      ("FORGE_BUILD_TIME".to_string(), self.time.clone()),
      ("FORGE_BUILD_MODE".to_string(), self.mode.clone()),
    ])
  }
}

/// HEAD commit id of the checkout at `root`, or the zero hash when `root` is
/// not inside a repository or HEAD cannot be resolved.
fn head_commit(root: &Path) -> String {
  match gix::discover(root) {
    Ok(repo) => match repo.head_id() {
      Ok(id) => id.to_string(),
      Err(e) => {
        debug!(error = %e, "could not resolve HEAD");
        UNKNOWN_COMMIT.to_string()
      }
    },
    Err(e) => {
      debug!(error = %e, "not a git checkout");
      UNKNOWN_COMMIT.to_string()
    }
  }
}

/// Normalized `BUILD_ENV` selector; anything but `dev` builds as `prod`.
pub fn build_env() -> String {
  match std::env::var("BUILD_ENV").as_deref() {
    Ok("dev") => "dev",
    _ => "prod",
  }
  .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  #[serial]
  fn build_env_defaults_to_prod() {
    temp_env::with_var("BUILD_ENV", None::<&str>, || {
      assert_eq!(build_env(), "prod");
    });
  }

  #[test]
  #[serial]
  fn build_env_accepts_dev() {
    temp_env::with_var("BUILD_ENV", Some("dev"), || {
      assert_eq!(build_env(), "dev");
    });
  }

  #[test]
  #[serial]
  fn build_env_normalizes_unknown_values() {
    temp_env::with_var("BUILD_ENV", Some("staging"), || {
      assert_eq!(build_env(), "prod");
    });
  }

  #[test]
  fn head_commit_outside_checkout_is_zero_hash() {
    let temp = TempDir::new().unwrap();
    assert_eq!(head_commit(temp.path()), UNKNOWN_COMMIT);
  }

  #[test]
  #[serial]
  fn collected_metadata_exports_all_four_variables() {
    let temp = TempDir::new().unwrap();
    let meta = BuildMetadata::collect(temp.path());
    let env = meta.env();

    assert_eq!(env.len(), 4);
    assert_eq!(env["FORGE_BUILD_VERSION"], consts::PRODUCT_VERSION);
    assert_eq!(env["FORGE_BUILD_COMMIT"], UNKNOWN_COMMIT);
    assert!(env.contains_key("FORGE_BUILD_MODE"));

    // The timestamp must be valid RFC 3339.
    chrono::DateTime::parse_from_rfc3339(&env["FORGE_BUILD_TIME"]).unwrap();
  }
}
