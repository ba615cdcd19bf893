//! Tool installation directories.
//!
//! External helper binaries are installed and looked up under the cargo
//! binary directories: `$CARGO_HOME/bin`, plus `$CARGO_INSTALL_ROOT/bin`
//! when an install root is configured. Both are created on first use.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving tool directories.
#[derive(Debug, Error)]
pub enum PathsError {
  /// Failed to create a tool directory.
  #[error("failed to create directory '{path}': {source}")]
  Create {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  let userprofile = std::env::var("USERPROFILE").expect("USERPROFILE not set");
  PathBuf::from(userprofile)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  let home = std::env::var("HOME").expect("HOME not set");
  PathBuf::from(home)
}

/// Returns the cargo home directory, creating it if missing
pub fn cargo_home() -> Result<PathBuf, PathsError> {
  let dir = std::env::var("CARGO_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".cargo"));
  ensure_dir(dir)
}

/// Returns the cargo install root, falling back to cargo home
pub fn install_root() -> Result<PathBuf, PathsError> {
  match std::env::var("CARGO_INSTALL_ROOT") {
    Ok(root) if !root.is_empty() => ensure_dir(PathBuf::from(root)),
    _ => cargo_home(),
  }
}

/// Base binary directories probed for helper tools, created if missing
///
/// The install-root entry duplicates the cargo-home entry when no separate
/// install root is configured; probing the same directory twice is harmless.
pub fn tool_bin_dirs() -> Result<Vec<PathBuf>, PathsError> {
  let dirs = vec![cargo_home()?.join("bin"), install_root()?.join("bin")];
  for dir in &dirs {
    std::fs::create_dir_all(dir).map_err(|source| PathsError::Create {
      path: dir.clone(),
      source,
    })?;
  }
  Ok(dirs)
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, PathsError> {
  std::fs::create_dir_all(&dir).map_err(|source| PathsError::Create {
    path: dir.clone(),
    source,
  })?;
  Ok(dir)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  #[serial]
  fn cargo_home_env_takes_precedence() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("cargo");

    temp_env::with_var("CARGO_HOME", Some(home.to_str().unwrap()), || {
      assert_eq!(cargo_home().unwrap(), home);
      assert!(home.is_dir());
    });
  }

  #[test]
  #[serial]
  #[cfg(unix)]
  fn cargo_home_falls_back_to_home() {
    let temp = TempDir::new().unwrap();

    temp_env::with_vars(
      [
        ("CARGO_HOME", None::<&str>),
        ("HOME", Some(temp.path().to_str().unwrap())),
      ],
      || {
        assert_eq!(cargo_home().unwrap(), temp.path().join(".cargo"));
      },
    );
  }

  #[test]
  #[serial]
  fn install_root_falls_back_to_cargo_home() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("cargo");

    temp_env::with_vars(
      [
        ("CARGO_INSTALL_ROOT", None::<&str>),
        ("CARGO_HOME", Some(home.to_str().unwrap())),
      ],
      || {
        assert_eq!(install_root().unwrap(), home);
      },
    );
  }

  #[test]
  #[serial]
  fn tool_bin_dirs_creates_both_directories() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("cargo");
    let root = temp.path().join("tools");

    temp_env::with_vars(
      [
        ("CARGO_HOME", Some(home.to_str().unwrap())),
        ("CARGO_INSTALL_ROOT", Some(root.to_str().unwrap())),
      ],
      || {
        let dirs = tool_bin_dirs().unwrap();
        assert_eq!(dirs, vec![home.join("bin"), root.join("bin")]);
        assert!(home.join("bin").is_dir());
        assert!(root.join("bin").is_dir());
      },
    );
  }
}
