//! The clean task: removes generated build artifacts.

use std::path::Path;

use tracing::info;

use crate::consts;

use super::{Builder, TaskError};

impl Builder {
  /// Remove every file matching the cleanup globs under `root`.
  pub fn clean(&self, root: &Path) -> Result<(), TaskError> {
    info!("cleaning up");
    clean_globs(root, consts::CLEANUP_GLOBS)?;
    info!("cleanup completed");
    Ok(())
  }
}

/// Expand each glob relative to `root` and remove every match.
///
/// Aborts at the first match that cannot be removed, naming the file.
pub fn clean_globs(root: &Path, patterns: &[&str]) -> Result<(), TaskError> {
  for pattern in patterns {
    let full = root.join(pattern).to_string_lossy().into_owned();
    let matches = glob::glob(&full).map_err(|source| TaskError::Pattern {
      pattern: full.clone(),
      source,
    })?;

    for entry in matches {
      let path = entry?;
      info!(path = %path.display(), "removing file");
      std::fs::remove_file(&path).map_err(|source| TaskError::Remove { path, source })?;
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn removes_exactly_the_matching_files() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("linux-cover.out"), b"").unwrap();
    std::fs::write(temp.path().join("build.log"), b"").unwrap();
    std::fs::write(temp.path().join("keep.txt"), b"").unwrap();

    clean_globs(temp.path(), &["*cover.out", "*.log"]).unwrap();

    assert!(!temp.path().join("linux-cover.out").exists());
    assert!(!temp.path().join("build.log").exists());
    assert!(temp.path().join("keep.txt").exists());
  }

  #[test]
  fn expands_subdirectory_patterns() {
    let temp = TempDir::new().unwrap();
    let dist = temp.path().join("dist");
    std::fs::create_dir(&dist).unwrap();
    std::fs::write(dist.join("forge_linux_x86_64"), b"").unwrap();
    std::fs::write(dist.join("unrelated"), b"").unwrap();

    clean_globs(temp.path(), &["dist/forge_*"]).unwrap();

    assert!(!dist.join("forge_linux_x86_64").exists());
    assert!(dist.join("unrelated").exists());
  }

  #[test]
  fn no_matches_is_a_noop() {
    let temp = TempDir::new().unwrap();
    clean_globs(temp.path(), &["*.log", "dist/forge_*"]).unwrap();
  }

  #[test]
  fn unremovable_match_is_reported() {
    let temp = TempDir::new().unwrap();
    // A directory matching a file pattern cannot be removed with remove_file.
    std::fs::create_dir(temp.path().join("stale.log")).unwrap();

    let err = clean_globs(temp.path(), &["*.log"]).unwrap_err();
    match err {
      TaskError::Remove { path, .. } => {
        assert_eq!(path, temp.path().join("stale.log"));
      }
      other => panic!("expected Remove error, got {other:?}"),
    }
  }
}
