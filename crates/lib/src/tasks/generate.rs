//! The generate task: refreshes derived sources and build inputs.

use std::path::Path;

use tracing::info;

use crate::consts;
use crate::exec;
use crate::metadata::BuildMetadata;

use super::{Builder, TaskError};

impl Builder {
  /// Regenerate derived files: the third-party license inventory, the
  /// Windows version resource script, and (on Windows targets) the compiled
  /// resource stub.
  pub async fn generate(&mut self) -> Result<(), TaskError> {
    info!(env = ?self.env(), "running generate");
    self.install_tools().await?;

    let env = self.env();
    let about = self.tool("cargo-about")?;
    exec::run(
      &about,
      ["generate", consts::ABOUT_TEMPLATE, "-o", consts::THIRD_PARTY_FILE],
      &env,
    )
    .await
    .map_err(|source| TaskError::Step {
      step: "cargo-about generate",
      source,
    })?;

    let meta = BuildMetadata::collect(Path::new("."));
    write_versioninfo(Path::new(consts::VERSIONINFO_RC), &meta)?;

    self.ensure_resource().await?;

    info!("generate completed");
    Ok(())
  }
}

/// Render the Windows version resource script from build metadata.
pub(crate) fn write_versioninfo(path: &Path, meta: &BuildMetadata) -> Result<(), TaskError> {
  let contents = render_versioninfo(meta);
  std::fs::write(path, contents).map_err(|source| TaskError::Write {
    path: path.to_path_buf(),
    source,
  })?;
  info!(path = %path.display(), "version resource rendered");
  Ok(())
}

fn render_versioninfo(meta: &BuildMetadata) -> String {
  let numeric = numeric_version(&meta.version);
  format!(
    r#"1 24 "{manifest}"

1 VERSIONINFO
FILEVERSION {numeric}
PRODUCTVERSION {numeric}
BEGIN
  BLOCK "StringFileInfo"
  BEGIN
    BLOCK "040904b0"
    BEGIN
      VALUE "ProductName", "{name}"
      VALUE "ProductVersion", "{version}"
      VALUE "FileVersion", "{version}"
      VALUE "Comments", "commit {commit} built {time} ({mode})"
    END
  END
  BLOCK "VarFileInfo"
  BEGIN
    VALUE "Translation", 0x409, 1200
  END
END
"#,
    manifest = consts::WINDOWS_MANIFEST,
    name = consts::PRODUCT_NAME,
    version = meta.version,
    commit = meta.commit,
    time = meta.time,
    mode = meta.mode,
  )
}

/// `0.7.0` -> `0,7,0,0`: four comma-separated numbers as VERSIONINFO requires.
fn numeric_version(version: &str) -> String {
  let mut parts: Vec<u32> = version
    .split('.')
    .map(|p| p.parse().unwrap_or(0))
    .collect();
  parts.resize(4, 0);
  parts
    .iter()
    .map(u32::to_string)
    .collect::<Vec<_>>()
    .join(",")
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn sample_meta() -> BuildMetadata {
    BuildMetadata {
      version: "0.7.0".to_string(),
      commit: "abc123".to_string(),
      time: "2025-06-01T12:00:00Z".to_string(),
      mode: "prod".to_string(),
    }
  }

  #[test]
  fn numeric_version_pads_to_four_parts() {
    assert_eq!(numeric_version("0.7.0"), "0,7,0,0");
    assert_eq!(numeric_version("3.16"), "3,16,0,0");
    assert_eq!(numeric_version("1.2.3.4"), "1,2,3,4");
  }

  #[test]
  fn numeric_version_tolerates_junk_components() {
    assert_eq!(numeric_version("1.x.3"), "1,0,3,0");
  }

  #[test]
  fn rendered_resource_embeds_metadata() {
    let rendered = render_versioninfo(&sample_meta());
    assert!(rendered.contains("FILEVERSION 0,7,0,0"));
    assert!(rendered.contains(r#"VALUE "ProductVersion", "0.7.0""#));
    assert!(rendered.contains("commit abc123"));
    assert!(rendered.contains(consts::WINDOWS_MANIFEST));
  }

  #[test]
  fn versioninfo_is_written_to_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("versioninfo.rc");

    write_versioninfo(&path, &sample_meta()).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("VERSIONINFO"));
  }
}
