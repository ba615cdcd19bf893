//! The test task: instrumented test run plus coverage conversion.

use std::collections::BTreeMap;

use tracing::{debug, info};

use forge_platform::Arch;

use crate::{exec, resolver};

use super::{Builder, TaskError};

impl Builder {
  /// Run the workspace test suite with coverage instrumentation, then
  /// convert the raw profiles into `<os>-cover.out` and print a summary.
  pub async fn test(&mut self) -> Result<(), TaskError> {
    info!(env = ?self.env(), "running tests");
    self.install_tools().await?;

    // Tests compile against generated inputs, so refresh them first.
    self.generate().await?;

    let cover_file = format!("{}-cover.out", self.platform.os);

    let mut env = self.env();
    let mut rustflags = self.rustflags();
    rustflags.push_str(" -C instrument-coverage");
    if race_enabled() && self.platform.arch != Arch::X86 {
      // The thread sanitizer has no 32-bit x86 support.
      rustflags.push_str(" -Z sanitizer=thread");
    }
    env.insert("RUSTFLAGS".to_string(), rustflags);
    env.insert(
      "LLVM_PROFILE_FILE".to_string(),
      format!("{}-cover-%p-%m.profraw", self.platform.os),
    );

    let features = self.features();
    let mut args: Vec<String> = ["test", "--workspace", "--locked", "--features", &features]
      .iter()
      .map(|s| s.to_string())
      .collect();
    args.extend(self.extra_flags.iter().cloned());

    debug!(?args, "testing with args");
    let cargo = resolver::cargo_command();
    exec::run(&cargo, &args, &env)
      .await
      .map_err(|source| TaskError::Step {
        step: "cargo test",
        source,
      })?;

    self.convert_coverage(&cover_file, &env).await?;

    info!("tests completed");
    Ok(())
  }

  /// Convert the raw profiles to lcov and echo a human-readable summary.
  async fn convert_coverage(&self, cover_file: &str, env: &BTreeMap<String, String>) -> Result<(), TaskError> {
    let grcov = self.tool("grcov")?;
    let common = [
      ".",
      "--binary-path",
      "target/debug/",
      "-s",
      ".",
      "--branch",
      "--ignore-not-existing",
    ];

    let mut convert_args: Vec<&str> = common.to_vec();
    convert_args.extend(["-t", "lcov", "-o", cover_file]);
    exec::run(&grcov, &convert_args, env)
      .await
      .map_err(|source| TaskError::Step {
        step: "coverage convert",
        source,
      })?;

    let mut report_args: Vec<&str> = common.to_vec();
    report_args.extend(["-t", "markdown"]);
    let summary = exec::output(&grcov, &report_args, env)
      .await
      .map_err(|source| TaskError::Step {
        step: "coverage report",
        source,
      })?;
    println!("{summary}");

    Ok(())
  }
}

fn race_enabled() -> bool {
  std::env::var("ENABLE_TEST_RACE").as_deref() == Ok("1")
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn race_toggle_reads_environment() {
    temp_env::with_var("ENABLE_TEST_RACE", Some("1"), || {
      assert!(race_enabled());
    });
    temp_env::with_var("ENABLE_TEST_RACE", None::<&str>, || {
      assert!(!race_enabled());
    });
    temp_env::with_var("ENABLE_TEST_RACE", Some("yes"), || {
      assert!(!race_enabled());
    });
  }
}
