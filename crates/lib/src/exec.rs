//! External process invocation.
//!
//! Every task ultimately shells out to third-party programs (cargo, the
//! resolved helper tools, installer scripts). Children inherit the parent
//! environment with per-invocation overrides merged on top; execution is
//! strictly sequential and the first failing child aborts the task.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::process::Stdio;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors that can occur while invoking an external program.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program could not be spawned at all.
  #[error("failed to spawn '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran but exited with a non-zero status.
  #[error("'{program}' exited with status {code:?}")]
  Failed { program: String, code: Option<i32> },

  /// I/O error while feeding the program's stdin.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Run a program to completion with inherited stdio.
pub async fn run<I, S>(program: &str, args: I, env: &BTreeMap<String, String>) -> Result<(), ExecError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<std::ffi::OsStr>,
{
  let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
  info!(program, args = ?args, "running");

  let status = Command::new(program)
    .args(&args)
    .envs(env)
    .status()
    .await
    .map_err(|source| ExecError::Spawn {
      program: program.to_string(),
      source,
    })?;

  if !status.success() {
    return Err(ExecError::Failed {
      program: program.to_string(),
      code: status.code(),
    });
  }
  Ok(())
}

/// Run a program and capture its stdout (trimmed).
pub async fn output<I, S>(program: &str, args: I, env: &BTreeMap<String, String>) -> Result<String, ExecError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<std::ffi::OsStr>,
{
  let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
  debug!(program, args = ?args, "capturing output");

  let out = Command::new(program)
    .args(&args)
    .envs(env)
    .output()
    .await
    .map_err(|source| ExecError::Spawn {
      program: program.to_string(),
      source,
    })?;

  if !out.status.success() {
    let stderr = String::from_utf8_lossy(&out.stderr);
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }
    return Err(ExecError::Failed {
      program: program.to_string(),
      code: out.status.code(),
    });
  }

  Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// Run a program with `input` piped to its stdin.
///
/// Used to feed fetched installer scripts to a shell without touching disk.
pub async fn run_with_stdin<I, S>(
  program: &str,
  args: I,
  env: &BTreeMap<String, String>,
  input: &[u8],
) -> Result<(), ExecError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<std::ffi::OsStr>,
{
  let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
  info!(program, args = ?args, "running with piped stdin");

  let mut child = Command::new(program)
    .args(&args)
    .envs(env)
    .stdin(Stdio::piped())
    .spawn()
    .map_err(|source| ExecError::Spawn {
      program: program.to_string(),
      source,
    })?;

  if let Some(mut stdin) = child.stdin.take() {
    stdin.write_all(input).await?;
    stdin.shutdown().await?;
  }

  let status = child.wait().await?;
  if !status.success() {
    return Err(ExecError::Failed {
      program: program.to_string(),
      code: status.code(),
    });
  }
  Ok(())
}

/// True when `program` answers a `--version` probe.
pub async fn probe(program: &str) -> bool {
  Command::new(program)
    .arg("--version")
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .await
    .map(|s| s.success())
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn no_env() -> BTreeMap<String, String> {
    BTreeMap::new()
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn run_succeeds_for_true() {
    run("sh", ["-c", "exit 0"], &no_env()).await.unwrap();
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn run_reports_exit_code() {
    let result = run("sh", ["-c", "exit 3"], &no_env()).await;
    assert!(matches!(result, Err(ExecError::Failed { code: Some(3), .. })));
  }

  #[tokio::test]
  async fn run_reports_spawn_failure() {
    let result = run("forge-test-no-such-program", ["--version"], &no_env()).await;
    assert!(matches!(result, Err(ExecError::Spawn { .. })));
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn output_is_trimmed() {
    let out = output("sh", ["-c", "echo '  hello  '"], &no_env()).await.unwrap();
    assert_eq!(out, "hello");
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn output_sees_env_overrides() {
    let mut env = no_env();
    env.insert("FORGE_TEST_VAR".to_string(), "value".to_string());
    let out = output("sh", ["-c", "echo $FORGE_TEST_VAR"], &env).await.unwrap();
    assert_eq!(out, "value");
  }

  #[tokio::test]
  #[cfg(unix)]
  async fn stdin_is_piped() {
    run_with_stdin("sh", ["-s"], &no_env(), b"exit 0\n").await.unwrap();

    let result = run_with_stdin("sh", ["-s"], &no_env(), b"exit 7\n").await;
    assert!(matches!(result, Err(ExecError::Failed { code: Some(7), .. })));
  }

  #[tokio::test]
  async fn probe_missing_program_is_false() {
    assert!(!probe("forge-test-no-such-program").await);
  }
}
