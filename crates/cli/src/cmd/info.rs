//! Implementation of the `forge info` command.
//!
//! Reports the metadata embedded at build time alongside the detected
//! build target.

use anyhow::Result;

use forge_lib::consts;
use forge_platform::Platform;

use crate::output::{print_info, print_json, print_stat, print_success, print_warning};

/// Execute the info command.
pub fn cmd_info(json: bool) -> Result<()> {
  let platform = Platform::detect();

  if json {
    let value = serde_json::json!({
      "name": consts::PRODUCT_NAME,
      "version": forge_buildinfo::version(),
      "commit": forge_buildinfo::commit(),
      "build_time": forge_buildinfo::build_time(),
      "build_mode": forge_buildinfo::build_mode(),
      "target": platform.map(|p| p.rust_triple()),
    });
    print_json(&value)?;
    return Ok(());
  }

  print_success(&format!(
    "{} v{}",
    consts::PRODUCT_NAME,
    forge_buildinfo::version()
  ));
  print_stat("Commit", forge_buildinfo::commit());
  print_stat("Build time", forge_buildinfo::build_time());
  print_stat("Build mode", forge_buildinfo::build_mode());

  match platform {
    Some(platform) => {
      print_stat("Target", platform.rust_triple());
      print_stat("OS", platform.os.as_str());
      print_stat("Arch", platform.arch.as_str());
    }
    None => print_warning("Unsupported build target"),
  }

  if forge_platform::is_elevated() {
    print_info("Administrator privileges detected");
  }

  Ok(())
}
