//! Forwards build metadata from the invoking environment into the compile.
//!
//! `forge build` exports the four `FORGE_BUILD_*` variables; unset variables
//! leave the compiled-in defaults in place.

use std::env;

const FORWARDED: &[&str] = &[
  "FORGE_BUILD_VERSION",
  "FORGE_BUILD_COMMIT",
  "FORGE_BUILD_TIME",
  "FORGE_BUILD_MODE",
];

fn main() {
  for var in FORWARDED {
    if let Ok(value) = env::var(var) {
      println!("cargo:rustc-env={var}={value}");
    }
    println!("cargo:rerun-if-env-changed={var}");
  }
  println!("cargo:rerun-if-changed=build.rs");
}
