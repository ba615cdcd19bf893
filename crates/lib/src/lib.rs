//! forge-lib: task pipelines and tool resolution for the forge build runner
//!
//! This crate provides the pieces the `forge` binary is assembled from:
//! - `tasks`: the build lifecycle tasks (generate, lint, vulncheck, test, build, clean)
//! - `resolver`: locates or installs the external helper tools the tasks shell out to
//! - `exec`: external process invocation
//! - `metadata`: build metadata computed at build time and embedded into binaries

pub mod consts;
pub mod exec;
pub mod metadata;
pub mod resolver;
pub mod tasks;
pub mod tools;
