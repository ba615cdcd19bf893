mod build;
mod clean;
mod generate;
mod info;
mod lint;
mod vulncheck;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use generate::cmd_generate;
pub use info::cmd_info;
pub use lint::cmd_lint;
pub use test::cmd_test;
pub use vulncheck::cmd_vulncheck;
