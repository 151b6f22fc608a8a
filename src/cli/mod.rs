pub mod commands;
pub mod core;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod test_mode;

pub use shell::{parse_launch_args, run_cli, SCRIPT_ENV};
