pub mod commands;
pub mod config;

pub use commands::{run_command, video_ref, CliCommand};
pub use config::CliConfig;
