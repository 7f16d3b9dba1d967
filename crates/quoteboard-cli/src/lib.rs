pub mod commands;
pub mod config;
pub mod repl;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
