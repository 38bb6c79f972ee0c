mod cli;
mod commands;
mod config;
pub mod output;

pub use cli::{ApiCommand, Cli, Command, ConfigCommand};
pub use commands::{run, OutputFormat};
pub use config::{ApiConfig, Config};
