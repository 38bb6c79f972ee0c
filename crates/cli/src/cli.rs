use crate::commands::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use keyward_api::CURRENT_USER;
use std::path::PathBuf;

/// Manage applications and their API tokens
#[derive(Debug, Parser)]
#[command(name = "keyward", version)]
pub struct Cli {
    /// Config file (default: ./keyward.toml, then the user config dir)
    #[arg(long, global = true, env = "KEYWARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server root URL, overrides config and environment
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is not set
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Api(ApiCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Commands that call the API
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ApiCommand {
    /// Create an application
    Create {
        /// Application name
        name: String,
    },

    /// Show an application
    Info { application_id: String },

    /// Delete an application
    Delete { application_id: String },

    /// Print an application's token
    Token { application_id: String },

    /// List applications owned by a user
    List {
        /// Page to fetch (starts at 1)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Owner id; defaults to the authenticated user
        #[arg(long, default_value = CURRENT_USER)]
        user: String,

        /// Keep fetching until the last page
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ConfigCommand {
    /// Print an example config file
    Example,
    /// Print the effective config, token masked
    Show,
}
