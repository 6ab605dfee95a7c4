//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use rainyield_core::LogFormat;
use rainyield_tui::DEFAULT_SERVER_URL;
use std::path::PathBuf;

/// Rainfall to crop yield predictions from multiple LLM providers.
#[derive(Parser, Debug)]
#[command(name = "rainyield")]
#[command(about = "Rainfall to crop yield predictions from multiple LLM providers")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Log line format for the server (pretty or json)
    #[arg(long, global = true, env = "RAINYIELD_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Configuration file (defaults to the per-user rainyield.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address, overriding the configuration
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Run the terminal client against a running server
    Tui {
        /// Server base URL
        #[arg(short, long, env = "RAINYIELD_SERVER", default_value = DEFAULT_SERVER_URL)]
        server: String,

        /// File receiving the client's logs
        #[arg(long, default_value = "rainyield-tui.log")]
        log_file: PathBuf,
    },
}
