//! Rainyield command-line entry point.

use clap::Parser;
use rainyield::cli::{Cli, Commands, handle_serve_command, launch_tui};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Vendor API keys may live in .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve { config, bind } => handle_serve_command(config, bind, cli.log_format).await,
        Commands::Tui { server, log_file } => launch_tui(server, log_file).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            tracing::error!(error = %e, "Exiting with error");
            ExitCode::FAILURE
        }
    }
}
