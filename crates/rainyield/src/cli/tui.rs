//! `tui` command handler.

use rainyield_core::init_tracing_to;
use rainyield_error::{RainyieldResult, SystemError};
use rainyield_tui::ApiClient;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::info;

/// Launch the terminal client.
///
/// Logs go to `log_file` so they do not draw over the screen.
pub async fn launch_tui(server: String, log_file: PathBuf) -> RainyieldResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| SystemError::io(format!("Cannot open {}: {}", log_file.display(), e)))?;
    init_tracing_to(file).map_err(SystemError::config)?;
    info!(server = %server, "Launching terminal client");

    let client = ApiClient::new(server);
    let runtime = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || rainyield_tui::run(client, runtime))
        .await
        .map_err(|e| SystemError::io(format!("Terminal client crashed: {}", e)))?
}
