//! `serve` command handler.

use rainyield_core::{LogFormat, init_observability, init_tracing, shutdown_observability};
use rainyield_error::{RainyieldResult, SystemError};
use rainyield_server::ServerConfig;
use std::path::PathBuf;
use tracing::info;

/// Seconds between metric exports.
const METRICS_EXPORT_INTERVAL_SECS: u64 = 30;

/// Handle the `serve` command.
pub async fn handle_serve_command(
    config_path: Option<PathBuf>,
    bind: Option<String>,
    log_format: LogFormat,
) -> RainyieldResult<()> {
    init_tracing(log_format).map_err(SystemError::config)?;
    init_observability("rainyield", METRICS_EXPORT_INTERVAL_SECS).map_err(SystemError::config)?;

    let mut config = ServerConfig::load(config_path.as_deref())?;
    if let Some(bind) = bind {
        config = config.with_bind(bind);
        config.validate()?;
    }

    info!(bind = %config.server().bind(), "Starting Rainyield server");
    let result = rainyield_server::serve(&config).await;
    shutdown_observability();
    result
}
