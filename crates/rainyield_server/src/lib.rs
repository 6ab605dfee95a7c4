//! HTTP service for Rainyield.
//!
//! Exposes `POST /api/predict`, which forwards a templated prompt to one
//! configured provider, and `POST /api/upload`, which turns a
//! `rainfall,yield` CSV into historical rows.
//!
//! # Example
//!
//! ```no_run
//! use rainyield_server::{ServerConfig, serve};
//!
//! # async fn run() -> rainyield_error::RainyieldResult<()> {
//! let config = ServerConfig::load(None)?;
//! serve(&config).await?;
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod error;
mod predict;
mod upload;

#[cfg(feature = "metrics")]
mod metrics;

pub use api::{AppState, create_router, serve};
pub use config::{
    CsvPolicy, DEFAULT_BIND, ENV_PREFIX, ServerConfig, ServerSettings, default_config_path,
};
pub use error::ApiError;
pub use predict::{ValidPrediction, predict, validate_request};
pub use upload::{FILE_FIELD, parse_csv, upload};

#[cfg(feature = "metrics")]
pub use metrics::ServerMetrics;
