//! HTTP API for predictions, CSV uploads and health checks.

use crate::{CsvPolicy, ServerConfig, predict::predict, upload::upload};
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rainyield_core::AgronomicProfile;
use rainyield_error::{RainyieldResult, SystemError};
use rainyield_models::PredictorRegistry;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<PredictorRegistry>,
    profile: Arc<AgronomicProfile>,
    csv_policy: CsvPolicy,
    #[cfg(feature = "metrics")]
    metrics: Arc<crate::ServerMetrics>,
}

impl AppState {
    /// Creates handler state.
    pub fn new(registry: PredictorRegistry, profile: AgronomicProfile, csv_policy: CsvPolicy) -> Self {
        Self {
            registry: Arc::new(registry),
            profile: Arc::new(profile),
            csv_policy,
            #[cfg(feature = "metrics")]
            metrics: Arc::new(crate::ServerMetrics::new()),
        }
    }

    /// State for a loaded configuration, with API keys from the environment.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            PredictorRegistry::from_env(config.providers()),
            AgronomicProfile::default(),
            *config.server().csv_policy(),
        )
    }

    /// Provider dispatch table.
    pub fn registry(&self) -> &PredictorRegistry {
        &self.registry
    }

    /// Agronomic constants for prompts.
    pub fn profile(&self) -> &AgronomicProfile {
        &self.profile
    }

    /// Upload malformed-number policy.
    pub fn csv_policy(&self) -> &CsvPolicy {
        &self.csv_policy
    }

    /// Request metrics.
    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> &crate::ServerMetrics {
        &self.metrics
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/upload", post(upload))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: &ServerConfig) -> RainyieldResult<()> {
    let addr = config.server().bind_addr()?;
    let state = AppState::from_config(config);
    let providers: Vec<String> = state.registry().providers().map(|p| p.to_string()).collect();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SystemError::config(format!("Failed to bind {}: {}", addr, e)))?;
    info!(%addr, ?providers, "Rainyield server listening");

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| SystemError::io(format!("Server error: {}", e)))?;
    Ok(())
}
