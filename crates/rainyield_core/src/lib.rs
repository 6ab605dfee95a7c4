//! Core data types for the Rainyield prediction service.
//!
//! This crate holds everything both ends of the wire agree on: providers,
//! request and response bodies, chart points, the prompt templates, the
//! reply parser and the client-side history model.

mod api;
mod bounds;
mod history;
mod observability;
mod point;
mod prompt;
mod provider;
mod reply;

pub use api::{ErrorBody, HistoricalRow, PredictRequest, PredictResponse, PredictResponseBuilder, UploadResponse};
pub use bounds::{MAX_RAINFALL_MM, MIN_RAINFALL_MM, YieldBounds, validate_rainfall};
pub use history::{ChartBounds, PredictionHistory, ProviderSeries};
pub use observability::{
    LogFormat, init_observability, init_tracing, init_tracing_to, shutdown_observability,
};
pub use point::PredictionPoint;
pub use prompt::{AgronomicProfile, AgronomicProfileBuilder, PredictionPrompt};
pub use provider::Provider;
pub use reply::RawPrediction;
