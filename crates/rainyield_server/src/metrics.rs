//! Request metrics for the prediction service.
//!
//! Available with the `metrics` feature.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use rainyield_core::Provider;
use tracing::debug;

/// Counters and latency for predictions and uploads.
#[derive(Clone)]
pub struct ServerMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Successful predictions
    pub predictions: Counter<u64>,
    /// Failed predictions
    pub prediction_failures: Counter<u64>,
    /// Upstream round trip in seconds
    pub prediction_duration: Histogram<f64>,
    /// Upload requests by outcome
    pub uploads: Counter<u64>,
    /// Rows returned by uploads
    pub upload_rows: Counter<u64>,
}

impl ServerMetrics {
    /// Create instruments on the global meter.
    pub fn new() -> Self {
        debug!("Building rainyield server metrics instruments");
        let meter = global::meter("rainyield_server");

        let predictions = meter
            .u64_counter("prediction.requests")
            .with_description("Successful predictions")
            .build();
        let prediction_failures = meter
            .u64_counter("prediction.failures")
            .with_description("Failed predictions")
            .build();
        let prediction_duration = meter
            .f64_histogram("prediction.duration")
            .with_unit("seconds")
            .with_description("Upstream prediction latency")
            .build();
        let uploads = meter
            .u64_counter("upload.requests")
            .with_description("CSV uploads")
            .build();
        let upload_rows = meter
            .u64_counter("upload.rows")
            .with_description("Rows returned by CSV uploads")
            .build();

        Self {
            _meter: meter,
            predictions,
            prediction_failures,
            prediction_duration,
            uploads,
            upload_rows,
        }
    }

    /// Record a prediction outcome.
    pub fn record_prediction(&self, provider: Provider, success: bool, duration_secs: f64) {
        let labels = &[KeyValue::new("provider", provider.to_string())];
        if success {
            self.predictions.add(1, labels);
        } else {
            self.prediction_failures.add(1, labels);
        }
        self.prediction_duration.record(duration_secs, labels);
    }

    /// Record an upload outcome.
    pub fn record_upload(&self, success: bool, rows: usize) {
        let labels = &[KeyValue::new("success", success)];
        self.uploads.add(1, labels);
        if success {
            self.upload_rows.add(rows as u64, &[]);
        }
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
