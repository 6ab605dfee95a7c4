//! The provider capability every vendor client implements.

use async_trait::async_trait;
use rainyield_core::{PredictionPrompt, Provider, RawPrediction};
use rainyield_error::RainyieldResult;

/// A vendor that can turn a prompt into a yield figure.
///
/// Each implementation owns its wire format and its reply shape: text
/// completions are parsed with [`RawPrediction::from_text`], function-calling
/// vendors read structured arguments. Range checking is the caller's job.
#[async_trait]
pub trait YieldPredictor: Send + Sync {
    /// Which provider this client talks to.
    fn provider(&self) -> Provider;

    /// Model identifier sent upstream.
    fn model_name(&self) -> &str;

    /// Make exactly one upstream call and extract the prediction.
    async fn predict(&self, prompt: &PredictionPrompt) -> RainyieldResult<RawPrediction>;
}
