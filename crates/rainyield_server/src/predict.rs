//! `POST /api/predict`.

use crate::{ApiError, AppState};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use chrono::Utc;
use rainyield_core::{PredictRequest, PredictResponse, PredictionPrompt, Provider, validate_rainfall};
use rainyield_error::{
    ProviderError, ProviderErrorKind, RainyieldResult, RequestError, RequestErrorKind,
};
use tracing::{debug, info, instrument};

/// A request that passed input validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidPrediction {
    /// Rainfall in mm, finite and inside the accepted band
    pub rainfall: f64,
    /// Live provider to ask
    pub provider: Provider,
}

/// Check a decoded request body without touching any provider.
#[track_caller]
pub fn validate_request(request: &PredictRequest) -> Result<ValidPrediction, RequestError> {
    let rainfall = request
        .rainfall
        .ok_or_else(|| RequestError::new(RequestErrorKind::MissingField("rainfall".into())))?;
    let provider = request
        .provider
        .as_deref()
        .ok_or_else(|| RequestError::new(RequestErrorKind::MissingField("provider".into())))?;

    let rainfall = validate_rainfall(rainfall)?;
    let provider = Provider::parse_live(provider)?;
    Ok(ValidPrediction { rainfall, provider })
}

/// Handle a prediction request.
#[instrument(skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(RequestError::new(RequestErrorKind::InvalidBody(
            rejection.body_text(),
        )))
    })?;
    let valid = validate_request(&request).map_err(ApiError::new)?;

    #[cfg(feature = "metrics")]
    let started = std::time::Instant::now();

    let result = run_prediction(&state, valid).await;

    #[cfg(feature = "metrics")]
    state.metrics().record_prediction(
        valid.provider,
        result.is_ok(),
        started.elapsed().as_secs_f64(),
    );

    Ok(Json(result?))
}

#[instrument(skip(state), fields(provider = %valid.provider, rainfall = valid.rainfall))]
async fn run_prediction(state: &AppState, valid: ValidPrediction) -> RainyieldResult<PredictResponse> {
    let entry = state.registry().get(valid.provider)?;
    let prompt = PredictionPrompt::new(valid.rainfall, state.profile());

    debug!(model = entry.predictor().model_name(), "Calling provider");
    let raw = entry.predictor().predict(&prompt).await?;
    let value = entry.bounds().check(*raw.value())?;

    let response = PredictResponse::builder()
        .prediction(format!("{:.2}", value))
        .comment(raw.comment().clone())
        .provider(valid.provider)
        .rainfall(valid.rainfall)
        .timestamp(Utc::now())
        .build()
        .map_err(|e| {
            ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                "Failed to build response: {}",
                e
            )))
        })?;

    info!(prediction = %response.prediction(), "Prediction complete");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rainfall: Option<f64>, provider: Option<&str>) -> PredictRequest {
        PredictRequest {
            rainfall,
            provider: provider.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_fields() {
        let err = validate_request(&request(None, Some("openai"))).unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::MissingField("rainfall".into()));

        let err = validate_request(&request(Some(100.0), None)).unwrap_err();
        assert_eq!(err.kind, RequestErrorKind::MissingField("provider".into()));
    }

    #[test]
    fn test_rainfall_checked_before_provider() {
        let err = validate_request(&request(Some(-5.0), Some("nope"))).unwrap_err();
        assert!(matches!(err.kind, RequestErrorKind::RainfallOutOfRange { .. }));
    }

    #[test]
    fn test_valid_request() {
        let valid = validate_request(&request(Some(5000.0), Some("deepseek"))).unwrap();
        assert_eq!(
            valid,
            ValidPrediction {
                rainfall: 5000.0,
                provider: Provider::Deepseek
            }
        );
    }
}
