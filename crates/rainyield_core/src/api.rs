//! HTTP request and response bodies shared by server and client.

use crate::Provider;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/predict`.
///
/// Both fields are optional at the wire level so a missing field can be
/// reported as such rather than as a generic decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Annual rainfall in mm
    #[serde(default)]
    pub rainfall: Option<f64>,
    /// Provider name
    #[serde(default)]
    pub provider: Option<String>,
}

impl PredictRequest {
    /// Request for `rainfall` mm from `provider`.
    pub fn new(rainfall: f64, provider: Provider) -> Self {
        Self {
            rainfall: Some(rainfall),
            provider: Some(provider.to_string()),
        }
    }
}

/// Successful reply of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct PredictResponse {
    /// Yield in t/ha formatted with two decimals
    prediction: String,
    /// Provider's explanation
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    /// Provider that answered
    provider: Provider,
    /// Rainfall echoed from the request
    rainfall: f64,
    /// Server time of the prediction
    timestamp: DateTime<Utc>,
}

impl PredictResponse {
    /// Creates a builder for `PredictResponse`.
    pub fn builder() -> PredictResponseBuilder {
        PredictResponseBuilder::default()
    }
}

/// Error reply of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

/// One parsed CSV row.
///
/// A field that failed numeric parsing is NaN; JSON carries it as `null`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoricalRow {
    /// Annual rainfall in mm
    #[serde(deserialize_with = "nan_if_null")]
    pub rainfall: f64,
    /// Yield in t/ha
    #[serde(rename = "yield", deserialize_with = "nan_if_null")]
    pub yield_tons: f64,
}

impl HistoricalRow {
    /// Creates a row.
    pub fn new(rainfall: f64, yield_tons: f64) -> Self {
        Self {
            rainfall,
            yield_tons,
        }
    }

    /// Whether both values are real numbers.
    pub fn is_complete(&self) -> bool {
        self.rainfall.is_finite() && self.yield_tons.is_finite()
    }
}

// Missing values compare equal to each other.
impl PartialEq for HistoricalRow {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }
        same(self.rainfall, other.rainfall) && same(self.yield_tons, other.yield_tons)
    }
}

fn nan_if_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Reply of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Whether the file was parsed
    pub success: bool,
    /// Parsed rows, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<HistoricalRow>>,
    /// Failure reason, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    /// Successful upload carrying `rows`.
    pub fn ok(rows: Vec<HistoricalRow>) -> Self {
        Self {
            success: true,
            data: Some(rows),
            message: None,
        }
    }

    /// Failed upload with a reason.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_request_missing_fields_decode() {
        let req: PredictRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, PredictRequest::default());
    }

    #[test]
    fn test_predict_request_rainfall_decodes_exactly() {
        for text in ["911.6760726776201", "3856.6829194149445", "0.30000000000000004"] {
            let expected: f64 = text.parse().unwrap();
            let req: PredictRequest =
                serde_json::from_str(&format!(r#"{{"rainfall": {}}}"#, text)).unwrap();
            assert_eq!(req.rainfall.map(f64::to_bits), Some(expected.to_bits()));
        }
    }

    #[test]
    fn test_historical_row_nan_as_null() {
        let row = HistoricalRow::new(800.0, f64::NAN);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"rainfall":800.0,"yield":null}"#);

        let back: HistoricalRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
        assert!(!back.is_complete());
    }

    #[test]
    fn test_upload_response_shapes() {
        let ok = serde_json::to_value(UploadResponse::ok(vec![HistoricalRow::new(1.0, 2.0)]))
            .unwrap();
        assert_eq!(ok["success"], true);
        assert!(ok.get("message").is_none());

        let failed = serde_json::to_value(UploadResponse::failed("No file uploaded")).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["message"], "No file uploaded");
        assert!(failed.get("data").is_none());
    }

    #[test]
    fn test_predict_response_omits_absent_comment() {
        let response = PredictResponse::builder()
            .prediction("3.40")
            .provider(Provider::Deepseek)
            .rainfall(900.0)
            .timestamp(Utc::now())
            .build()
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("comment").is_none());
        assert_eq!(json["provider"], "deepseek");
        assert_eq!(json["rainfall"], 900.0);
    }
}
