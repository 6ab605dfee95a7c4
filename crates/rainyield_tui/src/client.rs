//! HTTP client for the Rainyield server.

use rainyield_core::{HistoricalRow, PredictRequest, PredictResponse, Provider, UploadResponse};
use rainyield_error::{RainyieldResult, SystemError};
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Default server address.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Talks to `/api/predict` and `/api/upload`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Server address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the server for a prediction.
    ///
    /// # Errors
    ///
    /// Returns the server's `error` message on a non-success status, or a
    /// transport error.
    #[instrument(skip(self))]
    pub async fn predict(&self, rainfall: f64, provider: Provider) -> RainyieldResult<PredictResponse> {
        let response = self
            .http
            .post(format!("{}/api/predict", self.base_url))
            .json(&PredictRequest::new(rainfall, provider))
            .send()
            .await
            .map_err(transport)?;

        let response = check_status(response).await?;
        let prediction: PredictResponse = response
            .json()
            .await
            .map_err(|e| SystemError::http(format!("Invalid prediction response: {}", e)))?;
        debug!(prediction = %prediction.prediction(), "Prediction received");
        Ok(prediction)
    }

    /// Upload a CSV file from disk.
    #[instrument(skip(self))]
    pub async fn upload_csv(&self, path: &Path) -> RainyieldResult<Vec<HistoricalRow>> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SystemError::io(format!("Cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        self.upload_bytes(file_name, bytes).await
    }

    /// Upload CSV content as the `file` field.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_bytes(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> RainyieldResult<Vec<HistoricalRow>> {
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(transport)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let response = check_status(response).await?;
        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| SystemError::http(format!("Invalid upload response: {}", e)))?;

        match upload {
            UploadResponse {
                success: true,
                data,
                ..
            } => Ok(data.unwrap_or_default()),
            UploadResponse { message, .. } => Err(SystemError::http(
                message.unwrap_or_else(|| "Upload failed".to_string()),
            )
            .into()),
        }
    }
}

#[track_caller]
fn transport(err: reqwest::Error) -> SystemError {
    SystemError::http(format!("Request failed: {}", err))
}

/// Pass success responses through; turn failures into the server's message.
async fn check_status(response: Response) -> Result<Response, SystemError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| {
            ["error", "message"]
                .iter()
                .find_map(|key| body.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| format!("Server returned {}: {}", status, text));

    warn!(status = %status, message = %message, "Server rejected request");
    Err(SystemError::http(message))
}
