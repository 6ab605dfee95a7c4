//! Anthropic Messages API client.

use crate::YieldPredictor;
use crate::anthropic::{AnthropicMessage, AnthropicRequest, AnthropicResponse};
use async_trait::async_trait;
use rainyield_core::{PredictionPrompt, Provider, RawPrediction};
use rainyield_error::{ProviderError, ProviderErrorKind, ProviderResult, RainyieldResult};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Token budget for a number and one sentence.
const MAX_TOKENS: u32 = 256;

/// Client for the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// `base_url` is the API root; `/v1/messages` is appended.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        debug!(url = %base_url, "Created Anthropic client");
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    fn prompt_request(&self, prompt: &PredictionPrompt) -> ProviderResult<AnthropicRequest> {
        AnthropicRequest::builder()
            .model(self.model.clone())
            .messages(vec![AnthropicMessage::user(prompt.user().clone())])
            .system(Some(prompt.system().clone()))
            .max_tokens(MAX_TOKENS)
            .temperature(Some(0.0))
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                    "Failed to build request: {}",
                    e
                )))
            })
    }

    /// Sends a Messages API request.
    #[instrument(skip(self, request), fields(model = %self.model))]
    pub async fn messages(&self, request: &AnthropicRequest) -> ProviderResult<AnthropicResponse> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic request failed");
                ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Anthropic API error");
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            }));
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })
    }
}

#[async_trait]
impl YieldPredictor for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(provider = "anthropic", rainfall = *prompt.rainfall()))]
    async fn predict(&self, prompt: &PredictionPrompt) -> RainyieldResult<RawPrediction> {
        let request = self.prompt_request(prompt)?;
        let response = self.messages(&request).await?;

        let text = response.text().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::ResponseParsing(
                "No text content in response".to_string(),
            ))
        })?;

        debug!(reply = %text, "Parsing text reply");
        Ok(RawPrediction::from_text(&text)?)
    }
}
