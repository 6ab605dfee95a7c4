//! Generic client for OpenAI-compatible APIs.

use crate::YieldPredictor;
use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use rainyield_core::{PredictionPrompt, Provider, RawPrediction};
use rainyield_error::{ProviderError, ProviderErrorKind, ProviderResult, RainyieldResult};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Generic client for any OpenAI-compatible chat completions API.
///
/// Serves OpenAI and Deepseek directly, and carries the transport for the
/// function-calling Llama client.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider: Provider,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for bearer authentication
    /// * `model` - Model identifier
    /// * `base_url` - API root; `/chat/completions` is appended
    /// * `provider` - Which provider this client serves (for logging and dispatch)
    #[instrument(skip(api_key), fields(provider = %provider, model = %model))]
    pub fn new(api_key: String, model: String, base_url: String, provider: Provider) -> Self {
        debug!(url = %base_url, "Created OpenAI-compatible client");

        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
            provider,
        }
    }

    /// Builds a deterministic request for the prompt pair.
    pub fn prompt_request(&self, prompt: &PredictionPrompt) -> ProviderResult<ChatRequest> {
        ChatRequest::builder()
            .model(self.model.clone())
            .messages(vec![
                ChatMessage::system(prompt.system().clone()),
                ChatMessage::user(prompt.user().clone()),
            ])
            .temperature(Some(0.0))
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                    "Failed to build request: {}",
                    e
                )))
            })
    }

    /// Sends a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the body is not a chat completion.
    #[instrument(skip(self, request), fields(provider = %self.provider, model = %self.model))]
    pub async fn chat(&self, request: &ChatRequest) -> ProviderResult<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        debug!(
            message_count = request.messages().len(),
            tools = request.tools().is_some(),
            "Sending request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = %self.provider, error = ?e, "HTTP request failed");
                ProviderError::new(ProviderErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                provider = %self.provider,
                status = %status,
                error = %error_text,
                "API error"
            );
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            }));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = %self.provider, error = ?e, "Failed to parse response");
            ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(choices = chat_response.choices.len(), "Received response");
        Ok(chat_response)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl YieldPredictor for OpenAICompatibleClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(provider = %self.provider, rainfall = *prompt.rainfall()))]
    async fn predict(&self, prompt: &PredictionPrompt) -> RainyieldResult<RawPrediction> {
        let request = self.prompt_request(prompt)?;
        let response = self.chat(&request).await?;

        let text = response
            .first_message()
            .and_then(|message| message.content.as_deref())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::ResponseParsing(
                    "No text content in response".to_string(),
                ))
            })?;

        debug!(reply = %text, "Parsing text reply");
        Ok(RawPrediction::from_text(text)?)
    }
}
