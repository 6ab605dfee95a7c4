//! Llama API client using forced function calling.
//!
//! The model is offered a single `predict_yield` function and told to call
//! it, so the value arrives as structured arguments instead of free text.

use crate::YieldPredictor;
use crate::openai_compat::{
    ChatFunction, ChatMessage, ChatRequest, ChatTool, ChatToolCall, OpenAICompatibleClient,
};
use async_trait::async_trait;
use rainyield_core::{PredictionPrompt, Provider, RawPrediction};
use rainyield_error::{
    PredictionError, PredictionErrorKind, ProviderError, ProviderErrorKind, ProviderResult,
    RainyieldResult,
};
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Name of the function the model is forced to call.
pub const PREDICT_FUNCTION: &str = "predict_yield";

/// The `predict_yield` tool definition.
pub fn predict_yield_tool() -> ChatTool {
    ChatTool {
        tool_type: "function".to_string(),
        function: ChatFunction {
            name: PREDICT_FUNCTION.to_string(),
            description: "Report the predicted crop yield for the given rainfall.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "yield": {
                        "type": "number",
                        "description": "Predicted yield in metric tons per hectare"
                    },
                    "comment": {
                        "type": "string",
                        "description": "One short sentence explaining the prediction"
                    }
                },
                "required": ["yield"]
            }),
        },
    }
}

/// Client for the Llama API.
#[derive(Debug, Clone)]
pub struct LlamaClient {
    inner: OpenAICompatibleClient,
    model: String,
}

impl LlamaClient {
    /// Creates a new Llama client.
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        let inner =
            OpenAICompatibleClient::new(api_key, model.clone(), base_url, Provider::Llama);
        Self { inner, model }
    }

    fn prompt_request(&self, prompt: &PredictionPrompt) -> ProviderResult<ChatRequest> {
        ChatRequest::builder()
            .model(self.model.clone())
            .messages(vec![
                ChatMessage::system(prompt.system().clone()),
                ChatMessage::user(prompt.user().clone()),
            ])
            .temperature(Some(0.0))
            .tools(Some(vec![predict_yield_tool()]))
            .tool_choice(Some(json!({
                "type": "function",
                "function": { "name": PREDICT_FUNCTION }
            })))
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::ResponseParsing(format!(
                    "Failed to build request: {}",
                    e
                )))
            })
    }
}

/// Extract the prediction from the first `predict_yield` call.
///
/// Arguments may be a JSON-encoded string or an inline object; the yield may
/// be a number or a numeric string.
#[track_caller]
pub fn parse_tool_calls(calls: &[ChatToolCall]) -> Result<RawPrediction, PredictionError> {
    let call = calls
        .iter()
        .find(|call| call.function.name == PREDICT_FUNCTION)
        .ok_or_else(|| unparseable(format!("no {} call in reply", PREDICT_FUNCTION)))?;

    let arguments = match &call.function.arguments {
        Value::String(encoded) => serde_json::from_str::<Value>(encoded)
            .map_err(|e| unparseable(format!("malformed arguments: {}", e)))?,
        other => other.clone(),
    };

    let value = match arguments.get("yield") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
    .ok_or_else(|| unparseable(format!("non-numeric yield in {}", arguments)))?;

    let comment = arguments
        .get("comment")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RawPrediction::new(value, comment))
}

#[track_caller]
fn unparseable(detail: String) -> PredictionError {
    PredictionError::new(PredictionErrorKind::Unparseable(detail))
}

#[async_trait]
impl YieldPredictor for LlamaClient {
    fn provider(&self) -> Provider {
        Provider::Llama
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(provider = "llama", rainfall = *prompt.rainfall()))]
    async fn predict(&self, prompt: &PredictionPrompt) -> RainyieldResult<RawPrediction> {
        let request = self.prompt_request(prompt)?;
        let response = self.inner.chat(&request).await?;

        let calls = response
            .first_message()
            .and_then(|message| message.tool_calls.as_deref())
            .unwrap_or_default();
        debug!(calls = calls.len(), "Parsing tool calls");

        Ok(parse_tool_calls(calls)?)
    }
}
