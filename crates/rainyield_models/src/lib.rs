//! LLM provider integrations for Rainyield.
//!
//! Each vendor implements [`YieldPredictor`]: OpenAI and Deepseek through the
//! OpenAI-compatible text client, Anthropic through the Messages API, and
//! Llama through forced function calling. [`PredictorRegistry`] picks the
//! client for a request.

mod anthropic;
mod llama;
mod openai_compat;
mod predictor;
mod registry;
mod settings;

pub use anthropic::{
    ANTHROPIC_VERSION, AnthropicClient, AnthropicContent, AnthropicMessage, AnthropicRequest,
    AnthropicRequestBuilder, AnthropicResponse, AnthropicUsage,
};
pub use llama::{LlamaClient, PREDICT_FUNCTION, parse_tool_calls, predict_yield_tool};
pub use openai_compat::{
    ChatChoice, ChatFunction, ChatMessage, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChatTool, ChatToolCall, ChatToolCallFunction, ChatUsage, OpenAICompatibleClient,
};
pub use predictor::YieldPredictor;
pub use registry::{PredictorRegistry, RegisteredPredictor};
pub use settings::{ProviderSettings, ProviderSettingsBuilder, ProvidersSettings};
