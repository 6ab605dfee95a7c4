//! Generic OpenAI-compatible API client.
//!
//! Used for OpenAI and Deepseek text completions, and as the transport for
//! the Llama function-calling client.

mod client;
mod dto;

pub use client::OpenAICompatibleClient;
pub use dto::{
    ChatChoice, ChatFunction, ChatMessage, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChatTool, ChatToolCall, ChatToolCallFunction, ChatUsage,
};
