mod client;
mod types;

pub use client::{ANTHROPIC_VERSION, AnthropicClient};
pub use types::{
    AnthropicContent, AnthropicMessage, AnthropicRequest, AnthropicRequestBuilder,
    AnthropicResponse, AnthropicUsage,
};
