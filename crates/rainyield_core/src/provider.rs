//! Prediction sources.

use rainyield_error::{RequestError, RequestErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Where a prediction point came from.
///
/// The four vendors are "live" providers that can be queried; `Historical`
/// tags rows that arrived through a CSV upload.
///
/// # Examples
///
/// ```
/// use rainyield_core::Provider;
///
/// let provider: Provider = "anthropic".parse().unwrap();
/// assert_eq!(provider, Provider::Anthropic);
/// assert_eq!(provider.to_string(), "anthropic");
/// assert!(!Provider::Historical.is_live());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions
    OpenAi,
    /// Anthropic messages
    Anthropic,
    /// Llama API with function calling
    Llama,
    /// Deepseek, OpenAI-compatible
    Deepseek,
    /// Uploaded CSV data
    Historical,
}

impl Provider {
    /// Providers that can be queried for a prediction, in menu order.
    pub fn live() -> impl Iterator<Item = Provider> {
        Provider::iter().filter(|p| p.is_live())
    }

    /// Whether the provider is an external vendor.
    pub fn is_live(&self) -> bool {
        !matches!(self, Provider::Historical)
    }

    /// Environment variable holding the vendor's API key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Llama => Some("LLAMA_API_KEY"),
            Provider::Deepseek => Some("DEEPSEEK_API_KEY"),
            Provider::Historical => None,
        }
    }

    /// Human-readable label for menus and legends.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Llama => "Llama",
            Provider::Deepseek => "Deepseek",
            Provider::Historical => "Historical",
        }
    }

    /// Parse a provider name from a predict request.
    ///
    /// Only live providers are accepted; `historical` is rejected like any
    /// other unknown name.
    #[track_caller]
    pub fn parse_live(name: &str) -> Result<Provider, RequestError> {
        match Provider::from_str(name) {
            Ok(provider) if provider.is_live() => Ok(provider),
            _ => Err(RequestError::new(RequestErrorKind::InvalidProvider {
                name: name.to_string(),
                allowed: Provider::live()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })),
        }
    }
}
