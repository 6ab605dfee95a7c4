//! Per-provider model, endpoint and yield-bound settings.

use derive_getters::Getters;
use rainyield_core::{Provider, YieldBounds};
use rainyield_error::SystemError;
use serde::{Deserialize, Serialize};

/// Connection and validation settings for one live provider.
///
/// # Examples
///
/// ```
/// use rainyield_core::Provider;
/// use rainyield_models::ProviderSettings;
///
/// let settings = ProviderSettings::default_for(Provider::Anthropic);
/// assert_eq!(settings.model(), "claude-3-5-haiku-latest");
/// assert_eq!(*settings.max_yield(), 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ProviderSettings {
    /// Model identifier sent upstream
    model: String,
    /// API root
    base_url: String,
    /// Lowest plausible yield in t/ha
    #[builder(default = "0.0")]
    min_yield: f64,
    /// Highest plausible yield in t/ha
    #[builder(default = "20.0")]
    max_yield: f64,
}

impl ProviderSettings {
    /// Creates a builder for `ProviderSettings`.
    pub fn builder() -> ProviderSettingsBuilder {
        ProviderSettingsBuilder::default()
    }

    /// Vendor defaults for a live provider.
    ///
    /// `Historical` has no upstream; it gets empty model and URL.
    pub fn default_for(provider: Provider) -> Self {
        let (model, base_url) = match provider {
            Provider::OpenAi => ("gpt-4o-mini", "https://api.openai.com/v1"),
            Provider::Anthropic => ("claude-3-5-haiku-latest", "https://api.anthropic.com"),
            Provider::Llama => ("llama3.1-70b", "https://api.llama-api.com"),
            Provider::Deepseek => ("deepseek-chat", "https://api.deepseek.com/v1"),
            Provider::Historical => ("", ""),
        };
        let bounds = YieldBounds::default();
        Self {
            model: model.to_string(),
            base_url: base_url.to_string(),
            min_yield: *bounds.min(),
            max_yield: *bounds.max(),
        }
    }

    /// The configured plausible yield range.
    pub fn bounds(&self) -> YieldBounds {
        YieldBounds::new(self.min_yield, self.max_yield)
    }
}

/// Settings for every live provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ProvidersSettings {
    /// OpenAI
    openai: ProviderSettings,
    /// Anthropic
    anthropic: ProviderSettings,
    /// Llama API
    llama: ProviderSettings,
    /// Deepseek
    deepseek: ProviderSettings,
}

impl Default for ProvidersSettings {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::default_for(Provider::OpenAi),
            anthropic: ProviderSettings::default_for(Provider::Anthropic),
            llama: ProviderSettings::default_for(Provider::Llama),
            deepseek: ProviderSettings::default_for(Provider::Deepseek),
        }
    }
}

impl ProvidersSettings {
    /// Settings for one provider, `None` for `Historical`.
    pub fn get(&self, provider: Provider) -> Option<&ProviderSettings> {
        match provider {
            Provider::OpenAi => Some(&self.openai),
            Provider::Anthropic => Some(&self.anthropic),
            Provider::Llama => Some(&self.llama),
            Provider::Deepseek => Some(&self.deepseek),
            Provider::Historical => None,
        }
    }

    /// Mutable settings for one provider.
    pub fn get_mut(&mut self, provider: Provider) -> Option<&mut ProviderSettings> {
        match provider {
            Provider::OpenAi => Some(&mut self.openai),
            Provider::Anthropic => Some(&mut self.anthropic),
            Provider::Llama => Some(&mut self.llama),
            Provider::Deepseek => Some(&mut self.deepseek),
            Provider::Historical => None,
        }
    }

    /// Check every provider has a model, a URL and a usable yield range.
    #[track_caller]
    pub fn validate(&self) -> Result<(), SystemError> {
        for provider in Provider::live() {
            let Some(settings) = self.get(provider) else {
                continue;
            };
            if settings.model.trim().is_empty() {
                return Err(SystemError::config(format!(
                    "providers.{}.model must not be empty",
                    provider
                )));
            }
            if settings.base_url.trim().is_empty() {
                return Err(SystemError::config(format!(
                    "providers.{}.base_url must not be empty",
                    provider
                )));
            }
            if !settings.bounds().is_valid() {
                return Err(SystemError::config(format!(
                    "providers.{}: min_yield {} must not exceed max_yield {}",
                    provider, settings.min_yield, settings.max_yield
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        ProvidersSettings::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut settings = ProvidersSettings::default();
        if let Some(llama) = settings.get_mut(Provider::Llama) {
            llama.min_yield = 10.0;
            llama.max_yield = 2.0;
        }
        let err = settings.validate().unwrap_err();
        assert!(err.message().contains("providers.llama"));
    }

    #[test]
    fn test_builder_default_bounds() {
        let settings = ProviderSettings::builder()
            .model("m")
            .base_url("http://localhost")
            .build()
            .unwrap();
        assert_eq!(settings.bounds(), YieldBounds::default());
    }
}
