//! Provider dispatch table.

use crate::{
    AnthropicClient, LlamaClient, OpenAICompatibleClient, ProvidersSettings, YieldPredictor,
};
use derive_getters::Getters;
use rainyield_core::{Provider, YieldBounds};
use rainyield_error::{ProviderError, ProviderErrorKind, ProviderResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};

/// A predictor and the yield range its answers must fall in.
#[derive(Clone, Getters)]
pub struct RegisteredPredictor {
    /// The vendor client
    predictor: Arc<dyn YieldPredictor>,
    /// Plausible yield range for this provider
    bounds: YieldBounds,
}

impl std::fmt::Debug for RegisteredPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredPredictor")
            .field("provider", &self.predictor.provider())
            .field("model", &self.predictor.model_name())
            .field("bounds", &self.bounds)
            .finish()
    }
}

/// Maps each live provider to the client that serves it.
///
/// Built once at startup and shared read-only. Providers whose API key was
/// absent are remembered so the error names the variable to set.
#[derive(Debug, Clone, Default)]
pub struct PredictorRegistry {
    entries: BTreeMap<Provider, RegisteredPredictor>,
    missing_keys: BTreeSet<Provider>,
}

impl PredictorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predictor under its own provider, replacing any previous one.
    pub fn register(&mut self, predictor: Arc<dyn YieldPredictor>, bounds: YieldBounds) {
        let provider = predictor.provider();
        self.missing_keys.remove(&provider);
        self.entries.insert(
            provider,
            RegisteredPredictor {
                predictor,
                bounds,
            },
        );
    }

    /// Record that a provider could not be built for lack of an API key.
    pub fn mark_missing_key(&mut self, provider: Provider) {
        self.entries.remove(&provider);
        self.missing_keys.insert(provider);
    }

    /// Look up the predictor for a provider.
    ///
    /// # Errors
    ///
    /// `MissingApiKey` naming the environment variable if the key was absent
    /// at startup, `NotConfigured` otherwise.
    #[track_caller]
    pub fn get(&self, provider: Provider) -> ProviderResult<&RegisteredPredictor> {
        if let Some(entry) = self.entries.get(&provider) {
            return Ok(entry);
        }
        match provider.api_key_env() {
            Some(var) if self.missing_keys.contains(&provider) => Err(ProviderError::new(
                ProviderErrorKind::MissingApiKey(var.to_string()),
            )),
            _ => Err(ProviderError::new(ProviderErrorKind::NotConfigured(
                provider.to_string(),
            ))),
        }
    }

    /// Providers with a registered client.
    pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
        self.entries.keys().copied()
    }

    /// Build clients for every live provider.
    ///
    /// `key_for` maps an environment variable name to its value; providers
    /// without a non-blank key are marked missing instead of failing startup.
    pub fn from_settings<F>(settings: &ProvidersSettings, key_for: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut registry = Self::new();

        for provider in Provider::live() {
            let (Some(provider_settings), Some(var)) =
                (settings.get(provider), provider.api_key_env())
            else {
                continue;
            };

            let Some(api_key) = key_for(var).filter(|key| !key.trim().is_empty()) else {
                warn!(provider = %provider, env = var, "API key not set; provider disabled");
                registry.mark_missing_key(provider);
                continue;
            };

            let model = provider_settings.model().clone();
            let base_url = provider_settings.base_url().clone();
            let predictor: Arc<dyn YieldPredictor> = match provider {
                Provider::Anthropic => Arc::new(AnthropicClient::new(api_key, model, base_url)),
                Provider::Llama => Arc::new(LlamaClient::new(api_key, model, base_url)),
                _ => Arc::new(OpenAICompatibleClient::new(
                    api_key, model, base_url, provider,
                )),
            };

            info!(
                provider = %provider,
                model = predictor.model_name(),
                "Registered provider"
            );
            registry.register(predictor, provider_settings.bounds());
        }

        registry
    }

    /// Build clients using API keys from the process environment.
    pub fn from_env(settings: &ProvidersSettings) -> Self {
        Self::from_settings(settings, |var| std::env::var(var).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_variable() {
        let registry = PredictorRegistry::from_settings(&ProvidersSettings::default(), |var| {
            (var == "ANTHROPIC_API_KEY").then(|| "sk-test".to_string())
        });

        assert_eq!(
            registry.providers().collect::<Vec<_>>(),
            vec![Provider::Anthropic]
        );

        let err = registry.get(Provider::OpenAi).unwrap_err();
        assert_eq!(
            err.kind,
            ProviderErrorKind::MissingApiKey("OPENAI_API_KEY".into())
        );
        assert_eq!(
            err.kind.to_string(),
            "OPENAI_API_KEY environment variable not set"
        );
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let registry = PredictorRegistry::from_settings(&ProvidersSettings::default(), |_| {
            Some("   ".to_string())
        });
        assert_eq!(registry.providers().count(), 0);
        assert!(matches!(
            registry.get(Provider::Deepseek).unwrap_err().kind,
            ProviderErrorKind::MissingApiKey(_)
        ));
    }

    #[test]
    fn test_clients_match_provider() {
        let registry =
            PredictorRegistry::from_settings(&ProvidersSettings::default(), |_| Some("k".into()));
        for provider in Provider::live() {
            let entry = registry.get(provider).unwrap();
            assert_eq!(entry.predictor().provider(), provider);
        }
        assert!(matches!(
            registry.get(Provider::Historical).unwrap_err().kind,
            ProviderErrorKind::NotConfigured(_)
        ));
    }
}
