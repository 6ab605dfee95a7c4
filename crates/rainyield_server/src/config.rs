//! Layered server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, then
//! `RAINYIELD__SECTION__KEY` environment variables.

use config::{Config, Environment, File};
use derive_getters::Getters;
use rainyield_core::Provider;
use rainyield_error::SystemError;
use rainyield_models::{ProviderSettings, ProvidersSettings};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "RAINYIELD";

/// What to do with a CSV field that is not a number.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CsvPolicy {
    /// Keep the row; the field becomes NaN (`null` on the wire)
    #[default]
    PassThrough,
    /// Drop the row
    SkipRow,
    /// Fail the whole upload
    RejectFile,
}

/// Listener and upload settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ServerSettings {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    bind: String,
    /// Malformed-number handling for uploads
    #[serde(default)]
    csv_policy: CsvPolicy,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            csv_policy: CsvPolicy::default(),
        }
    }
}

impl ServerSettings {
    /// Settings with the given bind address and CSV policy.
    pub fn new(bind: impl Into<String>, csv_policy: CsvPolicy) -> Self {
        Self {
            bind: bind.into(),
            csv_policy,
        }
    }

    /// Parsed listen address.
    #[track_caller]
    pub fn bind_addr(&self) -> Result<SocketAddr, SystemError> {
        self.bind
            .parse()
            .map_err(|e| SystemError::config(format!("Invalid bind address '{}': {}", self.bind, e)))
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
pub struct ServerConfig {
    /// Listener and upload settings
    #[serde(default)]
    server: ServerSettings,
    /// Per-provider settings
    #[serde(default)]
    providers: ProvidersSettings,
}

impl ServerConfig {
    /// Configuration from parts.
    pub fn new(server: ServerSettings, providers: ProvidersSettings) -> Self {
        Self { server, providers }
    }

    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// An explicit `path` must exist. Without one, the per-user file from
    /// [`default_config_path`] is read if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read, a value has the wrong
    /// type, or the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, SystemError> {
        let mut builder = Config::builder()
            .set_default("server.bind", DEFAULT_BIND)
            .and_then(|b| b.set_default("server.csv_policy", CsvPolicy::default().to_string()))
            .map_err(config_error)?;

        // Seed every provider table so a file may override single keys.
        for provider in Provider::live() {
            let defaults = ProviderSettings::default_for(provider);
            let key = |field: &str| format!("providers.{}.{}", provider, field);
            builder = builder
                .set_default(key("model"), defaults.model().as_str())
                .and_then(|b| b.set_default(key("base_url"), defaults.base_url().as_str()))
                .and_then(|b| b.set_default(key("min_yield"), *defaults.min_yield()))
                .and_then(|b| b.set_default(key("max_yield"), *defaults.max_yield()))
                .map_err(config_error)?;
        }

        match path {
            Some(path) => {
                info!(path = %path.display(), "Loading configuration file");
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = default_config_path() {
                    debug!(path = %default_path.display(), "Checking default configuration file");
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        let loaded: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        loaded.validate()?;
        debug!(bind = %loaded.server.bind, csv_policy = %loaded.server.csv_policy, "Configuration loaded");
        Ok(loaded)
    }

    /// Replace the bind address.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.server.bind = bind.into();
        self
    }

    /// Check the bind address and provider settings.
    pub fn validate(&self) -> Result<(), SystemError> {
        self.server.bind_addr()?;
        self.providers.validate()
    }
}

/// `<config dir>/rainyield/rainyield.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rainyield").join("rainyield.toml"))
}

#[track_caller]
fn config_error(err: config::ConfigError) -> SystemError {
    SystemError::config(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_toml(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "rainyield-config-{}-{}.toml",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_file_overrides_single_provider_key() {
        let path = write_toml(
            "partial",
            r#"
            [server]
            bind = "0.0.0.0:8080"
            csv_policy = "skip_row"

            [providers.deepseek]
            max_yield = 12.5
            "#,
        );

        let config = ServerConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server().bind(), "0.0.0.0:8080");
        assert_eq!(*config.server().csv_policy(), CsvPolicy::SkipRow);
        let deepseek = config.providers().deepseek();
        assert_eq!(*deepseek.max_yield(), 12.5);
        assert_eq!(deepseek.model(), "deepseek-chat");
        assert_eq!(
            config.providers().openai(),
            &ProviderSettings::default_for(Provider::OpenAi)
        );
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("rainyield-does-not-exist.toml");
        assert!(ServerConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_bind_rejected() {
        let config = ServerConfig::default().with_bind("not-an-address");
        let err = config.validate().unwrap_err();
        assert!(err.message().contains("not-an-address"));
    }

    #[test]
    fn test_inverted_bounds_rejected_on_load() {
        let path = write_toml(
            "inverted",
            r#"
            [providers.openai]
            min_yield = 9.0
            max_yield = 1.0
            "#,
        );
        let result = ServerConfig::load(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(result.unwrap_err().message().contains("providers.openai"));
    }

    #[test]
    fn test_csv_policy_names() {
        assert_eq!(CsvPolicy::PassThrough.to_string(), "pass_through");
        assert_eq!("reject_file".parse::<CsvPolicy>().unwrap(), CsvPolicy::RejectFile);
    }
}
