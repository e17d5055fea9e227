//! Configuration management for Visor
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, VisorError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Visor
///
/// This structure holds all configuration needed for the chat client,
/// including provider settings and session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration
    pub provider: ProviderConfig,

    /// Chat session configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Provider configuration
///
/// Specifies which completion provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Gemini provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for completions
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API key for the Generative Language API
    ///
    /// Prefer the `GEMINI_API_KEY` environment variable over storing the
    /// key in a config file.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the `generateContent` and
    /// `models` endpoints, which allows tests to point the provider at a
    /// mock server. Defaults to the public Generative Language endpoint.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Optional per-request timeout in seconds
    ///
    /// When absent, requests wait indefinitely. A timeout still produces
    /// exactly one outcome for the turn; there are no retries.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_key: None,
            api_base: None,
            timeout_seconds: None,
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("model", &self.model)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum size of an attachment file (bytes)
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: usize,
}

fn default_max_attachment_bytes() -> usize {
    10_485_760 // 10 MB
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_attachment_bytes: default_max_attachment_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "gemini".to_string(),
                gemini: GeminiConfig::default(),
            },
            session: SessionConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| VisorError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| VisorError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            if !api_key.is_empty() {
                self.provider.gemini.api_key = Some(api_key);
            }
        }

        if let Ok(model) = std::env::var("VISOR_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("VISOR_API_BASE") {
            self.provider.gemini.api_base = Some(api_base);
        }

        if let Ok(timeout) = std::env::var("VISOR_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.gemini.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid VISOR_TIMEOUT_SECONDS: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set. The API key itself is
    /// checked at provider construction, not here, so commands that never
    /// reach the network can run without one.
    ///
    /// # Returns
    ///
    /// Returns Ok if configuration is valid
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(VisorError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["gemini"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(VisorError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.provider.gemini.model.is_empty() {
            return Err(VisorError::Config("Model cannot be empty".to_string()).into());
        }

        if let Some(api_base) = &self.provider.gemini.api_base {
            url::Url::parse(api_base).map_err(|e| {
                VisorError::Config(format!("Invalid api_base '{}': {}", api_base, e))
            })?;
        }

        if let Some(timeout) = self.provider.gemini.timeout_seconds {
            if timeout == 0 {
                return Err(VisorError::Config(
                    "timeout_seconds must be greater than 0".to_string(),
                )
                .into());
            }
        }

        if self.session.max_attachment_bytes == 0 {
            return Err(VisorError::Config(
                "session.max_attachment_bytes must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "gemini");
        assert_eq!(config.provider.gemini.model, "gemini-2.5-flash");
        assert!(config.provider.gemini.api_key.is_none());
        assert!(config.provider.gemini.api_base.is_none());
        assert_eq!(config.session.max_attachment_bytes, 10_485_760);
    }

    #[test]
    fn test_config_validation_success() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_provider() {
        let mut config = Config::default();
        config.provider.provider_type = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "openai".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.provider.gemini.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_api_base() {
        let mut config = Config::default();
        config.provider.gemini.api_base = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_valid_api_base() {
        let mut config = Config::default();
        config.provider.gemini.api_base = Some("http://127.0.0.1:8080".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.provider.gemini.timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_attachment_cap() {
        let mut config = Config::default();
        config.session.max_attachment_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
provider:
  type: gemini
  gemini:
    model: gemini-2.5-pro
    api_base: http://localhost:9090
    timeout_seconds: 30

session:
  max_attachment_bytes: 20971520
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.provider_type, "gemini");
        assert_eq!(config.provider.gemini.model, "gemini-2.5-pro");
        assert_eq!(
            config.provider.gemini.api_base.as_deref(),
            Some("http://localhost:9090")
        );
        assert_eq!(config.provider.gemini.timeout_seconds, Some(30));
        assert_eq!(config.session.max_attachment_bytes, 20_971_520);
    }

    #[test]
    fn test_config_from_yaml_minimal() {
        let yaml = r#"
provider:
  type: gemini
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.session.max_attachment_bytes, 10_485_760);
    }

    #[test]
    fn test_gemini_config_debug_redacts_api_key() {
        let config = GeminiConfig {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("VISOR_MODEL");
        std::env::remove_var("VISOR_API_BASE");
        std::env::remove_var("VISOR_TIMEOUT_SECONDS");

        let cli = crate::cli::Cli {
            config: None,
            verbose: false,
            command: None,
        };

        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.provider.provider_type, "gemini");
        assert_eq!(config.provider.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides() {
        std::env::set_var("GEMINI_API_KEY", "env-key");
        std::env::set_var("VISOR_MODEL", "gemini-2.5-pro");
        std::env::set_var("VISOR_API_BASE", "http://localhost:7777");

        let mut config = Config::default();
        config.apply_env_vars();

        assert_eq!(config.provider.gemini.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.provider.gemini.model, "gemini-2.5-pro");
        assert_eq!(
            config.provider.gemini.api_base.as_deref(),
            Some("http://localhost:7777")
        );

        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("VISOR_MODEL");
        std::env::remove_var("VISOR_API_BASE");
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_ignores_empty_api_key() {
        std::env::set_var("GEMINI_API_KEY", "");

        let mut config = Config::default();
        config.apply_env_vars();
        assert!(config.provider.gemini.api_key.is_none());

        std::env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    fn test_example_config_parses() {
        // Ensure the shipped example configuration maps to `Config`.
        let contents = std::fs::read_to_string("config/config.yaml")
            .expect("Failed to read example config/config.yaml");
        let config: Config =
            serde_yaml::from_str(&contents).expect("Failed to parse config/config.yaml");

        assert_eq!(config.provider.provider_type, "gemini");
        assert_eq!(config.provider.gemini.model, "gemini-2.5-flash");
        assert!(config.validate().is_ok());
    }
}
