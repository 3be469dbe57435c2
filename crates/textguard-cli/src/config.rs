//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use textguard_validators::GuardrailsConfig;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Validator selection and settings
    #[serde(default)]
    pub guardrails: GuardrailsConfig,

    /// Generation backend, also used as the judge
    #[serde(default)]
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            tracing::warn!("Config file '{}' not found, using defaults", config_path);
            Self::default()
        };

        if let Some(base_url) = &cli.base_url {
            config.llm.base_url = base_url.clone();
        }

        if let Some(model) = &cli.model {
            config.llm.model = model.clone();
        }

        Ok(config)
    }
}

/// OpenAI-compatible chat backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL, `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer token
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_model() -> String {
    "mistral".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = Cli::parse_from(["textguard", "list"]);
        let config = AppConfig::load("/no/such/config.yaml", &cli).unwrap();

        assert!(config.guardrails.enabled);
        assert!(config.guardrails.validators.is_empty());
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.llm.timeout_secs, 30);
    }

    #[test]
    fn test_load_file_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
guardrails:
  judge_timeout_ms: 2500
  validators:
    empty_input:
      enabled: true
    input_length:
      enabled: true
      max_length: 500
llm:
  model: llama3
  api_key_env: OPENAI_API_KEY
"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["textguard", "--model", "phi3", "list"]);
        let config = AppConfig::load(&path, &cli).unwrap();

        assert_eq!(config.guardrails.validators.len(), 2);
        assert_eq!(config.guardrails.judge_timeout_ms, Some(2500));
        assert_eq!(config.llm.model, "phi3");
        assert_eq!(config.llm.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "guardrails: [1, 2").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["textguard", "list"]);
        assert!(AppConfig::load(&path, &cli).is_err());
    }
}
