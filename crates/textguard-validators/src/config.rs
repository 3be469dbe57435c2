//! Configuration for the guardrail pipeline and its validators
//!
//! The configuration is an immutable snapshot: it is parsed once, and each
//! validator receives a typed settings struct parsed from its own options
//! record. Unrecognized option keys are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use textguard_core::{Error, Result};

pub const EMPTY_INPUT: &str = "empty_input";
pub const INPUT_LENGTH: &str = "input_length";
pub const SPECIAL_CHARACTERS: &str = "special_characters";
pub const PROMPT_INJECTION: &str = "prompt_injection";
pub const PII_DETECTOR: &str = "pii_detector";
pub const TOPIC_RESTRICTION: &str = "topic_restriction";
pub const TOXICITY_FILTER: &str = "toxicity_filter";

/// Configuration keys reserved for built-in validators
pub const BUILTIN_VALIDATORS: [&str; 7] = [
    EMPTY_INPUT,
    INPUT_LENGTH,
    SPECIAL_CHARACTERS,
    PROMPT_INJECTION,
    PII_DETECTOR,
    TOPIC_RESTRICTION,
    TOXICITY_FILTER,
];

/// Whether `key` names a built-in validator
pub fn is_builtin(key: &str) -> bool {
    BUILTIN_VALIDATORS.contains(&key)
}

/// Top-level guardrails configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsConfig {
    /// Master switch; when false both phases pass everything through
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Deadline applied to every external judgment call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_timeout_ms: Option<u64>,

    /// Validator options keyed by validator name
    #[serde(default)]
    pub validators: BTreeMap<String, ValidatorOptions>,
}

impl GuardrailsConfig {
    /// Parse a guardrails section from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a guardrails section from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Add or replace the options for one validator
    pub fn with_validator(mut self, key: impl Into<String>, options: ValidatorOptions) -> Self {
        self.validators.insert(key.into(), options);
        self
    }

    /// Toggle the master switch
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Options for `key`, if present
    pub fn options(&self, key: &str) -> Option<&ValidatorOptions> {
        self.validators.get(key)
    }

    /// Options for `key` when present and enabled
    pub fn enabled_options(&self, key: &str) -> Option<&ValidatorOptions> {
        self.options(key).filter(|options| options.enabled)
    }

    /// Judge deadline as a duration
    pub fn judge_timeout(&self) -> Option<Duration> {
        self.judge_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for GuardrailsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            judge_timeout_ms: None,
            validators: BTreeMap::new(),
        }
    }
}

/// Options record for a single validator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Validators are disabled unless this is set
    #[serde(default)]
    pub enabled: bool,

    /// Plugin module providing a custom validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,

    /// Class within the plugin module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Validator-specific settings
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl ValidatorOptions {
    /// An enabled options record with no settings
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Reference a custom validator class in a plugin module
    pub fn plugin(module_path: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            enabled: true,
            module_path: Some(module_path.into()),
            class_name: Some(class_name.into()),
            settings: Map::new(),
        }
    }

    /// Set one validator-specific setting
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Parse the settings into a typed struct
    pub fn parse_settings<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.settings.clone()))
            .map_err(|e| Error::config(format!("invalid validator options: {}", e)))
    }
}

/// Settings for the input-length validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLengthSettings {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for InputLengthSettings {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

/// Settings for the special-characters validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialCharactersSettings {
    #[serde(default = "default_max_ratio")]
    pub max_ratio: f64,
}

impl Default for SpecialCharactersSettings {
    fn default() -> Self {
        Self {
            max_ratio: default_max_ratio(),
        }
    }
}

/// Settings for the prompt-injection validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptInjectionSettings {
    #[serde(default)]
    pub patterns: PatternSetting,
}

/// Which injection patterns to use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSetting {
    /// A built-in set: "default" or "strict"; unknown names mean "default"
    Named(String),
    /// An explicit list of regular expressions
    Custom(Vec<String>),
}

impl Default for PatternSetting {
    fn default() -> Self {
        Self::Named("default".to_string())
    }
}

/// Settings for the PII-redaction validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PiiSettings {
    /// Categories to redact; all categories when absent
    #[serde(default)]
    pub redact_types: Option<Vec<String>>,
}

/// Settings for the topic-restriction validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicSettings {
    #[serde(default)]
    pub allowed_topics: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_max_length() -> usize {
    10_000
}

fn default_max_ratio() -> f64 {
    0.3
}
