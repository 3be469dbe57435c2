//! Prompt-injection pattern validator
//!
//! Detects attempts to manipulate the generation service through the user
//! prompt, using an ordered list of case-insensitive regular expressions.
//!
//! Pattern sets:
//! - `default`: instruction override, role switching, system delimiters
//! - `strict`: `default` plus jailbreak keywords
//! - an explicit list supplied in configuration
//!
//! The validator never rewrites text. A failing verdict carries the input
//! unchanged and names the pattern that matched.

use crate::config::{PatternSetting, PromptInjectionSettings, PROMPT_INJECTION};
use crate::validator::Validator;
use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use textguard_core::{Error, Result, ValidationPhase, ValidationVerdict};

/// Patterns used when no set, or an unknown set, is configured
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"ignore\s+(all\s+)?previous\s+instructions?",
    r"disregard\s+(all\s+)?previous\s+instructions?",
    r"forget\s+(all\s+)?previous\s+instructions?",
    r"ignore\s+(all\s+)?above",
    r"disregard\s+(all\s+)?above",
    r"you\s+are\s+now",
    r"new\s+instructions?:",
    r"system\s*:\s*",
    r"</\s*system\s*>",
    r"<\s*system\s*>",
    r"act\s+as\s+(a\s+)?different",
    r"pretend\s+(you\s+are|to\s+be)",
    r"roleplay\s+as",
    r"simulate\s+(being|a)",
];

/// Patterns added on top of [`DEFAULT_PATTERNS`] by the `strict` set
pub const STRICT_EXTRA_PATTERNS: &[&str] = &[
    r"jailbreak",
    r"DAN\s+mode",
    r"developer\s+mode",
    r"god\s+mode",
    r"override\s+",
    r"bypass\s+",
];

/// Pattern-based prompt injection validator
#[derive(Debug, Clone)]
pub struct PromptInjectionValidator {
    patterns: Vec<Regex>,
}

impl PromptInjectionValidator {
    /// Build from configuration
    pub fn new(settings: &PromptInjectionSettings) -> Result<Self> {
        match &settings.patterns {
            PatternSetting::Named(name) if name == "strict" => Self::strict(),
            PatternSetting::Named(name) => {
                if name != "default" {
                    tracing::warn!(
                        "Unknown prompt injection pattern set '{}', using default",
                        name
                    );
                }
                Self::default_set()
            }
            PatternSetting::Custom(patterns) => Self::with_patterns(patterns.as_slice()),
        }
    }

    /// The `default` pattern set
    pub fn default_set() -> Result<Self> {
        Self::with_patterns(DEFAULT_PATTERNS)
    }

    /// The `strict` pattern set
    pub fn strict() -> Result<Self> {
        let patterns: Vec<&str> = DEFAULT_PATTERNS
            .iter()
            .chain(STRICT_EXTRA_PATTERNS)
            .copied()
            .collect();
        Self::with_patterns(patterns.as_slice())
    }

    /// Compile an explicit, ordered pattern list
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern.as_ref())
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        Error::config(format!(
                            "Failed to compile injection pattern '{}': {}",
                            pattern.as_ref(),
                            e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// First pattern that matches anywhere in `text`
    pub fn matched_pattern(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(text))
            .map(|pattern| pattern.as_str())
    }

    /// Number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

#[async_trait]
impl Validator for PromptInjectionValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Input {
            return ValidationVerdict::not_applicable(text, phase);
        }

        match self.matched_pattern(text) {
            Some(pattern) => ValidationVerdict::fail(
                format!("Potential prompt injection detected: pattern '{}'", pattern),
                text,
            ),
            None => ValidationVerdict::pass("No injection patterns detected", text),
        }
    }

    fn name(&self) -> &str {
        PROMPT_INJECTION
    }

    fn description(&self) -> String {
        "Detects prompt injection attack patterns".to_string()
    }
}
