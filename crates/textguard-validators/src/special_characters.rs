//! Special-character ratio validator

use crate::config::{SpecialCharactersSettings, SPECIAL_CHARACTERS};
use crate::validator::Validator;
use async_trait::async_trait;
use textguard_core::{ValidationPhase, ValidationVerdict};

/// Rejects input whose share of non-alphanumeric, non-whitespace
/// characters exceeds `max_ratio`
#[derive(Debug, Clone)]
pub struct SpecialCharactersValidator {
    max_ratio: f64,
}

impl SpecialCharactersValidator {
    pub fn new(settings: &SpecialCharactersSettings) -> Self {
        Self::with_max_ratio(settings.max_ratio)
    }

    pub fn with_max_ratio(max_ratio: f64) -> Self {
        Self { max_ratio }
    }

    /// Share of special characters in `text`; 0 for empty text
    pub fn special_ratio(text: &str) -> f64 {
        let (special, total) = text.chars().fold((0usize, 0usize), |(special, total), c| {
            let is_special = !c.is_alphanumeric() && !c.is_whitespace();
            (special + usize::from(is_special), total + 1)
        });

        if total == 0 {
            0.0
        } else {
            special as f64 / total as f64
        }
    }
}

impl Default for SpecialCharactersValidator {
    fn default() -> Self {
        Self::new(&SpecialCharactersSettings::default())
    }
}

#[async_trait]
impl Validator for SpecialCharactersValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Input {
            return ValidationVerdict::not_applicable(text, phase);
        }

        if text.is_empty() {
            return ValidationVerdict::pass("Empty text", text);
        }

        let ratio = Self::special_ratio(text);
        if ratio > self.max_ratio {
            return ValidationVerdict::fail(
                format!(
                    "Excessive special characters detected ({:.1}% > {:.1}%)",
                    ratio * 100.0,
                    self.max_ratio * 100.0
                ),
                text,
            );
        }

        ValidationVerdict::pass("Special character ratio acceptable", text)
    }

    fn name(&self) -> &str {
        SPECIAL_CHARACTERS
    }

    fn description(&self) -> String {
        format!(
            "Detects excessive special characters (max {}%)",
            self.max_ratio * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(SpecialCharactersValidator::special_ratio(""), 0.0);
        assert_eq!(SpecialCharactersValidator::special_ratio("ab cd"), 0.0);
        assert_eq!(SpecialCharactersValidator::special_ratio("a!b?"), 0.5);
        assert_eq!(SpecialCharactersValidator::special_ratio("日本語!"), 0.25);
    }

    #[tokio::test]
    async fn test_normal_text_passes() {
        let validator = SpecialCharactersValidator::default();

        let verdict = validator
            .validate("What's the weather like today?", ValidationPhase::Input)
            .await;
        assert!(verdict.valid);
    }

    #[tokio::test]
    async fn test_symbol_flood_fails() {
        let validator = SpecialCharactersValidator::default();

        let verdict = validator
            .validate("%%%$$$###@@@!!!abc", ValidationPhase::Input)
            .await;
        assert!(!verdict.valid);
        assert!(verdict.reason.starts_with("Excessive special characters detected"));
        assert_eq!(verdict.sanitized_text, "%%%$$$###@@@!!!abc");
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let validator = SpecialCharactersValidator::with_max_ratio(0.5);

        let verdict = validator.validate("a!b?", ValidationPhase::Input).await;
        assert!(verdict.valid, "ratio equal to the limit must pass");

        let verdict = validator.validate("a!?", ValidationPhase::Input).await;
        assert!(!verdict.valid);
    }

    #[tokio::test]
    async fn test_empty_passes() {
        let validator = SpecialCharactersValidator::with_max_ratio(0.0);

        let verdict = validator.validate("", ValidationPhase::Input).await;
        assert!(verdict.valid);
    }

    #[tokio::test]
    async fn test_not_applicable_to_output() {
        let validator = SpecialCharactersValidator::with_max_ratio(0.0);

        let verdict = validator.validate("!!!", ValidationPhase::Output).await;
        assert!(verdict.is_not_applicable());
    }
}
