//! Input-length validator

use crate::config::{InputLengthSettings, INPUT_LENGTH};
use crate::validator::Validator;
use async_trait::async_trait;
use textguard_core::{ValidationPhase, ValidationVerdict};

/// Rejects input longer than `max_length` characters
///
/// On failure the carried-forward text is the input truncated to the limit.
#[derive(Debug, Clone)]
pub struct InputLengthValidator {
    max_length: usize,
}

impl InputLengthValidator {
    pub fn new(settings: &InputLengthSettings) -> Self {
        Self::with_max_length(settings.max_length)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    fn truncate<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.max_length) {
            Some((byte_index, _)) => &text[..byte_index],
            None => text,
        }
    }
}

impl Default for InputLengthValidator {
    fn default() -> Self {
        Self::new(&InputLengthSettings::default())
    }
}

#[async_trait]
impl Validator for InputLengthValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Input {
            return ValidationVerdict::not_applicable(text, phase);
        }

        let truncated = self.truncate(text);
        if truncated.len() < text.len() {
            return ValidationVerdict::fail(
                format!(
                    "Input exceeds maximum length of {} characters",
                    self.max_length
                ),
                truncated,
            );
        }

        ValidationVerdict::pass("Input length within limits", text)
    }

    fn name(&self) -> &str {
        INPUT_LENGTH
    }

    fn description(&self) -> String {
        format!(
            "Validates input does not exceed {} characters",
            self.max_length
        )
    }
}
