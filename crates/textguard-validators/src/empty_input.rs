//! Empty-input validator

use crate::config::EMPTY_INPUT;
use crate::validator::Validator;
use async_trait::async_trait;
use textguard_core::{ValidationPhase, ValidationVerdict};

/// Rejects input that is empty or whitespace-only
#[derive(Debug, Default)]
pub struct EmptyInputValidator;

impl EmptyInputValidator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Validator for EmptyInputValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Input {
            return ValidationVerdict::not_applicable(text, phase);
        }

        if text.trim().is_empty() {
            return ValidationVerdict::fail("Empty input detected", "");
        }

        ValidationVerdict::pass("Input is not empty", text)
    }

    fn name(&self) -> &str {
        EMPTY_INPUT
    }

    fn description(&self) -> String {
        "Validates input is not empty".to_string()
    }
}
