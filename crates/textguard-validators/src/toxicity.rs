//! Toxicity validator (input and output, judge-backed)

use crate::config::TOXICITY_FILTER;
use crate::judge::{JudgeAnswer, JudgeHandle};
use crate::validator::Validator;
use async_trait::async_trait;
use textguard_core::{ValidationPhase, ValidationVerdict};
use tracing::warn;

const TOXICITY_PROMPT: &str = r#"You are a content moderation system.
Analyze the following text for toxicity, hate speech, or harmful content.

Text: "{text}"

Is this text TOXIC or HARMFUL?
Answer only "YES" or "NO"."#;

/// Replacement for toxic generated text
pub const TOXIC_PLACEHOLDER: &str = "[REDACTED]";

/// Flags text the judge calls toxic
///
/// Output-phase failures replace the text with [`TOXIC_PLACEHOLDER`];
/// input-phase failures leave it untouched. Without a usable judge the
/// validator passes everything through.
pub struct ToxicityValidator {
    judge: Option<JudgeHandle>,
}

impl ToxicityValidator {
    pub fn new(judge: Option<JudgeHandle>) -> Self {
        Self { judge }
    }
}

#[async_trait]
impl Validator for ToxicityValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        let Some(judge) = &self.judge else {
            warn!("Toxicity filter has no judge available, skipping validation");
            return ValidationVerdict::pass("Toxicity check skipped: no judge available", text);
        };

        match judge.ask_yes_no(TOXICITY_PROMPT, &[("text", text)]).await {
            Ok(JudgeAnswer::Yes) => {
                let sanitized = match phase {
                    ValidationPhase::Output => TOXIC_PLACEHOLDER,
                    ValidationPhase::Input => text,
                };
                ValidationVerdict::fail("Content detected as toxic or harmful", sanitized)
            }
            Ok(_) => ValidationVerdict::pass("No toxic content detected", text),
            Err(e) => {
                warn!("Toxicity validation failed (judge error): {}", e);
                ValidationVerdict::pass(format!("Toxicity check skipped: {}", e), text)
            }
        }
    }

    fn name(&self) -> &str {
        TOXICITY_FILTER
    }

    fn description(&self) -> String {
        "Checks for toxic, hateful, or harmful content".to_string()
    }
}
