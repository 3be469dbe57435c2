//! Topic-restriction validator (input phase, judge-backed)

use crate::config::{TopicSettings, TOPIC_RESTRICTION};
use crate::judge::{JudgeAnswer, JudgeHandle};
use crate::validator::Validator;
use async_trait::async_trait;
use textguard_core::{ValidationPhase, ValidationVerdict};
use tracing::warn;

const TOPIC_PROMPT: &str = r#"You are a strict topic classifier.

Allowed Topics: {topics}

User Query: "{query}"

Is the User Query related to ANY of the Allowed Topics?
Answer only "YES" or "NO".
If the query is a greeting (hello, hi) or meta-question (who are you), answer "YES"."#;

/// Rejects queries the judge explicitly calls off-topic
///
/// Degrades to pass-through when no topics are configured, no judge is
/// available, the judge errors, or its answer is not a clear YES/NO.
pub struct TopicRestrictionValidator {
    allowed_topics: Vec<String>,
    judge: Option<JudgeHandle>,
}

impl TopicRestrictionValidator {
    pub fn new(settings: &TopicSettings, judge: Option<JudgeHandle>) -> Self {
        Self {
            allowed_topics: settings.allowed_topics.clone(),
            judge,
        }
    }

    pub fn allowed_topics(&self) -> &[String] {
        &self.allowed_topics
    }
}

#[async_trait]
impl Validator for TopicRestrictionValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Input {
            return ValidationVerdict::not_applicable(text, phase);
        }

        if self.allowed_topics.is_empty() {
            return ValidationVerdict::pass("No topic restriction configured", text);
        }

        let Some(judge) = &self.judge else {
            warn!("Topic restriction has no judge available, skipping validation");
            return ValidationVerdict::pass("Topic check skipped: no judge available", text);
        };

        let topics = self.allowed_topics.join(", ");
        match judge
            .ask_yes_no(TOPIC_PROMPT, &[("topics", topics.as_str()), ("query", text)])
            .await
        {
            Ok(JudgeAnswer::No) => ValidationVerdict::fail(
                format!("Query is off-topic. Allowed topics: {}", topics),
                text,
            ),
            Ok(_) => ValidationVerdict::pass("Query is on-topic", text),
            Err(e) => {
                warn!("Topic validation failed (judge error): {}", e);
                ValidationVerdict::pass(format!("Topic check skipped: {}", e), text)
            }
        }
    }

    fn name(&self) -> &str {
        TOPIC_RESTRICTION
    }

    fn description(&self) -> String {
        "Ensures the user query is relevant to the allowed topics".to_string()
    }
}
