//! Tests for the judge-backed validators
//!
//! Covers the explicit degradation branches: missing judge, failing judge,
//! slow judge, and unclear answers all resolve to pass-through.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use textguard_validators::config::TopicSettings;
use textguard_validators::prelude::*;
use textguard_validators::toxicity::TOXIC_PLACEHOLDER;
use textguard_validators::{
    Error, GuardrailsConfig, PluginRegistry, Result, ValidatorOptions,
};

/// A judge that always gives the same reply and remembers the last prompt
struct ScriptedJudge {
    reply: String,
    last_prompt: Mutex<Option<String>>,
    calls: AtomicU32,
}

impl ScriptedJudge {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            last_prompt: Mutex::new(None),
            calls: AtomicU32::new(0),
        }
    }

    fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn ask(&self, template: &str, variables: &[(&str, &str)]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_prompt.lock().unwrap() =
            Some(textguard_validators::render_prompt(template, variables));
        Ok(self.reply.clone())
    }
}

/// A judge that always fails
struct FailingJudge;

#[async_trait]
impl Judge for FailingJudge {
    async fn ask(&self, _template: &str, _variables: &[(&str, &str)]) -> Result<String> {
        Err(Error::judge("connection refused"))
    }
}

/// A judge that never answers in time
struct SlowJudge;

#[async_trait]
impl Judge for SlowJudge {
    async fn ask(&self, _template: &str, _variables: &[(&str, &str)]) -> Result<String> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("NO".to_string())
    }
}

/// Log sink shared with a test-local subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn topics(names: &[&str]) -> TopicSettings {
    TopicSettings {
        allowed_topics: names.iter().map(|s| s.to_string()).collect(),
    }
}

fn handle(judge: impl Judge + 'static) -> Option<JudgeHandle> {
    Some(JudgeHandle::new(Arc::new(judge)))
}

#[tokio::test]
async fn test_topic_off_topic_fails() {
    let judge = Arc::new(ScriptedJudge::new("NO"));
    let validator = TopicRestrictionValidator::new(
        &topics(&["cooking", "travel"]),
        Some(JudgeHandle::new(judge.clone())),
    );

    let verdict = validator
        .validate("How do I file taxes?", ValidationPhase::Input)
        .await;
    assert!(!verdict.valid);
    assert_eq!(
        verdict.reason,
        "Query is off-topic. Allowed topics: cooking, travel"
    );
    assert_eq!(verdict.sanitized_text, "How do I file taxes?");

    let prompt = judge.last_prompt().unwrap();
    assert!(prompt.contains("Allowed Topics: cooking, travel"));
    assert!(prompt.contains("User Query: \"How do I file taxes?\""));
}

#[tokio::test]
async fn test_topic_on_topic_and_unclear_pass() {
    for reply in ["YES", "yes, about cooking", "I am not sure"] {
        let validator =
            TopicRestrictionValidator::new(&topics(&["cooking"]), handle(ScriptedJudge::new(reply)));

        let verdict = validator
            .validate("best pasta recipe?", ValidationPhase::Input)
            .await;
        assert!(verdict.valid, "reply {:?} should pass", reply);
    }
}

#[tokio::test]
async fn test_topic_degrades_without_judge() {
    let validator = TopicRestrictionValidator::new(&topics(&["cooking"]), None);

    let verdict = validator.validate("anything", ValidationPhase::Input).await;
    assert!(verdict.valid);
    assert_eq!(verdict.sanitized_text, "anything");
}

#[tokio::test]
async fn test_topic_degrades_on_judge_error() {
    let validator = TopicRestrictionValidator::new(&topics(&["cooking"]), handle(FailingJudge));

    let verdict = validator.validate("anything", ValidationPhase::Input).await;
    assert!(verdict.valid);
    assert!(verdict.reason.contains("connection refused"));
}

#[tokio::test]
async fn test_judge_degradation_is_logged_as_warning() {
    let logs = CapturedLogs::default();
    let _guard = tracing::subscriber::set_default(logs.subscriber());

    let topic = TopicRestrictionValidator::new(&topics(&["cooking"]), handle(FailingJudge));
    assert!(topic.validate("anything", ValidationPhase::Input).await.valid);

    let toxicity = ToxicityValidator::new(None);
    assert!(toxicity.validate("anything", ValidationPhase::Output).await.valid);

    let output = logs.contents();
    assert!(output.contains("WARN"), "no warning captured: {output}");
    assert!(output.contains("connection refused"));
    assert_eq!(output.lines().count(), 2);
}

#[tokio::test]
async fn test_topic_without_topics_never_asks() {
    let judge = Arc::new(ScriptedJudge::new("NO"));
    let validator =
        TopicRestrictionValidator::new(&topics(&[]), Some(JudgeHandle::new(judge.clone())));

    let verdict = validator.validate("anything", ValidationPhase::Input).await;
    assert!(verdict.valid);
    assert_eq!(judge.calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_topic_not_applicable_to_output() {
    let validator = TopicRestrictionValidator::new(&topics(&["cooking"]), handle(ScriptedJudge::new("NO")));

    let verdict = validator.validate("text", ValidationPhase::Output).await;
    assert!(verdict.is_not_applicable());
}

#[tokio::test]
async fn test_toxicity_output_is_replaced() {
    let validator = ToxicityValidator::new(handle(ScriptedJudge::new("YES")));

    let verdict = validator.validate("nasty words", ValidationPhase::Output).await;
    assert!(!verdict.valid);
    assert_eq!(verdict.reason, "Content detected as toxic or harmful");
    assert_eq!(verdict.sanitized_text, TOXIC_PLACEHOLDER);
}

#[tokio::test]
async fn test_toxicity_input_is_not_rewritten() {
    let validator = ToxicityValidator::new(handle(ScriptedJudge::new("YES")));

    let verdict = validator.validate("nasty words", ValidationPhase::Input).await;
    assert!(!verdict.valid);
    assert_eq!(verdict.sanitized_text, "nasty words");
}

#[tokio::test]
async fn test_toxicity_degrades() {
    for validator in [
        ToxicityValidator::new(None),
        ToxicityValidator::new(handle(FailingJudge)),
        ToxicityValidator::new(handle(ScriptedJudge::new("NO"))),
    ] {
        let verdict = validator.validate("hello", ValidationPhase::Output).await;
        assert!(verdict.valid);
        assert_eq!(verdict.sanitized_text, "hello");
    }
}

#[tokio::test(start_paused = true)]
async fn test_judge_timeout_resolves_to_pass_through() {
    let config = GuardrailsConfig {
        judge_timeout_ms: Some(100),
        ..Default::default()
    }
    .with_validator(
        "topic_restriction",
        ValidatorOptions::enabled().with("allowed_topics", serde_json::json!(["cooking"])),
    );

    let pipeline =
        GuardrailPipeline::from_config(&config, Some(Arc::new(SlowJudge)), &PluginRegistry::new())
            .await;

    let result = pipeline.validate_input("tell me about taxes").await;
    assert!(result.valid);
    assert_eq!(result.sanitized_input, "tell me about taxes");
}

#[tokio::test]
async fn test_pipeline_with_judge_backed_validators() {
    let config = GuardrailsConfig::default()
        .with_validator("pii_detector", ValidatorOptions::enabled())
        .with_validator("toxicity_filter", ValidatorOptions::enabled());

    let pipeline = GuardrailPipeline::from_config(
        &config,
        Some(Arc::new(ScriptedJudge::new("YES"))),
        &PluginRegistry::new(),
    )
    .await;

    // PII redaction runs first, then toxicity replaces the whole answer
    let result = pipeline.validate_output("write to a@b.com, idiot").await;
    assert!(!result.valid);
    assert_eq!(
        result.reason,
        "[pii_detector] PII detected and redacted: email; \
         [toxicity_filter] Content detected as toxic or harmful"
    );
    assert_eq!(result.sanitized_output, TOXIC_PLACEHOLDER);

    let listed = pipeline.list_active_validators();
    let names: Vec<_> = listed.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["toxicity_filter", "pii_detector"]);
}
