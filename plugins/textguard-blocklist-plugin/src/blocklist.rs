//! Term blocklists built on Aho-Corasick

use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use textguard_core::{Error, Result, ValidationPhase, ValidationVerdict};
use textguard_validators::{Validator, ValidatorContext, ValidatorPlugin};

/// Module path configuration entries use to reach this plugin
pub const MODULE_PATH: &str = "blocklist";

/// Input-phase class rejecting prompts that contain a listed term
pub const KEYWORD_BLOCKLIST: &str = "KeywordBlocklist";

/// Output-phase class masking listed terms with asterisks
pub const PROFANITY_MASK: &str = "ProfanityMask";

/// Settings shared by both classes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlocklistSettings {
    #[serde(default)]
    pub terms: Vec<String>,
}

fn build_matcher(terms: &[String]) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(terms)
        .map_err(|e| Error::plugin(format!("Failed to build term matcher: {}", e)))
}

/// Rejects input containing any configured term
pub struct KeywordBlocklistValidator {
    name: String,
    matcher: AhoCorasick,
    terms: Vec<String>,
}

impl KeywordBlocklistValidator {
    pub fn new(name: impl Into<String>, terms: Vec<String>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            matcher: build_matcher(&terms)?,
            terms,
        })
    }

    /// First configured term found in `text`
    pub fn find_term(&self, text: &str) -> Option<&str> {
        self.matcher
            .find(text)
            .map(|m| self.terms[m.pattern().as_usize()].as_str())
    }
}

#[async_trait]
impl Validator for KeywordBlocklistValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Input {
            return ValidationVerdict::not_applicable(text, phase);
        }

        match self.find_term(text) {
            Some(term) => {
                tracing::debug!(validator = %self.name, term, "Blocked term matched");
                ValidationVerdict::fail(format!("Blocked term detected: '{}'", term), text)
            }
            None => ValidationVerdict::pass("No blocked terms", text),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Rejects input containing any of {} blocked terms", self.terms.len())
    }
}

/// Masks configured terms in output, keeping their length
pub struct ProfanityMaskValidator {
    name: String,
    matcher: AhoCorasick,
    term_count: usize,
}

impl ProfanityMaskValidator {
    pub fn new(name: impl Into<String>, terms: Vec<String>) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            matcher: build_matcher(&terms)?,
            term_count: terms.len(),
        })
    }

    /// Replace every match with asterisks, one per character
    ///
    /// Returns the masked text and the number of replacements.
    pub fn mask(&self, text: &str) -> (String, usize) {
        let mut masked = String::with_capacity(text.len());
        let mut last = 0;
        let mut count = 0;

        for m in self.matcher.find_iter(text) {
            masked.push_str(&text[last..m.start()]);
            masked.extend(std::iter::repeat('*').take(text[m.range()].chars().count()));
            last = m.end();
            count += 1;
        }
        masked.push_str(&text[last..]);

        (masked, count)
    }
}

#[async_trait]
impl Validator for ProfanityMaskValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Output {
            return ValidationVerdict::not_applicable(text, phase);
        }

        match self.mask(text) {
            (_, 0) => ValidationVerdict::pass("No masked terms", text),
            (masked, count) => {
                ValidationVerdict::fail(format!("Masked {} blocked term(s)", count), masked)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Masks {} blocked terms in output", self.term_count)
    }
}

/// Plugin exposing both blocklist classes
#[derive(Debug, Default)]
pub struct BlocklistPlugin;

impl BlocklistPlugin {
    pub fn new() -> Self {
        Self
    }

    /// Convenience for registering with a `PluginRegistry`
    pub fn shared() -> Arc<dyn ValidatorPlugin> {
        Arc::new(Self)
    }
}

impl ValidatorPlugin for BlocklistPlugin {
    fn module_path(&self) -> &str {
        MODULE_PATH
    }

    fn available_classes(&self) -> Vec<String> {
        vec![KEYWORD_BLOCKLIST.to_string(), PROFANITY_MASK.to_string()]
    }

    fn instantiate(
        &self,
        class_name: &str,
        context: &ValidatorContext<'_>,
    ) -> Result<Arc<dyn Validator>> {
        let settings: BlocklistSettings = context.options.parse_settings()?;
        if settings.terms.is_empty() {
            tracing::warn!("Blocklist '{}' has no terms configured", context.key);
        }

        match class_name {
            KEYWORD_BLOCKLIST => Ok(Arc::new(KeywordBlocklistValidator::new(
                context.key,
                settings.terms,
            )?)),
            PROFANITY_MASK => Ok(Arc::new(ProfanityMaskValidator::new(
                context.key,
                settings.terms,
            )?)),
            other => Err(Error::plugin(format!(
                "Class '{}' not found in module '{}'",
                other, MODULE_PATH
            ))),
        }
    }
}
