//! PII redaction validator (output phase)
//!
//! Scans generated text against every active PII category and replaces each
//! match with a category placeholder such as `[EMAIL_REDACTED]`. Finding PII
//! marks the verdict invalid, but the redacted text is always carried
//! forward: the answer is delivered mitigated, not blocked.

use crate::config::{PiiSettings, PII_DETECTOR};
use crate::validator::Validator;
use async_trait::async_trait;
use regex::{NoExpand, Regex};
use textguard_core::{Error, Result, ValidationPhase, ValidationVerdict};

/// PII categories known to the redactor, in scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiCategory {
    Email,
    Phone,
    Ssn,
    CreditCard,
}

impl PiiCategory {
    pub const ALL: [PiiCategory; 4] = [Self::Email, Self::Phone, Self::Ssn, Self::CreditCard];

    /// Configuration name of the category
    pub fn key(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::CreditCard => "credit_card",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::Email => r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b",
            Self::Phone => r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b",
            Self::Ssn => r"\b\d{3}-\d{2}-\d{4}\b",
            Self::CreditCard => r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b",
        }
    }

    /// Token that replaces every match of the category
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Email => "[EMAIL_REDACTED]",
            Self::Phone => "[PHONE_REDACTED]",
            Self::Ssn => "[SSN_REDACTED]",
            Self::CreditCard => "[CREDIT_CARD_REDACTED]",
        }
    }
}

/// PII detection and redaction using regex patterns
#[derive(Debug, Clone)]
pub struct PiiRedactionValidator {
    patterns: Vec<(PiiCategory, Regex)>,
}

impl PiiRedactionValidator {
    /// Build from configuration; unknown category names are ignored with a warning
    pub fn new(settings: &PiiSettings) -> Result<Self> {
        let categories: Vec<PiiCategory> = match &settings.redact_types {
            None => PiiCategory::ALL.to_vec(),
            Some(names) => {
                for name in names {
                    if PiiCategory::from_key(name).is_none() {
                        tracing::warn!("Unknown PII category '{}' ignored", name);
                    }
                }
                PiiCategory::ALL
                    .into_iter()
                    .filter(|category| names.iter().any(|name| name == category.key()))
                    .collect()
            }
        };

        Self::with_categories(&categories)
    }

    /// Redact only the given categories (kept in catalogue order)
    pub fn with_categories(categories: &[PiiCategory]) -> Result<Self> {
        let patterns = PiiCategory::ALL
            .into_iter()
            .filter(|category| categories.contains(category))
            .map(|category| {
                Regex::new(category.pattern())
                    .map(|regex| (category, regex))
                    .map_err(|e| {
                        Error::validator(format!(
                            "Failed to compile {} regex: {}",
                            category.key(),
                            e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Active categories, in scan order
    pub fn categories(&self) -> Vec<PiiCategory> {
        self.patterns.iter().map(|(category, _)| *category).collect()
    }

    /// Redact every active category, returning the text and the categories found
    pub fn redact(&self, text: &str) -> (String, Vec<PiiCategory>) {
        let mut redacted = text.to_string();
        let mut detected = Vec::new();

        for (category, regex) in &self.patterns {
            if regex.is_match(&redacted) {
                detected.push(*category);
                redacted = regex
                    .replace_all(&redacted, NoExpand(category.placeholder()))
                    .into_owned();
            }
        }

        (redacted, detected)
    }
}

impl Default for PiiRedactionValidator {
    fn default() -> Self {
        Self::with_categories(&PiiCategory::ALL).expect("Failed to create PII validator")
    }
}

#[async_trait]
impl Validator for PiiRedactionValidator {
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict {
        if phase != ValidationPhase::Output {
            return ValidationVerdict::not_applicable(text, phase);
        }

        let (redacted, detected) = self.redact(text);
        if detected.is_empty() {
            return ValidationVerdict::pass("No PII detected", text);
        }

        let names: Vec<&str> = detected.iter().map(|category| category.key()).collect();
        ValidationVerdict::fail(
            format!("PII detected and redacted: {}", names.join(", ")),
            redacted,
        )
    }

    fn name(&self) -> &str {
        PII_DETECTOR
    }

    fn description(&self) -> String {
        let names: Vec<&str> = self
            .patterns
            .iter()
            .map(|(category, _)| category.key())
            .collect();
        format!("Detects and redacts PII: {}", names.join(", "))
    }
}
