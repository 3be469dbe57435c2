//! Core types for textguard

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker a validator puts in its reason for a phase it does not handle
pub const NOT_APPLICABLE: &str = "N/A";

/// Which side of the generation call a text comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPhase {
    /// User-supplied text, before it reaches the generation service
    Input,
    /// Generated text, before it reaches the user
    Output,
}

impl ValidationPhase {
    /// Lowercase name, used in reasons and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one validator invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// Whether the text passed the check
    pub valid: bool,

    /// Human-readable explanation
    pub reason: String,

    /// Text to carry forward; equals the input when nothing was rewritten
    pub sanitized_text: String,
}

impl ValidationVerdict {
    /// A passing verdict that carries `text` forward unchanged
    pub fn pass(reason: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: reason.into(),
            sanitized_text: text.into(),
        }
    }

    /// A failing verdict carrying `sanitized_text` forward
    pub fn fail(reason: impl Into<String>, sanitized_text: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            sanitized_text: sanitized_text.into(),
        }
    }

    /// The opt-out answer for a phase the validator does not handle
    pub fn not_applicable(text: impl Into<String>, phase: ValidationPhase) -> Self {
        Self::pass(format!("{} for {}s", NOT_APPLICABLE, phase), text)
    }

    /// Whether this verdict is the "not applicable" sentinel
    ///
    /// Any reason containing the marker counts, wherever it appears.
    pub fn is_not_applicable(&self) -> bool {
        self.reason.contains(NOT_APPLICABLE)
    }
}

/// Outcome of the input phase, as handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValidation {
    pub valid: bool,
    pub reason: String,
    pub sanitized_input: String,
}

impl InputValidation {
    pub(crate) fn new(valid: bool, reason: impl Into<String>, sanitized_input: String) -> Self {
        Self {
            valid,
            reason: reason.into(),
            sanitized_input,
        }
    }

    /// Input accepted with the composed sanitized text
    pub fn accepted(reason: impl Into<String>, sanitized_input: impl Into<String>) -> Self {
        Self::new(true, reason, sanitized_input.into())
    }

    /// Input rejected
    pub fn rejected(reason: impl Into<String>, sanitized_input: impl Into<String>) -> Self {
        Self::new(false, reason, sanitized_input.into())
    }
}

/// Outcome of the output phase, as handed to callers
///
/// A failed output phase still carries usable, mitigated text in
/// `sanitized_output`; callers deliver it and log `reason`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputValidation {
    pub valid: bool,
    pub reason: String,
    pub sanitized_output: String,
}

impl OutputValidation {
    /// Output delivered without warnings
    pub fn clean(reason: impl Into<String>, sanitized_output: impl Into<String>) -> Self {
        Self {
            valid: true,
            reason: reason.into(),
            sanitized_output: sanitized_output.into(),
        }
    }

    /// Output delivered with warnings and mitigated text
    pub fn mitigated(reason: impl Into<String>, sanitized_output: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            sanitized_output: sanitized_output.into(),
        }
    }
}
