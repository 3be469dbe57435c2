//! Validator trait and descriptor types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use textguard_core::{ValidationPhase, ValidationVerdict};

/// Trait for all validators
///
/// `validate` must be a pure function of the text, the phase and the
/// validator's own configuration. A validator that does not handle `phase`
/// answers with [`ValidationVerdict::not_applicable`] instead of rejecting
/// or rewriting the text. Any reason containing `"N/A"` is read as that
/// opt-out, so regular reasons must not contain it.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Inspect `text` for the given phase
    async fn validate(&self, text: &str, phase: ValidationPhase) -> ValidationVerdict;

    /// Stable name, used to prefix failure reasons
    fn name(&self) -> &str;

    /// Human-readable description of what is checked
    fn description(&self) -> String;
}

/// Phases a validator participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Applicability {
    Input,
    Output,
    Both,
}

impl Applicability {
    /// Whether the validator runs in `phase`
    pub fn includes(&self, phase: ValidationPhase) -> bool {
        matches!(
            (self, phase),
            (Self::Both, _)
                | (Self::Input, ValidationPhase::Input)
                | (Self::Output, ValidationPhase::Output)
        )
    }

    /// Combine the outcome of the two load-time probes
    pub fn from_probes(input: bool, output: bool) -> Option<Self> {
        match (input, output) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Input),
            (false, true) => Some(Self::Output),
            (false, false) => None,
        }
    }
}

impl From<ValidationPhase> for Applicability {
    fn from(phase: ValidationPhase) -> Self {
        match phase {
            ValidationPhase::Input => Self::Input,
            ValidationPhase::Output => Self::Output,
        }
    }
}

/// Registry entry describing a loaded validator
///
/// Built at load time and never changed for the lifetime of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorDescriptor {
    pub name: String,
    pub description: String,
    pub phase: Applicability,
    pub enabled: bool,
}

impl ValidatorDescriptor {
    /// Describe `validator` with the given applicability
    pub fn of(validator: &dyn Validator, phase: Applicability, enabled: bool) -> Self {
        Self {
            name: validator.name().to_string(),
            description: validator.description(),
            phase,
            enabled,
        }
    }
}
