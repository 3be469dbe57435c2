//! Guardrail pipeline orchestration
//!
//! This module sequences validators into two phases with different
//! protocols:
//! - Input phase (fail-fast): the first failing validator stops the phase
//!   and its verdict is returned
//! - Output phase (accumulate-and-continue): every validator runs, and all
//!   failures are merged into one warning alongside the mitigated text
//!
//! In both phases the sanitized text of each validator becomes the input of
//! the next, so rewrites compose left to right. Validators run strictly one
//! after another.

use crate::config::GuardrailsConfig;
use crate::judge::{Judge, JudgeHandle};
use crate::plugin::PluginRegistry;
use crate::registry::{probe, RegisteredValidator, ValidatorLoader, ValidatorSet};
use crate::safe_response;
use crate::validator::{Applicability, Validator, ValidatorDescriptor};
use std::sync::Arc;
use std::time::Instant;
use textguard_core::{InputValidation, OutputValidation, ValidationPhase};
use tracing::{debug, info, warn};

/// An immutable, ordered set of validators and the phase protocols that run them
#[derive(Debug, Clone)]
pub struct GuardrailPipeline {
    enabled: bool,
    validators: ValidatorSet,
}

impl GuardrailPipeline {
    /// Load validators from configuration
    ///
    /// Custom validators are resolved through `plugins`; `judge` is shared by
    /// the judge-backed built-ins and handed to custom validators.
    pub async fn from_config(
        config: &GuardrailsConfig,
        judge: Option<Arc<dyn Judge>>,
        plugins: &PluginRegistry,
    ) -> Self {
        let judge = judge.map(|judge| {
            let handle = JudgeHandle::new(judge);
            match config.judge_timeout() {
                Some(limit) => handle.with_timeout(limit),
                None => handle,
            }
        });

        let validators = ValidatorLoader::new(config, judge, plugins).load().await;

        if !config.enabled {
            info!("Guardrails disabled; all text will pass through unchanged");
        }

        Self {
            enabled: config.enabled,
            validators,
        }
    }

    /// Start assembling a pipeline by hand
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Whether the master switch is on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Input-phase validators, in execution order
    pub fn input_validators(&self) -> &[RegisteredValidator] {
        &self.validators.input
    }

    /// Output-phase validators, in execution order
    pub fn output_validators(&self) -> &[RegisteredValidator] {
        &self.validators.output
    }

    /// Run the input phase: stop at the first failure
    pub async fn validate_input(&self, text: &str) -> InputValidation {
        if !self.enabled {
            return InputValidation::accepted("Guardrails disabled", text);
        }

        let start = Instant::now();
        let mut sanitized = text.to_string();

        for entry in self.validators.input.iter().filter(|e| e.is_enabled()) {
            let verdict = entry
                .validator
                .validate(&sanitized, ValidationPhase::Input)
                .await;

            if verdict.is_not_applicable() {
                continue;
            }

            debug!(
                validator = entry.name(),
                valid = verdict.valid,
                "Input validator finished"
            );

            if !verdict.valid {
                let reason = format!("[{}] {}", entry.name(), verdict.reason);
                info!("Input rejected: {}", reason);
                record_phase(ValidationPhase::Input, "blocked", start);
                record_failure(ValidationPhase::Input, entry.name());
                return InputValidation::rejected(reason, verdict.sanitized_text);
            }

            sanitized = verdict.sanitized_text;
        }

        record_phase(ValidationPhase::Input, "passed", start);
        InputValidation::accepted("All input validations passed", sanitized)
    }

    /// Run the output phase: run everything, merge failures, keep mitigations
    pub async fn validate_output(&self, text: &str) -> OutputValidation {
        if !self.enabled {
            return OutputValidation::clean("Guardrails disabled", text);
        }

        let start = Instant::now();
        let mut sanitized = text.to_string();
        let mut warnings = Vec::new();

        for entry in self.validators.output.iter().filter(|e| e.is_enabled()) {
            let verdict = entry
                .validator
                .validate(&sanitized, ValidationPhase::Output)
                .await;

            if verdict.is_not_applicable() {
                continue;
            }

            debug!(
                validator = entry.name(),
                valid = verdict.valid,
                "Output validator finished"
            );

            if !verdict.valid {
                record_failure(ValidationPhase::Output, entry.name());
                warnings.push(format!("[{}] {}", entry.name(), verdict.reason));
            }

            sanitized = verdict.sanitized_text;
        }

        if warnings.is_empty() {
            record_phase(ValidationPhase::Output, "passed", start);
            return OutputValidation::clean("All output validations passed", sanitized);
        }

        let reason = warnings.join("; ");
        warn!("Output mitigated: {}", reason);
        record_phase(ValidationPhase::Output, "mitigated", start);
        OutputValidation::mitigated(reason, sanitized)
    }

    /// Describe every loaded validator, input-phase entries first
    ///
    /// Validators that run in both phases are listed once.
    pub fn list_active_validators(&self) -> Vec<ValidatorDescriptor> {
        let input = self.validators.input.iter();
        let output_only = self
            .validators
            .output
            .iter()
            .filter(|entry| entry.descriptor.phase != Applicability::Both);

        input
            .chain(output_only)
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    /// User-facing refusal for a rejected input
    pub fn safe_response(&self, verdict: &InputValidation) -> &'static str {
        safe_response::safe_response(verdict)
    }
}

fn record_phase(phase: ValidationPhase, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "textguard_validations_total",
        "phase" => phase.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("textguard_phase_latency_us", "phase" => phase.as_str())
        .record(start.elapsed().as_micros() as f64);
}

fn record_failure(phase: ValidationPhase, validator: &str) {
    metrics::counter!(
        "textguard_validator_failures_total",
        "phase" => phase.as_str(),
        "validator" => validator.to_string()
    )
    .increment(1);
}

/// Builder for assembling pipelines without configuration
pub struct PipelineBuilder {
    enabled: bool,
    validators: ValidatorSet,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            enabled: true,
            validators: ValidatorSet::default(),
        }
    }

    /// Set the master switch
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Append an input-phase validator
    pub fn input(self, validator: Arc<dyn Validator>) -> Self {
        self.add(validator, Applicability::Input, true)
    }

    /// Append an output-phase validator
    pub fn output(self, validator: Arc<dyn Validator>) -> Self {
        self.add(validator, Applicability::Output, true)
    }

    /// Append a validator to both phases
    pub fn both(self, validator: Arc<dyn Validator>) -> Self {
        self.add(validator, Applicability::Both, true)
    }

    /// Append a validator that is listed but never run
    pub fn disabled(self, validator: Arc<dyn Validator>, phase: Applicability) -> Self {
        self.add(validator, phase, false)
    }

    /// Probe a validator and append it to the phases it handles
    pub async fn custom(self, validator: Arc<dyn Validator>) -> Self {
        match probe(validator.as_ref()).await {
            Some(phase) => self.add(validator, phase, true),
            None => {
                warn!(
                    "Validator '{}' is not applicable to any phase, skipping",
                    validator.name()
                );
                self
            }
        }
    }

    fn add(mut self, validator: Arc<dyn Validator>, phase: Applicability, enabled: bool) -> Self {
        self.validators
            .push(RegisteredValidator::new(validator, phase, enabled));
        self
    }

    pub fn build(self) -> GuardrailPipeline {
        GuardrailPipeline {
            enabled: self.enabled,
            validators: self.validators,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
