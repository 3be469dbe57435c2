//! Validator loading from configuration
//!
//! Turns a [`GuardrailsConfig`] into two ordered validator lists, one per
//! phase. Built-ins are instantiated in a fixed order so cheap structural
//! checks run before semantic ones. Custom validators are resolved through
//! the [`PluginRegistry`] and probed once to learn which phases they handle.
//!
//! Loading never fails as a whole: a validator that cannot be built is
//! logged and left out.

use crate::config::{
    is_builtin, GuardrailsConfig, InputLengthSettings, PiiSettings, PromptInjectionSettings,
    SpecialCharactersSettings, TopicSettings, ValidatorOptions, EMPTY_INPUT, INPUT_LENGTH,
    PII_DETECTOR, PROMPT_INJECTION, SPECIAL_CHARACTERS, TOPIC_RESTRICTION, TOXICITY_FILTER,
};
use crate::empty_input::EmptyInputValidator;
use crate::input_length::InputLengthValidator;
use crate::judge::JudgeHandle;
use crate::pii::PiiRedactionValidator;
use crate::plugin::{PluginRegistry, ValidatorContext};
use crate::prompt_injection::PromptInjectionValidator;
use crate::special_characters::SpecialCharactersValidator;
use crate::topic::TopicRestrictionValidator;
use crate::toxicity::ToxicityValidator;
use crate::validator::{Applicability, Validator, ValidatorDescriptor};
use std::collections::HashMap;
use std::sync::Arc;
use textguard_core::{Error, Result, ValidationPhase};
use tracing::{debug, info, warn};

/// Input-phase order of the built-in validators
pub const INPUT_ORDER: [&str; 6] = [
    EMPTY_INPUT,
    INPUT_LENGTH,
    SPECIAL_CHARACTERS,
    PROMPT_INJECTION,
    TOPIC_RESTRICTION,
    TOXICITY_FILTER,
];

/// Output-phase order of the built-in validators
pub const OUTPUT_ORDER: [&str; 2] = [PII_DETECTOR, TOXICITY_FILTER];

/// Text custom validators are probed with
pub const PROBE_TEXT: &str = "test";

/// A loaded validator and its descriptor
#[derive(Clone)]
pub struct RegisteredValidator {
    pub descriptor: ValidatorDescriptor,
    pub validator: Arc<dyn Validator>,
}

impl RegisteredValidator {
    pub fn new(validator: Arc<dyn Validator>, phase: Applicability, enabled: bool) -> Self {
        Self {
            descriptor: ValidatorDescriptor::of(validator.as_ref(), phase, enabled),
            validator,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn is_enabled(&self) -> bool {
        self.descriptor.enabled
    }
}

impl std::fmt::Debug for RegisteredValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredValidator")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Ordered per-phase validator lists
#[derive(Debug, Clone, Default)]
pub struct ValidatorSet {
    pub input: Vec<RegisteredValidator>,
    pub output: Vec<RegisteredValidator>,
}

impl ValidatorSet {
    /// Append `entry` to every phase list it applies to
    pub fn push(&mut self, entry: RegisteredValidator) {
        let phase = entry.descriptor.phase;
        if phase.includes(ValidationPhase::Input) {
            self.input.push(entry.clone());
        }
        if phase.includes(ValidationPhase::Output) {
            self.output.push(entry);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty()
    }
}

/// Builds validator lists from configuration
pub struct ValidatorLoader<'a> {
    config: &'a GuardrailsConfig,
    judge: Option<JudgeHandle>,
    plugins: &'a PluginRegistry,
}

impl<'a> ValidatorLoader<'a> {
    pub fn new(
        config: &'a GuardrailsConfig,
        judge: Option<JudgeHandle>,
        plugins: &'a PluginRegistry,
    ) -> Self {
        Self {
            config,
            judge,
            plugins,
        }
    }

    /// Instantiate every enabled validator
    pub async fn load(&self) -> ValidatorSet {
        let mut set = self.load_builtins();

        for (key, options) in &self.config.validators {
            if is_builtin(key) || !options.enabled {
                continue;
            }

            let validator = match self.instantiate_custom(key, options) {
                Ok(validator) => validator,
                Err(e) => {
                    warn!("Failed to load custom validator '{}': {}", key, e);
                    continue;
                }
            };

            match probe(validator.as_ref()).await {
                Some(phase) => {
                    debug!("Custom validator '{}' applies to {:?}", key, phase);
                    set.push(RegisteredValidator::new(validator, phase, true));
                }
                None => warn!(
                    "Custom validator '{}' is not applicable to any phase, skipping",
                    key
                ),
            }
        }

        info!(
            "Loaded {} input and {} output validators",
            set.input.len(),
            set.output.len()
        );

        set
    }

    fn load_builtins(&self) -> ValidatorSet {
        let mut built: HashMap<&str, RegisteredValidator> = HashMap::new();

        for key in INPUT_ORDER.iter().chain(OUTPUT_ORDER.iter()) {
            if built.contains_key(key) {
                continue;
            }
            let Some(options) = self.config.enabled_options(key) else {
                continue;
            };

            match self.instantiate_builtin(key, options) {
                Ok((validator, phase)) => {
                    built.insert(key, RegisteredValidator::new(validator, phase, true));
                }
                Err(e) => warn!("Failed to load validator '{}': {}", key, e),
            }
        }

        ValidatorSet {
            input: INPUT_ORDER
                .iter()
                .filter_map(|key| built.get(key).cloned())
                .collect(),
            output: OUTPUT_ORDER
                .iter()
                .filter_map(|key| built.get(key).cloned())
                .collect(),
        }
    }

    fn instantiate_builtin(
        &self,
        key: &str,
        options: &ValidatorOptions,
    ) -> Result<(Arc<dyn Validator>, Applicability)> {
        let loaded: (Arc<dyn Validator>, Applicability) = match key {
            EMPTY_INPUT => (Arc::new(EmptyInputValidator::new()), Applicability::Input),
            INPUT_LENGTH => {
                let settings: InputLengthSettings = options.parse_settings()?;
                (Arc::new(InputLengthValidator::new(&settings)), Applicability::Input)
            }
            SPECIAL_CHARACTERS => {
                let settings: SpecialCharactersSettings = options.parse_settings()?;
                (
                    Arc::new(SpecialCharactersValidator::new(&settings)),
                    Applicability::Input,
                )
            }
            PROMPT_INJECTION => {
                let settings: PromptInjectionSettings = options.parse_settings()?;
                (
                    Arc::new(PromptInjectionValidator::new(&settings)?),
                    Applicability::Input,
                )
            }
            PII_DETECTOR => {
                let settings: PiiSettings = options.parse_settings()?;
                (
                    Arc::new(PiiRedactionValidator::new(&settings)?),
                    Applicability::Output,
                )
            }
            TOPIC_RESTRICTION => {
                let settings: TopicSettings = options.parse_settings()?;
                (
                    Arc::new(TopicRestrictionValidator::new(&settings, self.judge.clone())),
                    Applicability::Input,
                )
            }
            TOXICITY_FILTER => (
                Arc::new(ToxicityValidator::new(self.judge.clone())),
                Applicability::Both,
            ),
            other => {
                return Err(Error::config(format!(
                    "'{}' is not a built-in validator",
                    other
                )))
            }
        };

        Ok(loaded)
    }

    fn instantiate_custom(
        &self,
        key: &str,
        options: &ValidatorOptions,
    ) -> Result<Arc<dyn Validator>> {
        let module_path = options
            .module_path
            .as_deref()
            .ok_or_else(|| Error::config("missing 'module_path'"))?;
        let class_name = options
            .class_name
            .as_deref()
            .ok_or_else(|| Error::config("missing 'class_name'"))?;

        let context = ValidatorContext {
            key,
            options,
            judge: self.judge.clone(),
        };

        self.plugins.instantiate(module_path, class_name, &context)
    }
}

/// Learn which phases a validator handles by calling it once per phase
pub async fn probe(validator: &dyn Validator) -> Option<Applicability> {
    let input = !validator
        .validate(PROBE_TEXT, ValidationPhase::Input)
        .await
        .is_not_applicable();
    let output = !validator
        .validate(PROBE_TEXT, ValidationPhase::Output)
        .await
        .is_not_applicable();

    Applicability::from_probes(input, output)
}
