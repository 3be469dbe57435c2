//! textguard Validators
//!
//! Independent, pluggable checks applied to user text before it reaches a
//! language-generation service, and to that service's output before it
//! reaches the user.
//!
//! Validators run in two phases:
//! - Input (fail-fast): the first failure blocks the request
//! - Output (accumulate): every validator runs, rewrites compose, and all
//!   failures are reported together alongside the mitigated text
//!
//! Built-in validators cover empty input, input length, special-character
//! ratio, prompt-injection patterns and PII redaction. Topic restriction and
//! toxicity delegate their judgment to an external [`Judge`] and fall back to
//! pass-through when it is missing or fails. Custom validators are supplied
//! through [`ValidatorPlugin`]s and resolved by name at load time.

pub mod config;
pub mod empty_input;
pub mod input_length;
pub mod judge;
pub mod pii;
pub mod pipeline;
pub mod plugin;
pub mod prompt_injection;
pub mod registry;
pub mod safe_response;
pub mod special_characters;
pub mod topic;
pub mod toxicity;
pub mod validator;

pub use config::{GuardrailsConfig, ValidatorOptions, BUILTIN_VALIDATORS};
pub use judge::{render_prompt, Judge, JudgeAnswer, JudgeHandle};
pub use pipeline::{GuardrailPipeline, PipelineBuilder};
pub use plugin::{PluginRegistry, ValidatorContext, ValidatorFactory, ValidatorPlugin};
pub use registry::{RegisteredValidator, ValidatorLoader, ValidatorSet};
pub use safe_response::{safe_response, SAFE_RESPONSE};
pub use validator::{Applicability, Validator, ValidatorDescriptor};

pub use textguard_core::{
    Error, InputValidation, OutputValidation, Result, ValidationPhase, ValidationVerdict,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::empty_input::EmptyInputValidator;
    pub use crate::input_length::InputLengthValidator;
    pub use crate::judge::{Judge, JudgeHandle};
    pub use crate::pii::{PiiCategory, PiiRedactionValidator};
    pub use crate::pipeline::GuardrailPipeline;
    pub use crate::prompt_injection::PromptInjectionValidator;
    pub use crate::special_characters::SpecialCharactersValidator;
    pub use crate::topic::TopicRestrictionValidator;
    pub use crate::toxicity::ToxicityValidator;
    pub use crate::validator::{Applicability, Validator};
    pub use textguard_core::{ValidationPhase, ValidationVerdict};
}
