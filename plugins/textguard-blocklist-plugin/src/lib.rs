//! Blocklist validators for `textguard-validators`.
//!
//! This crate provides a [`ValidatorPlugin`](textguard_validators::ValidatorPlugin)
//! under the module path `blocklist` that can be registered with a
//! `PluginRegistry` and referenced from configuration:
//!
//! ```yaml
//! banned_words:
//!   enabled: true
//!   module_path: blocklist
//!   class_name: KeywordBlocklist
//!   terms: [password, secret key]
//! ```

pub mod blocklist;

pub use blocklist::{
    BlocklistPlugin, BlocklistSettings, KeywordBlocklistValidator, ProfanityMaskValidator,
    KEYWORD_BLOCKLIST, MODULE_PATH, PROFANITY_MASK,
};
