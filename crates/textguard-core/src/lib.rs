//! textguard Core
//!
//! Core types shared across textguard components.
//!
//! This crate provides:
//! - The validation phase and verdict types every validator speaks
//! - The "not applicable" sentinel used to opt out of a phase
//! - Phase-level outcomes returned to callers
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    InputValidation, OutputValidation, ValidationPhase, ValidationVerdict, NOT_APPLICABLE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        InputValidation, OutputValidation, ValidationPhase, ValidationVerdict,
    };
}
