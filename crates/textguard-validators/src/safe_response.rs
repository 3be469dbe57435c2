//! Safe-response generation for rejected input

use textguard_core::InputValidation;

/// Refusal shown to the user whenever input is rejected
pub const SAFE_RESPONSE: &str = "I apologize, but I cannot process your request due to security concerns. Please rephrase your question and try again.";

/// Map a rejected input to the user-facing refusal
///
/// The text never includes the rejected payload or the name of the check
/// that rejected it.
pub fn safe_response(_verdict: &InputValidation) -> &'static str {
    SAFE_RESPONSE
}
