//! Opaque verification token generation
//!
//! The same generator backs email-verification tokens and uploaded file
//! names, so the output must stay file-name safe.

use uuid::Uuid;

/// Verification token generator
pub struct VerificationTokenGenerator;

impl VerificationTokenGenerator {
    /// Generate a statistically-unique opaque token (32 hex chars)
    pub fn generate() -> String {
        Uuid::new_v4().simple().to_string()
    }
}
