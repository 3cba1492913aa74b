//! Gatekeeper error types

use crate::PolicyViolation;
use thiserror::Error;

/// Errors that can occur during gatekeeper operations
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Neither the computed signals nor the AI-only fallback satisfy the policy
    #[error("Trust policy '{policy_id}' cannot be satisfied: {violation}")]
    PolicyUnsatisfiable {
        /// Policy that rejected the recommendation
        policy_id: String,
        /// Why the AI-only fallback was rejected
        violation: PolicyViolation,
    },
}
