//! Partner trust policies
//!
//! A policy carries an explicit `policy_id` that is recorded in the audit
//! log, so the applied policy never has to be inferred from its values.

use crate::ConfidenceLevel;
use serde::{Deserialize, Serialize};

/// Identifier of the built-in policy
pub const DEFAULT_POLICY_ID: &str = "default";

/// Identifier given to partner policies that do not name themselves
pub const CUSTOM_POLICY_ID: &str = "custom";

/// Partner-supplied thresholds gating which recommendations are surfaced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustPolicy {
    /// Label recorded as `policy_applied` in the audit log
    #[serde(default = "default_custom_id")]
    pub policy_id: String,

    /// Whether UGC-influenced recommendations may be shown
    pub allow_ugc: bool,

    /// Maximum age (hours) of the activity behind a `recent_activity` signal
    pub min_activity_recency_hours: u32,

    /// Whether the request context must be verified
    pub require_verified_context: bool,

    /// Lowest acceptable confidence level
    pub confidence_floor: ConfidenceLevel,
}

fn default_custom_id() -> String {
    CUSTOM_POLICY_ID.to_string()
}

impl Default for TrustPolicy {
    /// Lenient built-in policy
    ///
    /// - UGC allowed
    /// - Activity must be within 24 hours
    /// - No verified context required
    /// - Low confidence floor
    fn default() -> Self {
        Self {
            policy_id: DEFAULT_POLICY_ID.to_string(),
            allow_ugc: true,
            min_activity_recency_hours: 24,
            require_verified_context: false,
            confidence_floor: ConfidenceLevel::Low,
        }
    }
}

impl TrustPolicy {
    /// Strict policy: no UGC, verified context, high confidence
    pub fn strict() -> Self {
        Self {
            policy_id: "strict".to_string(),
            allow_ugc: false,
            min_activity_recency_hours: 6,
            require_verified_context: true,
            confidence_floor: ConfidenceLevel::High,
        }
    }
}
