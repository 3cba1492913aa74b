//! Audit log records
//!
//! Events are append-only and carry no PII: the user's input is present
//! only as a one-way hash.

use crate::{ConfidenceLevel, TrustBadge, TrustSignals};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Page size used when the caller does not give one
pub const DEFAULT_AUDIT_LIMIT: usize = 100;

/// Largest page size a caller may request
pub const MAX_AUDIT_LIMIT: usize = 1000;

/// Compliance record of one recommendation decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEvent {
    /// Identifier returned to the client with the recommendation
    pub recommendation_id: Uuid,

    /// SHA-256 hex digest of the normalized user input
    pub input_context_hash: String,

    /// Badge shown with the recommendation
    pub trust_badge: TrustBadge,

    /// `policy_id` of the policy the recommendation passed
    pub policy_applied: String,

    /// When the decision was made
    pub generated_at: DateTime<Utc>,

    /// Adapter (provider/model) that produced the text
    pub model_version: String,

    /// Confidence level at decision time
    pub confidence_level: ConfidenceLevel,

    /// Signals the badge was resolved from
    pub signals_summary: TrustSignals,
}

/// Descending-time page request over an audit collection
#[derive(Debug, Clone, PartialEq)]
pub struct AuditQuery {
    /// Partner collection; `None` reads the default collection
    pub partner_id: Option<String>,

    /// Page size, already clamped to `1..=MAX_AUDIT_LIMIT`
    pub limit: usize,

    /// Only return events strictly older than this cursor
    pub start_after: Option<DateTime<Utc>>,
}

impl AuditQuery {
    /// Build a query, clamping the requested limit
    pub fn new(partner_id: Option<String>, limit: Option<usize>, start_after: Option<DateTime<Utc>>) -> Self {
        Self {
            partner_id,
            limit: clamp_limit(limit),
            start_after,
        }
    }
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// Apply the default and the upper bound to a requested page size
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_AUDIT_LIMIT).clamp(1, MAX_AUDIT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clamping() {
        assert_eq!(clamp_limit(None), DEFAULT_AUDIT_LIMIT);
        assert_eq!(clamp_limit(Some(5000)), MAX_AUDIT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(42)), 42);
    }

    #[test]
    fn test_event_serde_roundtrip() {
        let event = AuditLogEvent {
            recommendation_id: Uuid::new_v4(),
            input_context_hash: "ab".repeat(32),
            trust_badge: TrustBadge::VerifiedContext,
            policy_applied: "default".to_string(),
            generated_at: Utc::now(),
            model_version: "openai:gpt-4o-mini".to_string(),
            confidence_level: ConfidenceLevel::Medium,
            signals_summary: TrustSignals::ai_only(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"trust_badge\":\"VERIFIED_CONTEXT\""));
        let back: AuditLogEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
