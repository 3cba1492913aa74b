//! Audit event assembly

use sha2::{Digest, Sha256};
use spontaneity_domain::{AuditLogEvent, TrustMetadata, TrustPolicy};
use uuid::Uuid;

/// SHA-256 hex digest of the trimmed, lowercased input
///
/// Normalization makes equivalent inputs hash identically.
pub fn hash_input_context(user_input: &str) -> String {
    let normalized = user_input.trim().to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Build the audit record for a recommendation decision
///
/// Only the hash of `user_input` is kept.
pub fn create_audit_log_event(
    user_input: &str,
    recommendation_id: Uuid,
    metadata: &TrustMetadata,
    policy: &TrustPolicy,
    model_version: &str,
) -> AuditLogEvent {
    AuditLogEvent {
        recommendation_id,
        input_context_hash: hash_input_context(user_input),
        trust_badge: metadata.badge(),
        policy_applied: policy.policy_id.clone(),
        generated_at: metadata.generated_at(),
        model_version: model_version.to_string(),
        confidence_level: metadata.confidence_level(),
        signals_summary: *metadata.signals(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spontaneity_domain::{ConfidenceLevel, TrustBadge, TrustSignals};

    #[test]
    fn test_hash_is_normalized() {
        assert_eq!(hash_input_context("Denver"), hash_input_context("  denver  "));
        assert_eq!(hash_input_context("DENVER\n"), hash_input_context("denver"));
        assert_ne!(hash_input_context("Denver"), hash_input_context("Boulder"));
    }

    #[test]
    fn test_hash_format() {
        let hash = hash_input_context("denver");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        // sha256("") is well known
        assert_eq!(
            hash_input_context("   "),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_event_carries_no_raw_input() {
        let input = "Vibe: chill, Time: 2 hours, Location: Denver";
        let metadata = TrustMetadata::from_signals(TrustSignals::ai_only());
        let id = Uuid::new_v4();
        let event = create_audit_log_event(input, id, &metadata, &TrustPolicy::default(), "mock");

        assert_eq!(event.recommendation_id, id);
        assert_eq!(event.trust_badge, TrustBadge::AiCurated);
        assert_eq!(event.confidence_level, ConfidenceLevel::Low);
        assert_eq!(event.policy_applied, "default");
        assert_eq!(event.model_version, "mock");
        assert_eq!(event.generated_at, metadata.generated_at());

        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.to_lowercase().contains("denver"));
    }
}
