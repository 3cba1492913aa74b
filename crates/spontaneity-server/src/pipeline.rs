//! Post-processing of engine output into a trusted recommendation.

use crate::config::FeatureFlags;
use serde_json::{json, Map, Value};
use spontaneity_domain::{generate_why_now, TrustMetadata, TrustPolicy, UserContext};
use spontaneity_gatekeeper::{
    apply_trust_policy, compute_trust_signals, moderate_recommendation, GatekeeperError,
    ModerationOutcome,
};
use tracing::{info, warn};
use uuid::Uuid;

/// A recommendation ready to be returned and audited
#[derive(Debug, Clone)]
pub struct FinalizedRecommendation {
    /// JSON object sent back to the client
    pub recommendation: Value,
    /// Identifier shared by the response and the audit event
    pub recommendation_id: Uuid,
    /// Trust metadata, absent when the trust layer is disabled
    pub metadata: Option<TrustMetadata>,
    /// True when moderation replaced the provider output
    pub replaced: bool,
}

/// Interpret provider text as a JSON object
///
/// Anything that is not a JSON object becomes `{"description": text}`.
pub fn parse_recommendation(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Value::Object(map),
        _ => json!({ "description": text.trim() }),
    }
}

/// Safe stand-in shown when provider output fails moderation
pub fn placeholder_recommendation(context: &UserContext) -> Value {
    json!({
        "title": "Take a spontaneous walk",
        "description": "Head out for a relaxed walk around your neighborhood and visit a park or cafe you have not tried yet.",
        "location": context.location.as_deref().unwrap_or("Nearby"),
        "duration": context.time_window.as_deref().unwrap_or("1 hour"),
        "category": "outdoors",
    })
}

/// Moderate, gate and annotate engine output
///
/// # Errors
///
/// Returns [`GatekeeperError::PolicyUnsatisfiable`] when neither the computed
/// signals nor the AI-only set satisfy `policy`.
pub fn finalize_recommendation(
    text: &str,
    user_input: &str,
    policy: &TrustPolicy,
    features: &FeatureFlags,
) -> Result<FinalizedRecommendation, GatekeeperError> {
    let recommendation_id = Uuid::new_v4();
    let mut recommendation = parse_recommendation(text);

    if !features.trust_layer {
        insert(&mut recommendation, "recommendation_id", json!(recommendation_id));
        return Ok(FinalizedRecommendation {
            recommendation,
            recommendation_id,
            metadata: None,
            replaced: false,
        });
    }

    let context = UserContext::parse(user_input);

    let mut replaced = false;
    if let ModerationOutcome::Rejected { reason, flags } =
        moderate_recommendation(&recommendation, &context)
    {
        warn!(
            reason = %reason,
            flags = ?flags,
            "Recommendation failed moderation, substituting placeholder"
        );
        recommendation = placeholder_recommendation(&context);
        replaced = true;
    }

    let computed = compute_trust_signals(&recommendation, &context);
    let decision = apply_trust_policy(computed.signals, computed.activity_timestamp, policy)?;
    if decision.fell_back {
        info!(
            policy = %policy.policy_id,
            rejected = ?computed.signals.active(),
            "Using AI-only trust signals"
        );
    }

    let why_now = generate_why_now(decision.metadata.signals(), &context);

    insert(&mut recommendation, "trust", json!(decision.metadata));
    insert(&mut recommendation, "recommendation_id", json!(recommendation_id));
    insert(&mut recommendation, "why_now", Value::String(why_now));

    Ok(FinalizedRecommendation {
        recommendation,
        recommendation_id,
        metadata: Some(decision.metadata),
        replaced,
    })
}

fn insert(recommendation: &mut Value, key: &str, value: Value) {
    if let Some(map) = recommendation.as_object_mut() {
        map.insert(key.to_string(), value);
    } else {
        let mut map = Map::new();
        map.insert(key.to_string(), value);
        *recommendation = Value::Object(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spontaneity_domain::{ConfidenceLevel, TrustBadge};

    const INPUT: &str = "Vibe: chill, Time: 2 hours, Location: Denver";

    #[test]
    fn test_parse_recommendation_object() {
        let value = parse_recommendation(r#"{"title":"Hike"}"#);
        assert_eq!(value["title"], "Hike");
    }

    #[test]
    fn test_parse_recommendation_wraps_plain_text() {
        let value = parse_recommendation("  Go visit the botanic gardens ");
        assert_eq!(value, json!({"description": "Go visit the botanic gardens"}));

        let value = parse_recommendation("[1, 2]");
        assert_eq!(value["description"], "[1, 2]");
    }

    #[test]
    fn test_finalize_adds_trust_fields() {
        let text = r#"{"title":"Coffee crawl","description":"Visit three local cafes and taste their espresso.","ugc_sources":["reddit"]}"#;
        let finalized =
            finalize_recommendation(text, INPUT, &TrustPolicy::default(), &FeatureFlags::default())
                .unwrap();

        let metadata = finalized.metadata.unwrap();
        assert_eq!(metadata.badge(), TrustBadge::CommunitySignal);
        assert_eq!(metadata.confidence_level(), ConfidenceLevel::High);
        assert!(!finalized.replaced);

        let value = &finalized.recommendation;
        assert_eq!(value["trust"]["badge"], "COMMUNITY_SIGNAL");
        assert_eq!(
            value["recommendation_id"],
            finalized.recommendation_id.to_string()
        );
        assert!(value["why_now"].as_str().unwrap().contains("community"));
    }

    #[test]
    fn test_finalize_replaces_unsafe_output() {
        let text = r#"{"title":"Meet up","description":"Come meet me alone at my place tonight."}"#;
        let finalized =
            finalize_recommendation(text, INPUT, &TrustPolicy::default(), &FeatureFlags::default())
                .unwrap();

        assert!(finalized.replaced);
        assert_eq!(finalized.recommendation["title"], "Take a spontaneous walk");
        assert_eq!(finalized.recommendation["location"], "Denver");
    }

    #[test]
    fn test_finalize_falls_back_to_ai_only() {
        let policy = TrustPolicy {
            allow_ugc: false,
            ..TrustPolicy::default()
        };
        let text = r#"{"title":"Food truck rally","description":"Grab lunch at the food truck rally downtown.","ugc_influenced":true}"#;

        let finalized =
            finalize_recommendation(text, "Location: Denver", &policy, &FeatureFlags::default())
                .unwrap();

        let metadata = finalized.metadata.unwrap();
        assert_eq!(metadata.badge(), TrustBadge::AiCurated);
        assert!(!metadata.signals().ugc_influenced);
    }

    #[test]
    fn test_finalize_policy_unsatisfiable() {
        let text = r#"{"title":"Gallery walk","description":"Explore the galleries in the arts district."}"#;
        let result = finalize_recommendation(
            text,
            INPUT,
            &TrustPolicy::strict(),
            &FeatureFlags::default(),
        );

        assert!(matches!(
            result,
            Err(GatekeeperError::PolicyUnsatisfiable { policy_id, .. }) if policy_id == "strict"
        ));
    }

    #[test]
    fn test_trust_layer_disabled() {
        let features = FeatureFlags {
            trust_layer: false,
            audit_logging: true,
        };
        let finalized =
            finalize_recommendation("plain text", INPUT, &TrustPolicy::strict(), &features).unwrap();

        assert!(finalized.metadata.is_none());
        assert!(finalized.recommendation.get("trust").is_none());
        assert!(finalized.recommendation.get("recommendation_id").is_some());
    }
}
