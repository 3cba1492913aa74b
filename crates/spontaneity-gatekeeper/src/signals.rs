//! Trust signal computation from a provider payload

use chrono::{DateTime, Utc};
use serde_json::Value;
use spontaneity_domain::{TrustSignals, UserContext};

/// Signals plus the activity time backing `recent_activity`, if known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedSignals {
    /// Trust signals for the recommendation
    pub signals: TrustSignals,
    /// Time of the most recent activity, used by the recency check
    pub activity_timestamp: Option<DateTime<Utc>>,
}

/// Derive trust signals for engine output
///
/// - `ai_generated`: always set
/// - `ugc_influenced`: `ugc_influenced: true` or a non-empty `ugc_sources` array
/// - `recent_activity`: a parseable RFC 3339 `activity_timestamp` or `recent_activity: true`
/// - `context_verified`: the request named both a location and a time window
pub fn compute_trust_signals(recommendation: &Value, context: &UserContext) -> ComputedSignals {
    let flag = |name: &str| recommendation.get(name).and_then(Value::as_bool).unwrap_or(false);

    let ugc_influenced = flag("ugc_influenced")
        || recommendation
            .get("ugc_sources")
            .and_then(Value::as_array)
            .is_some_and(|sources| !sources.is_empty());

    let activity_timestamp = recommendation
        .get("activity_timestamp")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc));

    ComputedSignals {
        signals: TrustSignals {
            ai_generated: true,
            ugc_influenced,
            recent_activity: activity_timestamp.is_some() || flag("recent_activity"),
            context_verified: context.is_verifiable(),
        },
        activity_timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_model_output() {
        let computed = compute_trust_signals(&json!({ "title": "Hike" }), &UserContext::default());
        assert_eq!(computed.signals, TrustSignals::ai_only());
        assert!(computed.activity_timestamp.is_none());
    }

    #[test]
    fn test_ugc_sources() {
        let rec = json!({ "ugc_sources": ["r/denver"] });
        assert!(compute_trust_signals(&rec, &UserContext::default()).signals.ugc_influenced);

        let empty = json!({ "ugc_sources": [] });
        assert!(!compute_trust_signals(&empty, &UserContext::default()).signals.ugc_influenced);
    }

    #[test]
    fn test_activity_timestamp() {
        let rec = json!({ "activity_timestamp": "2025-06-01T18:30:00Z" });
        let computed = compute_trust_signals(&rec, &UserContext::default());
        assert!(computed.signals.recent_activity);
        assert_eq!(
            computed.activity_timestamp.map(|ts| ts.to_rfc3339()),
            Some("2025-06-01T18:30:00+00:00".to_string())
        );
    }

    #[test]
    fn test_unparseable_timestamp_ignored() {
        let rec = json!({ "activity_timestamp": "yesterday" });
        let computed = compute_trust_signals(&rec, &UserContext::default());
        assert!(!computed.signals.recent_activity);
    }

    #[test]
    fn test_context_verified() {
        let context = UserContext::parse("Vibe: chill, Time: 2 hours, Location: Denver");
        assert!(compute_trust_signals(&json!({}), &context).signals.context_verified);

        let partial = UserContext::parse("Location: Denver");
        assert!(!compute_trust_signals(&json!({}), &partial).signals.context_verified);
    }
}
