//! Moderation over a structured recommendation payload

use crate::{check_contextual_validity, mentions_location, pre_filter_content, FilterFlag};
use serde_json::Value;
use spontaneity_domain::UserContext;
use tracing::debug;

/// Fields whose text is moderated, in display order
const TEXT_FIELDS: &[&str] = &["title", "description", "location", "duration", "category"];

/// Result of moderating one recommendation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Safe to show
    Approved,
    /// Rejected; the caller substitutes a placeholder
    Rejected {
        /// Machine-readable reason
        reason: String,
        /// Pre-filter categories that matched, if any
        flags: Vec<FilterFlag>,
    },
}

impl ModerationOutcome {
    /// True when the recommendation may be shown
    pub fn is_approved(&self) -> bool {
        matches!(self, ModerationOutcome::Approved)
    }
}

/// Join the displayable text fields of a recommendation
pub fn recommendation_text(recommendation: &Value) -> String {
    TEXT_FIELDS
        .iter()
        .filter_map(|field| recommendation.get(*field).and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the pre-filter and the contextual validity check
pub fn moderate_recommendation(recommendation: &Value, context: &UserContext) -> ModerationOutcome {
    let text = recommendation_text(recommendation);

    let filtered = pre_filter_content(&text);
    if !filtered.passed {
        return ModerationOutcome::Rejected {
            reason: filtered.reason.unwrap_or_else(|| "filtered".to_string()),
            flags: filtered.flags,
        };
    }

    let validity = check_contextual_validity(&text);
    if let Some(reason) = validity.reason {
        return ModerationOutcome::Rejected {
            reason: reason.to_string(),
            flags: Vec::new(),
        };
    }

    if !mentions_location(&text, context) {
        debug!("Recommendation does not mention the requested location");
    }

    ModerationOutcome::Approved
}
