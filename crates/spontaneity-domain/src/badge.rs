//! Trust badge resolution
//!
//! The badge is never chosen directly. It is always the result of
//! [`resolve_trust_badge`] over the recommendation's signals.

use crate::TrustSignals;
use serde::{Deserialize, Serialize};

/// Label summarizing why a recommendation is considered trustworthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustBadge {
    /// Influenced by community (user-generated) content
    CommunitySignal,

    /// Backed by recent real-world activity
    RecentlyActive,

    /// Request context was verified
    VerifiedContext,

    /// Model output with no further backing
    AiCurated,
}

impl TrustBadge {
    /// Wire representation, matching the serde form
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustBadge::CommunitySignal => "COMMUNITY_SIGNAL",
            TrustBadge::RecentlyActive => "RECENTLY_ACTIVE",
            TrustBadge::VerifiedContext => "VERIFIED_CONTEXT",
            TrustBadge::AiCurated => "AI_CURATED",
        }
    }

    /// Parse the wire representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COMMUNITY_SIGNAL" => Some(TrustBadge::CommunitySignal),
            "RECENTLY_ACTIVE" => Some(TrustBadge::RecentlyActive),
            "VERIFIED_CONTEXT" => Some(TrustBadge::VerifiedContext),
            "AI_CURATED" => Some(TrustBadge::AiCurated),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrustBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrustBadge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid trust badge: {}", s))
    }
}

/// Resolve the badge for a signal set
///
/// Evaluated top-down, first match wins:
/// 1. `ugc_influenced` → [`TrustBadge::CommunitySignal`]
/// 2. `recent_activity` → [`TrustBadge::RecentlyActive`]
/// 3. `context_verified` → [`TrustBadge::VerifiedContext`]
/// 4. otherwise → [`TrustBadge::AiCurated`]
pub fn resolve_trust_badge(signals: &TrustSignals) -> TrustBadge {
    if signals.ugc_influenced {
        TrustBadge::CommunitySignal
    } else if signals.recent_activity {
        TrustBadge::RecentlyActive
    } else if signals.context_verified {
        TrustBadge::VerifiedContext
    } else {
        TrustBadge::AiCurated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn signals(ai: bool, ugc: bool, recent: bool, verified: bool) -> TrustSignals {
        TrustSignals {
            ai_generated: ai,
            ugc_influenced: ugc,
            recent_activity: recent,
            context_verified: verified,
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(resolve_trust_badge(&signals(true, true, true, true)), TrustBadge::CommunitySignal);
        assert_eq!(resolve_trust_badge(&signals(true, false, true, true)), TrustBadge::RecentlyActive);
        assert_eq!(resolve_trust_badge(&signals(true, false, false, true)), TrustBadge::VerifiedContext);
        assert_eq!(resolve_trust_badge(&signals(true, false, false, false)), TrustBadge::AiCurated);
        assert_eq!(resolve_trust_badge(&signals(false, false, false, false)), TrustBadge::AiCurated);
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&TrustBadge::CommunitySignal).unwrap(),
            "\"COMMUNITY_SIGNAL\""
        );
        assert_eq!(TrustBadge::parse("AI_CURATED"), Some(TrustBadge::AiCurated));
        assert_eq!(TrustBadge::parse("ai_curated"), None);
        assert!("VERIFIED_CONTEXT".parse::<TrustBadge>().is_ok());
    }

    proptest! {
        #[test]
        fn ugc_always_wins(ai: bool, recent: bool, verified: bool) {
            let resolved = resolve_trust_badge(&signals(ai, true, recent, verified));
            prop_assert_eq!(resolved, TrustBadge::CommunitySignal);
        }

        #[test]
        fn ai_flag_never_changes_badge(ugc: bool, recent: bool, verified: bool) {
            prop_assert_eq!(
                resolve_trust_badge(&signals(true, ugc, recent, verified)),
                resolve_trust_badge(&signals(false, ugc, recent, verified))
            );
        }
    }
}
