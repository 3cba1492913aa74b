//! Trust signals attached to a generated recommendation

use serde::{Deserialize, Serialize};

/// Four independent facts about how a recommendation was produced
///
/// No derived state is stored here; badge and confidence are always
/// recomputed from these flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TrustSignals {
    /// Text was produced by a generative model
    pub ai_generated: bool,

    /// User-generated content influenced the recommendation
    pub ugc_influenced: bool,

    /// The venue or activity shows recent real-world activity
    pub recent_activity: bool,

    /// The request context (location + time) was verified
    pub context_verified: bool,
}

impl TrustSignals {
    /// Signal set for a recommendation backed only by the model
    ///
    /// Used as the fallback when the computed signals fail a partner policy.
    pub fn ai_only() -> Self {
        Self {
            ai_generated: true,
            ..Self::default()
        }
    }

    /// Names of the signals that are set, in declaration order
    pub fn active(&self) -> Vec<&'static str> {
        let flags = [
            ("ai_generated", self.ai_generated),
            ("ugc_influenced", self.ugc_influenced),
            ("recent_activity", self.recent_activity),
            ("context_verified", self.context_verified),
        ];

        flags
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| name)
            .collect()
    }
}
