//! Confidence scoring over trust signals
//!
//! Weights: `ai_generated` +1, `ugc_influenced` +2, `recent_activity` +1,
//! `context_verified` +1. Score ≥ 4 is high, ≥ 2 is medium, otherwise low.

use crate::TrustSignals;
use serde::{Deserialize, Serialize};

/// Score at or above which confidence is [`ConfidenceLevel::High`]
pub const HIGH_THRESHOLD: u8 = 4;

/// Score at or above which confidence is [`ConfidenceLevel::Medium`]
pub const MEDIUM_THRESHOLD: u8 = 2;

/// Bucketed confidence in a recommendation
///
/// Ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    /// Score below 2
    Low,
    /// Score 2 or 3
    Medium,
    /// Score 4 or more
    High,
}

impl ConfidenceLevel {
    /// Ordinal rank used by policy floors (low=0, medium=1, high=2)
    pub fn rank(&self) -> u8 {
        match self {
            ConfidenceLevel::Low => 0,
            ConfidenceLevel::Medium => 1,
            ConfidenceLevel::High => 2,
        }
    }

    /// Lowercase name, matching the serde form
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }

    /// Parse a level from its name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(ConfidenceLevel::Low),
            "medium" => Some(ConfidenceLevel::Medium),
            "high" => Some(ConfidenceLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted sum of the signals (community signal counts double)
pub fn confidence_score(signals: &TrustSignals) -> u8 {
    let mut score = 0;
    if signals.ai_generated {
        score += 1;
    }
    if signals.ugc_influenced {
        score += 2;
    }
    if signals.recent_activity {
        score += 1;
    }
    if signals.context_verified {
        score += 1;
    }
    score
}

/// Bucket the weighted score into a [`ConfidenceLevel`]
pub fn compute_confidence_level(signals: &TrustSignals) -> ConfidenceLevel {
    let score = confidence_score(signals);
    if score >= HIGH_THRESHOLD {
        ConfidenceLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_signals_high() {
        let signals = TrustSignals {
            ai_generated: true,
            ugc_influenced: true,
            recent_activity: true,
            context_verified: true,
        };
        assert_eq!(confidence_score(&signals), 5);
        assert_eq!(compute_confidence_level(&signals), ConfidenceLevel::High);
    }

    #[test]
    fn test_no_signals_low() {
        let signals = TrustSignals::default();
        assert_eq!(confidence_score(&signals), 0);
        assert_eq!(compute_confidence_level(&signals), ConfidenceLevel::Low);
    }

    #[test]
    fn test_ai_only_is_low() {
        assert_eq!(compute_confidence_level(&TrustSignals::ai_only()), ConfidenceLevel::Low);
    }

    #[test]
    fn test_ugc_counts_double() {
        let ugc = TrustSignals {
            ugc_influenced: true,
            ..TrustSignals::default()
        };
        assert_eq!(confidence_score(&ugc), 2);
        assert_eq!(compute_confidence_level(&ugc), ConfidenceLevel::Medium);

        let ai_recent_verified = TrustSignals {
            ai_generated: true,
            recent_activity: true,
            context_verified: true,
            ugc_influenced: false,
        };
        assert_eq!(confidence_score(&ai_recent_verified), 3);
        assert_eq!(compute_confidence_level(&ai_recent_verified), ConfidenceLevel::Medium);
    }

    #[test]
    fn test_boundary_four_is_high() {
        let signals = TrustSignals {
            ai_generated: true,
            ugc_influenced: true,
            recent_activity: true,
            context_verified: false,
        };
        assert_eq!(confidence_score(&signals), 4);
        assert_eq!(compute_confidence_level(&signals), ConfidenceLevel::High);
    }

    #[test]
    fn test_rank_ordering() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::Medium < ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::Low.rank(), 0);
        assert_eq!(ConfidenceLevel::High.rank(), 2);
        assert_eq!(ConfidenceLevel::parse("MEDIUM"), Some(ConfidenceLevel::Medium));
    }
}
