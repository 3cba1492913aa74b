//! Trust policy gate
//!
//! Four checks run in order and stop at the first failure:
//! 1. UGC allowed
//! 2. Activity recency (skipped when no activity timestamp is known)
//! 3. Verified context
//! 4. Confidence floor

use crate::GatekeeperError;
use chrono::{DateTime, Utc};
use spontaneity_domain::{ConfidenceLevel, TrustMetadata, TrustPolicy, TrustSignals};
use std::fmt;
use tracing::warn;

/// First policy check a recommendation failed
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyViolation {
    /// Policy forbids UGC-influenced recommendations
    UgcNotAllowed,

    /// Backing activity is older than the policy allows
    ActivityTooOld {
        /// Hours since the activity
        hours_elapsed: f64,
        /// Policy maximum
        max_hours: u32,
    },

    /// Policy requires verified context
    ContextNotVerified,

    /// Confidence is below the policy floor
    ConfidenceBelowFloor {
        /// Confidence of the recommendation
        actual: ConfidenceLevel,
        /// Policy floor
        floor: ConfidenceLevel,
    },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::UgcNotAllowed => write!(f, "UGC-influenced recommendations are not allowed"),
            PolicyViolation::ActivityTooOld {
                hours_elapsed,
                max_hours,
            } => write!(f, "activity is {:.1}h old (max {}h)", hours_elapsed, max_hours),
            PolicyViolation::ContextNotVerified => write!(f, "verified context is required"),
            PolicyViolation::ConfidenceBelowFloor { actual, floor } => {
                write!(f, "confidence {} is below floor {}", actual, floor)
            }
        }
    }
}

/// Check metadata against a policy at a given time
pub fn check_trust_policy_at(
    metadata: &TrustMetadata,
    policy: &TrustPolicy,
    activity_timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), PolicyViolation> {
    let signals = metadata.signals();

    if !policy.allow_ugc && signals.ugc_influenced {
        return Err(PolicyViolation::UgcNotAllowed);
    }

    if signals.recent_activity {
        if let Some(activity_at) = activity_timestamp {
            let hours_elapsed = (now - activity_at).num_seconds() as f64 / 3600.0;
            if hours_elapsed > f64::from(policy.min_activity_recency_hours) {
                return Err(PolicyViolation::ActivityTooOld {
                    hours_elapsed,
                    max_hours: policy.min_activity_recency_hours,
                });
            }
        }
    }

    if policy.require_verified_context && !signals.context_verified {
        return Err(PolicyViolation::ContextNotVerified);
    }

    if metadata.confidence_level().rank() < policy.confidence_floor.rank() {
        return Err(PolicyViolation::ConfidenceBelowFloor {
            actual: metadata.confidence_level(),
            floor: policy.confidence_floor,
        });
    }

    Ok(())
}

/// Check metadata against a policy now
pub fn check_trust_policy(
    metadata: &TrustMetadata,
    policy: &TrustPolicy,
    activity_timestamp: Option<DateTime<Utc>>,
) -> Result<(), PolicyViolation> {
    check_trust_policy_at(metadata, policy, activity_timestamp, Utc::now())
}

/// Boolean form of [`check_trust_policy_at`]
pub fn validate_trust_policy_at(
    metadata: &TrustMetadata,
    policy: &TrustPolicy,
    activity_timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    check_trust_policy_at(metadata, policy, activity_timestamp, now).is_ok()
}

/// Boolean form of [`check_trust_policy`]
pub fn validate_trust_policy(
    metadata: &TrustMetadata,
    policy: &TrustPolicy,
    activity_timestamp: Option<DateTime<Utc>>,
) -> bool {
    check_trust_policy(metadata, policy, activity_timestamp).is_ok()
}

/// Trust metadata that passed the gate
#[derive(Debug, Clone, PartialEq)]
pub struct TrustDecision {
    /// Metadata to attach to the recommendation
    pub metadata: TrustMetadata,
    /// True when the computed signals failed and the AI-only set was used
    pub fell_back: bool,
}

/// Gate computed signals, retrying once with the AI-only signal set
///
/// # Errors
///
/// Returns [`GatekeeperError::PolicyUnsatisfiable`] when the AI-only set fails too.
pub fn apply_trust_policy(
    signals: TrustSignals,
    activity_timestamp: Option<DateTime<Utc>>,
    policy: &TrustPolicy,
) -> Result<TrustDecision, GatekeeperError> {
    let metadata = TrustMetadata::from_signals(signals);
    let violation = match check_trust_policy(&metadata, policy, activity_timestamp) {
        Ok(()) => {
            return Ok(TrustDecision {
                metadata,
                fell_back: false,
            })
        }
        Err(violation) => violation,
    };

    warn!(
        policy = %policy.policy_id,
        violation = %violation,
        "Computed signals failed trust policy, retrying with AI-only signals"
    );

    let fallback = TrustMetadata::from_signals(TrustSignals::ai_only());
    match check_trust_policy(&fallback, policy, None) {
        Ok(()) => Ok(TrustDecision {
            metadata: fallback,
            fell_back: true,
        }),
        Err(violation) => Err(GatekeeperError::PolicyUnsatisfiable {
            policy_id: policy.policy_id.clone(),
            violation,
        }),
    }
}
