//! Spontaneity Gatekeeper
//!
//! Moderation and trust gating for generated recommendations.
//!
//! The Gatekeeper provides:
//! - Lexical content pre-filter (addresses, violence, adult content, meeting invitations)
//! - Contextual validity check (is this actually an activity?)
//! - Trust signal computation from the provider's payload
//! - Policy gate with the AI-only fallback
//!
//! Everything here is a pure function over its inputs.
//!
//! # Examples
//!
//! ```
//! use spontaneity_domain::{TrustPolicy, TrustSignals};
//! use spontaneity_gatekeeper::apply_trust_policy;
//!
//! let decision = apply_trust_policy(TrustSignals::ai_only(), None, &TrustPolicy::default()).unwrap();
//! assert!(!decision.fell_back);
//! ```

#![warn(missing_docs)]

mod context_check;
mod error;
mod moderation;
mod policy;
mod prefilter;
mod signals;

pub use context_check::{check_contextual_validity, mentions_location, ContextCheck, MIN_ACTIVITY_CHECK_LEN};
pub use error::GatekeeperError;
pub use moderation::{moderate_recommendation, recommendation_text, ModerationOutcome};
pub use policy::{
    apply_trust_policy, check_trust_policy, check_trust_policy_at, validate_trust_policy,
    validate_trust_policy_at, PolicyViolation, TrustDecision,
};
pub use prefilter::{pre_filter_content, FilterFlag, PreFilterResult};
pub use signals::{compute_trust_signals, ComputedSignals};
