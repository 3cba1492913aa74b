//! "Why now" explanation sentences
//!
//! Exactly one reason is given per recommendation, chosen by the same
//! priority order as the trust badge. Reasons are never combined.

use crate::{resolve_trust_badge, TrustBadge, TrustSignals, UserContext};

/// Build the single-reason explanation for a recommendation
pub fn generate_why_now(signals: &TrustSignals, context: &UserContext) -> String {
    let at_location = context
        .location
        .as_deref()
        .map(|loc| format!(" in {}", loc))
        .unwrap_or_default();
    let time = context.time_window.as_deref().unwrap_or("the next few hours");
    let vibe = context.vibe.as_deref().unwrap_or("spontaneous");

    match resolve_trust_badge(signals) {
        TrustBadge::CommunitySignal => {
            format!("Popular with the local community{} right now.", at_location)
        }
        TrustBadge::RecentlyActive => {
            format!("There has been recent activity here{}, so now is a good time to go.", at_location)
        }
        TrustBadge::VerifiedContext => {
            format!("Verified to fit your {} plans{} within {}.", vibe, at_location, time)
        }
        TrustBadge::AiCurated => {
            format!("Curated for a {} outing{} in {}.", vibe, at_location, time)
        }
    }
}
