//! Contextual validity: is the text actually describing an activity?

use spontaneity_domain::UserContext;

/// Texts shorter than or equal to this many characters skip the keyword check
pub const MIN_ACTIVITY_CHECK_LEN: usize = 20;

/// Rejection reason for texts with no activity keyword
pub const NOT_ACTIVITY_BASED: &str = "not_activity_based";

/// Word prefixes that indicate an activity ("hik" matches hike, hiking, hikes)
const ACTIVITY_STEMS: &[&str] = &[
    "visit", "explor", "walk", "hik", "try", "enjoy", "grab", "check", "watch", "tour",
    "play", "relax", "eat", "drink", "coffee", "park", "museum", "trail", "market", "class",
    "show", "concert", "game", "bik", "swim", "danc", "cafe", "café", "restaurant", "bar",
    "galler", "festival", "garden", "beach", "lake", "climb", "paddl", "tast", "brew",
];

/// Outcome of the contextual validity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextCheck {
    /// True when the text looks like an activity
    pub passed: bool,
    /// Machine-readable reason when it does not
    pub reason: Option<&'static str>,
}

/// Require at least one activity word in texts longer than the threshold
pub fn check_contextual_validity(text: &str) -> ContextCheck {
    if text.chars().count() <= MIN_ACTIVITY_CHECK_LEN {
        return ContextCheck {
            passed: true,
            reason: None,
        };
    }

    let lowered = text.to_lowercase();
    let has_activity = lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| ACTIVITY_STEMS.iter().any(|stem| word.starts_with(*stem)));

    if has_activity {
        ContextCheck {
            passed: true,
            reason: None,
        }
    } else {
        ContextCheck {
            passed: false,
            reason: Some(NOT_ACTIVITY_BASED),
        }
    }
}

/// Whether the text mentions the user's location
///
/// Advisory only: callers log a miss but never reject on it. Returns true
/// when the user gave no location.
pub fn mentions_location(text: &str, context: &UserContext) -> bool {
    match context.location.as_deref() {
        Some(location) => {
            let lowered = text.to_lowercase();
            location
                .split(',')
                .map(|part| part.trim().to_lowercase())
                .filter(|part| !part.is_empty())
                .any(|part| lowered.contains(&part))
        }
        None => true,
    }
}
