//! Lexical content pre-filter
//!
//! Purely pattern based. The first matching category short-circuits.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Category of content the pre-filter rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterFlag {
    /// Looks like a street address
    StreetAddress,
    /// Hate or violence keywords
    HateViolence,
    /// Adult content keywords
    AdultContent,
    /// Explicit invitation to meet in person
    PersonalMeeting,
}

impl FilterFlag {
    /// snake_case name, matching the serde form
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterFlag::StreetAddress => "street_address",
            FilterFlag::HateViolence => "hate_violence",
            FilterFlag::AdultContent => "adult_content",
            FilterFlag::PersonalMeeting => "personal_meeting",
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            FilterFlag::StreetAddress => "Contains a specific street address",
            FilterFlag::HateViolence => "Contains hate or violence related content",
            FilterFlag::AdultContent => "Contains adult content",
            FilterFlag::PersonalMeeting => "Contains an invitation to meet in person",
        }
    }
}

/// Outcome of the pre-filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreFilterResult {
    /// True when no pattern matched
    pub passed: bool,
    /// Human-readable reason for the rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Categories that matched
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FilterFlag>,
}

impl PreFilterResult {
    fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
            flags: Vec::new(),
        }
    }

    fn reject(flag: FilterFlag) -> Self {
        Self {
            passed: false,
            reason: Some(flag.reason().to_string()),
            flags: vec![flag],
        }
    }
}

/// Patterns checked in order
static FILTER_PATTERNS: LazyLock<Vec<(Regex, FilterFlag)>> = LazyLock::new(|| {
    vec![
        // House number, a capitalised or ordinal street name, up to two more
        // words, then a street suffix
        (
            Regex::new(r"\b\d{1,5}\s+(?:[A-Z][A-Za-z.'-]*|\d+(?:st|nd|rd|th))(?:\s+[A-Za-z0-9.'-]+){0,2}?\s+(?i:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|court|ct|place|pl)\b\.?").unwrap(),
            FilterFlag::StreetAddress,
        ),
        (
            Regex::new(r"(?i)\b(?:kill|killing|murder|shoot|shooting|stab|stabbing|bomb|bombing|terrorist|terrorism|lynch|massacre|genocide|nazi)\b").unwrap(),
            FilterFlag::HateViolence,
        ),
        (
            Regex::new(r"(?i)\b(?:porn\w*|xxx|nsfw|nude|nudity|strip\s?club|escort|sexual|erotic)\b").unwrap(),
            FilterFlag::AdultContent,
        ),
        (
            Regex::new(r"(?i)\b(?:meet\s+(?:me|up\s+with\s+me)|come\s+(?:over\s+)?to\s+my\s+(?:place|house|apartment|room)|my\s+address\s+is|text\s+me\s+at|dm\s+me)\b").unwrap(),
            FilterFlag::PersonalMeeting,
        ),
    ]
});

/// Test text against the fixed pattern list
pub fn pre_filter_content(text: &str) -> PreFilterResult {
    FILTER_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, flag)| PreFilterResult::reject(*flag))
        .unwrap_or_else(PreFilterResult::pass)
}
