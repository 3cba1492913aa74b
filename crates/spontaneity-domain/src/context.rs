//! Parsing of the free-text request context
//!
//! The demo UI sends inputs shaped like
//! `"Vibe: chill, Time: 2 hours, Location: Denver"`. Unknown segments are
//! kept attached to the preceding field so values like `"Denver, CO"`
//! survive the comma split.

use serde::Serialize;

/// Structured view of the user's request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserContext {
    /// Desired mood ("chill", "adventurous", ...)
    pub vibe: Option<String>,

    /// Available time window ("2 hours")
    pub time_window: Option<String>,

    /// Where the user is
    pub location: Option<String>,
}

#[derive(Clone, Copy)]
enum Field {
    Vibe,
    Time,
    Location,
}

impl UserContext {
    /// Parse `Key: value` segments separated by commas
    pub fn parse(input: &str) -> Self {
        let mut context = Self::default();
        let mut current: Option<Field> = None;

        for segment in input.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            if let Some((key, value)) = segment.split_once(':') {
                let field = match key.trim().to_lowercase().as_str() {
                    "vibe" | "mood" => Some(Field::Vibe),
                    "time" | "duration" => Some(Field::Time),
                    "location" | "where" | "city" => Some(Field::Location),
                    _ => None,
                };
                if let Some(field) = field {
                    let value = value.trim();
                    if !value.is_empty() {
                        *context.slot(field) = Some(value.to_string());
                    }
                    current = Some(field);
                    continue;
                }
            }

            if let Some(field) = current {
                if let Some(existing) = context.slot(field) {
                    existing.push_str(", ");
                    existing.push_str(segment);
                }
            }
        }

        context
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Vibe => &mut self.vibe,
            Field::Time => &mut self.time_window,
            Field::Location => &mut self.location,
        }
    }

    /// True when both a location and a time window were given
    pub fn is_verifiable(&self) -> bool {
        self.location.is_some() && self.time_window.is_some()
    }
}
