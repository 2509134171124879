// ABOUTME: Session intent model plus the narrow IntentResolver boundary
// ABOUTME: Keyword resolver is the reference implementation; the core never depends on how intents are derived
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::workout::Sport;
use crate::errors::{CoachError, Result};

/// A resolved request for one training session.
///
/// Sport and date are always present: the resolver defaults the date to
/// "today" and the sport to the athlete's primary sport when the message is
/// ambiguous but still actionable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIntent {
    /// Sport of the requested session
    pub sport: Sport,
    /// Athlete-local target date
    pub date: NaiveDate,
    /// Requested duration in minutes, when stated
    pub duration_min: Option<u32>,
    /// Requested distance in meters (swim-specific), when stated
    pub distance_m: Option<u32>,
    /// Replace an existing same-day/same-sport session
    pub replace_existing: bool,
    /// Create a separate session even if one exists that day
    pub separate_session: bool,
    /// Surface the session on the athlete's calendar
    pub add_to_calendar: bool,
    /// Strength sessions only: restrict to mobility work (pain/injury mentioned)
    pub mobility_only: bool,
}

impl SessionIntent {
    /// Default intent for a sport and date with no modifiers
    #[must_use]
    pub const fn new(sport: Sport, date: NaiveDate) -> Self {
        Self {
            sport,
            date,
            duration_min: None,
            distance_m: None,
            replace_existing: false,
            separate_session: false,
            add_to_calendar: false,
            mobility_only: false,
        }
    }
}

/// Context the resolver needs beyond the raw text
#[derive(Debug, Clone)]
pub struct IntentContext {
    /// Athlete's primary sport, the fallback when no sport keyword appears
    pub primary_sport: Sport,
    /// Athlete-local "today"
    pub today: NaiveDate,
}

/// Boundary between the fuzzy text-parsing layer and the deterministic core.
///
/// Returns `None` when the message carries no resolvable sport keyword and no
/// actionable verb; the caller must then fall back to a clarifying response
/// instead of generating a prescription.
pub trait IntentResolver: Send + Sync {
    /// Resolve free text into a session intent, or `None` if unresolvable
    fn resolve(&self, text: &str, context: &IntentContext) -> Option<SessionIntent>;

    /// Resolve free text, surfacing [`CoachError::UnresolvableIntent`] when
    /// the message carries no sport keyword and no actionable verb.
    ///
    /// For callers that must propagate an error instead of falling back to a
    /// clarifying response.
    fn resolve_required(&self, text: &str, context: &IntentContext) -> Result<SessionIntent> {
        self.resolve(text, context)
            .ok_or_else(|| CoachError::UnresolvableIntent {
                reason: "no sport keyword or actionable verb in the message".to_owned(),
            })
    }
}

/// Regex keyword reference resolver.
///
/// Deliberately simple: sport keywords, today/tomorrow, numeric duration and
/// distance capture, and modifier keywords. Production deployments may swap
/// in an LLM-backed resolver behind the same trait.
pub struct KeywordIntentResolver {
    duration_re: Regex,
    distance_re: Regex,
}

impl Default for KeywordIntentResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Action verbs that make an otherwise sport-less message actionable
const ACTION_VERBS: &[&str] = &[
    "train", "workout", "session", "plan", "schedule", "change", "replace", "update",
];

/// Keywords that flip strength sessions into mobility-only mode
const PAIN_KEYWORDS: &[&str] = &["pain", "hurt", "injury", "injured", "sore back", "tweaked"];

impl KeywordIntentResolver {
    /// Build the resolver, compiling its capture patterns once
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            // "60 min", "60-minute"; "1.5 h" is out of scope, whole minutes only
            duration_re: Regex::new(r"(\d{1,3})\s*(?:min|minute|minutes)\b")
                .expect("literal pattern"),
            // "2000m", "2000 m", "2000 meters"
            distance_re: Regex::new(r"(\d{3,5})\s*(?:m|meter|meters|metres)\b")
                .expect("literal pattern"),
        }
    }

    fn detect_sport(text: &str) -> Option<Sport> {
        if text.contains("swim") || text.contains("pool") {
            Some(Sport::Swim)
        } else if text.contains("run") || text.contains("jog") {
            Some(Sport::Run)
        } else if text.contains("bike") || text.contains("ride") || text.contains("cycl") {
            Some(Sport::Bike)
        } else if text.contains("strength") || text.contains("gym") || text.contains("lift")
            || text.contains("mobility")
        {
            Some(Sport::Strength)
        } else {
            None
        }
    }

    fn detect_date(text: &str, today: NaiveDate) -> NaiveDate {
        if text.contains("tomorrow") {
            today + Duration::days(1)
        } else {
            today
        }
    }
}

impl IntentResolver for KeywordIntentResolver {
    fn resolve(&self, text: &str, context: &IntentContext) -> Option<SessionIntent> {
        let lower = text.to_lowercase();

        let sport = Self::detect_sport(&lower);
        let has_verb = ACTION_VERBS.iter().any(|v| lower.contains(v));
        // No sport keyword and no actionable verb: not a workout request.
        if sport.is_none() && !has_verb {
            return None;
        }

        let mut intent = SessionIntent::new(
            sport.unwrap_or(context.primary_sport),
            Self::detect_date(&lower, context.today),
        );

        intent.duration_min = self
            .duration_re
            .captures(&lower)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());
        intent.distance_m = self
            .distance_re
            .captures(&lower)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());

        intent.replace_existing =
            lower.contains("change") || lower.contains("replace") || lower.contains("instead");
        intent.separate_session = lower.contains("another") || lower.contains("second session");
        intent.add_to_calendar = lower.contains("calendar");
        intent.mobility_only = PAIN_KEYWORDS.iter().any(|k| lower.contains(k));

        Some(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> IntentContext {
        IntentContext {
            primary_sport: Sport::Run,
            today: NaiveDate::from_ymd_opt(2025, 5, 12).expect("valid date"),
        }
    }

    #[test]
    fn resolves_swim_with_distance_and_tomorrow() {
        let resolver = KeywordIntentResolver::new();
        let intent = resolver
            .resolve("swim 2000m tomorrow", &context())
            .expect("resolvable");
        assert_eq!(intent.sport, Sport::Swim);
        assert_eq!(intent.distance_m, Some(2000));
        assert_eq!(intent.date, NaiveDate::from_ymd_opt(2025, 5, 13).unwrap());
    }

    #[test]
    fn defaults_to_primary_sport_on_bare_verb() {
        let resolver = KeywordIntentResolver::new();
        let intent = resolver
            .resolve("plan me a session for today", &context())
            .expect("actionable verb present");
        assert_eq!(intent.sport, Sport::Run);
        assert_eq!(intent.date, context().today);
    }

    #[test]
    fn unresolvable_without_sport_or_verb() {
        let resolver = KeywordIntentResolver::new();
        assert!(resolver.resolve("how are you doing", &context()).is_none());
    }

    #[test]
    fn required_resolution_surfaces_the_intent_error() {
        let resolver = KeywordIntentResolver::new();
        let err = resolver
            .resolve_required("how are you doing", &context())
            .unwrap_err();
        assert!(matches!(err, CoachError::UnresolvableIntent { .. }));
        assert!(err.to_string().contains("Could not resolve"));
    }

    #[test]
    fn pain_keywords_set_mobility_only() {
        let resolver = KeywordIntentResolver::new();
        let intent = resolver
            .resolve("gym today but my shoulder hurts", &context())
            .expect("resolvable");
        assert_eq!(intent.sport, Sport::Strength);
        assert!(intent.mobility_only);
    }
}
