// ABOUTME: Monthly trait inference - promotes recurring short/mid-term patterns to long-term traits
// ABOUTME: Contradictions are detected over structured polarity tokens, not free-text matching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{MemoryRecord, MemoryType, SourceRefs};

/// Stable polarity token a candidate trait carries.
///
/// Contradiction detection matches these tokens against a fixed pair-list
/// instead of string-matching generated English, so reworded summaries
/// cannot silently defeat the check. Tokens serialize into trait summaries
/// as stable bracketed markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraitPolarity {
    /// Repeatedly trains through fatigue and rest recommendations
    PushesThroughFatigue,
    /// Honors rest and recovery recommendations
    RespectsRecovery,
    /// Fatigue accumulates quickly under load
    OverreachesEasily,
    /// Bounces back quickly from load
    RecoversWell,
    /// Mood and stress respond strongly to training load
    StressSensitive,
    /// Mood stays stable under load swings
    StressResilient,
}

/// Fixed contradiction pair-list; each pair is checked in both directions
const CONTRADICTION_PAIRS: &[(TraitPolarity, TraitPolarity)] = &[
    (
        TraitPolarity::PushesThroughFatigue,
        TraitPolarity::RespectsRecovery,
    ),
    (TraitPolarity::OverreachesEasily, TraitPolarity::RecoversWell),
    (TraitPolarity::StressSensitive, TraitPolarity::StressResilient),
];

impl TraitPolarity {
    /// Whether two polarities contradict each other
    #[must_use]
    pub fn contradicts(self, other: Self) -> bool {
        CONTRADICTION_PAIRS
            .iter()
            .any(|&(a, b)| (self == a && other == b) || (self == b && other == a))
    }

    /// Stable marker embedded in trait summaries so stored long-term records
    /// can be polarity-checked later
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::PushesThroughFatigue => "[pushes-through-fatigue]",
            Self::RespectsRecovery => "[respects-recovery]",
            Self::OverreachesEasily => "[overreaches-easily]",
            Self::RecoversWell => "[recovers-well]",
            Self::StressSensitive => "[stress-sensitive]",
            Self::StressResilient => "[stress-resilient]",
        }
    }

    /// Recover the polarity marker embedded in a stored summary
    #[must_use]
    pub fn from_summary(summary: &str) -> Option<Self> {
        [
            Self::PushesThroughFatigue,
            Self::RespectsRecovery,
            Self::OverreachesEasily,
            Self::RecoversWell,
            Self::StressSensitive,
            Self::StressResilient,
        ]
        .into_iter()
        .find(|p| summary.contains(p.marker()))
    }
}

/// A candidate long-term trait before the contradiction check and commit gate
#[derive(Debug, Clone)]
pub struct TraitCandidate {
    /// Type of the trait memory
    pub memory_type: MemoryType,
    /// Trait title
    pub title: String,
    /// Summary text, carrying the polarity marker
    pub summary: String,
    /// Polarity token for contradiction checking
    pub polarity: TraitPolarity,
    /// Number of contributing memories
    pub contributors: u32,
    /// Total data points across contributors
    pub data_points: u32,
    /// Merged source references from all contributors
    pub sources: SourceRefs,
    /// Contradictions found against existing long-term traits
    pub contradiction_count: u32,
}

/// Group current short/mid-term memories by type and infer trait candidates.
///
/// Only types with at least `min_contributors` contributing memories produce
/// a candidate; contradiction counts start at zero and are filled in by the
/// engine against the existing long-term records.
#[must_use]
pub fn infer_candidates(memories: &[MemoryRecord], min_contributors: usize) -> Vec<TraitCandidate> {
    let mut by_type: HashMap<MemoryType, Vec<&MemoryRecord>> = HashMap::new();
    for memory in memories {
        by_type.entry(memory.memory_type).or_default().push(memory);
    }

    let mut candidates: Vec<TraitCandidate> = by_type
        .into_iter()
        .filter(|(_, group)| group.len() >= min_contributors)
        .filter_map(|(memory_type, group)| candidate_for_type(memory_type, &group))
        .collect();
    // Deterministic output order for tests and logs.
    candidates.sort_by(|a, b| a.title.cmp(&b.title));
    candidates
}

/// Type-keyed heuristics over the contributing summaries
fn candidate_for_type(
    memory_type: MemoryType,
    group: &[&MemoryRecord],
) -> Option<TraitCandidate> {
    let (title, polarity, body) = match memory_type {
        MemoryType::OverridePattern => (
            "Tends to push through fatigue".to_owned(),
            TraitPolarity::PushesThroughFatigue,
            "Repeatedly overrode rest and recovery recommendations across multiple weeks."
                .to_owned(),
        ),
        MemoryType::FatigueResponse => {
            if group.iter().filter(|m| mentions_high_fatigue(&m.summary)).count() * 2
                > group.len()
            {
                (
                    "Fatigue accumulates quickly".to_owned(),
                    TraitPolarity::OverreachesEasily,
                    "Fatigue patterns recurred across most observed weeks; load tolerance appears limited.".to_owned(),
                )
            } else {
                (
                    "Recovers well from load".to_owned(),
                    TraitPolarity::RecoversWell,
                    "Fatigue observations were isolated; the athlete absorbs normal load without carryover.".to_owned(),
                )
            }
        }
        MemoryType::Psychological => {
            if group.iter().filter(|m| mentions_low_readiness(&m.summary)).count() * 2
                > group.len()
            {
                (
                    "Readiness is stress-sensitive".to_owned(),
                    TraitPolarity::StressSensitive,
                    "Low-readiness weeks recurred; mood and recovery respond strongly to load and life stress.".to_owned(),
                )
            } else {
                (
                    "Stable under training stress".to_owned(),
                    TraitPolarity::StressResilient,
                    "Readiness held steady across the observed weeks.".to_owned(),
                )
            }
        }
        // Preference, communication, and language patterns stay at the weekly
        // layer; they do not promote to long-term traits.
        MemoryType::Preference | MemoryType::Communication | MemoryType::LanguagePattern => {
            return None;
        }
    };

    let mut sources = SourceRefs::default();
    let mut data_points = 0;
    for memory in group {
        data_points += memory.data_points;
        sources
            .checkin_ids
            .extend(memory.sources.checkin_ids.iter().copied());
        sources
            .feedback_ids
            .extend(memory.sources.feedback_ids.iter().copied());
        sources
            .diary_ids
            .extend(memory.sources.diary_ids.iter().copied());
    }

    #[allow(clippy::cast_possible_truncation)]
    Some(TraitCandidate {
        memory_type,
        title,
        summary: format!("{body} {}", polarity.marker()),
        polarity,
        contributors: group.len() as u32,
        data_points,
        sources,
        contradiction_count: 0,
    })
}

fn mentions_high_fatigue(summary: &str) -> bool {
    summary.contains("high fatigue") || summary.contains("Elevated fatigue")
}

fn mentions_low_readiness(summary: &str) -> bool {
    summary.contains("Low readiness")
        || (summary.contains("readiness") && summary.contains("limited"))
}

/// Annotate a candidate that contradicts an existing long-term trait.
///
/// The contradiction count feeds the punitive confidence term; the summary
/// records the tension instead of silently overwriting history.
pub fn annotate_contradiction(candidate: &mut TraitCandidate, existing_title: &str) {
    candidate.contradiction_count += 1;
    candidate.summary.push_str(&format!(
        " Contradicts prior observation \"{existing_title}\"."
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemoryLayer, SourceRefs};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn memory(memory_type: MemoryType, summary: &str, data_points: u32) -> MemoryRecord {
        let now = Utc::now();
        MemoryRecord {
            id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            layer: MemoryLayer::ShortTerm,
            memory_type,
            title: "weekly".to_owned(),
            summary: summary.to_owned(),
            confidence: 60,
            data_points,
            sources: SourceRefs::default(),
            period_start: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2025, 5, 11).unwrap(),
            expires_at: MemoryLayer::ShortTerm.expiry_from(now),
            version: 1,
            superseded_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn three_override_weeks_promote_a_pushing_trait() {
        let memories = vec![
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
            memory(MemoryType::OverridePattern, "Overrode rest 3 times", 3),
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
        ];
        let candidates = infer_candidates(&memories, 3);
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.polarity, TraitPolarity::PushesThroughFatigue);
        assert_eq!(c.contributors, 3);
        assert_eq!(c.data_points, 7);
    }

    #[test]
    fn two_contributors_are_not_enough() {
        let memories = vec![
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
        ];
        assert!(infer_candidates(&memories, 3).is_empty());
    }

    #[test]
    fn contradiction_pairs_are_symmetric() {
        assert!(TraitPolarity::PushesThroughFatigue
            .contradicts(TraitPolarity::RespectsRecovery));
        assert!(TraitPolarity::RespectsRecovery
            .contradicts(TraitPolarity::PushesThroughFatigue));
        assert!(!TraitPolarity::PushesThroughFatigue.contradicts(TraitPolarity::RecoversWell));
    }

    #[test]
    fn polarity_round_trips_through_summary_marker() {
        let memories = vec![
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
        ];
        let candidate = &infer_candidates(&memories, 3)[0];
        assert_eq!(
            TraitPolarity::from_summary(&candidate.summary),
            Some(candidate.polarity)
        );
    }

    #[test]
    fn annotation_bumps_contradictions_and_marks_summary() {
        let memories = vec![
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
            memory(MemoryType::OverridePattern, "Overrode rest 2 times", 2),
        ];
        let mut candidate = infer_candidates(&memories, 3).remove(0);
        annotate_contradiction(&mut candidate, "Respects recovery");
        assert_eq!(candidate.contradiction_count, 1);
        assert!(candidate.summary.contains("Contradicts prior observation"));
    }
}
