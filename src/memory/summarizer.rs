// ABOUTME: Weekly pattern summarizers - readiness, override, language, and fatigue
// ABOUTME: Each returns None when nothing notable happened; None is never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use std::collections::HashMap;

use crate::models::{
    AiVisibility, CheckIn, FeedbackEntry, JournalEntry, MemoryType, SorenessLevel, SourceRefs,
};

/// Minimum occurrences before a feedback tag counts as a recurring theme
const TAG_FREQUENCY_THRESHOLD: usize = 2;

/// Minimum check-ins before readiness or fatigue patterns are judged
const MIN_CHECKINS: usize = 3;

/// A non-null summarizer result, ready to become a short-term memory
#[derive(Debug, Clone)]
pub struct SummarySeed {
    /// Type of the memory this seed produces
    pub memory_type: MemoryType,
    /// Short title
    pub title: String,
    /// Human-readable summary
    pub summary: String,
    /// Number of contributing data points
    pub data_points: u32,
    /// Weak back-references to the contributing records
    pub sources: SourceRefs,
}

/// Weekly window of AI-visible athlete data
#[derive(Debug, Clone, Copy)]
pub struct WeeklyWindow<'a> {
    /// Check-ins inside the window
    pub checkins: &'a [CheckIn],
    /// Feedback inside the window (visibility filtered here)
    pub feedback: &'a [FeedbackEntry],
    /// Diary entries inside the window (visibility filtered here)
    pub journal: &'a [JournalEntry],
}

/// Run all four summarizers over one weekly window
#[must_use]
pub fn summarize_week(window: &WeeklyWindow<'_>) -> Vec<SummarySeed> {
    [
        summarize_readiness(window.checkins),
        summarize_overrides(window.checkins),
        summarize_language(window.feedback),
        summarize_fatigue(window.checkins, window.journal),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn checkin_sources(checkins: &[&CheckIn]) -> SourceRefs {
    SourceRefs {
        checkin_ids: checkins.iter().map(|c| c.id).collect(),
        ..SourceRefs::default()
    }
}

/// Readiness pattern: notable weeks are consistently low or consistently
/// strong average readiness across at least three scored check-ins.
#[must_use]
pub fn summarize_readiness(checkins: &[CheckIn]) -> Option<SummarySeed> {
    let scored: Vec<&CheckIn> = checkins
        .iter()
        .filter(|c| c.readiness_score.is_some())
        .collect();
    if scored.len() < MIN_CHECKINS {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let average = scored
        .iter()
        .filter_map(|c| c.readiness_score)
        .map(f64::from)
        .sum::<f64>()
        / scored.len() as f64;

    let (title, summary) = if average < 50.0 {
        (
            "Low readiness week".to_owned(),
            format!(
                "Average readiness {average:.0}/100 across {} check-ins; recovery capacity was limited this week.",
                scored.len()
            ),
        )
    } else if average >= 75.0 {
        (
            "Strong readiness week".to_owned(),
            format!(
                "Average readiness {average:.0}/100 across {} check-ins; the athlete absorbed training well.",
                scored.len()
            ),
        )
    } else {
        return None;
    };

    #[allow(clippy::cast_possible_truncation)]
    Some(SummarySeed {
        memory_type: MemoryType::Psychological,
        title,
        summary,
        data_points: scored.len() as u32,
        sources: checkin_sources(&scored),
    })
}

/// Override pattern: the athlete explicitly rejecting rest-leaning decisions
#[must_use]
pub fn summarize_overrides(checkins: &[CheckIn]) -> Option<SummarySeed> {
    let overrides: Vec<&CheckIn> = checkins.iter().filter(|c| c.overrode_rest()).collect();
    if overrides.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(SummarySeed {
        memory_type: MemoryType::OverridePattern,
        title: "Overrode rest recommendations".to_owned(),
        summary: format!(
            "Overrode a rest or recovery recommendation {} times this week and trained anyway.",
            overrides.len()
        ),
        data_points: overrides.len() as u32,
        sources: checkin_sources(&overrides),
    })
}

/// Language pattern: semantic tags recurring across visible feedback
#[must_use]
pub fn summarize_language(feedback: &[FeedbackEntry]) -> Option<SummarySeed> {
    let visible: Vec<&FeedbackEntry> = feedback.iter().filter(|f| f.visible_to_ai).collect();
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for entry in &visible {
        for tag in &entry.tags {
            *frequency.entry(tag.as_str()).or_default() += 1;
        }
    }
    let mut recurring: Vec<(&str, usize)> = frequency
        .into_iter()
        .filter(|(_, count)| *count >= TAG_FREQUENCY_THRESHOLD)
        .collect();
    if recurring.is_empty() {
        return None;
    }
    recurring.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let themes = recurring
        .iter()
        .map(|(tag, count)| format!("{tag} ({count}x)"))
        .collect::<Vec<_>>()
        .join(", ");
    let contributing: Vec<&FeedbackEntry> = visible
        .into_iter()
        .filter(|f| f.tags.iter().any(|t| recurring.iter().any(|(tag, _)| t == tag)))
        .collect();

    #[allow(clippy::cast_possible_truncation)]
    Some(SummarySeed {
        memory_type: MemoryType::LanguagePattern,
        title: "Recurring feedback themes".to_owned(),
        summary: format!("Feedback this week kept returning to: {themes}."),
        data_points: contributing.len() as u32,
        sources: SourceRefs {
            feedback_ids: contributing.iter().map(|f| f.id).collect(),
            ..SourceRefs::default()
        },
    })
}

/// Fatigue pattern: repeated high fatigue or meaningful soreness across the
/// week, drawing on check-ins and engine-visible diary entries.
#[must_use]
pub fn summarize_fatigue(checkins: &[CheckIn], journal: &[JournalEntry]) -> Option<SummarySeed> {
    let fatigued: Vec<&CheckIn> = checkins
        .iter()
        .filter(|c| c.physical_fatigue >= 4 || c.soreness >= SorenessLevel::Moderate)
        .collect();
    let fatigued_diary: Vec<&JournalEntry> = journal
        .iter()
        .filter(|j| j.visibility != AiVisibility::Hidden && (j.soreness >= 4 || j.energy <= 2))
        .collect();

    let total = fatigued.len() + fatigued_diary.len();
    if total < MIN_CHECKINS {
        return None;
    }
    let mut sources = checkin_sources(&fatigued);
    sources.diary_ids = fatigued_diary.iter().map(|j| j.id).collect();

    #[allow(clippy::cast_possible_truncation)]
    Some(SummarySeed {
        memory_type: MemoryType::FatigueResponse,
        title: "Elevated fatigue week".to_owned(),
        summary: format!(
            "Reported high fatigue or notable soreness in {total} records this week ({} check-ins, {} diary entries).",
            fatigued.len(),
            fatigued_diary.len()
        ),
        data_points: total as u32,
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutDecision;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn checkin(readiness: u8, fatigue: u8, soreness: SorenessLevel) -> CheckIn {
        CheckIn {
            id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 5, 10).expect("valid date"),
            sleep_hours: 7.0,
            sleep_quality: 3,
            physical_fatigue: fatigue,
            mental_readiness: 3,
            motivation: 3,
            soreness,
            stress: 3,
            notes: None,
            readiness_score: Some(readiness),
            decision: None,
            confidence: None,
            locked: true,
            overridden: false,
            override_reason: None,
            created_at: Utc::now(),
        }
    }

    fn feedback(tags: &[&str], visible: bool) -> FeedbackEntry {
        FeedbackEntry {
            id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            created_at: Utc::now(),
            comment: "some comment".to_owned(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            visible_to_ai: visible,
        }
    }

    #[test]
    fn quiet_week_produces_no_seeds() {
        let checkins = vec![
            checkin(65, 2, SorenessLevel::None),
            checkin(68, 3, SorenessLevel::Mild),
            checkin(62, 2, SorenessLevel::None),
        ];
        let window = WeeklyWindow {
            checkins: &checkins,
            feedback: &[],
            journal: &[],
        };
        assert!(summarize_week(&window).is_empty());
    }

    #[test]
    fn low_readiness_week_is_summarized() {
        let checkins = vec![
            checkin(40, 2, SorenessLevel::None),
            checkin(45, 2, SorenessLevel::None),
            checkin(38, 2, SorenessLevel::None),
        ];
        let seed = summarize_readiness(&checkins).expect("notable");
        assert_eq!(seed.memory_type, MemoryType::Psychological);
        assert_eq!(seed.data_points, 3);
        assert_eq!(seed.sources.checkin_ids.len(), 3);
    }

    #[test]
    fn override_pattern_requires_rest_leaning_decision() {
        let mut a = checkin(25, 4, SorenessLevel::Moderate);
        a.decision = Some(WorkoutDecision::Rest);
        a.overridden = true;
        let mut b = checkin(35, 4, SorenessLevel::Mild);
        b.decision = Some(WorkoutDecision::SwapRecovery);
        b.overridden = true;
        // Overriding PROCEED is not an override pattern.
        let mut c = checkin(80, 1, SorenessLevel::None);
        c.decision = Some(WorkoutDecision::Proceed);
        c.overridden = true;

        let seed = summarize_overrides(&[a, b, c]).expect("two rest overrides");
        assert_eq!(seed.data_points, 2);
    }

    #[test]
    fn language_pattern_needs_frequency_two_and_visibility() {
        let entries = vec![
            feedback(&["too-hard"], true),
            feedback(&["too-hard", "loved-intervals"], true),
            feedback(&["too-hard"], false),
        ];
        let seed = summarize_language(&entries).expect("recurring tag");
        assert!(seed.summary.contains("too-hard (2x)"));
        assert!(!seed.summary.contains("loved-intervals"));
    }
}
