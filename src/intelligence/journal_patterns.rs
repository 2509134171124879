// ABOUTME: Journal pattern detection - streaks, burnout signals, and trends over diary windows
// ABOUTME: Six stateless detectors; results are severity-sorted insights with charting data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::JournalEntry;

/// Sliding window length in entries
const WINDOW: usize = 7;

/// Minimum entries before any detector may fire
const MIN_ENTRIES: usize = 3;

/// Insight severity, ordered for sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightSeverity {
    /// Informational
    Low,
    /// Worth attention
    Medium,
    /// Needs action
    High,
}

/// What kind of pattern fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Three or more consecutive low-mood days
    NegativeMoodStreak,
    /// Multiple days combining stress, low energy, and low motivation
    BurnoutSignal,
    /// Monotonic-ish motivation decline ending low
    MotivationDrop,
    /// Repeated poor or short sleep
    SleepPattern,
    /// Repeated high-stress days
    StressPattern,
    /// Wellbeing trending up across the window
    PositiveTrend,
}

/// One detected journal insight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalInsight {
    /// Pattern kind
    pub kind: InsightKind,
    /// Severity tag
    pub severity: InsightSeverity,
    /// Short title
    pub title: String,
    /// Human-readable detail
    pub detail: String,
    /// First date of the contributing range
    pub period_start: NaiveDate,
    /// Last date of the contributing range
    pub period_end: NaiveDate,
    /// Contributing (date, value) points for charting
    pub data_points: Vec<(NaiveDate, f64)>,
}

/// Stateless journal pattern detector
pub struct JournalPatternDetector;

impl JournalPatternDetector {
    /// Run all six detectors over the last seven entries.
    ///
    /// Entries must be sorted by date ascending. Fewer than three entries is
    /// a silent no-op (empty result), never an error. Results are sorted
    /// HIGH to LOW.
    #[must_use]
    pub fn detect(entries: &[JournalEntry]) -> Vec<JournalInsight> {
        if entries.len() < MIN_ENTRIES {
            return Vec::new();
        }
        let window = &entries[entries.len().saturating_sub(WINDOW)..];

        let mut insights: Vec<JournalInsight> = [
            Self::negative_mood_streak(window),
            Self::burnout_signal(window),
            Self::motivation_drop(window),
            Self::sleep_pattern(window),
            Self::stress_pattern(window),
            Self::positive_trend(window),
        ]
        .into_iter()
        .flatten()
        .collect();

        insights.sort_by(|a, b| b.severity.cmp(&a.severity));
        insights
    }

    /// >=3 consecutive days with mood <= 2; severity by streak length
    fn negative_mood_streak(window: &[JournalEntry]) -> Option<JournalInsight> {
        let mut best: &[JournalEntry] = &[];
        let mut start = None;
        for (i, entry) in window.iter().enumerate() {
            if entry.mood <= 2 {
                if start.is_none() {
                    start = Some(i);
                }
                let s = start.unwrap_or(i);
                if i + 1 - s > best.len() {
                    best = &window[s..=i];
                }
            } else {
                start = None;
            }
        }
        if best.len() < 3 {
            return None;
        }
        let severity = if best.len() >= 5 {
            InsightSeverity::High
        } else {
            InsightSeverity::Medium
        };
        Some(JournalInsight {
            kind: InsightKind::NegativeMoodStreak,
            severity,
            title: format!("{}-day low mood streak", best.len()),
            detail: format!(
                "Mood has been at 2/5 or below for {} consecutive days.",
                best.len()
            ),
            period_start: best[0].date,
            period_end: best[best.len() - 1].date,
            data_points: best.iter().map(|e| (e.date, f64::from(e.mood))).collect(),
        })
    }

    /// >=3 of the last 7 days with >=2 of {stress>=4, energy<=2, motivation<=2}
    fn burnout_signal(window: &[JournalEntry]) -> Option<JournalInsight> {
        let flagged: Vec<&JournalEntry> = window
            .iter()
            .filter(|e| {
                let indicators = usize::from(e.stress >= 4)
                    + usize::from(e.energy <= 2)
                    + usize::from(e.motivation <= 2);
                indicators >= 2
            })
            .collect();
        if flagged.len() < 3 {
            return None;
        }
        let severity = if flagged.len() >= 5 {
            InsightSeverity::High
        } else {
            InsightSeverity::Medium
        };
        Some(JournalInsight {
            kind: InsightKind::BurnoutSignal,
            severity,
            title: "Possible burnout pattern".to_owned(),
            detail: format!(
                "{} of the last {} days combined high stress with low energy or motivation.",
                flagged.len(),
                window.len()
            ),
            period_start: flagged[0].date,
            period_end: flagged[flagged.len() - 1].date,
            data_points: flagged
                .iter()
                .map(|e| (e.date, f64::from(e.energy)))
                .collect(),
        })
    }

    /// Decline-count heuristic over >=5 entries, final motivation <= 2
    fn motivation_drop(window: &[JournalEntry]) -> Option<JournalInsight> {
        if window.len() < 5 {
            return None;
        }
        let last = window.last()?;
        if last.motivation > 2 {
            return None;
        }
        let declines = window
            .windows(2)
            .filter(|pair| pair[1].motivation < pair[0].motivation)
            .count();
        if declines < 3 {
            return None;
        }
        Some(JournalInsight {
            kind: InsightKind::MotivationDrop,
            severity: InsightSeverity::Medium,
            title: "Motivation sliding".to_owned(),
            detail: format!(
                "Motivation declined on {declines} of the last {} day-to-day steps and now sits at {}/5.",
                window.len() - 1,
                last.motivation
            ),
            period_start: window[0].date,
            period_end: last.date,
            data_points: window
                .iter()
                .map(|e| (e.date, f64::from(e.motivation)))
                .collect(),
        })
    }

    /// >=3 of 7 days with poor quality (<=2) or short (<6h) sleep
    fn sleep_pattern(window: &[JournalEntry]) -> Option<JournalInsight> {
        let poor: Vec<&JournalEntry> = window
            .iter()
            .filter(|e| e.sleep_quality <= 2 || e.sleep_hours < 6.0)
            .collect();
        if poor.len() < 3 {
            return None;
        }
        let severity = if poor.len() >= 5 {
            InsightSeverity::High
        } else {
            InsightSeverity::Medium
        };
        Some(JournalInsight {
            kind: InsightKind::SleepPattern,
            severity,
            title: "Sleep is suffering".to_owned(),
            detail: format!(
                "{} of the last {} nights were short or poor quality.",
                poor.len(),
                window.len()
            ),
            period_start: poor[0].date,
            period_end: poor[poor.len() - 1].date,
            data_points: poor.iter().map(|e| (e.date, e.sleep_hours)).collect(),
        })
    }

    /// >=4 of 7 days with stress >= 4
    fn stress_pattern(window: &[JournalEntry]) -> Option<JournalInsight> {
        let stressed: Vec<&JournalEntry> =
            window.iter().filter(|e| e.stress >= 4).collect();
        if stressed.len() < 4 {
            return None;
        }
        let severity = if stressed.len() >= 6 {
            InsightSeverity::High
        } else {
            InsightSeverity::Medium
        };
        Some(JournalInsight {
            kind: InsightKind::StressPattern,
            severity,
            title: "Sustained high stress".to_owned(),
            detail: format!(
                "Stress was 4/5 or higher on {} of the last {} days.",
                stressed.len(),
                window.len()
            ),
            period_start: stressed[0].date,
            period_end: stressed[stressed.len() - 1].date,
            data_points: stressed
                .iter()
                .map(|e| (e.date, f64::from(e.stress)))
                .collect(),
        })
    }

    /// Second-half wellbeing beats the first half by >0.5 and is >=3.5 absolute
    fn positive_trend(window: &[JournalEntry]) -> Option<JournalInsight> {
        if window.len() < 4 {
            return None;
        }
        let half = window.len() / 2;
        let first = Self::mean_wellbeing(&window[..half]);
        let second = Self::mean_wellbeing(&window[half..]);
        if second - first <= 0.5 || second < 3.5 {
            return None;
        }
        Some(JournalInsight {
            kind: InsightKind::PositiveTrend,
            severity: InsightSeverity::Low,
            title: "Trending up".to_owned(),
            detail: format!(
                "Average wellbeing rose from {first:.1} to {second:.1} across the window."
            ),
            period_start: window[0].date,
            period_end: window[window.len() - 1].date,
            data_points: window
                .iter()
                .map(|e| (e.date, Self::wellbeing(e)))
                .collect(),
        })
    }

    fn wellbeing(entry: &JournalEntry) -> f64 {
        f64::from(u16::from(entry.mood) + u16::from(entry.energy) + u16::from(entry.motivation))
            / 3.0
    }

    fn mean_wellbeing(entries: &[JournalEntry]) -> f64 {
        if entries.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = entries.len() as f64;
        entries.iter().map(Self::wellbeing).sum::<f64>() / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AiVisibility;
    use uuid::Uuid;

    fn entry(day: u32, mood: u8, energy: u8, motivation: u8, stress: u8) -> JournalEntry {
        JournalEntry {
            id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date"),
            mood,
            energy,
            sleep_quality: 3,
            sleep_hours: 7.5,
            soreness: 2,
            stress,
            motivation,
            note: None,
            visibility: AiVisibility::MetricsOnly,
        }
    }

    #[test]
    fn fewer_than_three_entries_is_silent() {
        let entries = vec![entry(1, 1, 1, 1, 5), entry(2, 1, 1, 1, 5)];
        assert!(JournalPatternDetector::detect(&entries).is_empty());
    }

    #[test]
    fn three_day_mood_streak_fires_medium() {
        let entries = vec![
            entry(1, 4, 3, 3, 2),
            entry(2, 2, 3, 3, 2),
            entry(3, 1, 3, 3, 2),
            entry(4, 2, 3, 3, 2),
        ];
        let insights = JournalPatternDetector::detect(&entries);
        let streak = insights
            .iter()
            .find(|i| i.kind == InsightKind::NegativeMoodStreak)
            .expect("streak detected");
        assert_eq!(streak.severity, InsightSeverity::Medium);
        assert_eq!(streak.data_points.len(), 3);
        assert_eq!(
            streak.period_start,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }

    #[test]
    fn burnout_needs_two_of_three_indicators_on_three_days() {
        let entries = vec![
            entry(1, 3, 2, 2, 4),
            entry(2, 3, 2, 2, 4),
            entry(3, 3, 3, 3, 2),
            entry(4, 3, 1, 2, 5),
        ];
        let insights = JournalPatternDetector::detect(&entries);
        assert!(insights.iter().any(|i| i.kind == InsightKind::BurnoutSignal));
    }

    #[test]
    fn results_sorted_high_to_low() {
        let entries: Vec<JournalEntry> = (1..=7)
            .map(|d| entry(d, 1, 1, 1, 5))
            .collect();
        let insights = JournalPatternDetector::detect(&entries);
        assert!(insights.len() >= 2);
        for pair in insights.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
        }
    }

    #[test]
    fn positive_trend_requires_absolute_level() {
        // Rising but still low: 1.x -> 3.0 average stays below 3.5.
        let entries = vec![
            entry(1, 1, 1, 1, 2),
            entry(2, 2, 1, 2, 2),
            entry(3, 2, 3, 3, 2),
            entry(4, 3, 3, 3, 2),
        ];
        let insights = JournalPatternDetector::detect(&entries);
        assert!(!insights.iter().any(|i| i.kind == InsightKind::PositiveTrend));
    }

    #[test]
    fn clear_positive_trend_fires_low_severity() {
        let entries = vec![
            entry(1, 3, 3, 3, 2),
            entry(2, 3, 3, 3, 2),
            entry(3, 4, 4, 4, 2),
            entry(4, 5, 5, 5, 1),
            entry(5, 5, 5, 5, 1),
        ];
        let insights = JournalPatternDetector::detect(&entries);
        let trend = insights
            .iter()
            .find(|i| i.kind == InsightKind::PositiveTrend)
            .expect("trend detected");
        assert_eq!(trend.severity, InsightSeverity::Low);
    }
}
