// ABOUTME: Training guardrails - weekly load, ramp rate, and risk adjustments
// ABOUTME: All functions are total; missing history yields safe defaults, never errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{IntensityTag, PlannedWorkout};

/// Estimated TSS per minute when a session has no explicit TSS
const TSS_PER_MINUTE_ESTIMATE: f64 = 0.8;

/// Absolute weekly load below which a no-baseline week is safe
const NO_BASELINE_SAFE_LOAD: f64 = 200.0;

/// Absolute weekly load above which a no-baseline week is dangerous
const NO_BASELINE_DANGER_LOAD: f64 = 400.0;

/// Week-over-week ramp rate, with an explicit sentinel for a zero baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RampRate {
    /// Previous week's load was zero; no percentage is defined
    NoBaseline,
    /// Percentage change from the previous week
    Percent(f64),
}

/// Discrete ramp status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RampStatus {
    /// Within the ramp threshold
    Safe,
    /// Between 1x and 1.5x the threshold
    Warning,
    /// Above 1.5x the threshold
    Danger,
}

/// One recommended session adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailAdjustment {
    /// Date of the session being adjusted
    pub date: chrono::NaiveDate,
    /// Original planned duration in minutes
    pub original_duration_min: u32,
    /// Recommended duration after trimming
    pub adjusted_duration_min: u32,
    /// Original intensity tag
    pub original_intensity: IntensityTag,
    /// Recommended intensity after downgrading
    pub adjusted_intensity: IntensityTag,
    /// Why the adjustment is recommended
    pub reason: String,
}

/// Combined guardrail assessment for the upcoming week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailReport {
    /// Projected weekly load for the planned week
    pub weekly_load: f64,
    /// Week-over-week ramp rate
    pub ramp_rate: RampRate,
    /// Discrete ramp status
    pub ramp_status: RampStatus,
    /// Additive risk score, clamped to 0-100
    pub risk_score: u8,
    /// Human-readable warnings
    pub warnings: Vec<String>,
    /// Recommended adjustments, hardest sessions first
    pub adjustments: Vec<GuardrailAdjustment>,
}

/// Estimated load contribution of one session
fn session_load(workout: &PlannedWorkout) -> f64 {
    workout
        .tss
        .unwrap_or_else(|| f64::from(workout.duration_min) * TSS_PER_MINUTE_ESTIMATE)
}

/// Sum of session loads for a week of planned workouts.
///
/// TSS where present, else `round(duration x 0.8)`. Returns 0 for empty input.
#[must_use]
pub fn calculate_weekly_load(workouts: &[PlannedWorkout]) -> f64 {
    workouts
        .iter()
        .map(|w| w.tss.unwrap_or_else(|| (f64::from(w.duration_min) * TSS_PER_MINUTE_ESTIMATE).round()))
        .sum()
}

/// Week-over-week ramp rate; `NoBaseline` when the previous week was zero.
#[must_use]
pub fn calculate_ramp_rate(current: f64, previous: f64) -> RampRate {
    if previous <= 0.0 {
        RampRate::NoBaseline
    } else {
        RampRate::Percent((current - previous) / previous * 100.0)
    }
}

/// Discrete ramp status.
///
/// With a baseline: SAFE at or below the threshold, WARNING up to 1.5x,
/// DANGER beyond. Without one, status comes from absolute load magnitude so
/// new athletes are not assumed to be in danger.
#[must_use]
pub fn ramp_status(rate: RampRate, current_load: f64, threshold_pct: f64) -> RampStatus {
    match rate {
        RampRate::Percent(pct) => {
            if pct <= threshold_pct {
                RampStatus::Safe
            } else if pct <= threshold_pct * 1.5 {
                RampStatus::Warning
            } else {
                RampStatus::Danger
            }
        }
        RampRate::NoBaseline => {
            if current_load < NO_BASELINE_SAFE_LOAD {
                RampStatus::Safe
            } else if current_load <= NO_BASELINE_DANGER_LOAD {
                RampStatus::Warning
            } else {
                RampStatus::Danger
            }
        }
    }
}

/// Run the full guardrail check for the upcoming week.
///
/// Combines the ramp-rate check, a consecutive-hard-day scan over the
/// chronologically merged recent and planned sessions, and a
/// full-week-no-rest check. When the ramp threshold is exceeded, the hardest
/// planned sessions are greedily trimmed (and downgraded) until the projected
/// load returns to threshold, never below `min_session_minutes` per session.
#[must_use]
pub fn check_guardrails(
    planned_week: &[PlannedWorkout],
    previous_week_load: f64,
    recent: &[PlannedWorkout],
    threshold_pct: f64,
    min_session_minutes: u32,
) -> GuardrailReport {
    let weekly_load = calculate_weekly_load(planned_week);
    let ramp_rate = calculate_ramp_rate(weekly_load, previous_week_load);
    let status = ramp_status(ramp_rate, weekly_load, threshold_pct);

    let mut risk_score = 0u32;
    let mut warnings = Vec::new();

    match status {
        RampStatus::Safe => {}
        RampStatus::Warning => {
            risk_score += 20;
            warnings.push(match ramp_rate {
                RampRate::Percent(pct) => format!(
                    "Weekly load ramping {pct:.0}% over last week (threshold {threshold_pct:.0}%)"
                ),
                RampRate::NoBaseline => format!(
                    "No training history last week; planned load {weekly_load:.0} TSS is substantial"
                ),
            });
        }
        RampStatus::Danger => {
            risk_score += 40;
            warnings.push(match ramp_rate {
                RampRate::Percent(pct) => format!(
                    "Dangerous ramp: {pct:.0}% over last week (threshold {threshold_pct:.0}%)"
                ),
                RampRate::NoBaseline => format!(
                    "No training history last week; planned load {weekly_load:.0} TSS is very high"
                ),
            });
        }
    }

    if let Some(dates) = find_consecutive_hard_days(recent, planned_week) {
        risk_score += 25;
        warnings.push(format!(
            "Back-to-back hard sessions on {} and {}",
            dates.0, dates.1
        ));
    }

    if full_week_without_rest(planned_week) {
        risk_score += 20;
        warnings.push("No rest day planned this week".to_owned());
    }

    let adjustments = if matches!(status, RampStatus::Warning | RampStatus::Danger)
        && previous_week_load > 0.0
    {
        trim_to_threshold(
            planned_week,
            previous_week_load,
            threshold_pct,
            min_session_minutes,
        )
    } else {
        Vec::new()
    };

    if !adjustments.is_empty() {
        debug!(
            count = adjustments.len(),
            weekly_load, "guardrail trim recommended"
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    let risk_score = risk_score.min(100) as u8;

    GuardrailReport {
        weekly_load,
        ramp_rate,
        ramp_status: status,
        risk_score,
        warnings,
        adjustments,
    }
}

/// Scan merged recent+planned sessions for adjacent calendar days both hard.
///
/// Compares distinct hard days, not adjacent list entries, so a second easy
/// session on the same day cannot mask a back-to-back pair.
fn find_consecutive_hard_days(
    recent: &[PlannedWorkout],
    planned: &[PlannedWorkout],
) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let mut hard_days: Vec<chrono::NaiveDate> = recent
        .iter()
        .chain(planned.iter())
        .filter(|w| w.intensity.is_hard())
        .map(|w| w.date)
        .collect();
    hard_days.sort_unstable();
    hard_days.dedup();

    hard_days
        .windows(2)
        .find(|pair| pair[1] - pair[0] == Duration::days(1))
        .map(|pair| (pair[0], pair[1]))
}

/// Whether the planned week trains on seven distinct days with no rest
fn full_week_without_rest(planned: &[PlannedWorkout]) -> bool {
    let mut days: Vec<chrono::NaiveDate> = planned
        .iter()
        .filter(|w| !matches!(w.intensity, IntensityTag::Recovery) || w.duration_min > 0)
        .map(|w| w.date)
        .collect();
    days.sort_unstable();
    days.dedup();
    days.len() >= 7
}

/// Greedily trim the hardest sessions until projected load returns to threshold
fn trim_to_threshold(
    planned: &[PlannedWorkout],
    previous_week_load: f64,
    threshold_pct: f64,
    min_session_minutes: u32,
) -> Vec<GuardrailAdjustment> {
    let target_load = previous_week_load * (1.0 + threshold_pct / 100.0);
    let mut projected = calculate_weekly_load(planned);
    if projected <= target_load {
        return Vec::new();
    }

    // Hardest first: intensity rank, then duration.
    let mut order: Vec<&PlannedWorkout> = planned.iter().collect();
    order.sort_by(|a, b| {
        intensity_rank(b.intensity)
            .cmp(&intensity_rank(a.intensity))
            .then(b.duration_min.cmp(&a.duration_min))
    });

    let mut adjustments = Vec::new();
    for workout in order {
        if projected <= target_load {
            break;
        }
        let load = session_load(workout);
        let per_minute = if workout.duration_min > 0 {
            load / f64::from(workout.duration_min)
        } else {
            TSS_PER_MINUTE_ESTIMATE
        };

        let excess = projected - target_load;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let minutes_to_cut = (excess / per_minute).ceil() as u32;
        let adjusted_duration = workout
            .duration_min
            .saturating_sub(minutes_to_cut)
            .max(min_session_minutes)
            .min(workout.duration_min);
        let adjusted_intensity = downgrade(workout.intensity);

        let saved = f64::from(workout.duration_min - adjusted_duration) * per_minute;
        projected -= saved;

        if adjusted_duration < workout.duration_min || adjusted_intensity != workout.intensity {
            adjustments.push(GuardrailAdjustment {
                date: workout.date,
                original_duration_min: workout.duration_min,
                adjusted_duration_min: adjusted_duration,
                original_intensity: workout.intensity,
                adjusted_intensity,
                reason: format!(
                    "Weekly ramp above {threshold_pct:.0}% threshold; trimming hardest sessions"
                ),
            });
        }
    }
    adjustments
}

const fn intensity_rank(tag: IntensityTag) -> u8 {
    match tag {
        IntensityTag::Recovery => 0,
        IntensityTag::Easy => 1,
        IntensityTag::Moderate => 2,
        IntensityTag::Hard => 3,
    }
}

const fn downgrade(tag: IntensityTag) -> IntensityTag {
    match tag {
        IntensityTag::Hard => IntensityTag::Moderate,
        IntensityTag::Moderate => IntensityTag::Easy,
        IntensityTag::Easy | IntensityTag::Recovery => tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sport;
    use chrono::NaiveDate;

    fn workout(day: u32, duration: u32, intensity: IntensityTag) -> PlannedWorkout {
        PlannedWorkout {
            date: NaiveDate::from_ymd_opt(2025, 5, day).expect("valid date"),
            duration_min: duration,
            intensity,
            tss: None,
            sport: Sport::Run,
        }
    }

    #[test]
    fn weekly_load_empty_is_zero() {
        assert!((calculate_weekly_load(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weekly_load_prefers_tss_over_estimate() {
        let mut w = workout(1, 60, IntensityTag::Moderate);
        w.tss = Some(75.0);
        let estimated = workout(2, 60, IntensityTag::Moderate);
        // 75 + round(60 * 0.8) = 75 + 48
        assert!((calculate_weekly_load(&[w, estimated]) - 123.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ramp_rate_zero_baseline_is_sentinel_not_panic() {
        assert_eq!(calculate_ramp_rate(0.0, 0.0), RampRate::NoBaseline);
        assert_eq!(calculate_ramp_rate(300.0, 0.0), RampRate::NoBaseline);
    }

    #[test]
    fn no_baseline_status_uses_absolute_load() {
        assert_eq!(
            ramp_status(RampRate::NoBaseline, 150.0, 15.0),
            RampStatus::Safe
        );
        assert_eq!(
            ramp_status(RampRate::NoBaseline, 300.0, 15.0),
            RampStatus::Warning
        );
        assert_eq!(
            ramp_status(RampRate::NoBaseline, 450.0, 15.0),
            RampStatus::Danger
        );
    }

    #[test]
    fn ramp_status_threshold_bands() {
        assert_eq!(
            ramp_status(RampRate::Percent(15.0), 0.0, 15.0),
            RampStatus::Safe
        );
        assert_eq!(
            ramp_status(RampRate::Percent(20.0), 0.0, 15.0),
            RampStatus::Warning
        );
        assert_eq!(
            ramp_status(RampRate::Percent(30.0), 0.0, 15.0),
            RampStatus::Danger
        );
    }

    #[test]
    fn consecutive_hard_days_detected_across_recent_and_planned() {
        let recent = vec![workout(4, 60, IntensityTag::Hard)];
        let planned = vec![workout(5, 60, IntensityTag::Hard)];
        let report = check_guardrails(&planned, 500.0, &recent, 15.0, 20);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("Back-to-back hard")));
    }

    #[test]
    fn same_day_easy_session_does_not_mask_hard_pair() {
        // A hard day with a second easy session, then a hard day.
        let recent = vec![
            workout(4, 60, IntensityTag::Hard),
            workout(4, 30, IntensityTag::Easy),
        ];
        let planned = vec![workout(5, 60, IntensityTag::Hard)];
        let report = check_guardrails(&planned, 500.0, &recent, 15.0, 20);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("Back-to-back hard")));
    }

    #[test]
    fn trim_never_goes_below_twenty_minutes() {
        // Previous week 100, threshold 15% -> target 115. Planned 300+.
        let planned = vec![
            workout(1, 120, IntensityTag::Hard),
            workout(3, 120, IntensityTag::Hard),
            workout(5, 120, IntensityTag::Moderate),
        ];
        let report = check_guardrails(&planned, 100.0, &[], 15.0, 20);
        assert!(!report.adjustments.is_empty());
        for adj in &report.adjustments {
            assert!(adj.adjusted_duration_min >= 20);
        }
    }

    #[test]
    fn trim_floor_follows_configured_minimum() {
        let planned = vec![
            workout(1, 120, IntensityTag::Hard),
            workout(3, 120, IntensityTag::Hard),
        ];
        let report = check_guardrails(&planned, 100.0, &[], 15.0, 45);
        assert!(!report.adjustments.is_empty());
        for adj in &report.adjustments {
            assert!(adj.adjusted_duration_min >= 45);
        }
    }

    #[test]
    fn risk_score_clamped_to_100() {
        let planned: Vec<PlannedWorkout> = (1..=7)
            .map(|d| workout(d, 90, IntensityTag::Hard))
            .collect();
        let report = check_guardrails(&planned, 50.0, &[], 15.0, 20);
        assert!(report.risk_score <= 100);
        assert!(report.warnings.len() >= 2);
    }
}
