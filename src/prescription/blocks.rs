// ABOUTME: Sport-specific block builders for run, bike, swim, and strength prescriptions
// ABOUTME: Swim builder partitions an exact requested distance; strength has a mobility-only mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use crate::models::{
    AthleteProfile, IntensityTarget, PrescriptionStep, Sport,
};

/// Fixed minimum swim cool-down in meters
const SWIM_COOLDOWN_MIN_M: u32 = 100;

/// Fraction of total swim distance assigned to the warm-up before pool rounding
const SWIM_WARMUP_FRACTION: f64 = 0.2;

/// Resolved session intensity after the low-readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionIntensity {
    /// Readiness or soreness called for backing off
    Easy,
    /// Normal aerobic/moderate session
    Moderate,
}

/// Output of a sport block builder
#[derive(Debug, Clone)]
pub struct SportBlocks {
    /// Warm-up steps
    pub warmup: Vec<PrescriptionStep>,
    /// Main-set steps
    pub main: Vec<PrescriptionStep>,
    /// Cool-down steps
    pub cooldown: Vec<PrescriptionStep>,
    /// Technique cues for the sport
    pub technique_cues: Vec<String>,
    /// Goal sentence for the session
    pub goal: String,
    /// Title for the session
    pub title: String,
    /// Total distance in meters, for distance-based sessions
    pub distance_m: Option<u32>,
}

/// Duration split across the three blocks, all in minutes
#[derive(Debug, Clone, Copy)]
pub struct DurationSplit {
    /// Warm-up minutes (>=5, 15% of total)
    pub warmup_min: u32,
    /// Main-set minutes (remainder, >=10)
    pub main_min: u32,
    /// Cool-down minutes (>=5, 10% of total)
    pub cooldown_min: u32,
}

/// Split an effective duration into warm-up / main / cool-down.
///
/// Warm-up is 15% (floor 5), cool-down 10% (floor 5), main is the remainder
/// with a floor of 10 minutes.
#[must_use]
pub fn split_duration(total_min: u32) -> DurationSplit {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let warmup = ((f64::from(total_min) * 0.15).round() as u32).max(5);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cooldown = ((f64::from(total_min) * 0.10).round() as u32).max(5);
    let main = total_min.saturating_sub(warmup + cooldown).max(10);
    DurationSplit {
        warmup_min: warmup,
        main_min: main,
        cooldown_min: cooldown,
    }
}

/// Main-set intensity target for an endurance session
fn endurance_target(
    sport: Sport,
    intensity: SessionIntensity,
    profile: &AthleteProfile,
) -> Vec<IntensityTarget> {
    let rpe = match intensity {
        SessionIntensity::Easy => IntensityTarget::Rpe { low: 3, high: 4 },
        SessionIntensity::Moderate => IntensityTarget::Rpe { low: 5, high: 6 },
    };
    let zone_number = match intensity {
        SessionIntensity::Easy => 2,
        SessionIntensity::Moderate => 3,
    };

    let mut targets = vec![rpe];
    if sport == Sport::Bike {
        if let Some(power) = &profile.power_zones {
            let (low, high) = power.zone(zone_number);
            targets.push(IntensityTarget::Power { low, high });
            return targets;
        }
    }
    if let Some(hr) = &profile.hr_zones {
        let (low, high) = hr.zone(zone_number);
        targets.push(IntensityTarget::HeartRate { low, high });
    }
    targets
}

/// Run and bike share the fixed endurance shape: three warm-up steps, one
/// targeted main step, two cool-down steps.
#[must_use]
pub fn build_endurance_blocks(
    sport: Sport,
    split: DurationSplit,
    intensity: SessionIntensity,
    profile: &AthleteProfile,
) -> SportBlocks {
    let verb = match sport {
        Sport::Run => "run",
        _ => "ride",
    };
    let drill = match sport {
        Sport::Run => "strides and leg swings",
        _ => "high-cadence spin-ups",
    };

    let wu_easy = split.warmup_min.saturating_sub(4).max(1);
    let warmup = vec![
        PrescriptionStep::timed(format!("Very easy {verb} to wake the legs up"), wu_easy),
        PrescriptionStep::timed(format!("Build to comfortable pace with {drill}"), 2),
        PrescriptionStep::timed("Two short pick-ups to session effort", 2),
    ];

    let targets = endurance_target(sport, intensity, profile);
    let mut main_step = PrescriptionStep::timed(
        match intensity {
            SessionIntensity::Easy => {
                format!("Steady easy {verb}, conversational throughout")
            }
            SessionIntensity::Moderate => {
                format!("Steady {verb} at moderate aerobic effort")
            }
        },
        split.main_min,
    );
    main_step.target = targets.first().cloned();
    let mut main = vec![main_step];
    // Secondary target (HR or power) rides on the same step when available.
    if let Some(secondary) = targets.get(1) {
        if let Some(step) = main.first_mut() {
            step.description = format!("{} ({secondary})", step.description);
        }
    }

    let cd_spin = split.cooldown_min.saturating_sub(3).max(1);
    let cooldown = vec![
        PrescriptionStep::timed(format!("Easy {verb} letting heart rate drop"), cd_spin),
        PrescriptionStep::timed("Walk or very light spin, shake out", 3),
    ];

    let (title, goal, cues) = match sport {
        Sport::Run => (
            match intensity {
                SessionIntensity::Easy => "Easy Run".to_owned(),
                SessionIntensity::Moderate => "Steady Run".to_owned(),
            },
            "Aerobic maintenance without digging a recovery hole".to_owned(),
            vec![
                "Tall posture, relaxed shoulders".to_owned(),
                "Quick, light steps rather than long strides".to_owned(),
            ],
        ),
        _ => (
            match intensity {
                SessionIntensity::Easy => "Easy Ride".to_owned(),
                SessionIntensity::Moderate => "Steady Ride".to_owned(),
            },
            "Aerobic ride building durability in the saddle".to_owned(),
            vec![
                "Keep cadence around 90 rpm".to_owned(),
                "Relax grip and drop the shoulders on climbs".to_owned(),
            ],
        ),
    };

    SportBlocks {
        warmup,
        main,
        cooldown,
        technique_cues: cues,
        goal,
        title,
        distance_m: None,
    }
}

/// Round down to a whole number of pool lengths, never below one length
fn round_to_pool(meters: u32, pool_length_m: u32) -> u32 {
    let pool = pool_length_m.max(1);
    ((meters / pool).max(1)) * pool
}

/// Partition a swim total into warm-up / main / cool-down distances that sum
/// exactly to `total_m`.
///
/// Warm-up is 20% rounded to the pool length, cool-down is at least 100 m
/// rounded to the pool length, and the main set absorbs the remainder so the
/// sum is exact by construction.
#[must_use]
pub fn partition_swim_distance(total_m: u32, pool_length_m: u32) -> (u32, u32, u32) {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let warmup_raw = (f64::from(total_m) * SWIM_WARMUP_FRACTION) as u32;
    let warmup = round_to_pool(warmup_raw.max(pool_length_m), pool_length_m).min(total_m / 2);
    let cooldown =
        round_to_pool(SWIM_COOLDOWN_MIN_M.max(pool_length_m), pool_length_m).min(total_m / 4);
    let main = total_m.saturating_sub(warmup + cooldown);
    (warmup, main, cooldown)
}

/// Default swim total for the athlete's level: band midpoint rounded to pool length
#[must_use]
pub fn default_swim_distance(profile: &AthleteProfile) -> u32 {
    let (low, high) = profile.swim_level.distance_band();
    round_to_pool((low + high) / 2, profile.pool_length_m)
}

/// Swim pace estimate in minutes per 100 m, used to derive session duration
const fn swim_pace_min_per_100m(intensity: SessionIntensity) -> f64 {
    match intensity {
        SessionIntensity::Easy => 2.2,
        SessionIntensity::Moderate => 1.9,
    }
}

/// Estimated duration of a swim session from its distance
#[must_use]
pub fn estimate_swim_duration(total_m: u32, intensity: SessionIntensity) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes =
        (f64::from(total_m) / 100.0 * swim_pace_min_per_100m(intensity)).round() as u32;
    minutes.max(15)
}

/// Build swim blocks on the total-distance model.
///
/// When `requested_m` is present it overrides the level band and the three
/// block distances sum to it exactly (load-bearing contract; the save path
/// refuses to persist on mismatch).
#[must_use]
pub fn build_swim_blocks(
    requested_m: Option<u32>,
    intensity: SessionIntensity,
    profile: &AthleteProfile,
) -> SportBlocks {
    let total = requested_m.unwrap_or_else(|| default_swim_distance(profile));
    let (wu_m, main_m, cd_m) = partition_swim_distance(total, profile.pool_length_m);

    let duration = estimate_swim_duration(total, intensity);
    let wu_min = estimate_swim_duration(wu_m, SessionIntensity::Easy).min(duration / 4);
    let cd_min = estimate_swim_duration(cd_m, SessionIntensity::Easy).min(duration / 6);
    let main_min = duration.saturating_sub(wu_min + cd_min).max(10);

    let warmup = vec![PrescriptionStep::timed(
        format!("{wu_m}m easy freestyle, mixing in backstroke every 4th length"),
        wu_min,
    )
    .with_distance(wu_m)
    .with_target(IntensityTarget::Rpe { low: 2, high: 3 })];

    let main_desc = match intensity {
        SessionIntensity::Easy => format!(
            "{main_m}m as relaxed continuous swim, broken into comfortable repeats"
        ),
        SessionIntensity::Moderate => format!(
            "{main_m}m as steady repeats with 15-20s rest, holding even pace"
        ),
    };
    let main = vec![PrescriptionStep::timed(main_desc, main_min)
        .with_distance(main_m)
        .with_target(match intensity {
            SessionIntensity::Easy => IntensityTarget::Rpe { low: 3, high: 4 },
            SessionIntensity::Moderate => IntensityTarget::Rpe { low: 5, high: 6 },
        })];

    let cooldown = vec![PrescriptionStep::timed(
        format!("{cd_m}m easy choice of stroke, long and smooth"),
        cd_min,
    )
    .with_distance(cd_m)
    .with_target(IntensityTarget::Rpe { low: 2, high: 2 })];

    SportBlocks {
        warmup,
        main,
        cooldown,
        technique_cues: vec![
            "Long exhale underwater, relaxed breathing rhythm".to_owned(),
            "High elbow catch, finish each stroke past the hip".to_owned(),
        ],
        goal: "Consistent technique under light aerobic load".to_owned(),
        title: format!("Swim {total}m"),
        distance_m: Some(total),
    }
}

/// Keywords that must never appear in mobility-only strength work
pub const COMPOUND_LIFT_KEYWORDS: &[&str] = &["squat", "deadlift", "barbell", "heavy"];

/// Build strength blocks keyed on the athlete's primary sport.
///
/// Mobility-only mode excludes loaded and compound movements, pins RPE to
/// 3-4, and retitles the session so the restriction is explicit.
#[must_use]
pub fn build_strength_blocks(
    split: DurationSplit,
    mobility_only: bool,
    profile: &AthleteProfile,
) -> SportBlocks {
    if mobility_only {
        return build_mobility_blocks(split, profile);
    }

    let (main_desc, cues, title) = match profile.primary_sport {
        Sport::Swim => (
            "Circuit: pull-aparts, single-arm rows, dead bugs, scapular push-ups - 3 rounds"
                .to_owned(),
            vec![
                "Control the shoulder blade through every rep".to_owned(),
                "Stop each set two reps short of failure".to_owned(),
            ],
            "Swimmer Strength".to_owned(),
        ),
        Sport::Run => (
            "Circuit: goblet squats, step-ups, calf raises, side planks - 3 rounds".to_owned(),
            vec![
                "Drive through the whole foot on step-ups".to_owned(),
                "Keep hips level during single-leg work".to_owned(),
            ],
            "Runner Strength".to_owned(),
        ),
        _ => (
            "Circuit: goblet squats, hip thrusts, single-leg deadlifts, planks - 3 rounds"
                .to_owned(),
            vec![
                "Brace before every rep".to_owned(),
                "Full hip extension at the top of each thrust".to_owned(),
            ],
            "Endurance Strength".to_owned(),
        ),
    };

    SportBlocks {
        warmup: vec![
            PrescriptionStep::timed("Light row or jog plus dynamic mobility flow", split.warmup_min),
        ],
        main: vec![PrescriptionStep::timed(main_desc, split.main_min)
            .with_target(IntensityTarget::Rpe { low: 6, high: 7 })],
        cooldown: vec![PrescriptionStep::timed(
            "Easy stretching for worked muscle groups",
            split.cooldown_min,
        )],
        technique_cues: cues,
        goal: "Durable strength supporting the primary sport".to_owned(),
        title,
        distance_m: None,
    }
}

/// Mobility-only variant: unloaded movement, RPE 3-4, explicit title
fn build_mobility_blocks(split: DurationSplit, profile: &AthleteProfile) -> SportBlocks {
    let focus = match profile.primary_sport {
        Sport::Swim => "shoulders and thoracic spine",
        Sport::Run => "hips, calves, and ankles",
        _ => "hips and lower back",
    };

    SportBlocks {
        warmup: vec![PrescriptionStep::timed(
            "Gentle walking and arm circles to raise temperature",
            split.warmup_min,
        )],
        main: vec![PrescriptionStep::timed(
            format!(
                "Unloaded mobility flow for {focus}: cat-cow, hip openers, band work, slow controlled ranges"
            ),
            split.main_min,
        )
        .with_target(IntensityTarget::Rpe { low: 3, high: 4 })],
        cooldown: vec![PrescriptionStep::timed(
            "Long-hold stretches and easy breathing work",
            split.cooldown_min,
        )],
        technique_cues: vec![
            "Nothing should hurt; back off any range that does".to_owned(),
            "Move slowly and breathe through each position".to_owned(),
        ],
        goal: "Restore range of motion without loading irritated tissue".to_owned(),
        title: "Mobility Only - Recovery Strength".to_owned(),
        distance_m: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn profile() -> AthleteProfile {
        AthleteProfile::new(Uuid::new_v4(), Sport::Run)
    }

    #[test]
    fn split_has_floors() {
        let split = split_duration(20);
        assert!(split.warmup_min >= 5);
        assert!(split.cooldown_min >= 5);
        assert!(split.main_min >= 10);
    }

    #[test]
    fn swim_partition_sums_exactly() {
        for total in [1500_u32, 2000, 2750, 3500, 5050] {
            let (wu, main, cd) = partition_swim_distance(total, 25);
            assert_eq!(wu + main + cd, total, "partition must sum to {total}");
        }
    }

    #[test]
    fn swim_cooldown_at_least_100m_when_room() {
        let (_, _, cd) = partition_swim_distance(3500, 25);
        assert!(cd >= 100);
    }

    #[test]
    fn requested_swim_distance_overrides_band_and_titles() {
        let blocks = build_swim_blocks(Some(3500), SessionIntensity::Moderate, &profile());
        assert_eq!(blocks.distance_m, Some(3500));
        assert_eq!(blocks.title, "Swim 3500m");
        let sum: u32 = blocks
            .warmup
            .iter()
            .chain(&blocks.main)
            .chain(&blocks.cooldown)
            .filter_map(|s| s.distance_m)
            .sum();
        assert_eq!(sum, 3500);
    }

    #[test]
    fn default_swim_distance_within_level_band() {
        let p = profile();
        let total = default_swim_distance(&p);
        let (low, high) = p.swim_level.distance_band();
        assert!(total >= low && total <= high);
    }

    #[test]
    fn mobility_only_has_no_compound_lifts_and_low_rpe() {
        let blocks = build_strength_blocks(split_duration(45), true, &profile());
        assert!(blocks.title.contains("Mobility"));
        for step in &blocks.main {
            let lower = step.description.to_lowercase();
            for keyword in COMPOUND_LIFT_KEYWORDS {
                assert!(!lower.contains(keyword), "found '{keyword}' in mobility work");
            }
            match &step.target {
                Some(IntensityTarget::Rpe { low, high }) => {
                    assert_eq!((*low, *high), (3, 4));
                }
                other => panic!("mobility main step needs an RPE target, got {other:?}"),
            }
        }
    }

    #[test]
    fn bike_prefers_power_over_hr_when_available() {
        let mut p = AthleteProfile::new(Uuid::new_v4(), Sport::Bike);
        p.power_zones = Some(crate::models::PowerZones {
            zones: [(100, 140), (140, 180), (180, 220), (220, 260), (260, 320)],
        });
        let blocks = build_endurance_blocks(
            Sport::Bike,
            split_duration(60),
            SessionIntensity::Moderate,
            &p,
        );
        let desc = &blocks.main[0].description;
        assert!(desc.contains('W'), "power band should appear: {desc}");
    }
}
