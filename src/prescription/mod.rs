// ABOUTME: Prescription generation pipeline - intensity, split, sport dispatch, adaptation, guardrails
// ABOUTME: Stages run strictly in order; guardrail caps are the final authority on duration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

/// Sport-specific block builders
pub mod blocks;
/// Deterministic markdown rendering
pub mod markdown;
/// Beginner progression notes
pub mod progression;

use tracing::debug;

use crate::config::EngineConfig;
use crate::intelligence::guardrails::{check_guardrails, RampStatus};
use crate::intelligence::readiness::ReadinessAssessment;
use crate::intelligence::training_load::TrainingContext;
use crate::models::{
    AthleteProfile, CheckIn, IntensityTag, PlannedWorkout, SessionIntent, Sport, WhyContext,
    WorkoutDecision, WorkoutPrescription,
};

pub use blocks::{
    build_endurance_blocks, build_strength_blocks, build_swim_blocks, default_swim_distance,
    estimate_swim_duration, partition_swim_distance, split_duration, DurationSplit,
    SessionIntensity, SportBlocks, COMPOUND_LIFT_KEYWORDS,
};
pub use markdown::render_markdown;
pub use progression::{needs_progression_note, progression_note, ProgressionPhase};

/// Default session duration per sport when the intent does not state one
const fn default_duration_min(sport: Sport) -> u32 {
    match sport {
        Sport::Run => 45,
        Sport::Bike => 60,
        Sport::Swim => 45,
        Sport::Strength => 45,
    }
}

/// Readiness below which a session drops to easy intensity
const LOW_READINESS_SCORE: u8 = 50;

/// Soreness scale at or above which a session drops to easy intensity
const LOW_READINESS_SORENESS: u8 = 4;

/// Duration scale applied when the low-readiness predicate holds
const LOW_READINESS_DURATION_FACTOR: f64 = 0.75;

/// Duration band for recovery-swapped sessions, in minutes
const RECOVERY_DURATION_MIN: u32 = 30;
const RECOVERY_DURATION_MAX: u32 = 45;

/// Session duration at or above which fueling guidance is attached
const FUELING_DURATION_MIN: u32 = 75;

/// Everything the generator consumes for one session
#[derive(Debug, Clone)]
pub struct GenerationInputs<'a> {
    /// The resolved session intent
    pub intent: &'a SessionIntent,
    /// Athlete profile
    pub profile: &'a AthleteProfile,
    /// Today's check-in, when one exists
    pub checkin: Option<&'a CheckIn>,
    /// Readiness assessment for today, when a check-in exists
    pub readiness: Option<&'a ReadinessAssessment>,
    /// Training load context
    pub training: &'a TrainingContext,
    /// Already-planned sessions for the target week (excluding this one)
    pub planned_week: &'a [PlannedWorkout],
    /// Previous week's realized load
    pub previous_week_load: f64,
    /// Recent realized sessions, for consecutive-hard-day scanning
    pub recent_workouts: &'a [PlannedWorkout],
    /// Historical session count for the intent's sport
    pub historical_sport_sessions: u32,
}

/// Stateless, configurable prescription generator
pub struct PrescriptionGenerator {
    config: EngineConfig,
}

impl Default for PrescriptionGenerator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PrescriptionGenerator {
    /// Create a generator with the given thresholds
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Generate a full prescription.
    ///
    /// Pipeline order is load-bearing: intensity resolution, duration split,
    /// sport dispatch, readiness adaptation, then guardrail validation last
    /// so its caps are final.
    #[must_use]
    pub fn generate(&self, inputs: &GenerationInputs<'_>) -> WorkoutPrescription {
        let readiness_score = inputs
            .readiness
            .map(|r| r.score)
            .or_else(|| inputs.checkin.and_then(|c| c.readiness_score))
            .unwrap_or(70);
        let soreness = inputs
            .checkin
            .map_or(1, |c| c.soreness.as_scale());
        let sleep_quality = inputs.checkin.map_or(3, |c| c.sleep_quality);
        let decision = inputs.readiness.map(|r| r.decision);

        // Stage 1: intensity resolution.
        let low_readiness =
            readiness_score < LOW_READINESS_SCORE || soreness >= LOW_READINESS_SORENESS;
        let intensity = if low_readiness {
            SessionIntensity::Easy
        } else {
            SessionIntensity::Moderate
        };

        let mut prescription = if inputs.intent.sport == Sport::Swim {
            self.build_swim(inputs, intensity, low_readiness)
        } else {
            self.build_timed(inputs, intensity, low_readiness)
        };
        prescription.confidence = inputs.readiness.map(|r| r.confidence);

        // Recovery swap from the readiness decision: recovery flavor,
        // duration pinned into the 30-45 minute band.
        let swapped = matches!(
            decision,
            Some(WorkoutDecision::SwapRecovery | WorkoutDecision::Rest)
        );
        if swapped {
            Self::swap_to_recovery(&mut prescription, readiness_score, soreness);
        }

        // Stage 4: second-pass readiness/soreness/sleep adaptation.
        Self::apply_readiness_adaptation(
            &mut prescription,
            readiness_score,
            soreness,
            sleep_quality,
        );

        // The adaptation factor must not push a swapped session below the
        // recovery band. Guardrail caps still may.
        if swapped && prescription.duration_min < RECOVERY_DURATION_MIN {
            Self::rescale_durations(&mut prescription, RECOVERY_DURATION_MIN);
        }

        // Stage 5: guardrails run last; their cap is the final authority.
        self.validate_guardrails(&mut prescription, inputs, intensity);

        // Stage 6: beginner progression note.
        if needs_progression_note(inputs.historical_sport_sessions, inputs.profile.experience) {
            prescription.progression_note = Some(progression_note(
                inputs.intent.sport,
                inputs.historical_sport_sessions,
            ));
        }

        debug!(
            sport = %prescription.sport,
            duration_min = prescription.duration_min,
            readiness = readiness_score,
            "prescription generated"
        );
        prescription
    }

    fn base_duration(&self, inputs: &GenerationInputs<'_>, low_readiness: bool) -> u32 {
        let base = inputs
            .intent
            .duration_min
            .unwrap_or_else(|| default_duration_min(inputs.intent.sport));
        if low_readiness {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let scaled = (f64::from(base) * LOW_READINESS_DURATION_FACTOR).round() as u32;
            scaled.max(self.config.min_session_minutes)
        } else {
            base
        }
    }

    fn build_timed(
        &self,
        inputs: &GenerationInputs<'_>,
        intensity: SessionIntensity,
        low_readiness: bool,
    ) -> WorkoutPrescription {
        let duration = self.base_duration(inputs, low_readiness);
        let split = split_duration(duration);

        let blocks = match inputs.intent.sport {
            Sport::Strength => build_strength_blocks(
                split,
                inputs.intent.mobility_only,
                inputs.profile,
            ),
            sport => build_endurance_blocks(sport, split, intensity, inputs.profile),
        };

        Self::assemble(inputs, blocks, duration, intensity)
    }

    fn build_swim(
        &self,
        inputs: &GenerationInputs<'_>,
        intensity: SessionIntensity,
        low_readiness: bool,
    ) -> WorkoutPrescription {
        // Explicit distance is a hard contract; the default band shrinks on
        // low readiness instead of the distance the athlete asked for.
        let requested = inputs.intent.distance_m.or_else(|| {
            let base = default_swim_distance(inputs.profile);
            if low_readiness {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let scaled = (f64::from(base) * LOW_READINESS_DURATION_FACTOR) as u32;
                Some(
                    (scaled / inputs.profile.pool_length_m.max(1))
                        * inputs.profile.pool_length_m.max(1),
                )
            } else {
                Some(base)
            }
        });

        let blocks = build_swim_blocks(requested, intensity, inputs.profile);
        let duration = inputs
            .intent
            .duration_min
            .unwrap_or_else(|| estimate_swim_duration(blocks.distance_m.unwrap_or(0), intensity));

        Self::assemble(inputs, blocks, duration, intensity)
    }

    fn assemble(
        inputs: &GenerationInputs<'_>,
        blocks: SportBlocks,
        duration: u32,
        intensity: SessionIntensity,
    ) -> WorkoutPrescription {
        let targets_summary = blocks
            .main
            .iter()
            .filter_map(|s| s.target.as_ref().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join(", ");
        let targets_summary = if targets_summary.is_empty() {
            "Easy, conversational effort".to_owned()
        } else {
            targets_summary
        };

        let fueling = (duration >= FUELING_DURATION_MIN).then(|| {
            "Carry fluids; take in 30-60g of carbohydrate per hour after the first 45 minutes."
                .to_owned()
        });

        let rationale = match intensity {
            SessionIntensity::Easy => format!(
                "Kept the session easy today (form {:.0}, readiness-led); consistency matters more than intensity.",
                inputs.training.tsb
            ),
            SessionIntensity::Moderate => format!(
                "You're absorbing training well (form {:.0}); a steady session extends the base.",
                inputs.training.tsb
            ),
        };

        WorkoutPrescription {
            sport: inputs.intent.sport,
            date: inputs.intent.date,
            title: blocks.title,
            duration_min: duration,
            distance_m: blocks.distance_m,
            goal: blocks.goal,
            warmup: blocks.warmup,
            main: blocks.main,
            cooldown: blocks.cooldown,
            technique_cues: blocks.technique_cues,
            targets_summary,
            fueling,
            variant_ideal:
                "Feeling great: hold the top of the effort range and finish with a strong, controlled last third."
                    .to_owned(),
            variant_low_energy:
                "Flat day: drop to the bottom of the range, cut the main set by a quarter, and call it done."
                    .to_owned(),
            progression_note: None,
            success_criteria: vec![
                "Finished feeling like you could have done a little more".to_owned(),
                "Effort stayed inside the target range".to_owned(),
            ],
            rationale: rationale.clone(),
            why: WhyContext {
                rationale,
                guardrail_checks: Vec::new(),
                adaptation_reason: None,
            },
            confidence: None,
        }
    }

    /// Recovery swap: recovery-flavored title/goal and a 30-45 minute cap
    fn swap_to_recovery(prescription: &mut WorkoutPrescription, readiness: u8, soreness: u8) {
        let capped = prescription
            .duration_min
            .clamp(RECOVERY_DURATION_MIN, RECOVERY_DURATION_MAX);
        Self::rescale_durations(prescription, capped);
        prescription.title = format!("Recovery {}", prescription.sport.display_name());
        prescription.goal =
            "Move easy, promote blood flow, and leave the session fresher than you started"
                .to_owned();
        let note = format!(
            "Swapped to recovery: readiness {readiness}/100 and soreness {soreness}/5 called for backing off."
        );
        prescription.rationale = note.clone();
        prescription.why.rationale.clone_from(&note);
        prescription.why.adaptation_reason = Some(note);
    }

    /// Stage 4: no-op when readiness >= 55, soreness < 4, and sleep quality >= 3;
    /// otherwise scale duration by a severity-keyed factor and explain.
    fn apply_readiness_adaptation(
        prescription: &mut WorkoutPrescription,
        readiness: u8,
        soreness: u8,
        sleep_quality: u8,
    ) {
        if readiness >= 55 && soreness < 4 && sleep_quality >= 3 {
            return;
        }
        let factor = if readiness < 30 {
            0.6
        } else if readiness < 45 {
            0.8
        } else {
            0.9
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let target = ((f64::from(prescription.duration_min) * factor).round() as u32).max(20);
        Self::rescale_durations(prescription, target);

        let reason = format!(
            "Trimmed to {target} minutes: readiness {readiness}/100, soreness {soreness}/5, sleep quality {sleep_quality}/5."
        );
        match &mut prescription.why.adaptation_reason {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&reason);
            }
            none => *none = Some(reason),
        }
    }

    /// Stage 5: re-run guardrails for the week including this session and cap
    /// duration to any recommended adjustment.
    fn validate_guardrails(
        &self,
        prescription: &mut WorkoutPrescription,
        inputs: &GenerationInputs<'_>,
        intensity: SessionIntensity,
    ) {
        let tag = match intensity {
            SessionIntensity::Easy => IntensityTag::Easy,
            SessionIntensity::Moderate => IntensityTag::Moderate,
        };
        let mut week = inputs.planned_week.to_vec();
        week.push(PlannedWorkout {
            date: prescription.date,
            duration_min: prescription.duration_min,
            intensity: tag,
            tss: None,
            sport: prescription.sport,
        });

        let report = check_guardrails(
            &week,
            inputs.previous_week_load,
            inputs.recent_workouts,
            self.config.ramp_threshold_pct,
            self.config.min_session_minutes,
        );

        match report.ramp_status {
            RampStatus::Safe => prescription
                .why
                .guardrail_checks
                .push("Weekly ramp within threshold".to_owned()),
            _ => prescription
                .why
                .guardrail_checks
                .extend(report.warnings.iter().cloned()),
        }

        if let Some(cap) = report
            .adjustments
            .iter()
            .find(|a| a.date == prescription.date)
            .map(|a| a.adjusted_duration_min)
        {
            if cap < prescription.duration_min {
                Self::rescale_durations(prescription, cap);
                prescription.why.guardrail_checks.push(format!(
                    "Capped to {cap} minutes to keep the weekly ramp inside {:.0}%",
                    self.config.ramp_threshold_pct
                ));
            }
        }
    }

    /// Scale total and per-step durations to a new total, preserving distances
    fn rescale_durations(prescription: &mut WorkoutPrescription, new_total: u32) {
        let old_total = prescription.duration_min.max(1);
        let ratio = f64::from(new_total) / f64::from(old_total);
        for step in prescription
            .warmup
            .iter_mut()
            .chain(prescription.main.iter_mut())
            .chain(prescription.cooldown.iter_mut())
        {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let scaled = (f64::from(step.duration_min) * ratio).round() as u32;
            step.duration_min = scaled.max(1);
        }
        prescription.duration_min = new_total;
    }
}
