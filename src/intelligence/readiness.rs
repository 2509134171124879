// ABOUTME: Readiness evaluation - maps a daily check-in to a 0-100 score and a workout decision
// ABOUTME: Score formula and decision thresholds are fixed contracts covered by tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use serde::{Deserialize, Serialize};

use crate::models::{CheckIn, SorenessLevel, WorkoutDecision};

/// One reason contributing to a readiness assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReason {
    /// Human-readable reason
    pub text: String,
    /// Whether it pushed the assessment up or down
    pub positive: bool,
    /// Salience for ordering (higher = more salient)
    pub weight: u8,
}

/// Decision-keyed workout adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReadinessAdaptation {
    /// Keep the session, drop intensity to 80-85% of planned
    ReduceIntensity {
        /// Target intensity range as percent of planned
        intensity_pct: (u8, u8),
    },
    /// Scale duration by 0.7 and intensity to 85-90%
    Shorten {
        /// Multiplier applied to planned duration
        duration_factor: f64,
        /// Target intensity range as percent of planned
        intensity_pct: (u8, u8),
    },
    /// Replace the workout type with recovery, capped to 30-45 minutes
    SwapRecovery {
        /// Allowed duration range in minutes
        duration_range_min: (u32, u32),
    },
    /// Full rest day
    Rest,
}

/// Complete readiness assessment for one check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessAssessment {
    /// Composite readiness score, 0-100
    pub score: u8,
    /// Discrete decision from the score
    pub decision: WorkoutDecision,
    /// Confidence in the decision, 35-95
    pub confidence: u8,
    /// Contributing reasons, most salient first
    pub reasons: Vec<ReadinessReason>,
    /// Decision-keyed adjustment; `None` when proceeding as planned
    pub adaptation: Option<ReadinessAdaptation>,
    /// Short explanation, at most three sentences
    pub explanation: String,
}

/// Stateless readiness evaluator
pub struct ReadinessEvaluator;

impl ReadinessEvaluator {
    /// Compute the 0-100 readiness score from check-in fields.
    ///
    /// Sleep contributes 0-30, physical state 0-30, mental state 0-40.
    /// Bounded inputs keep the rounded sum inside [0, 100].
    #[must_use]
    pub fn calculate_readiness_score(checkin: &CheckIn) -> u8 {
        let sleep = (checkin.sleep_hours / 8.0).min(1.0) * 15.0
            + f64::from(checkin.sleep_quality) / 5.0 * 15.0;

        let physical = f64::from(6 - checkin.physical_fatigue.clamp(1, 5)) / 5.0 * 15.0
            + checkin.soreness.readiness_points();

        let mental = f64::from(checkin.mental_readiness) / 5.0 * 15.0
            + f64::from(checkin.motivation) / 5.0 * 15.0
            + f64::from(6 - checkin.stress.clamp(1, 5)) / 5.0 * 10.0;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = (sleep + physical + mental).round().clamp(0.0, 100.0) as u8;
        score
    }

    /// Map a score to the discrete workout decision.
    ///
    /// Boundary-inclusive on the upper decision: 70 proceeds, 50 reduces,
    /// 40 shortens, 30 swaps to recovery.
    #[must_use]
    pub const fn decide(score: u8) -> WorkoutDecision {
        if score >= 70 {
            WorkoutDecision::Proceed
        } else if score >= 50 {
            WorkoutDecision::ReduceIntensity
        } else if score >= 40 {
            WorkoutDecision::Shorten
        } else if score >= 30 {
            WorkoutDecision::SwapRecovery
        } else {
            WorkoutDecision::Rest
        }
    }

    /// Confidence in the decision: the score itself, nudged by the balance of
    /// positive and negative reasons, clamped to [35, 95].
    #[must_use]
    pub fn calculate_confidence(score: u8, reasons: &[ReadinessReason]) -> u8 {
        let positive = reasons.iter().filter(|r| r.positive).count() as i32;
        let negative = reasons.iter().filter(|r| !r.positive).count() as i32;
        let adjustment = ((positive - negative) * 3).clamp(-10, 8);
        let confidence = (i32::from(score) + adjustment + 5).clamp(35, 95);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let confidence = confidence as u8;
        confidence
    }

    /// Full assessment: score, decision, confidence, reasons, adaptation,
    /// and a short explanation.
    #[must_use]
    pub fn assess(checkin: &CheckIn) -> ReadinessAssessment {
        let score = Self::calculate_readiness_score(checkin);
        let decision = Self::decide(score);
        let reasons = Self::collect_reasons(checkin);
        let confidence = Self::calculate_confidence(score, &reasons);
        let adaptation = Self::adaptation_for(decision);
        let explanation = Self::explain(decision, score, &reasons);

        ReadinessAssessment {
            score,
            decision,
            confidence,
            reasons,
            adaptation,
            explanation,
        }
    }

    /// Decision-keyed adaptation; `Proceed` emits none
    #[must_use]
    pub fn adaptation_for(decision: WorkoutDecision) -> Option<ReadinessAdaptation> {
        match decision {
            WorkoutDecision::Proceed => None,
            WorkoutDecision::ReduceIntensity => Some(ReadinessAdaptation::ReduceIntensity {
                intensity_pct: (80, 85),
            }),
            WorkoutDecision::Shorten => Some(ReadinessAdaptation::Shorten {
                duration_factor: 0.7,
                intensity_pct: (85, 90),
            }),
            WorkoutDecision::SwapRecovery => Some(ReadinessAdaptation::SwapRecovery {
                duration_range_min: (30, 45),
            }),
            WorkoutDecision::Rest => Some(ReadinessAdaptation::Rest),
        }
    }

    fn collect_reasons(checkin: &CheckIn) -> Vec<ReadinessReason> {
        let mut reasons = Vec::new();

        if checkin.sleep_hours >= 8.0 && checkin.sleep_quality >= 4 {
            reasons.push(ReadinessReason {
                text: format!("well rested ({:.1}h of good sleep)", checkin.sleep_hours),
                positive: true,
                weight: 20,
            });
        } else if checkin.sleep_hours < 6.0 {
            reasons.push(ReadinessReason {
                text: format!("short sleep ({:.1}h)", checkin.sleep_hours),
                positive: false,
                weight: 25,
            });
        } else if checkin.sleep_quality <= 2 {
            reasons.push(ReadinessReason {
                text: "poor sleep quality".to_owned(),
                positive: false,
                weight: 20,
            });
        }

        if checkin.physical_fatigue >= 4 {
            reasons.push(ReadinessReason {
                text: format!("high physical fatigue ({}/5)", checkin.physical_fatigue),
                positive: false,
                weight: 25,
            });
        } else if checkin.physical_fatigue <= 2 {
            reasons.push(ReadinessReason {
                text: "legs feel fresh".to_owned(),
                positive: true,
                weight: 15,
            });
        }

        match checkin.soreness {
            SorenessLevel::Severe => reasons.push(ReadinessReason {
                text: "severe muscle soreness".to_owned(),
                positive: false,
                weight: 30,
            }),
            SorenessLevel::Moderate => reasons.push(ReadinessReason {
                text: "moderate muscle soreness".to_owned(),
                positive: false,
                weight: 20,
            }),
            SorenessLevel::None => reasons.push(ReadinessReason {
                text: "no soreness".to_owned(),
                positive: true,
                weight: 10,
            }),
            SorenessLevel::Mild => {}
        }

        if checkin.stress >= 4 {
            reasons.push(ReadinessReason {
                text: format!("elevated stress ({}/5)", checkin.stress),
                positive: false,
                weight: 15,
            });
        }

        if checkin.motivation >= 4 {
            reasons.push(ReadinessReason {
                text: "motivation is high".to_owned(),
                positive: true,
                weight: 15,
            });
        } else if checkin.motivation <= 2 {
            reasons.push(ReadinessReason {
                text: "low motivation".to_owned(),
                positive: false,
                weight: 15,
            });
        }

        if checkin.mental_readiness <= 2 {
            reasons.push(ReadinessReason {
                text: "mentally not ready to push".to_owned(),
                positive: false,
                weight: 15,
            });
        }

        reasons.sort_by(|a, b| b.weight.cmp(&a.weight));
        reasons
    }

    /// Decision-keyed explanation from the single most salient reason.
    ///
    /// Never more than three sentences.
    fn explain(decision: WorkoutDecision, score: u8, reasons: &[ReadinessReason]) -> String {
        let salient_negative = reasons.iter().find(|r| !r.positive);
        let salient_positive = reasons.iter().find(|r| r.positive);

        match decision {
            WorkoutDecision::Proceed => salient_positive.map_or_else(
                || format!("Readiness is {score}/100. Train as planned."),
                |r| format!("Readiness is {score}/100 and {}. Train as planned.", r.text),
            ),
            WorkoutDecision::ReduceIntensity => salient_negative.map_or_else(
                || format!("Readiness is {score}/100. Keep the session but ease off the intensity."),
                |r| {
                    format!(
                        "Readiness is {score}/100 with {}. Keep the session but ease off the intensity. Aim for 80-85% of planned effort.",
                        r.text
                    )
                },
            ),
            WorkoutDecision::Shorten => salient_negative.map_or_else(
                || format!("Readiness is {score}/100. Shorten today's session."),
                |r| {
                    format!(
                        "Readiness is {score}/100 with {}. Shorten today's session to about 70% of the planned time.",
                        r.text
                    )
                },
            ),
            WorkoutDecision::SwapRecovery => salient_negative.map_or_else(
                || format!("Readiness is {score}/100. Swap today for easy recovery work."),
                |r| {
                    format!(
                        "Readiness is {score}/100 with {}. Swap today for 30-45 minutes of easy recovery work.",
                        r.text
                    )
                },
            ),
            WorkoutDecision::Rest => salient_negative.map_or_else(
                || format!("Readiness is {score}/100. Take a full rest day."),
                |r| {
                    format!(
                        "Readiness is {score}/100 with {}. Take a full rest day. Tomorrow's session will be better for it.",
                        r.text
                    )
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn checkin(
        sleep_hours: f64,
        sleep_quality: u8,
        fatigue: u8,
        mental: u8,
        motivation: u8,
        soreness: SorenessLevel,
        stress: u8,
    ) -> CheckIn {
        CheckIn {
            id: Uuid::new_v4(),
            athlete_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date"),
            sleep_hours,
            sleep_quality,
            physical_fatigue: fatigue,
            mental_readiness: mental,
            motivation,
            soreness,
            stress,
            notes: None,
            readiness_score: None,
            decision: None,
            confidence: None,
            locked: false,
            overridden: false,
            override_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn score_bounded_at_extremes() {
        let best = checkin(24.0, 5, 1, 5, 5, SorenessLevel::None, 1);
        let worst = checkin(0.0, 1, 5, 1, 1, SorenessLevel::Severe, 5);
        assert!(ReadinessEvaluator::calculate_readiness_score(&best) <= 100);
        let low = ReadinessEvaluator::calculate_readiness_score(&worst);
        assert!(low <= 15, "worst case should be near zero, got {low}");
    }

    #[test]
    fn perfect_checkin_scores_100() {
        let best = checkin(8.0, 5, 1, 5, 5, SorenessLevel::None, 1);
        assert_eq!(ReadinessEvaluator::calculate_readiness_score(&best), 100);
    }

    #[test]
    fn decision_table_boundaries() {
        assert_eq!(ReadinessEvaluator::decide(70), WorkoutDecision::Proceed);
        assert_eq!(
            ReadinessEvaluator::decide(69),
            WorkoutDecision::ReduceIntensity
        );
        assert_eq!(
            ReadinessEvaluator::decide(50),
            WorkoutDecision::ReduceIntensity
        );
        assert_eq!(ReadinessEvaluator::decide(49), WorkoutDecision::Shorten);
        assert_eq!(ReadinessEvaluator::decide(40), WorkoutDecision::Shorten);
        assert_eq!(ReadinessEvaluator::decide(39), WorkoutDecision::SwapRecovery);
        assert_eq!(ReadinessEvaluator::decide(30), WorkoutDecision::SwapRecovery);
        assert_eq!(ReadinessEvaluator::decide(29), WorkoutDecision::Rest);
    }

    #[test]
    fn confidence_clamped_between_35_and_95() {
        let low = ReadinessEvaluator::calculate_confidence(0, &[]);
        assert_eq!(low, 35);
        let high = ReadinessEvaluator::calculate_confidence(100, &[]);
        assert_eq!(high, 95);
    }

    #[test]
    fn proceed_emits_no_adaptation() {
        assert!(ReadinessEvaluator::adaptation_for(WorkoutDecision::Proceed).is_none());
    }

    #[test]
    fn shorten_scales_duration_by_point_seven() {
        let adaptation = ReadinessEvaluator::adaptation_for(WorkoutDecision::Shorten)
            .expect("shorten adapts");
        match adaptation {
            ReadinessAdaptation::Shorten {
                duration_factor,
                intensity_pct,
            } => {
                assert!((duration_factor - 0.7).abs() < f64::EPSILON);
                assert_eq!(intensity_pct, (85, 90));
            }
            other => panic!("unexpected adaptation {other:?}"),
        }
    }

    #[test]
    fn explanation_stays_under_three_sentences() {
        let c = checkin(5.0, 2, 4, 2, 2, SorenessLevel::Moderate, 4);
        let assessment = ReadinessEvaluator::assess(&c);
        let sentences = assessment.explanation.matches('.').count();
        assert!(sentences <= 3, "too many sentences: {}", assessment.explanation);
    }
}
