// ABOUTME: Fatigue classification - scores four fatigue types and picks the dominant one
// ABOUTME: A dominance threshold prevents over-triggering on marginal signals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::intelligence::training_load::TrainingContext;

/// Score at or above which severity is "high" rather than moderate
const HIGH_SEVERITY_THRESHOLD: f64 = 60.0;

/// Minimum rule weight for a reason to be reported
const MIN_REASON_WEIGHT: f64 = 15.0;

/// Maximum reasons reported per assessment
const MAX_REASONS: usize = 3;

/// The four fatigue types the classifier distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FatigueType {
    /// No type scored above the dominance threshold
    None,
    /// Central nervous system fatigue (sleep, persistent low energy)
    Cns,
    /// Muscular fatigue (soreness, acute load spike, consecutive days)
    Muscular,
    /// Metabolic fatigue (deep TSB, high absolute ATL)
    Metabolic,
    /// Psychological fatigue (mood, stress)
    Psychological,
}

/// Severity tier of a detected fatigue type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatigueSeverity {
    /// Dominant score below 60
    Moderate,
    /// Dominant score 60 or above
    High,
}

/// Signals the classifier consumes, mixed from check-in, journal, and load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueSignals {
    /// Sleep quality, 1-5
    pub sleep_quality: u8,
    /// Sleep duration in hours
    pub sleep_hours: f64,
    /// Consecutive recent days with reported low energy
    pub low_energy_days: u32,
    /// Soreness on the 1-5 scale
    pub soreness: u8,
    /// Mood, 1-5
    pub mood: u8,
    /// Stress, 1-5
    pub stress: u8,
    /// Training load context
    pub training: TrainingContext,
}

/// One contributing rule that fired
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueReason {
    /// Human-readable reason
    pub text: String,
    /// Rule weight
    pub weight: f64,
}

/// Result of fatigue classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueAssessment {
    /// Dominant fatigue type, or `None` below threshold
    pub fatigue_type: FatigueType,
    /// Dominant score
    pub score: f64,
    /// Severity tier, present when a type was detected
    pub severity: Option<FatigueSeverity>,
    /// Up to three contributing reasons, heaviest first
    pub reasons: Vec<FatigueReason>,
    /// Type-and-severity-keyed recommendation
    pub recommendation: String,
}

/// Configurable fatigue classifier
pub struct FatigueClassifier {
    config: EngineConfig,
}

impl Default for FatigueClassifier {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl FatigueClassifier {
    /// Create a classifier with the given thresholds
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Classify the dominant fatigue type from mixed signals.
    ///
    /// Total function: sparse signals simply score low and return
    /// `FatigueType::None` with an empty reason list. The dominance
    /// threshold comes from [`EngineConfig::fatigue_threshold`].
    #[must_use]
    pub fn classify(&self, signals: &FatigueSignals) -> FatigueAssessment {
        let scored = [
            (FatigueType::Cns, Self::score_cns(signals)),
            (FatigueType::Muscular, Self::score_muscular(signals)),
            (FatigueType::Metabolic, Self::score_metabolic(signals)),
            (
                FatigueType::Psychological,
                Self::score_psychological(signals),
            ),
        ];

        let (dominant, (score, mut reasons)) = scored
            .into_iter()
            .max_by(|a, b| {
                a.1 .0
                    .partial_cmp(&b.1 .0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or((FatigueType::None, (0.0, Vec::new())));

        if score < self.config.fatigue_threshold {
            return FatigueAssessment {
                fatigue_type: FatigueType::None,
                score,
                severity: None,
                reasons: Vec::new(),
                recommendation: "No dominant fatigue signal. Continue as planned.".to_owned(),
            };
        }

        let severity = if score >= HIGH_SEVERITY_THRESHOLD {
            FatigueSeverity::High
        } else {
            FatigueSeverity::Moderate
        };

        reasons.retain(|r| r.weight >= MIN_REASON_WEIGHT);
        reasons.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        reasons.truncate(MAX_REASONS);

        FatigueAssessment {
            fatigue_type: dominant,
            score,
            severity: Some(severity),
            recommendation: Self::recommendation(dominant, severity),
            reasons,
        }
    }

    fn score_cns(s: &FatigueSignals) -> (f64, Vec<FatigueReason>) {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if s.sleep_quality <= 2 {
            score += 25.0;
            reasons.push(FatigueReason {
                text: "sleep quality has been poor".to_owned(),
                weight: 25.0,
            });
        }
        if s.low_energy_days >= 3 {
            score += 30.0;
            reasons.push(FatigueReason {
                text: format!("low energy for {} straight days", s.low_energy_days),
                weight: 30.0,
            });
        }
        if s.sleep_hours < 6.0 {
            score += 15.0;
            reasons.push(FatigueReason {
                text: format!("short sleep ({:.1}h)", s.sleep_hours),
                weight: 15.0,
            });
        }
        (score, reasons)
    }

    fn score_muscular(s: &FatigueSignals) -> (f64, Vec<FatigueReason>) {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if s.soreness >= 4 {
            score += 35.0;
            reasons.push(FatigueReason {
                text: "severe muscle soreness".to_owned(),
                weight: 35.0,
            });
        } else if s.soreness == 3 {
            score += 20.0;
            reasons.push(FatigueReason {
                text: "moderate muscle soreness".to_owned(),
                weight: 20.0,
            });
        }
        if s.training.ctl > 0.0 && s.training.atl / s.training.ctl > 1.3 {
            score += 30.0;
            reasons.push(FatigueReason {
                text: "acute load well above chronic load".to_owned(),
                weight: 30.0,
            });
        }
        if s.training.consecutive_training_days >= 4 {
            score += 20.0;
            reasons.push(FatigueReason {
                text: format!(
                    "{} consecutive training days",
                    s.training.consecutive_training_days
                ),
                weight: 20.0,
            });
        }
        (score, reasons)
    }

    fn score_metabolic(s: &FatigueSignals) -> (f64, Vec<FatigueReason>) {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if s.training.tsb < -15.0 {
            score += 35.0;
            reasons.push(FatigueReason {
                text: format!("deeply negative form (TSB {:.0})", s.training.tsb),
                weight: 35.0,
            });
        } else if s.training.tsb < -10.0 {
            score += 25.0;
            reasons.push(FatigueReason {
                text: format!("negative form (TSB {:.0})", s.training.tsb),
                weight: 25.0,
            });
        }
        if s.training.atl > 100.0 {
            score += 20.0;
            reasons.push(FatigueReason {
                text: "very high acute training load".to_owned(),
                weight: 20.0,
            });
        }
        if s.low_energy_days >= 2 {
            score += 15.0;
            reasons.push(FatigueReason {
                text: "energy has been low".to_owned(),
                weight: 15.0,
            });
        }
        (score, reasons)
    }

    fn score_psychological(s: &FatigueSignals) -> (f64, Vec<FatigueReason>) {
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if s.mood <= 2 {
            score += 30.0;
            reasons.push(FatigueReason {
                text: "mood has been low".to_owned(),
                weight: 30.0,
            });
        }
        if s.stress >= 4 {
            score += 25.0;
            reasons.push(FatigueReason {
                text: "stress is elevated".to_owned(),
                weight: 25.0,
            });
        }
        // Interaction term: poor sleep compounds low mood.
        if s.sleep_quality <= 2 && s.mood <= 2 {
            score += 20.0;
            reasons.push(FatigueReason {
                text: "poor sleep is compounding low mood".to_owned(),
                weight: 20.0,
            });
        }
        (score, reasons)
    }

    fn recommendation(fatigue_type: FatigueType, severity: FatigueSeverity) -> String {
        match (fatigue_type, severity) {
            (FatigueType::Cns, FatigueSeverity::High) => {
                "Central fatigue is high: prioritize sleep and take 1-2 very easy days before any intensity.".to_owned()
            }
            (FatigueType::Cns, FatigueSeverity::Moderate) => {
                "Signs of central fatigue: protect sleep this week and keep intensity easy.".to_owned()
            }
            (FatigueType::Muscular, FatigueSeverity::High) => {
                "Muscular fatigue is high: no loaded work today; easy spin or mobility only until soreness settles.".to_owned()
            }
            (FatigueType::Muscular, FatigueSeverity::Moderate) => {
                "Muscles are carrying fatigue: keep today low-impact and stretch after.".to_owned()
            }
            (FatigueType::Metabolic, FatigueSeverity::High) => {
                "Deep metabolic fatigue: cut volume sharply for 2-3 days and refuel aggressively.".to_owned()
            }
            (FatigueType::Metabolic, FatigueSeverity::Moderate) => {
                "Accumulated load is showing: favor short aerobic sessions until form rebounds.".to_owned()
            }
            (FatigueType::Psychological, FatigueSeverity::High) => {
                "Mental fatigue is high: step away from structure today; move only if it feels fun.".to_owned()
            }
            (FatigueType::Psychological, FatigueSeverity::Moderate) => {
                "Mental load is elevated: keep sessions unstructured and low-pressure this week.".to_owned()
            }
            (FatigueType::None, _) => "No dominant fatigue signal. Continue as planned.".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_signals() -> FatigueSignals {
        FatigueSignals {
            sleep_quality: 4,
            sleep_hours: 8.0,
            low_energy_days: 0,
            soreness: 1,
            mood: 4,
            stress: 2,
            training: TrainingContext::empty(),
        }
    }

    #[test]
    fn marginal_signals_yield_no_fatigue_and_no_reasons() {
        let mut signals = quiet_signals();
        signals.soreness = 3; // lone 20-point rule, below the 40 threshold
        let assessment = FatigueClassifier::default().classify(&signals);
        assert_eq!(assessment.fatigue_type, FatigueType::None);
        assert!(assessment.reasons.is_empty());
        assert!(assessment.severity.is_none());
    }

    #[test]
    fn severe_soreness_with_load_spike_is_muscular() {
        let mut signals = quiet_signals();
        signals.soreness = 5;
        signals.training.ctl = 50.0;
        signals.training.atl = 80.0;
        let assessment = FatigueClassifier::default().classify(&signals);
        assert_eq!(assessment.fatigue_type, FatigueType::Muscular);
        assert_eq!(assessment.severity, Some(FatigueSeverity::High));
        assert!(!assessment.reasons.is_empty());
        assert!(assessment.reasons.len() <= 3);
    }

    #[test]
    fn reasons_sorted_descending_by_weight() {
        let mut signals = quiet_signals();
        signals.soreness = 5;
        signals.training.ctl = 50.0;
        signals.training.atl = 80.0;
        signals.training.consecutive_training_days = 5;
        let assessment = FatigueClassifier::default().classify(&signals);
        for pair in assessment.reasons.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
    }

    #[test]
    fn deep_tsb_drives_metabolic_classification() {
        let mut signals = quiet_signals();
        signals.training.tsb = -20.0;
        signals.training.atl = 110.0;
        let assessment = FatigueClassifier::default().classify(&signals);
        assert_eq!(assessment.fatigue_type, FatigueType::Metabolic);
    }

    #[test]
    fn severity_tiers_at_sixty() {
        let mut signals = quiet_signals();
        signals.mood = 1;
        signals.stress = 5; // 30 + 25 = 55 -> moderate
        let assessment = FatigueClassifier::default().classify(&signals);
        assert_eq!(assessment.severity, Some(FatigueSeverity::Moderate));

        signals.sleep_quality = 2; // adds the 20-point interaction -> high
        let assessment = FatigueClassifier::default().classify(&signals);
        assert_eq!(assessment.fatigue_type, FatigueType::Psychological);
        assert_eq!(assessment.severity, Some(FatigueSeverity::High));
    }

    #[test]
    fn dominance_threshold_follows_config() {
        let mut signals = quiet_signals();
        signals.mood = 1;
        signals.stress = 5; // psychological 55, above the default 40

        let default_assessment = FatigueClassifier::default().classify(&signals);
        assert_eq!(default_assessment.fatigue_type, FatigueType::Psychological);

        let strict = FatigueClassifier::new(EngineConfig {
            fatigue_threshold: 90.0,
            ..EngineConfig::default()
        });
        let assessment = strict.classify(&signals);
        assert_eq!(assessment.fatigue_type, FatigueType::None);
        assert!(assessment.severity.is_none());
    }
}
