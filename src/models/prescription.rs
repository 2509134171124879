// ABOUTME: Structured workout prescription - the artifact the generator produces
// ABOUTME: Includes the versioned structured-plan payload external renderers consume
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::workout::Sport;

/// Intensity target attached to a prescription step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntensityTarget {
    /// Rating of perceived exertion band (1-10)
    Rpe {
        /// Lower bound
        low: u8,
        /// Upper bound
        high: u8,
    },
    /// Heart-rate band in bpm
    HeartRate {
        /// Lower bound
        low: u16,
        /// Upper bound
        high: u16,
    },
    /// Power band in watts
    Power {
        /// Lower bound
        low: u16,
        /// Upper bound
        high: u16,
    },
    /// Pace description (e.g. "comfortable aerobic pace")
    Pace {
        /// Human-readable pace target
        description: String,
    },
}

impl std::fmt::Display for IntensityTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rpe { low, high } => write!(f, "RPE {low}-{high}"),
            Self::HeartRate { low, high } => write!(f, "{low}-{high} bpm"),
            Self::Power { low, high } => write!(f, "{low}-{high} W"),
            Self::Pace { description } => f.write_str(description),
        }
    }
}

/// One step inside a warm-up, main, or cool-down block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionStep {
    /// What to do
    pub description: String,
    /// Duration in minutes
    pub duration_min: u32,
    /// Distance in meters, for distance-based steps (swim)
    pub distance_m: Option<u32>,
    /// Intensity target, when one applies
    pub target: Option<IntensityTarget>,
}

impl PrescriptionStep {
    /// Time-based step with no distance or target
    #[must_use]
    pub fn timed(description: impl Into<String>, duration_min: u32) -> Self {
        Self {
            description: description.into(),
            duration_min,
            distance_m: None,
            target: None,
        }
    }

    /// Attach an intensity target
    #[must_use]
    pub fn with_target(mut self, target: IntensityTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach a distance in meters
    #[must_use]
    pub const fn with_distance(mut self, meters: u32) -> Self {
        self.distance_m = Some(meters);
        self
    }
}

/// Structured rationale attached to every prescription
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhyContext {
    /// Primary rationale sentence(s)
    pub rationale: String,
    /// Guardrail check outcomes, one string each
    pub guardrail_checks: Vec<String>,
    /// Why the session was adapted from the initial shape, when it was
    pub adaptation_reason: Option<String>,
}

/// The generated workout prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPrescription {
    /// Sport of the session
    pub sport: Sport,
    /// Athlete-local target date
    pub date: NaiveDate,
    /// Human-readable title (swim titles carry the exact distance)
    pub title: String,
    /// Total duration in minutes; block durations approximate this
    pub duration_min: u32,
    /// Total distance in meters, for distance-based sessions
    pub distance_m: Option<u32>,
    /// One-sentence goal for the session
    pub goal: String,
    /// Ordered warm-up steps
    pub warmup: Vec<PrescriptionStep>,
    /// Ordered main-set steps
    pub main: Vec<PrescriptionStep>,
    /// Ordered cool-down steps
    pub cooldown: Vec<PrescriptionStep>,
    /// Technique cues for the session
    pub technique_cues: Vec<String>,
    /// One-line intensity targets summary
    pub targets_summary: String,
    /// Fueling guidance, for longer sessions
    pub fueling: Option<String>,
    /// Narrative variant for a good day
    pub variant_ideal: String,
    /// Narrative variant for a low-energy day
    pub variant_low_energy: String,
    /// Beginner progression note, when the athlete is early in the sport
    pub progression_note: Option<String>,
    /// Success criteria for the session
    pub success_criteria: Vec<String>,
    /// Flat rationale string
    pub rationale: String,
    /// Structured rationale with guardrail outcomes
    pub why: WhyContext,
    /// Engine confidence (0-100), carried from the readiness assessment
    pub confidence: Option<u8>,
}

impl WorkoutPrescription {
    /// Sum of step distances across all three blocks, in meters
    #[must_use]
    pub fn total_block_distance(&self) -> u32 {
        self.warmup
            .iter()
            .chain(&self.main)
            .chain(&self.cooldown)
            .filter_map(|s| s.distance_m)
            .sum()
    }

    /// Sum of step durations across all three blocks, in minutes
    #[must_use]
    pub fn total_block_duration(&self) -> u32 {
        self.warmup
            .iter()
            .chain(&self.main)
            .chain(&self.cooldown)
            .map(|s| s.duration_min)
            .sum()
    }

    /// Build the versioned structured plan external renderers consume
    #[must_use]
    pub fn to_structured_plan(&self) -> StructuredPlan {
        StructuredPlan::V1 {
            sections: vec![
                PlanSection {
                    name: "Warm-up".into(),
                    steps: self.warmup.clone(),
                },
                PlanSection {
                    name: "Main set".into(),
                    steps: self.main.clone(),
                },
                PlanSection {
                    name: "Cool-down".into(),
                    steps: self.cooldown.clone(),
                },
            ],
        }
    }
}

/// One named section of a structured plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSection {
    /// Section name ("Warm-up", "Main set", "Cool-down")
    pub name: String,
    /// Ordered steps
    pub steps: Vec<PrescriptionStep>,
}

/// Versioned structured-plan payload.
///
/// A closed tagged variant per schema version; adding `V2` requires an
/// explicit converter, never untyped key-value access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "version", rename_all = "lowercase")]
pub enum StructuredPlan {
    /// Initial schema: ordered named sections of typed steps
    V1 {
        /// Ordered sections (Warm-up, Main set, Cool-down)
        sections: Vec<PlanSection>,
    },
}

impl StructuredPlan {
    /// Sections regardless of schema version
    #[must_use]
    pub fn sections(&self) -> &[PlanSection] {
        match self {
            Self::V1 { sections } => sections,
        }
    }
}
