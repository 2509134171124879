// ABOUTME: Workout models - the persisted record, planned sessions, and sport/intensity enums
// ABOUTME: Persisted workouts carry provenance fields and the serialized structured plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::prescription::StructuredPlan;

/// Sports the prescription generator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sport {
    /// Running
    Run,
    /// Cycling
    Bike,
    /// Swimming
    Swim,
    /// Strength / mobility work
    Strength,
}

impl Sport {
    /// Display name used in titles and markdown
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Run => "Run",
            Self::Bike => "Bike",
            Self::Swim => "Swim",
            Self::Strength => "Strength",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Coarse intensity tag on a planned session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityTag {
    /// Recovery or rest-adjacent session
    Recovery,
    /// Easy aerobic session
    Easy,
    /// Moderate / tempo session
    Moderate,
    /// Hard session (intervals, threshold, race effort)
    Hard,
}

impl IntensityTag {
    /// Whether this session counts as "hard" for consecutive-hard-day checks
    #[must_use]
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Hard)
    }
}

/// A planned (not yet completed) session used for guardrail projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedWorkout {
    /// Athlete-local calendar date of the session
    pub date: NaiveDate,
    /// Planned duration in minutes
    pub duration_min: u32,
    /// Coarse intensity tag
    pub intensity: IntensityTag,
    /// Training stress score when known; estimated from duration otherwise
    pub tss: Option<f64>,
    /// Sport of the session
    pub sport: Sport,
}

/// The durable workout record a prescription is saved into
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Scheduled instant in UTC
    pub date: DateTime<Utc>,
    /// Sport of the workout
    pub sport: Sport,
    /// Human-readable title
    pub title: String,
    /// Total duration in minutes
    pub duration_min: u32,
    /// Total distance in meters, when distance-based
    pub distance_m: Option<u32>,
    /// Whether this is a planned (future) session
    pub planned: bool,
    /// Whether the athlete completed it
    pub completed: bool,
    /// Rendered markdown description
    pub description_md: String,
    /// Serialized structured prescription, when generated by the engine
    pub structured_plan: Option<StructuredPlan>,
    /// Whether the record was produced by the engine rather than the athlete
    pub ai_generated: bool,
    /// Provenance tag (e.g. "coach-engine", "manual", "import")
    pub source: String,
    /// Engine confidence at generation time (0-100)
    pub confidence: Option<u8>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
