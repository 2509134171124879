// ABOUTME: Daily readiness check-in model with derived score, decision, and lock semantics
// ABOUTME: At most one locked check-in per athlete per day; overrides are audited events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Muscle soreness level reported on a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SorenessLevel {
    /// No soreness
    None,
    /// Mild soreness, training unaffected
    Mild,
    /// Moderate soreness, noticeable during sessions
    Moderate,
    /// Severe soreness, movement compromised
    Severe,
}

impl SorenessLevel {
    /// Contribution to the physical readiness component (NONE=15 .. SEVERE=0)
    #[must_use]
    pub const fn readiness_points(self) -> f64 {
        match self {
            Self::None => 15.0,
            Self::Mild => 10.0,
            Self::Moderate => 5.0,
            Self::Severe => 0.0,
        }
    }

    /// 1-5 scale used by the fatigue classifier and prescription generator
    /// (NONE=1, MILD=2, MODERATE=3, SEVERE=5)
    #[must_use]
    pub const fn as_scale(self) -> u8 {
        match self {
            Self::None => 1,
            Self::Mild => 2,
            Self::Moderate => 3,
            Self::Severe => 5,
        }
    }
}

/// Discrete workout decision derived from the readiness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkoutDecision {
    /// Score >= 70: train as planned
    Proceed,
    /// Score 50-69: keep the session, drop intensity
    ReduceIntensity,
    /// Score 40-49: shorten the session
    Shorten,
    /// Score 30-39: swap to a recovery session
    SwapRecovery,
    /// Score < 30: full rest day
    Rest,
}

/// One athlete's daily readiness check-in.
///
/// Becomes locked once a workout decision is attached; after that only an
/// explicit, audited user override may change the decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    /// Unique identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Athlete-local calendar date of the check-in
    pub date: NaiveDate,
    /// Sleep duration in hours
    pub sleep_hours: f64,
    /// Sleep quality, 1-5
    pub sleep_quality: u8,
    /// Physical fatigue, 1-5 (5 = exhausted)
    pub physical_fatigue: u8,
    /// Mental readiness, 1-5
    pub mental_readiness: u8,
    /// Motivation, 1-5
    pub motivation: u8,
    /// Muscle soreness level
    pub soreness: SorenessLevel,
    /// Stress level, 1-5 (5 = very stressed)
    pub stress: u8,
    /// Free-text notes from the athlete
    pub notes: Option<String>,
    /// Derived readiness score (0-100), immutable once locked
    pub readiness_score: Option<u8>,
    /// Derived workout decision
    pub decision: Option<WorkoutDecision>,
    /// Derived confidence in the decision (0-100)
    pub confidence: Option<u8>,
    /// Whether a decision has been attached and the record is immutable
    pub locked: bool,
    /// Set when the athlete explicitly rejected the derived decision
    pub overridden: bool,
    /// Athlete-supplied reason for the override
    pub override_reason: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl CheckIn {
    /// Whether the athlete rejected a rest-leaning decision and trained anyway
    #[must_use]
    pub fn overrode_rest(&self) -> bool {
        self.overridden
            && matches!(
                self.decision,
                Some(WorkoutDecision::Rest | WorkoutDecision::SwapRecovery)
            )
    }
}
