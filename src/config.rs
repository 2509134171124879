// ABOUTME: Engine configuration with environment-variable overrides
// ABOUTME: Every evaluator threshold lives here so deployments can tune without rebuilds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use std::env;

use serde::{Deserialize, Serialize};

/// Default weekly ramp-rate threshold in percent
const DEFAULT_RAMP_THRESHOLD_PCT: f64 = 15.0;

/// Default fatigue dominance threshold (argmax score below this yields no fatigue)
const DEFAULT_FATIGUE_THRESHOLD: f64 = 40.0;

/// Default minimum session duration the guardrail trimmer will not go below
const DEFAULT_MIN_SESSION_MINUTES: u32 = 20;

/// Tunable thresholds for the decision engine.
///
/// Environment-only configuration: each field has a hard default and an
/// optional `COACH_*` environment override. Invalid values fall back to the
/// default rather than failing startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Weekly ramp-rate threshold in percent (ramp above this triggers adjustments)
    pub ramp_threshold_pct: f64,
    /// Fatigue classifier dominance threshold; below it no fatigue type is reported
    pub fatigue_threshold: f64,
    /// Floor for any single session after guardrail trimming, in minutes
    pub min_session_minutes: u32,
    /// Minimum confidence for committing a long-term trait memory
    pub trait_commit_confidence: u8,
    /// Minimum contributing memories for monthly trait inference
    pub trait_min_contributors: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ramp_threshold_pct: DEFAULT_RAMP_THRESHOLD_PCT,
            fatigue_threshold: DEFAULT_FATIGUE_THRESHOLD,
            min_session_minutes: DEFAULT_MIN_SESSION_MINUTES,
            trait_commit_confidence: 50,
            trait_min_contributors: 3,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ramp_threshold_pct: parse_env("COACH_RAMP_THRESHOLD_PCT", defaults.ramp_threshold_pct),
            fatigue_threshold: parse_env("COACH_FATIGUE_THRESHOLD", defaults.fatigue_threshold),
            min_session_minutes: parse_env(
                "COACH_MIN_SESSION_MINUTES",
                defaults.min_session_minutes,
            ),
            trait_commit_confidence: parse_env(
                "COACH_TRAIT_COMMIT_CONFIDENCE",
                defaults.trait_commit_confidence,
            ),
            trait_min_contributors: parse_env(
                "COACH_TRAIT_MIN_CONTRIBUTORS",
                defaults.trait_min_contributors,
            ),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
