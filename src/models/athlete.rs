// ABOUTME: Athlete profile with experience level, swim skill, zone tables, and local offset
// ABOUTME: Supplied by the external athlete context provider; never mutated by the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::workout::Sport;

/// Overall training experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// New to structured training
    Beginner,
    /// 1-3 years of consistent training
    Intermediate,
    /// 3+ years, comfortable with structured intensity
    Advanced,
    /// Competitive athlete
    Expert,
}

/// Swim-specific skill level, drives default total-distance bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwimLevel {
    /// 800-1600 m sessions
    Beginner,
    /// 1600-2800 m sessions
    Intermediate,
    /// 2500-4000 m sessions
    Advanced,
    /// 3500-5500 m sessions
    Expert,
}

impl SwimLevel {
    /// Default total-distance band (min, max) in meters for this level
    #[must_use]
    pub const fn distance_band(self) -> (u32, u32) {
        match self {
            Self::Beginner => (800, 1600),
            Self::Intermediate => (1600, 2800),
            Self::Advanced => (2500, 4000),
            Self::Expert => (3500, 5500),
        }
    }
}

/// Five-zone heart-rate table in bpm, zone 1 easiest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HrZones {
    /// Inclusive (low, high) bpm bounds per zone, index 0 = zone 1
    pub zones: [(u16, u16); 5],
}

impl HrZones {
    /// Bounds for a 1-based zone number, clamped to the table
    #[must_use]
    pub fn zone(&self, number: usize) -> (u16, u16) {
        let idx = number.clamp(1, 5) - 1;
        self.zones[idx]
    }
}

/// Five-zone power table in watts, zone 1 easiest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerZones {
    /// Inclusive (low, high) watt bounds per zone, index 0 = zone 1
    pub zones: [(u16, u16); 5],
}

impl PowerZones {
    /// Bounds for a 1-based zone number, clamped to the table
    #[must_use]
    pub fn zone(&self, number: usize) -> (u16, u16) {
        let idx = number.clamp(1, 5) - 1;
        self.zones[idx]
    }
}

/// Athlete profile fields the engine consumes.
///
/// Owned by the external athlete context provider; the engine never writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Unique identifier
    pub id: Uuid,
    /// Primary sport, the default for ambiguous intents
    pub primary_sport: Sport,
    /// Overall experience level
    pub experience: ExperienceLevel,
    /// Swim-specific skill level
    pub swim_level: SwimLevel,
    /// Pool length in meters used for swim segment rounding
    pub pool_length_m: u32,
    /// Fixed UTC offset in minutes east, for local-day bucketing
    pub utc_offset_minutes: i32,
    /// Heart-rate zone table, when known
    pub hr_zones: Option<HrZones>,
    /// Power zone table, when known (cycling)
    pub power_zones: Option<PowerZones>,
}

impl AthleteProfile {
    /// A minimal profile useful for tests and new athletes
    #[must_use]
    pub fn new(id: Uuid, primary_sport: Sport) -> Self {
        Self {
            id,
            primary_sport,
            experience: ExperienceLevel::Intermediate,
            swim_level: SwimLevel::Intermediate,
            pool_length_m: 25,
            utc_offset_minutes: 0,
            hr_zones: None,
            power_zones: None,
        }
    }
}
