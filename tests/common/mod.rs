// ABOUTME: Shared fixtures for integration tests - check-ins, profiles, and journal entries
// ABOUTME: Builders default to an unremarkable healthy athlete; tests override what they probe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

#![allow(dead_code)]

use cadence_coach::models::{
    AiVisibility, AthleteProfile, CheckIn, JournalEntry, SorenessLevel, Sport,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Fixed base date all fixtures anchor to
#[must_use]
pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 12).expect("valid date")
}

/// Profile for a run-primary athlete in a 25m pool at UTC
#[must_use]
pub fn profile(sport: Sport) -> AthleteProfile {
    AthleteProfile::new(Uuid::new_v4(), sport)
}

/// Unremarkable healthy check-in; override fields to shape the scenario
#[must_use]
pub fn healthy_checkin(athlete_id: Uuid, date: NaiveDate) -> CheckIn {
    CheckIn {
        id: Uuid::new_v4(),
        athlete_id,
        date,
        sleep_hours: 7.5,
        sleep_quality: 4,
        physical_fatigue: 2,
        mental_readiness: 4,
        motivation: 4,
        soreness: SorenessLevel::None,
        stress: 2,
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

/// Check-in shaped to score in the low 30s: exhausted, sore, stressed
#[must_use]
pub fn depleted_checkin(athlete_id: Uuid, date: NaiveDate) -> CheckIn {
    CheckIn {
        sleep_hours: 5.0,
        sleep_quality: 2,
        physical_fatigue: 5,
        mental_readiness: 2,
        motivation: 1,
        soreness: SorenessLevel::Moderate,
        stress: 5,
        ..healthy_checkin(athlete_id, date)
    }
}

/// Journal entry with neutral 3/5 values everywhere
#[must_use]
pub fn neutral_journal_entry(athlete_id: Uuid, date: NaiveDate) -> JournalEntry {
    JournalEntry {
        id: Uuid::new_v4(),
        athlete_id,
        date,
        mood: 3,
        energy: 3,
        sleep_quality: 3,
        sleep_hours: 7.0,
        soreness: 2,
        stress: 3,
        motivation: 3,
        note: None,
        visibility: AiVisibility::FullAiAccess,
    }
}
