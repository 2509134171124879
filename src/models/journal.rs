// ABOUTME: Journal entries and athlete feedback consumed by pattern detection and the memory engine
// ABOUTME: Visibility levels gate what free text the engine may ever surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How much of an entry the engine is allowed to read and surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiVisibility {
    /// Entry is invisible to the engine; never read, never surfaced
    Hidden,
    /// Numeric fields only; free text must never be surfaced
    MetricsOnly,
    /// Numeric fields plus extracted semantic tags (never verbatim quotes)
    FullAiAccess,
}

/// One diary entry on the athlete's journal, 1-5 scales throughout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Athlete-local calendar date
    pub date: NaiveDate,
    /// Mood, 1-5
    pub mood: u8,
    /// Energy, 1-5
    pub energy: u8,
    /// Sleep quality, 1-5
    pub sleep_quality: u8,
    /// Sleep duration in hours
    pub sleep_hours: f64,
    /// Soreness, 1-5
    pub soreness: u8,
    /// Stress, 1-5
    pub stress: u8,
    /// Motivation, 1-5
    pub motivation: u8,
    /// Free-text note
    pub note: Option<String>,
    /// Visibility level gating engine access
    pub visibility: AiVisibility,
}

/// Athlete feedback on an engine decision or generated workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// When the feedback was given
    pub created_at: DateTime<Utc>,
    /// Free-text comment
    pub comment: String,
    /// Semantic tags extracted upstream (e.g. "too-hard", "loved-intervals")
    pub tags: Vec<String>,
    /// Whether the engine may read this feedback
    pub visible_to_ai: bool,
}
