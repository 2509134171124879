// ABOUTME: Layered athlete memory records with decay, supersession, and weak source references
// ABOUTME: Append-only log; the "current" view filters where superseded_by is none
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Memory layer, governing expiry and contribution to trait inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryLayer {
    /// Expires 7 days after creation
    ShortTerm,
    /// Expires 30 days after creation
    MidTerm,
    /// Never expires
    LongTerm,
}

impl MemoryLayer {
    /// Expiry horizon from creation, `None` for long-term
    #[must_use]
    pub fn expiry_from(self, created_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::ShortTerm => Some(created_at + Duration::days(7)),
            Self::MidTerm => Some(created_at + Duration::days(30)),
            Self::LongTerm => None,
        }
    }
}

/// What kind of observation a memory captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemoryType {
    /// Mood, stress, and motivation patterns
    Psychological,
    /// How the athlete responds to accumulated load
    FatigueResponse,
    /// Stated or revealed training preferences
    Preference,
    /// How the athlete likes to be communicated with
    Communication,
    /// Pattern of overriding engine decisions
    OverridePattern,
    /// Recurring semantic tags in free-text feedback
    LanguagePattern,
}

/// Weak back-references to the records a memory was derived from.
///
/// IDs only, never raw free text. Deleting a source does not cascade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRefs {
    /// Contributing check-in IDs
    pub checkin_ids: Vec<Uuid>,
    /// Contributing feedback IDs
    pub feedback_ids: Vec<Uuid>,
    /// Contributing diary entry IDs
    pub diary_ids: Vec<Uuid>,
}

impl SourceRefs {
    /// Total number of contributing source records
    #[must_use]
    pub fn count(&self) -> usize {
        self.checkin_ids.len() + self.feedback_ids.len() + self.diary_ids.len()
    }
}

/// One confidence-scored, decaying athlete memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Memory layer
    pub layer: MemoryLayer,
    /// Observation type
    pub memory_type: MemoryType,
    /// Short title
    pub title: String,
    /// Human-readable summary
    pub summary: String,
    /// Confidence 0-100
    pub confidence: u8,
    /// Number of underlying data points
    pub data_points: u32,
    /// Weak back-references for explainability
    pub sources: SourceRefs,
    /// Observation period start
    pub period_start: NaiveDate,
    /// Observation period end
    pub period_end: NaiveDate,
    /// Expiry instant; `None` for long-term memories
    pub expires_at: Option<DateTime<Utc>>,
    /// Version counter, bumped on correction
    pub version: u32,
    /// Newer record of the same (type, layer) that replaced this one
    pub superseded_by: Option<Uuid>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Whether this record is part of the current (non-superseded) view
    #[must_use]
    pub const fn is_current(&self) -> bool {
        self.superseded_by.is_none()
    }

    /// Whether the record has expired as of `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Append-only audit record for memory lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier
    pub id: Uuid,
    /// Owning athlete
    pub athlete_id: Uuid,
    /// Event kind (e.g. "memory_cleanup", "checkin_override")
    pub event: String,
    /// Free-form detail (counts, reasons)
    pub detail: String,
    /// When the event happened
    pub created_at: DateTime<Utc>,
}
