// ABOUTME: Storage abstraction - repository traits for workouts, memories, and athlete context
// ABOUTME: The engine core depends only on these traits; backends live behind them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

/// In-memory repository backend for tests and embedders
pub mod in_memory;
/// Idempotent prescription save engine
pub mod save_engine;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{
    AthleteProfile, AuditRecord, MemoryLayer, MemoryRecord, MemoryType, Sport, Workout,
};

pub use in_memory::InMemoryStorage;
pub use save_engine::{SaveEngine, SaveMode, SaveOutcome, SaveReport};

/// Persistence boundary for workout records
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// All workouts for an athlete scheduled inside `[start, end)`
    async fn find_in_range(
        &self,
        athlete_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Workout>>;

    /// The most recently created workout for the (athlete, UTC range, sport)
    /// key, or `None`. This is the save engine's same-day lookup.
    async fn find_latest_matching(
        &self,
        athlete_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sport: Sport,
    ) -> Result<Option<Workout>>;

    /// Persist a new workout record
    async fn create(&self, workout: &Workout) -> Result<()>;

    /// Overwrite an existing workout record in place
    async fn update(&self, workout: &Workout) -> Result<()>;
}

/// Persistence boundary for the layered memory log
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// Current (non-superseded, non-expired as of `now`) memories for an
    /// athlete, optionally filtered by type and layer. `now` is injected so
    /// callers with a pinned clock stay deterministic.
    async fn find_current(
        &self,
        athlete_id: Uuid,
        memory_type: Option<MemoryType>,
        layer: Option<MemoryLayer>,
        now: DateTime<Utc>,
    ) -> Result<Vec<MemoryRecord>>;

    /// All memories created inside `[start, end)`, including superseded
    /// ones. Monthly trait inference counts every weekly observation in the
    /// period as a contributor; supersession only shapes the current view.
    async fn find_created_between(
        &self,
        athlete_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MemoryRecord>>;

    /// Append a new memory record
    async fn create(&self, record: &MemoryRecord) -> Result<()>;

    /// Overwrite an existing memory record (supersession pointer, version bump)
    async fn update(&self, record: &MemoryRecord) -> Result<()>;

    /// Delete expired memories for an athlete; returns how many were removed
    async fn delete_expired(&self, athlete_id: Uuid, now: DateTime<Utc>) -> Result<usize>;

    /// Append an audit record
    async fn append_audit(&self, record: &AuditRecord) -> Result<()>;
}

/// Read access to athlete profiles
#[async_trait]
pub trait AthleteContextProvider: Send + Sync {
    /// The athlete's profile, or a not-found error
    async fn athlete_profile(&self, athlete_id: Uuid) -> Result<AthleteProfile>;
}
