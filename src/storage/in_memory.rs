// ABOUTME: Dashmap-backed in-memory storage implementing every repository trait
// ABOUTME: Used by the test suite and by embedders that do not need durability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::{CoachError, Result};
use crate::models::{
    AthleteProfile, AuditRecord, MemoryLayer, MemoryRecord, MemoryType, Sport, Workout,
};

use super::{AthleteContextProvider, MemoryRepository, WorkoutRepository};

/// In-memory backend keyed by record ID, with per-athlete scans
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    workouts: DashMap<Uuid, Workout>,
    memories: DashMap<Uuid, MemoryRecord>,
    audits: DashMap<Uuid, AuditRecord>,
    profiles: DashMap<Uuid, AthleteProfile>,
}

impl InMemoryStorage {
    /// Fresh, empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an athlete profile
    pub fn insert_profile(&self, profile: AthleteProfile) {
        self.profiles.insert(profile.id, profile);
    }

    /// All audit records for an athlete, oldest first
    #[must_use]
    pub fn audits_for(&self, athlete_id: Uuid) -> Vec<AuditRecord> {
        let mut records: Vec<AuditRecord> = self
            .audits
            .iter()
            .filter(|entry| entry.athlete_id == athlete_id)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| r.created_at);
        records
    }

    /// Every stored memory for an athlete, including superseded and expired
    /// ones, oldest first. Tests use this to inspect the full log.
    #[must_use]
    pub fn all_memories_for(&self, athlete_id: Uuid) -> Vec<MemoryRecord> {
        let mut records: Vec<MemoryRecord> = self
            .memories
            .iter()
            .filter(|entry| entry.athlete_id == athlete_id)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|r| r.created_at);
        records
    }

    /// Number of stored workouts across all athletes
    #[must_use]
    pub fn workout_count(&self) -> usize {
        self.workouts.len()
    }
}

#[async_trait]
impl WorkoutRepository for InMemoryStorage {
    async fn find_in_range(
        &self,
        athlete_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Workout>> {
        let mut found: Vec<Workout> = self
            .workouts
            .iter()
            .filter(|w| w.athlete_id == athlete_id && w.date >= start && w.date < end)
            .map(|w| w.value().clone())
            .collect();
        found.sort_by_key(|w| w.date);
        Ok(found)
    }

    async fn find_latest_matching(
        &self,
        athlete_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sport: Sport,
    ) -> Result<Option<Workout>> {
        let latest = self
            .workouts
            .iter()
            .filter(|w| {
                w.athlete_id == athlete_id && w.sport == sport && w.date >= start && w.date < end
            })
            .map(|w| w.value().clone())
            .max_by_key(|w| w.created_at);
        Ok(latest)
    }

    async fn create(&self, workout: &Workout) -> Result<()> {
        self.workouts.insert(workout.id, workout.clone());
        Ok(())
    }

    async fn update(&self, workout: &Workout) -> Result<()> {
        if !self.workouts.contains_key(&workout.id) {
            return Err(CoachError::NotFound {
                entity: "workout",
                id: workout.id.to_string(),
            });
        }
        self.workouts.insert(workout.id, workout.clone());
        Ok(())
    }
}

#[async_trait]
impl MemoryRepository for InMemoryStorage {
    async fn find_current(
        &self,
        athlete_id: Uuid,
        memory_type: Option<MemoryType>,
        layer: Option<MemoryLayer>,
        now: DateTime<Utc>,
    ) -> Result<Vec<MemoryRecord>> {
        let mut found: Vec<MemoryRecord> = self
            .memories
            .iter()
            .filter(|m| {
                m.athlete_id == athlete_id
                    && m.is_current()
                    && !m.is_expired(now)
                    && memory_type.is_none_or(|t| m.memory_type == t)
                    && layer.is_none_or(|l| m.layer == l)
            })
            .map(|m| m.value().clone())
            .collect();
        found.sort_by_key(|m| m.created_at);
        Ok(found)
    }

    async fn find_created_between(
        &self,
        athlete_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MemoryRecord>> {
        let mut found: Vec<MemoryRecord> = self
            .memories
            .iter()
            .filter(|m| {
                m.athlete_id == athlete_id && m.created_at >= start && m.created_at < end
            })
            .map(|m| m.value().clone())
            .collect();
        found.sort_by_key(|m| m.created_at);
        Ok(found)
    }

    async fn create(&self, record: &MemoryRecord) -> Result<()> {
        self.memories.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &MemoryRecord) -> Result<()> {
        if !self.memories.contains_key(&record.id) {
            return Err(CoachError::NotFound {
                entity: "memory",
                id: record.id.to_string(),
            });
        }
        self.memories.insert(record.id, record.clone());
        Ok(())
    }

    async fn delete_expired(&self, athlete_id: Uuid, now: DateTime<Utc>) -> Result<usize> {
        let expired: Vec<Uuid> = self
            .memories
            .iter()
            .filter(|m| m.athlete_id == athlete_id && m.is_expired(now))
            .map(|m| m.id)
            .collect();
        for id in &expired {
            self.memories.remove(id);
        }
        Ok(expired.len())
    }

    async fn append_audit(&self, record: &AuditRecord) -> Result<()> {
        self.audits.insert(record.id, record.clone());
        Ok(())
    }
}

#[async_trait]
impl AthleteContextProvider for InMemoryStorage {
    async fn athlete_profile(&self, athlete_id: Uuid) -> Result<AthleteProfile> {
        self.profiles
            .get(&athlete_id)
            .map(|p| p.value().clone())
            .ok_or(CoachError::NotFound {
                entity: "athlete",
                id: athlete_id.to_string(),
            })
    }
}
