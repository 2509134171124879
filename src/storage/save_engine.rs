// ABOUTME: Idempotent save engine - content-hashed create/replace/upsert with per-key serialization
// ABOUTME: Refuses to persist swim prescriptions whose block distances do not sum to the total
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::{local_day_bounds, Clock};
use crate::errors::{CoachError, Result};
use crate::models::{Sport, StructuredPlan, Workout, WorkoutPrescription};
use crate::prescription::render_markdown;

use super::WorkoutRepository;

/// How the caller wants an existing same-day record treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Always create a new record, even alongside an existing one
    Create,
    /// Overwrite the existing same-day record; error when none exists
    Replace,
    /// Overwrite when a same-day record exists, create otherwise
    Upsert,
}

/// What the save actually did. Exactly one of the three cases holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was written
    Created,
    /// An existing record was overwritten with changed content
    Updated,
    /// An identical record already existed; nothing was written
    Reused,
}

impl SaveOutcome {
    /// Whether a new record was written
    #[must_use]
    pub const fn created(self) -> bool {
        matches!(self, Self::Created)
    }

    /// Whether an existing record was overwritten
    #[must_use]
    pub const fn updated(self) -> bool {
        matches!(self, Self::Updated)
    }

    /// Whether an identical record already existed
    #[must_use]
    pub const fn reused(self) -> bool {
        matches!(self, Self::Reused)
    }
}

/// Result of one save call: the outcome, why, and the resulting record
#[derive(Debug, Clone)]
pub struct SaveReport {
    /// What the save did (exactly one case)
    pub outcome: SaveOutcome,
    /// Human-readable reason for the outcome
    pub reason: String,
    /// The record as it now exists in storage
    pub workout: Workout,
}

/// Fields that participate in the content hash, in fixed declaration order.
///
/// System fields (IDs, timestamps, provenance) are excluded so re-saving the
/// same prescription hashes identically.
#[derive(Serialize)]
struct HashableContent<'a> {
    title: &'a str,
    duration_min: u32,
    distance_m: Option<u32>,
    description_md: &'a str,
    structured_plan: &'a Option<StructuredPlan>,
}

/// Idempotent prescription persistence over a [`WorkoutRepository`]
pub struct SaveEngine {
    repository: Arc<dyn WorkoutRepository>,
    clock: Arc<dyn Clock>,
    // Serializes saves per (athlete, local day, sport) so two concurrent
    // upserts cannot both miss the same-day lookup and double-create.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SaveEngine {
    /// Create a save engine over the given repository and clock
    #[must_use]
    pub fn new(repository: Arc<dyn WorkoutRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            locks: DashMap::new(),
        }
    }

    /// Save a prescription for the athlete.
    ///
    /// Same-day matching buckets by the athlete-local calendar day using the
    /// profile's fixed UTC offset. Swim prescriptions are validated before any
    /// write: block distances must sum exactly to the session total.
    pub async fn save(
        &self,
        athlete_id: Uuid,
        utc_offset_minutes: i32,
        prescription: &WorkoutPrescription,
        mode: SaveMode,
    ) -> Result<SaveReport> {
        validate_distance(prescription)?;

        let key = lock_key(athlete_id, prescription.date, prescription.sport);
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let (start, end) = local_day_bounds(prescription.date, utc_offset_minutes);
        let existing = if mode == SaveMode::Create {
            None
        } else {
            self.repository
                .find_latest_matching(athlete_id, start, end, prescription.sport)
                .await?
        };

        let description_md = render_markdown(prescription);
        let structured_plan = Some(prescription.to_structured_plan());
        let content_hash = hash_content(prescription, &description_md, &structured_plan)?;

        match (mode, existing) {
            (SaveMode::Replace, None) => Err(CoachError::NoWorkoutToReplace {
                sport: prescription.sport.to_string(),
                date: prescription.date.to_string(),
            }),
            (SaveMode::Replace | SaveMode::Upsert, Some(current)) => {
                let current_hash = hash_workout(&current)?;
                if current_hash == content_hash {
                    debug!(workout_id = %current.id, "identical content, save skipped");
                    return Ok(SaveReport {
                        outcome: SaveOutcome::Reused,
                        reason: "identical content already stored for this day".to_owned(),
                        workout: current,
                    });
                }
                let mut updated = current;
                updated.title.clone_from(&prescription.title);
                updated.duration_min = prescription.duration_min;
                updated.distance_m = prescription.distance_m;
                updated.description_md = description_md;
                updated.structured_plan = structured_plan;
                updated.confidence = prescription.confidence;
                updated.updated_at = self.clock.now();
                self.repository.update(&updated).await?;
                info!(workout_id = %updated.id, sport = %updated.sport, "workout updated in place");
                Ok(SaveReport {
                    outcome: SaveOutcome::Updated,
                    reason: "existing same-day record had different content".to_owned(),
                    workout: updated,
                })
            }
            (SaveMode::Create | SaveMode::Upsert, _) => {
                let now = self.clock.now();
                let workout = Workout {
                    id: Uuid::new_v4(),
                    athlete_id,
                    date: start,
                    sport: prescription.sport,
                    title: prescription.title.clone(),
                    duration_min: prescription.duration_min,
                    distance_m: prescription.distance_m,
                    planned: true,
                    completed: false,
                    description_md,
                    structured_plan,
                    ai_generated: true,
                    source: "coach-engine".to_owned(),
                    confidence: prescription.confidence,
                    created_at: now,
                    updated_at: now,
                };
                self.repository.create(&workout).await?;
                info!(workout_id = %workout.id, sport = %workout.sport, "workout created");
                let reason = if mode == SaveMode::Create {
                    "separate session requested".to_owned()
                } else {
                    "no existing record for this day and sport".to_owned()
                };
                Ok(SaveReport {
                    outcome: SaveOutcome::Created,
                    reason,
                    workout,
                })
            }
        }
    }
}

fn lock_key(athlete_id: Uuid, date: NaiveDate, sport: Sport) -> String {
    format!("{athlete_id}:{date}:{sport}")
}

/// Refuse distance-carrying prescriptions whose blocks do not sum to the total
fn validate_distance(prescription: &WorkoutPrescription) -> Result<()> {
    if let Some(requested) = prescription.distance_m {
        let generated = prescription.total_block_distance();
        if generated != requested {
            return Err(CoachError::DistanceMismatch {
                requested_m: requested,
                generated_m: generated,
            });
        }
    }
    Ok(())
}

fn hash_fields(content: &HashableContent<'_>) -> Result<String> {
    let canonical = serde_json::to_vec(content)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

fn hash_content(
    prescription: &WorkoutPrescription,
    description_md: &str,
    structured_plan: &Option<StructuredPlan>,
) -> Result<String> {
    hash_fields(&HashableContent {
        title: &prescription.title,
        duration_min: prescription.duration_min,
        distance_m: prescription.distance_m,
        description_md,
        structured_plan,
    })
}

fn hash_workout(workout: &Workout) -> Result<String> {
    hash_fields(&HashableContent {
        title: &workout.title,
        duration_min: workout.duration_min,
        distance_m: workout.distance_m,
        description_md: &workout.description_md,
        structured_plan: &workout.structured_plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::intelligence::training_load::TrainingContext;
    use crate::models::{AthleteProfile, SessionIntent};
    use crate::prescription::{GenerationInputs, PrescriptionGenerator};
    use crate::storage::InMemoryStorage;
    use chrono::{TimeZone, Utc};

    fn prescription(sport: Sport, distance_m: Option<u32>) -> WorkoutPrescription {
        let date = NaiveDate::from_ymd_opt(2025, 5, 10).expect("valid date");
        let mut intent = SessionIntent::new(sport, date);
        intent.distance_m = distance_m;
        let profile = AthleteProfile::new(Uuid::new_v4(), sport);
        let training = TrainingContext::empty();
        PrescriptionGenerator::default().generate(&GenerationInputs {
            intent: &intent,
            profile: &profile,
            checkin: None,
            readiness: None,
            training: &training,
            planned_week: &[],
            previous_week_load: 0.0,
            recent_workouts: &[],
            historical_sport_sessions: 10,
        })
    }

    fn engine(storage: &Arc<InMemoryStorage>) -> SaveEngine {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap());
        SaveEngine::new(Arc::clone(storage) as Arc<dyn WorkoutRepository>, Arc::new(clock))
    }

    #[tokio::test]
    async fn upsert_creates_then_reuses_identical_content() {
        let storage = Arc::new(InMemoryStorage::new());
        let engine = engine(&storage);
        let athlete = Uuid::new_v4();
        let p = prescription(Sport::Run, None);

        let first = engine.save(athlete, 0, &p, SaveMode::Upsert).await.unwrap();
        assert!(first.outcome.created());

        let second = engine.save(athlete, 0, &p, SaveMode::Upsert).await.unwrap();
        assert!(second.outcome.reused());
        assert!(!second.outcome.created());
        assert!(!second.outcome.updated());
        assert_eq!(storage.workout_count(), 1);
    }

    #[tokio::test]
    async fn second_replace_with_identical_content_is_reused() {
        let storage = Arc::new(InMemoryStorage::new());
        let engine = engine(&storage);
        let athlete = Uuid::new_v4();
        let p = prescription(Sport::Run, None);

        engine.save(athlete, 0, &p, SaveMode::Upsert).await.unwrap();
        let report = engine.save(athlete, 0, &p, SaveMode::Replace).await.unwrap();
        assert_eq!(report.outcome, SaveOutcome::Reused);
        assert_eq!(storage.workout_count(), 1);
    }

    #[tokio::test]
    async fn replace_without_existing_record_errors() {
        let storage = Arc::new(InMemoryStorage::new());
        let engine = engine(&storage);
        let p = prescription(Sport::Run, None);
        let err = engine
            .save(Uuid::new_v4(), 0, &p, SaveMode::Replace)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::NoWorkoutToReplace { .. }));
    }

    #[tokio::test]
    async fn changed_content_updates_in_place() {
        let storage = Arc::new(InMemoryStorage::new());
        let engine = engine(&storage);
        let athlete = Uuid::new_v4();

        let first = prescription(Sport::Swim, Some(1800));
        engine.save(athlete, 0, &first, SaveMode::Upsert).await.unwrap();

        let second = prescription(Sport::Swim, Some(3500));
        let report = engine
            .save(athlete, 0, &second, SaveMode::Upsert)
            .await
            .unwrap();
        assert_eq!(report.outcome, SaveOutcome::Updated);
        assert_eq!(report.workout.distance_m, Some(3500));
        assert_eq!(storage.workout_count(), 1);
    }

    #[tokio::test]
    async fn distance_mismatch_is_refused_before_write() {
        let storage = Arc::new(InMemoryStorage::new());
        let engine = engine(&storage);
        let mut p = prescription(Sport::Swim, Some(2000));
        // Corrupt one block so the sum no longer matches.
        if let Some(step) = p.main.first_mut() {
            step.distance_m = step.distance_m.map(|m| m - 50);
        }
        let err = engine
            .save(Uuid::new_v4(), 0, &p, SaveMode::Upsert)
            .await
            .unwrap_err();
        assert!(matches!(err, CoachError::DistanceMismatch { .. }));
        assert_eq!(storage.workout_count(), 0);
    }

    #[tokio::test]
    async fn saved_workout_carries_generation_confidence() {
        let storage = Arc::new(InMemoryStorage::new());
        let engine = engine(&storage);
        let athlete = Uuid::new_v4();

        let mut p = prescription(Sport::Run, None);
        p.confidence = Some(82);
        let report = engine.save(athlete, 0, &p, SaveMode::Upsert).await.unwrap();
        assert_eq!(report.workout.confidence, Some(82));

        // A changed re-save refreshes the stored confidence too.
        p.duration_min += 10;
        p.confidence = Some(64);
        let report = engine.save(athlete, 0, &p, SaveMode::Replace).await.unwrap();
        assert_eq!(report.outcome, SaveOutcome::Updated);
        assert_eq!(report.workout.confidence, Some(64));
    }

    #[tokio::test]
    async fn create_mode_allows_a_second_same_day_session() {
        let storage = Arc::new(InMemoryStorage::new());
        let engine = engine(&storage);
        let athlete = Uuid::new_v4();
        let p = prescription(Sport::Run, None);

        engine.save(athlete, 0, &p, SaveMode::Upsert).await.unwrap();
        let report = engine.save(athlete, 0, &p, SaveMode::Create).await.unwrap();
        assert_eq!(report.outcome, SaveOutcome::Created);
        assert_eq!(storage.workout_count(), 2);
    }
}
