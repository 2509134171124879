// ABOUTME: Integration tests for the memory lifecycle - expiry windows, promotion, contradiction
// ABOUTME: All time flows through pinned clocks so the expiry assertions are exact
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

//! Memory Lifecycle Tests
//!
//! Exercises the weekly summarize / monthly infer / cleanup cycle against the
//! in-memory backend with deterministic clocks.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use cadence_coach::clock::FixedClock;
use cadence_coach::config::EngineConfig;
use cadence_coach::memory::{MemoryEngine, WeeklyWindow};
use cadence_coach::models::{
    CheckIn, MemoryLayer, MemoryType, SorenessLevel, WorkoutDecision,
};
use cadence_coach::storage::{InMemoryStorage, MemoryRepository};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

fn engine_at(storage: &Arc<InMemoryStorage>, now: DateTime<Utc>) -> MemoryEngine {
    MemoryEngine::new(
        Arc::clone(storage) as Arc<dyn MemoryRepository>,
        Arc::new(FixedClock(now)),
        EngineConfig::default(),
    )
}

fn overriding_checkin(athlete_id: Uuid, date: NaiveDate) -> CheckIn {
    CheckIn {
        physical_fatigue: 4,
        soreness: SorenessLevel::Moderate,
        readiness_score: Some(28),
        decision: Some(WorkoutDecision::Rest),
        locked: true,
        overridden: true,
        override_reason: Some("big week at work, training anyway".to_owned()),
        ..common::healthy_checkin(athlete_id, date)
    }
}

async fn write_week(
    storage: &Arc<InMemoryStorage>,
    athlete: Uuid,
    week_start: NaiveDate,
    now: DateTime<Utc>,
) {
    let engine = engine_at(storage, now);
    let checkins: Vec<CheckIn> = (0..3)
        .map(|i| overriding_checkin(athlete, week_start + Duration::days(i)))
        .collect();
    let window = WeeklyWindow {
        checkins: &checkins,
        feedback: &[],
        journal: &[],
    };
    engine
        .run_weekly_summaries(athlete, &window, week_start, week_start + Duration::days(6))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_short_term_memory_present_at_six_days_absent_at_eight() {
    let storage = Arc::new(InMemoryStorage::new());
    let athlete = Uuid::new_v4();
    let created = Utc.with_ymd_and_hms(2025, 5, 11, 12, 0, 0).unwrap();

    write_week(
        &storage,
        athlete,
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
        created,
    )
    .await;

    let at_six_days = engine_at(&storage, created + Duration::days(6));
    assert!(
        !at_six_days.current_memories(athlete).await.unwrap().is_empty(),
        "short-term memories must still be active at T+6 days"
    );

    let at_eight_days = engine_at(&storage, created + Duration::days(8));
    assert!(
        at_eight_days.current_memories(athlete).await.unwrap().is_empty(),
        "short-term memories must be expired at T+8 days"
    );
}

#[tokio::test]
async fn test_three_override_weeks_promote_long_term_trait() {
    let storage = Arc::new(InMemoryStorage::new());
    let athlete = Uuid::new_v4();
    let month_end = Utc.with_ymd_and_hms(2025, 5, 25, 12, 0, 0).unwrap();

    // Three weekly summaries close enough together that none expire before
    // the monthly job runs.
    for (week, days_back) in [(5, 6), (12, 4), (19, 2)] {
        write_week(
            &storage,
            athlete,
            NaiveDate::from_ymd_opt(2025, 5, week).unwrap(),
            month_end - Duration::days(days_back),
        )
        .await;
    }

    let engine = engine_at(&storage, month_end);
    let committed = engine
        .run_monthly_inference(
            athlete,
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 25).unwrap(),
        )
        .await
        .unwrap();

    let trait_record = committed
        .iter()
        .find(|m| m.memory_type == MemoryType::OverridePattern)
        .expect("override trait committed");
    assert_eq!(trait_record.layer, MemoryLayer::LongTerm);
    assert!(trait_record.expires_at.is_none(), "long-term never expires");
    assert!(trait_record.confidence >= 50);
    assert!(trait_record.title.contains("push through fatigue"));
}

#[tokio::test]
async fn test_weekly_rerun_supersedes_without_deleting() {
    let storage = Arc::new(InMemoryStorage::new());
    let athlete = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2025, 5, 11, 12, 0, 0).unwrap();
    let week = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();

    write_week(&storage, athlete, week, now).await;
    write_week(&storage, athlete, week, now + Duration::hours(1)).await;

    let log = storage.all_memories_for(athlete);
    let current: Vec<_> = log.iter().filter(|m| m.superseded_by.is_none()).collect();
    let superseded: Vec<_> = log.iter().filter(|m| m.superseded_by.is_some()).collect();
    assert_eq!(current.len(), superseded.len(), "each rerun supersedes its prior");
    assert!(!superseded.is_empty());
    for old in &superseded {
        let successor = old.superseded_by.unwrap();
        assert!(
            log.iter().any(|m| m.id == successor),
            "supersession pointer must reference a live log entry"
        );
    }
}

#[tokio::test]
async fn test_cleanup_deletes_expired_and_audits_once() {
    let storage = Arc::new(InMemoryStorage::new());
    let athlete = Uuid::new_v4();
    let created = Utc.with_ymd_and_hms(2025, 5, 11, 12, 0, 0).unwrap();

    write_week(
        &storage,
        athlete,
        NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
        created,
    )
    .await;

    let later = engine_at(&storage, created + Duration::days(10));
    let deleted = later.cleanup_expired(athlete).await.unwrap();
    assert!(deleted > 0);
    assert_eq!(storage.audits_for(athlete).len(), 1);

    // Second pass finds nothing; no extra audit record.
    assert_eq!(later.cleanup_expired(athlete).await.unwrap(), 0);
    assert_eq!(storage.audits_for(athlete).len(), 1);
}
