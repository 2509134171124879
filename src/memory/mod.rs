// ABOUTME: Memory engine - weekly summaries, monthly trait inference, expiry cleanup, corrections
// ABOUTME: The log is append-only; supersession sets a pointer and never deletes history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

/// Confidence scoring formula
pub mod confidence;
/// Monthly trait inference over weekly memories
pub mod inference;
/// Numeric-only explainability snippets
pub mod snippets;
/// Weekly pattern summarizers
pub mod summarizer;

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::errors::Result;
use crate::models::{AuditRecord, MemoryLayer, MemoryRecord, MemoryType};
use crate::storage::MemoryRepository;

pub use confidence::{calculate_confidence, ConfidenceInputs};
pub use inference::{annotate_contradiction, infer_candidates, TraitCandidate, TraitPolarity};
pub use snippets::{checkin_snippet, feedback_snippet, journal_snippet};
pub use summarizer::{summarize_week, SummarySeed, WeeklyWindow};

/// Fixed confidence penalty applied when the athlete corrects a memory
const CORRECTION_PENALTY: u8 = 15;

/// Orchestrates the layered memory lifecycle over a [`MemoryRepository`]
pub struct MemoryEngine {
    repository: Arc<dyn MemoryRepository>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl MemoryEngine {
    /// Create an engine over the given repository and clock
    #[must_use]
    pub fn new(
        repository: Arc<dyn MemoryRepository>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Weekly job: run the four summarizers over the window and upsert each
    /// non-null result as a short-term memory.
    ///
    /// Upserting supersedes the prior record of the same (type, layer) by
    /// setting its pointer; history is never deleted.
    pub async fn run_weekly_summaries(
        &self,
        athlete_id: Uuid,
        window: &WeeklyWindow<'_>,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Vec<MemoryRecord>> {
        let seeds = summarize_week(window);
        let mut written = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let record = self
                .upsert_short_term(athlete_id, seed, period_start, period_end)
                .await?;
            written.push(record);
        }
        info!(%athlete_id, count = written.len(), "weekly memory summaries written");
        Ok(written)
    }

    async fn upsert_short_term(
        &self,
        athlete_id: Uuid,
        seed: SummarySeed,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<MemoryRecord> {
        let now = self.clock.now();
        let previous = self
            .repository
            .find_current(athlete_id, Some(seed.memory_type), Some(MemoryLayer::ShortTerm), now)
            .await?
            .into_iter()
            .max_by_key(|m| m.created_at);

        let confidence = calculate_confidence(&ConfidenceInputs {
            data_points: seed.data_points,
            has_recent_data: true,
            contradiction_count: 0,
            layer: MemoryLayer::ShortTerm,
            weeks_since_update: 0,
        });

        let record = MemoryRecord {
            id: Uuid::new_v4(),
            athlete_id,
            layer: MemoryLayer::ShortTerm,
            memory_type: seed.memory_type,
            title: seed.title,
            summary: seed.summary,
            confidence,
            data_points: seed.data_points,
            sources: seed.sources,
            period_start,
            period_end,
            expires_at: MemoryLayer::ShortTerm.expiry_from(now),
            version: previous.as_ref().map_or(1, |p| p.version + 1),
            superseded_by: None,
            created_at: now,
            updated_at: now,
        };
        self.repository.create(&record).await?;

        if let Some(mut old) = previous {
            old.superseded_by = Some(record.id);
            old.updated_at = now;
            self.repository.update(&old).await?;
            debug!(superseded = %old.id, by = %record.id, "short-term memory superseded");
        }
        Ok(record)
    }

    /// Monthly job: promote recurring weekly patterns to long-term traits.
    ///
    /// Candidates are checked against existing long-term traits of the same
    /// type for polarity contradictions; a contradiction annotates the
    /// summary and applies the punitive confidence term. Only candidates at
    /// or above the commit threshold are written.
    pub async fn run_monthly_inference(
        &self,
        athlete_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Vec<MemoryRecord>> {
        let now = self.clock.now();
        // Every weekly observation in the period counts as a contributor,
        // superseded or not; supersession only shapes the current view.
        let period_start_utc = period_start
            .and_hms_opt(0, 0, 0)
            .map_or(now, |dt| chrono::TimeZone::from_utc_datetime(&Utc, &dt));
        let contributors: Vec<MemoryRecord> = self
            .repository
            .find_created_between(athlete_id, period_start_utc, now + Duration::days(1))
            .await?
            .into_iter()
            .filter(|m| m.layer != MemoryLayer::LongTerm)
            .collect();

        let mut committed = Vec::new();
        for mut candidate in infer_candidates(&contributors, self.config.trait_min_contributors) {
            let existing = self
                .repository
                .find_current(
                    athlete_id,
                    Some(candidate.memory_type),
                    Some(MemoryLayer::LongTerm),
                    now,
                )
                .await?;
            for prior in &existing {
                if TraitPolarity::from_summary(&prior.summary)
                    .is_some_and(|p| p.contradicts(candidate.polarity))
                {
                    annotate_contradiction(&mut candidate, &prior.title);
                }
            }

            let has_recent_data = period_end >= (now - Duration::days(7)).date_naive();
            let confidence = calculate_confidence(&ConfidenceInputs {
                data_points: candidate.data_points,
                has_recent_data,
                contradiction_count: candidate.contradiction_count,
                layer: MemoryLayer::LongTerm,
                weeks_since_update: 0,
            });
            if confidence < self.config.trait_commit_confidence {
                debug!(
                    title = %candidate.title,
                    confidence,
                    "trait candidate below commit threshold, skipped"
                );
                continue;
            }

            let previous = existing.into_iter().max_by_key(|m| m.created_at);
            let record = MemoryRecord {
                id: Uuid::new_v4(),
                athlete_id,
                layer: MemoryLayer::LongTerm,
                memory_type: candidate.memory_type,
                title: candidate.title,
                summary: candidate.summary,
                confidence,
                data_points: candidate.data_points,
                sources: candidate.sources,
                period_start,
                period_end,
                expires_at: None,
                version: previous.as_ref().map_or(1, |p| p.version + 1),
                superseded_by: None,
                created_at: now,
                updated_at: now,
            };
            self.repository.create(&record).await?;

            if let Some(mut old) = previous {
                old.superseded_by = Some(record.id);
                old.updated_at = now;
                self.repository.update(&old).await?;
            }
            info!(trait_title = %record.title, confidence, "long-term trait committed");
            committed.push(record);
        }
        Ok(committed)
    }

    /// Cleanup pass: delete expired memories, emitting one audit record for
    /// the whole batch (not one per record). A batch of zero emits nothing.
    pub async fn cleanup_expired(&self, athlete_id: Uuid) -> Result<usize> {
        let now = self.clock.now();
        let deleted = self.repository.delete_expired(athlete_id, now).await?;
        if deleted > 0 {
            let audit = AuditRecord {
                id: Uuid::new_v4(),
                athlete_id,
                event: "memory_cleanup".to_owned(),
                detail: format!("deleted {deleted} expired memories"),
                created_at: now,
            };
            self.repository.append_audit(&audit).await?;
            info!(%athlete_id, deleted, "expired memories cleaned up");
        }
        Ok(deleted)
    }

    /// Athlete correction: reduce confidence by the fixed penalty and bump
    /// the version counter.
    pub async fn correct_memory(
        &self,
        athlete_id: Uuid,
        memory_type: MemoryType,
        layer: MemoryLayer,
    ) -> Result<Option<MemoryRecord>> {
        let current = self
            .repository
            .find_current(athlete_id, Some(memory_type), Some(layer), self.clock.now())
            .await?
            .into_iter()
            .max_by_key(|m| m.created_at);

        let Some(mut record) = current else {
            return Ok(None);
        };
        record.confidence = record.confidence.saturating_sub(CORRECTION_PENALTY);
        record.version += 1;
        record.updated_at = self.clock.now();
        self.repository.update(&record).await?;
        info!(memory_id = %record.id, confidence = record.confidence, "memory corrected by athlete");
        Ok(Some(record))
    }

    /// Current non-superseded, non-expired memories for prompt assembly
    pub async fn current_memories(&self, athlete_id: Uuid) -> Result<Vec<MemoryRecord>> {
        self.repository
            .find_current(athlete_id, None, None, self.clock.now())
            .await
    }
}
