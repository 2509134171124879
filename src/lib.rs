// ABOUTME: Main library entry point for the Cadence coach decision engine
// ABOUTME: Deterministic coaching core - readiness, guardrails, prescriptions, layered memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

#![deny(unsafe_code)]

//! # Cadence Coach
//!
//! The deterministic decision core of an endurance coaching platform: the
//! explainable rules an AI conversation layer calls into, never the other
//! way around.
//!
//! ## Components
//!
//! - **Readiness evaluator**: scores a daily check-in 0-100 and derives a
//!   discrete workout decision with confidence and weighted reasons
//! - **Guardrail evaluator**: weekly load, week-over-week ramp rate, and
//!   risk scoring with concrete trim adjustments
//! - **Fatigue classifier**: CNS / muscular / metabolic / psychological
//!   scoring with a dominance threshold
//! - **Prescription generator**: sport-specific structured workouts with
//!   block splits, intensity targets, and an explainable "why" object
//! - **Save engine**: idempotent create/replace/upsert keyed by
//!   (athlete, local day, sport) with content hashing
//! - **Memory engine**: layered short/mid/long-term athlete memories with
//!   decay, supersession, and monthly trait inference
//! - **Journal pattern detector**: streak, burnout, and trend detection
//!   plus Pearson correlation over paired daily series
//!
//! ## Example
//!
//! ```rust
//! use cadence_coach::intelligence::ReadinessEvaluator;
//! use cadence_coach::models::{CheckIn, SorenessLevel};
//! use chrono::{NaiveDate, Utc};
//! use uuid::Uuid;
//!
//! let checkin = CheckIn {
//!     id: Uuid::new_v4(),
//!     athlete_id: Uuid::new_v4(),
//!     date: NaiveDate::from_ymd_opt(2025, 5, 10).expect("valid date"),
//!     sleep_hours: 7.5,
//!     sleep_quality: 4,
//!     physical_fatigue: 2,
//!     mental_readiness: 4,
//!     motivation: 4,
//!     soreness: SorenessLevel::Mild,
//!     stress: 2,
//!     notes: None,
//!     readiness_score: None,
//!     decision: None,
//!     confidence: None,
//!     locked: false,
//!     overridden: false,
//!     override_reason: None,
//!     created_at: Utc::now(),
//! };
//!
//! let assessment = ReadinessEvaluator::assess(&checkin);
//! assert!(assessment.score >= 70);
//! ```

/// Injected clock abstraction for deterministic time
pub mod clock;

/// Engine configuration with environment overrides
pub mod config;

/// Unified error types
pub mod errors;

/// Pure evaluators: training load, guardrails, readiness, fatigue, patterns
pub mod intelligence;

/// Structured logging initialization
pub mod logging;

/// Layered athlete memory engine
pub mod memory;

/// Domain models shared across the engine
pub mod models;

/// Prescription generation pipeline and markdown rendering
pub mod prescription;

/// Repository traits, in-memory backend, and the idempotent save engine
pub mod storage;

pub use errors::{CoachError, Result};
