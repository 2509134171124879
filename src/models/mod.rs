// ABOUTME: Core domain models for the coach decision engine
// ABOUTME: Check-ins, workouts, athletes, intents, memories, and prescriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

/// Athlete profile, experience levels, and training zones
pub mod athlete;
/// Daily readiness check-in records
pub mod checkin;
/// Session intents and the intent resolver boundary
pub mod intent;
/// Journal entries and athlete feedback
pub mod journal;
/// Layered athlete memory records
pub mod memory;
/// Structured workout prescriptions
pub mod prescription;
/// Persisted and planned workouts
pub mod workout;

pub use athlete::{AthleteProfile, ExperienceLevel, HrZones, PowerZones, SwimLevel};
pub use checkin::{CheckIn, SorenessLevel, WorkoutDecision};
pub use intent::{IntentContext, IntentResolver, KeywordIntentResolver, SessionIntent};
pub use journal::{AiVisibility, FeedbackEntry, JournalEntry};
pub use memory::{AuditRecord, MemoryLayer, MemoryRecord, MemoryType, SourceRefs};
pub use prescription::{
    IntensityTarget, PlanSection, PrescriptionStep, StructuredPlan, WhyContext,
    WorkoutPrescription,
};
pub use workout::{IntensityTag, PlannedWorkout, Sport, Workout};
