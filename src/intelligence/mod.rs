// ABOUTME: Pure evaluators - training load, guardrails, readiness, fatigue, journal patterns
// ABOUTME: Every function here is total; failure is pushed into the return type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

/// Pearson correlation over paired daily series
pub mod correlation;
/// Fatigue type classification
pub mod fatigue;
/// Weekly load, ramp rate, and risk guardrails
pub mod guardrails;
/// Journal streak/burnout/trend detection
pub mod journal_patterns;
/// Readiness scoring and workout decisions
pub mod readiness;
/// CTL/ATL/TSB training load context
pub mod training_load;

pub use correlation::{
    correlate, correlate_daily, CorrelationDirection, CorrelationResult, CorrelationStrength,
};
pub use fatigue::{
    FatigueAssessment, FatigueClassifier, FatigueReason, FatigueSeverity, FatigueSignals,
    FatigueType,
};
pub use guardrails::{
    calculate_ramp_rate, calculate_weekly_load, check_guardrails, ramp_status,
    GuardrailAdjustment, GuardrailReport, RampRate, RampStatus,
};
pub use journal_patterns::{InsightKind, InsightSeverity, JournalInsight, JournalPatternDetector};
pub use readiness::{
    ReadinessAdaptation, ReadinessAssessment, ReadinessEvaluator, ReadinessReason,
};
pub use training_load::{
    DailyLoad, TrainingContext, TrainingLoadCalculator, TrainingStatus,
};
