// ABOUTME: Unified error types for the coach decision engine
// ABOUTME: Only the persistence boundary is fallible; evaluators are total functions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use thiserror::Error;

/// Errors produced at the engine's fallible boundaries.
///
/// Pure evaluators (readiness, fatigue, guardrails, pattern detection) never
/// return these; absence of data yields safe defaults or `None`. Only intent
/// resolution and the save path can fail.
#[derive(Debug, Error)]
pub enum CoachError {
    /// No sport keyword or actionable verb could be resolved from the request
    #[error("Could not resolve a workout intent: {reason}")]
    UnresolvableIntent {
        /// Why resolution failed
        reason: String,
    },

    /// A swim prescription's block distances do not sum to the requested total
    #[error(
        "Swim distance mismatch: requested {requested_m}m but generated blocks sum to {generated_m}m"
    )]
    DistanceMismatch {
        /// Distance the athlete asked for, in meters
        requested_m: u32,
        /// Distance the generated blocks actually sum to, in meters
        generated_m: u32,
    },

    /// Replace mode requires an existing record for the (athlete, day, sport) key
    #[error("No existing {sport} workout found on {date} to replace")]
    NoWorkoutToReplace {
        /// Sport of the requested replacement
        sport: String,
        /// Local calendar date searched
        date: String,
    },

    /// Referenced entity does not exist
    #[error("Not found: {entity} {id}")]
    NotFound {
        /// Entity kind (workout, memory, athlete)
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Underlying storage failure; no partial write occurred
    #[error("Storage error: {0}")]
    Storage(String),

    /// Payload could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoachError {
    /// Construct a storage error from any displayable cause
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        Self::Storage(cause.to_string())
    }
}

/// Convenience alias used throughout the storage and memory layers
pub type Result<T> = std::result::Result<T, CoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_mismatch_message_names_both_distances() {
        let err = CoachError::DistanceMismatch {
            requested_m: 3500,
            generated_m: 3400,
        };
        let msg = err.to_string();
        assert!(msg.contains("3500"));
        assert!(msg.contains("3400"));
    }
}
