// ABOUTME: Beginner progression notes, phase-keyed by historical session count
// ABOUTME: Attached when the athlete is new to the sport or tagged beginner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use crate::models::{ExperienceLevel, Sport};

/// Progression phase from the count of historical sessions in the sport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionPhase {
    /// 0-2 historical sessions
    One,
    /// 3-5 historical sessions
    Two,
    /// 6+ historical sessions
    Three,
}

impl ProgressionPhase {
    /// Bucket a historical session count into a phase
    #[must_use]
    pub const fn from_session_count(count: u32) -> Self {
        match count {
            0..=2 => Self::One,
            3..=5 => Self::Two,
            _ => Self::Three,
        }
    }
}

/// Whether a progression note applies: at most one historical session of the
/// sport, or an explicit beginner experience tag.
#[must_use]
pub const fn needs_progression_note(historical_sessions: u32, experience: ExperienceLevel) -> bool {
    historical_sessions <= 1 || matches!(experience, ExperienceLevel::Beginner)
}

/// Phase- and sport-keyed progression note
#[must_use]
pub fn progression_note(sport: Sport, historical_sessions: u32) -> String {
    let phase = ProgressionPhase::from_session_count(historical_sessions);
    match (sport, phase) {
        (Sport::Run, ProgressionPhase::One) => {
            "You're in the first weeks of running: walk breaks are part of the plan, not a failure. Consistency beats distance right now.".to_owned()
        }
        (Sport::Run, ProgressionPhase::Two) => {
            "A few runs in: keep every run conversational and let duration creep up by a few minutes each week.".to_owned()
        }
        (Sport::Run, ProgressionPhase::Three) => {
            "Your run base is forming: one slightly longer run a week is the next step before any intensity.".to_owned()
        }
        (Sport::Bike, ProgressionPhase::One) => {
            "First rides: focus on comfortable position and smooth pedaling. Duration matters more than speed.".to_owned()
        }
        (Sport::Bike, ProgressionPhase::Two) => {
            "Building ride frequency: add a few minutes per ride and practice steady cadence around 90 rpm.".to_owned()
        }
        (Sport::Bike, ProgressionPhase::Three) => {
            "Ride base is forming: extend one weekly ride gradually before introducing harder efforts.".to_owned()
        }
        (Sport::Swim, ProgressionPhase::One) => {
            "New to swim training: short repeats with plenty of rest. Technique first, fitness follows.".to_owned()
        }
        (Sport::Swim, ProgressionPhase::Two) => {
            "A few swims in: start linking repeats with shorter rest while keeping strokes long.".to_owned()
        }
        (Sport::Swim, ProgressionPhase::Three) => {
            "Swim base is forming: grow total distance slowly and keep one technique-focused session per week.".to_owned()
        }
        (Sport::Strength, ProgressionPhase::One) => {
            "First strength sessions: learn the movements with light load. Soreness will fade as sessions repeat.".to_owned()
        }
        (Sport::Strength, ProgressionPhase::Two) => {
            "A few sessions in: add small amounts of load only when every rep is controlled.".to_owned()
        }
        (Sport::Strength, ProgressionPhase::Three) => {
            "Strength habit is forming: two sessions a week is plenty alongside endurance work.".to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_buckets() {
        assert_eq!(ProgressionPhase::from_session_count(0), ProgressionPhase::One);
        assert_eq!(ProgressionPhase::from_session_count(2), ProgressionPhase::One);
        assert_eq!(ProgressionPhase::from_session_count(3), ProgressionPhase::Two);
        assert_eq!(ProgressionPhase::from_session_count(5), ProgressionPhase::Two);
        assert_eq!(ProgressionPhase::from_session_count(6), ProgressionPhase::Three);
    }

    #[test]
    fn beginner_tag_forces_note_even_with_history() {
        assert!(needs_progression_note(20, ExperienceLevel::Beginner));
        assert!(!needs_progression_note(20, ExperienceLevel::Advanced));
        assert!(needs_progression_note(1, ExperienceLevel::Expert));
    }
}
