// ABOUTME: Memory confidence scoring - fixed formula with a load-bearing operation order
// ABOUTME: The final clamp must happen last; the terms are not reorderable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use crate::models::MemoryLayer;

/// Inputs to the confidence formula
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs {
    /// Number of underlying data points
    pub data_points: u32,
    /// Whether any contributing data is from the last 7 days
    pub has_recent_data: bool,
    /// Number of detected contradictions with prior observations
    pub contradiction_count: u32,
    /// Layer of the memory being scored
    pub layer: MemoryLayer,
    /// Whole weeks since the record was last updated
    pub weeks_since_update: u32,
}

/// Confidence score 0-100.
///
/// Terms apply in a fixed order: `base = min(100, data_points x 5)`, +10 for
/// recent data, +15 when there are no contradictions and at least five data
/// points, -20 per contradiction, and for short/mid-term layers -5 per week
/// since the last update. The clamp to [0, 100] happens once, at the end.
#[must_use]
pub fn calculate_confidence(inputs: &ConfidenceInputs) -> u8 {
    let mut score = i64::from(inputs.data_points * 5).min(100);
    if inputs.has_recent_data {
        score += 10;
    }
    if inputs.contradiction_count == 0 && inputs.data_points >= 5 {
        score += 15;
    }
    score -= 20 * i64::from(inputs.contradiction_count);
    if inputs.layer != MemoryLayer::LongTerm {
        score -= 5 * i64::from(inputs.weeks_since_update);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        score.clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(data_points: u32) -> ConfidenceInputs {
        ConfidenceInputs {
            data_points,
            has_recent_data: false,
            contradiction_count: 0,
            layer: MemoryLayer::LongTerm,
            weeks_since_update: 0,
        }
    }

    #[test]
    fn base_caps_at_100_before_bonuses() {
        // 30 points would be 150 uncapped; the cap applies to the base,
        // then the no-contradiction bonus still lands and the final clamp
        // brings it back to 100.
        let score = calculate_confidence(&ConfidenceInputs {
            data_points: 30,
            has_recent_data: true,
            ..inputs(30)
        });
        assert_eq!(score, 100);
    }

    #[test]
    fn more_data_points_never_decreases_confidence() {
        let mut previous = 0;
        for dp in 0..=40 {
            let score = calculate_confidence(&inputs(dp));
            assert!(score >= previous, "confidence dropped at {dp} data points");
            previous = score;
        }
    }

    #[test]
    fn contradictions_are_punitive() {
        let clean = calculate_confidence(&inputs(6));
        let contradicted = calculate_confidence(&ConfidenceInputs {
            contradiction_count: 2,
            ..inputs(6)
        });
        // 6 dp: base 30 + 15 bonus = 45 clean; contradicted loses the bonus
        // and takes -40: base 30 - 40 -> clamped to 0.
        assert_eq!(clean, 45);
        assert_eq!(contradicted, 0);
    }

    #[test]
    fn staleness_only_decays_short_and_mid_term() {
        let long = calculate_confidence(&ConfidenceInputs {
            layer: MemoryLayer::LongTerm,
            weeks_since_update: 10,
            ..inputs(10)
        });
        let short = calculate_confidence(&ConfidenceInputs {
            layer: MemoryLayer::ShortTerm,
            weeks_since_update: 10,
            ..inputs(10)
        });
        assert!(long > short);
        assert_eq!(long - short, 50);
    }

    #[test]
    fn recency_bonus_is_ten() {
        let without = calculate_confidence(&inputs(3));
        let with = calculate_confidence(&ConfidenceInputs {
            has_recent_data: true,
            ..inputs(3)
        });
        assert_eq!(with - without, 10);
    }
}
