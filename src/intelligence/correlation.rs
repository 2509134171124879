// ABOUTME: Pearson correlation over paired daily series (mood vs readiness, sleep vs TSB, stress vs ATL)
// ABOUTME: Requires five same-day pairs; classifies strength bands and sign direction with a dead-zone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum same-day pairs before a correlation is computed
const MIN_PAIRED_POINTS: usize = 5;

/// |r| at or above which the correlation is strong
const STRONG_THRESHOLD: f64 = 0.7;

/// |r| at or above which the correlation is moderate
const MODERATE_THRESHOLD: f64 = 0.4;

/// |r| at or above which the correlation is weak
const WEAK_THRESHOLD: f64 = 0.2;

/// Dead-zone around zero inside which direction is reported as flat
const DIRECTION_DEAD_ZONE: f64 = 0.1;

/// Correlation strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelationStrength {
    /// |r| >= 0.7
    Strong,
    /// |r| >= 0.4
    Moderate,
    /// |r| >= 0.2
    Weak,
    /// |r| < 0.2
    None,
}

/// Direction of the relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationDirection {
    /// r > 0.1
    Positive,
    /// r < -0.1
    Negative,
    /// |r| <= 0.1
    Flat,
}

/// Result of correlating two paired daily series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Pearson correlation coefficient, -1 to 1
    pub r: f64,
    /// Strength band
    pub strength: CorrelationStrength,
    /// Sign direction with dead-zone
    pub direction: CorrelationDirection,
    /// Number of same-day pairs used
    pub paired_points: usize,
}

/// Pearson correlation over two daily series, paired by calendar day.
///
/// Returns `None` when fewer than five same-day pairs exist or either series
/// is constant (undefined correlation); this is the silent insufficient-data
/// path, never an error.
#[must_use]
pub fn correlate_daily(
    series_a: &[(NaiveDate, f64)],
    series_b: &[(NaiveDate, f64)],
) -> Option<CorrelationResult> {
    let by_date: HashMap<NaiveDate, f64> = series_b.iter().copied().collect();
    let pairs: Vec<(f64, f64)> = series_a
        .iter()
        .filter_map(|(date, a)| by_date.get(date).map(|b| (*a, *b)))
        .collect();
    correlate(&pairs)
}

/// Pearson correlation over already-paired points
#[must_use]
pub fn correlate(pairs: &[(f64, f64)]) -> Option<CorrelationResult> {
    if pairs.len() < MIN_PAIRED_POINTS {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return None;
    }
    let r = cov / denominator;

    let strength = if r.abs() >= STRONG_THRESHOLD {
        CorrelationStrength::Strong
    } else if r.abs() >= MODERATE_THRESHOLD {
        CorrelationStrength::Moderate
    } else if r.abs() >= WEAK_THRESHOLD {
        CorrelationStrength::Weak
    } else {
        CorrelationStrength::None
    };

    let direction = if r > DIRECTION_DEAD_ZONE {
        CorrelationDirection::Positive
    } else if r < -DIRECTION_DEAD_ZONE {
        CorrelationDirection::Negative
    } else {
        CorrelationDirection::Flat
    };

    Some(CorrelationResult {
        r,
        strength,
        direction,
        paired_points: pairs.len(),
    })
}
