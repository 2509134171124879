// ABOUTME: Training load calculations - CTL, ATL, and TSB from daily stress scores
// ABOUTME: Implements gap-filled exponential moving averages over the daily TSS series
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Sport;

/// Standard CTL (Chronic Training Load) window - 42 days for long-term fitness
const CTL_WINDOW_DAYS: i64 = 42;

/// Standard ATL (Acute Training Load) window - 7 days for short-term fatigue
const ATL_WINDOW_DAYS: i64 = 7;

/// One day's realized training stress
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyLoad {
    /// Athlete-local calendar date
    pub date: NaiveDate,
    /// Training stress score accumulated that day
    pub tss: f64,
}

/// Ephemeral per-request training context.
///
/// Computed from workout history; never persisted as its own entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingContext {
    /// Chronic Training Load (42-day EMA) - fitness
    pub ctl: f64,
    /// Acute Training Load (7-day EMA) - fatigue
    pub atl: f64,
    /// Training Stress Balance (CTL - ATL) - form
    pub tsb: f64,
    /// Yesterday's realized TSS
    pub yesterday_tss: f64,
    /// Today's planned TSS, when a session is scheduled
    pub today_planned_tss: Option<f64>,
    /// Today's planned duration in minutes
    pub today_planned_duration_min: Option<u32>,
    /// Today's planned sport
    pub today_planned_sport: Option<Sport>,
    /// Consecutive training days ending yesterday
    pub consecutive_training_days: u32,
}

impl TrainingContext {
    /// A context with no history at all (new athlete)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ctl: 0.0,
            atl: 0.0,
            tsb: 0.0,
            yesterday_tss: 0.0,
            today_planned_tss: None,
            today_planned_duration_min: None,
            today_planned_sport: None,
            consecutive_training_days: 0,
        }
    }
}

/// Training status based on TSB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingStatus {
    /// TSB < -10: overreaching, high fatigue
    Overreaching,
    /// TSB -10 to 0: productive training zone
    Productive,
    /// TSB 0 to +10: fresh, ready to perform
    Fresh,
    /// TSB > +10: risk of detraining
    Detraining,
}

/// Calculator for training load metrics
pub struct TrainingLoadCalculator {
    ctl_window_days: i64,
    atl_window_days: i64,
}

impl Default for TrainingLoadCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingLoadCalculator {
    /// Create a calculator with the standard 42/7-day windows
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ctl_window_days: CTL_WINDOW_DAYS,
            atl_window_days: ATL_WINDOW_DAYS,
        }
    }

    /// Create a calculator with custom window sizes
    #[must_use]
    pub const fn with_windows(ctl_days: i64, atl_days: i64) -> Self {
        Self {
            ctl_window_days: ctl_days,
            atl_window_days: atl_days,
        }
    }

    /// Build the full training context for a request date.
    ///
    /// `loads` is the realized daily TSS history; missing days count as zero.
    /// Total function: empty history yields the empty context.
    #[must_use]
    pub fn build_context(&self, loads: &[DailyLoad], today: NaiveDate) -> TrainingContext {
        if loads.is_empty() {
            return TrainingContext::empty();
        }

        let by_date: HashMap<NaiveDate, f64> = loads.iter().fold(HashMap::new(), |mut m, l| {
            *m.entry(l.date).or_insert(0.0) += l.tss;
            m
        });

        let ctl = Self::calculate_ema(&by_date, today, self.ctl_window_days);
        let atl = Self::calculate_ema(&by_date, today, self.atl_window_days);

        let yesterday = today - Duration::days(1);
        let yesterday_tss = by_date.get(&yesterday).copied().unwrap_or(0.0);

        let mut consecutive = 0u32;
        let mut cursor = yesterday;
        while by_date.get(&cursor).copied().unwrap_or(0.0) > 0.0 {
            consecutive += 1;
            cursor -= Duration::days(1);
        }

        TrainingContext {
            ctl,
            atl,
            tsb: ctl - atl,
            yesterday_tss,
            today_planned_tss: None,
            today_planned_duration_min: None,
            today_planned_sport: None,
            consecutive_training_days: consecutive,
        }
    }

    /// Calculate exponential moving average over a gap-filled daily series.
    ///
    /// EMA formula: `EMA_today` = (`TSS_today` x α) + (`EMA_yesterday` x (1 - α))
    /// where α = 2 / (N + 1) and N is the window size in days.
    fn calculate_ema(by_date: &HashMap<NaiveDate, f64>, as_of: NaiveDate, window_days: i64) -> f64 {
        let Some(first_date) = by_date.keys().min().copied() else {
            return 0.0;
        };
        let days_span = (as_of - first_date).num_days();
        if days_span < 0 {
            return 0.0;
        }

        #[allow(clippy::cast_precision_loss)]
        let alpha = 2.0 / (window_days as f64 + 1.0);

        let mut ema = 0.0;
        for day_offset in 0..=days_span {
            let current = first_date + Duration::days(day_offset);
            let daily_tss = by_date.get(&current).copied().unwrap_or(0.0);
            ema = daily_tss.mul_add(alpha, ema * (1.0 - alpha));
        }
        ema
    }

    /// Interpret a TSB value as a training status
    #[must_use]
    pub fn interpret_tsb(tsb: f64) -> TrainingStatus {
        if tsb < -10.0 {
            TrainingStatus::Overreaching
        } else if tsb < 0.0 {
            TrainingStatus::Productive
        } else if tsb <= 10.0 {
            TrainingStatus::Fresh
        } else {
            TrainingStatus::Detraining
        }
    }
}
