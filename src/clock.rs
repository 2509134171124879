// ABOUTME: Injected clock abstraction so evaluators never call Utc::now directly
// ABOUTME: Provides a system clock and a pinnable test clock plus local-day helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Coach

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

/// Source of "now" for every time-dependent computation.
///
/// Evaluators and jobs take a `&dyn Clock` instead of calling `Utc::now()`
/// so tests can pin time deterministically.
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// The athlete-local calendar date for the current instant, given the
    /// athlete's fixed UTC offset in minutes east.
    fn local_date(&self, utc_offset_minutes: i32) -> NaiveDate {
        local_date_of(self.now(), utc_offset_minutes)
    }
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Athlete-local calendar date of a UTC instant.
///
/// Offsets outside the valid range (±24h) are treated as UTC.
#[must_use]
pub fn local_date_of(instant: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDate {
    FixedOffset::east_opt(utc_offset_minutes * 60).map_or_else(
        || instant.date_naive(),
        |offset| instant.with_timezone(&offset).date_naive(),
    )
}

/// UTC bounds `[start, end)` of an athlete-local calendar day.
///
/// Used by the save engine so a 23:50 local session never spills into the
/// next UTC day's bucket.
#[must_use]
pub fn local_day_bounds(
    date: NaiveDate,
    utc_offset_minutes: i32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let start_local = match offset.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(dt) | chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => offset.from_utc_datetime(&midnight),
    };
    let start = start_local.with_timezone(&Utc);
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn late_evening_local_stays_in_local_day() {
        // 23:50 on 2025-03-10 at UTC+2 is 21:50 UTC the same day,
        // but 01:50 UTC+2 on 2025-03-11 is 23:50 UTC on 2025-03-10.
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 23, 50, 0).unwrap();
        assert_eq!(
            local_date_of(instant, 120),
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()
        );
        assert_eq!(
            local_date_of(instant, 0),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn day_bounds_cover_exactly_24_hours() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (start, end) = local_day_bounds(date, -300);
        assert_eq!(end - start, Duration::days(1));
        // UTC-5 midnight local is 05:00 UTC
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 5, 0, 0).unwrap());
    }
}
