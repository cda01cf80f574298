// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Proleptic Gregorian (ISO-8601) calendar arithmetic.
//!
//! Everything here is a pure function of `(year, month, day)`. Callers are
//! expected to pass a month in `1..=12`; [`PlainDate`](crate::PlainDate)
//! validates its fields before calling in.
//!
//! Day counts are anchored on **1970-01-01**, which is epoch day `0` and a
//! Thursday. The conversions use the era-based (400-year cycle) algorithm
//! by Howard Hinnant, which is exact for every `i64` year that fits the
//! intermediate products.

use crate::error::TemporalError;
use std::fmt;
use std::str::FromStr;

/// Cumulative day count at the start of each month in a common year.
const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Days in a 400-year Gregorian cycle.
const DAYS_PER_ERA: i64 = 146_097;

/// Days from 0000-03-01 to 1970-01-01.
const EPOCH_SHIFT: i64 = 719_468;

/// Calendar system attached to civil dates.
///
/// Only the ISO-8601 proleptic Gregorian calendar exists today. The type is
/// kept so that dates carry an explicit calendar identifier, the way the
/// string and equality rules expect.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Calendar {
    #[default]
    Iso8601,
}

impl Calendar {
    /// Identifier used in strings and comparisons.
    pub const fn id(&self) -> &'static str {
        match self {
            Calendar::Iso8601 => "iso8601",
        }
    }

    #[inline]
    pub fn is_leap_year(&self, year: i32) -> bool {
        is_leap_year(year)
    }

    #[inline]
    pub fn days_in_month(&self, year: i32, month: u8) -> u8 {
        days_in_month(year, month)
    }

    #[inline]
    pub fn days_in_year(&self, year: i32) -> u16 {
        days_in_year(year)
    }

    #[inline]
    pub fn day_of_week(&self, year: i32, month: u8, day: u8) -> u8 {
        day_of_week(year, month, day)
    }

    #[inline]
    pub fn day_of_year(&self, year: i32, month: u8, day: u8) -> u16 {
        day_of_year(year, month, day)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Calendar {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("iso8601") {
            Ok(Calendar::Iso8601)
        } else {
            Err(TemporalError::range(format!("unsupported calendar {s:?}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Pure calendar queries
// ---------------------------------------------------------------------------

/// Gregorian leap-year rule.
#[inline]
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (1-based) of `year`.
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// 365 or 366.
#[inline]
pub fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// ISO weekday: 1 = Monday … 7 = Sunday.
pub fn day_of_week(year: i32, month: u8, day: u8) -> u8 {
    // Epoch day 0 was a Thursday (4), hence the +3 shift on a 0-based index.
    let days = days_from_civil(i64::from(year), month, day);
    (days + 3).rem_euclid(7) as u8 + 1
}

/// Ordinal day within the year, 1-based.
pub fn day_of_year(year: i32, month: u8, day: u8) -> u16 {
    let index = usize::from(month.clamp(1, 12) - 1);
    let leap_shift = u16::from(month > 2 && is_leap_year(year));
    DAYS_BEFORE_MONTH[index] + leap_shift + u16::from(day)
}

// ---------------------------------------------------------------------------
// Epoch-day conversion
// ---------------------------------------------------------------------------

/// Days since 1970-01-01 for a civil date.
pub(crate) fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let mp = (i64::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * DAYS_PER_ERA + doe - EPOCH_SHIFT
}

/// Inverse of [`days_from_civil`].
pub(crate) fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + EPOCH_SHIFT;
    let era = z.div_euclid(DAYS_PER_ERA);
    let doe = z.rem_euclid(DAYS_PER_ERA);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_year(2024), 366);
    }

    #[test]
    fn test_day_of_week() {
        assert_eq!(day_of_week(1970, 1, 1), 4);
        assert_eq!(day_of_week(2023, 6, 15), 4);
        assert_eq!(day_of_week(2023, 6, 18), 7);
        assert_eq!(day_of_week(2023, 6, 19), 1);
        assert_eq!(day_of_week(1969, 12, 31), 3);
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(2023, 6, 15), 166);
        assert_eq!(day_of_year(2024, 6, 15), 167);
        assert_eq!(day_of_year(2023, 1, 1), 1);
        assert_eq!(day_of_year(2024, 12, 31), 366);
    }

    #[test]
    fn test_epoch_days_anchor() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2000, 3, 1), 11_017);
        assert_eq!(days_from_civil(1969, 12, 31), -1);
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(-1), (1969, 12, 31));
    }

    #[test]
    fn test_epoch_days_inverse_over_leap_cycle() {
        for days in -150_000..150_000 {
            let (y, m, d) = civil_from_days(days);
            assert_eq!(days_from_civil(y, m, d), days, "day {days}");
        }
    }

    #[test]
    fn test_calendar_identifier() {
        assert_eq!("iso8601".parse::<Calendar>(), Ok(Calendar::Iso8601));
        assert_eq!("ISO8601".parse::<Calendar>(), Ok(Calendar::Iso8601));
        assert!("gregory".parse::<Calendar>().is_err());
        assert_eq!(Calendar::default().to_string(), "iso8601");
    }
}
