// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar dates without a time of day or zone.
//!
//! Calendar arithmetic follows the usual two-step rule: years and months are
//! applied first by moving the month counter, then the day-of-month is
//! resolved against the target month under an [`Overflow`] policy, and only
//! then is the day count added on the epoch-day line.
//!
//! ```
//! use civtime::{Duration, PlainDate};
//!
//! let jan31 = PlainDate::new(2023, 1, 31).unwrap();
//! let feb = jan31.checked_add(&Duration::from_months(1)).unwrap();
//! assert_eq!(feb.to_string(), "2023-02-28");
//! ```

use crate::calendar::{self, Calendar};
use crate::datetime::PlainDateTime;
use crate::duration::Duration;
use crate::error::{TemporalError, TemporalResult};
use crate::parse::{self, Cursor};
use crate::time::PlainTime;
use crate::timezone::TimeZone;
use crate::zoned::ZonedDateTime;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// What to do when a day-of-month does not exist in the target month.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Clamp to the last day of the month (`Jan 31 + 1 month = Feb 28`).
    #[default]
    Constrain,
    /// Fail with a range error.
    Reject,
}

/// A proleptic Gregorian calendar date.
///
/// Ordering is lexicographic over `(year, month, day)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlainDate {
    year: i32,
    month: u8,
    day: u8,
    calendar: Calendar,
}

/// Field overrides for [`PlainDate::with_fields`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl PlainDate {
    /// ISO date; fails with a range error naming `month` or `day`.
    pub fn new(year: i32, month: u8, day: u8) -> TemporalResult<Self> {
        Self::new_with_calendar(year, month, day, Calendar::Iso8601)
    }

    pub fn new_with_calendar(
        year: i32,
        month: u8,
        day: u8,
        calendar: Calendar,
    ) -> TemporalResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::field_range("month", month.into(), 1, 12));
        }
        let last = calendar.days_in_month(year, month);
        if !(1..=last).contains(&day) {
            return Err(TemporalError::field_range("day", day.into(), 1, last.into()));
        }
        Ok(Self {
            year,
            month,
            day,
            calendar,
        })
    }

    /// Builds from wide integers, as produced by parsing or arithmetic.
    pub(crate) fn from_raw(year: i64, month: i64, day: i64) -> TemporalResult<Self> {
        let year = i32::try_from(year).map_err(|_| {
            TemporalError::field_range("year", year, i32::MIN.into(), i32::MAX.into())
        })?;
        let month = u8::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| TemporalError::field_range("month", month, 1, 12))?;
        let last = i64::from(calendar::days_in_month(year, month));
        let day = u8::try_from(day)
            .ok()
            .filter(|d| (1..=last).contains(&i64::from(*d)))
            .ok_or_else(|| TemporalError::field_range("day", day, 1, last))?;
        Self::new(year, month, day)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    #[inline]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// ISO weekday, 1 = Monday … 7 = Sunday.
    #[inline]
    pub fn day_of_week(&self) -> u8 {
        self.calendar.day_of_week(self.year, self.month, self.day)
    }

    #[inline]
    pub fn day_of_year(&self) -> u16 {
        self.calendar.day_of_year(self.year, self.month, self.day)
    }

    #[inline]
    pub fn days_in_month(&self) -> u8 {
        self.calendar.days_in_month(self.year, self.month)
    }

    #[inline]
    pub fn days_in_year(&self) -> u16 {
        self.calendar.days_in_year(self.year)
    }

    #[inline]
    pub fn in_leap_year(&self) -> bool {
        self.calendar.is_leap_year(self.year)
    }

    // ── epoch-day line ────────────────────────────────────────────────

    /// Days since 1970-01-01.
    pub fn epoch_days(&self) -> i64 {
        calendar::days_from_civil(i64::from(self.year), self.month, self.day)
    }

    /// Date `days` after 1970-01-01; fails when the year leaves `i32`.
    pub fn from_epoch_days(days: i64) -> TemporalResult<Self> {
        // Bound the input so the era arithmetic cannot overflow.
        const LIMIT: i64 = 1 << 40;
        if !(-LIMIT..=LIMIT).contains(&days) {
            return Err(TemporalError::field_range("epoch days", days, -LIMIT, LIMIT));
        }
        let (year, month, day) = calendar::civil_from_days(days);
        Self::from_raw(year, month.into(), day.into())
    }

    /// Like [`from_epoch_days`](Self::from_epoch_days) for callers that have
    /// already bounded `days` to the instant range, where the year always
    /// fits `i32`.
    pub(crate) fn from_epoch_days_in_range(days: i64) -> Self {
        let (year, month, day) = calendar::civil_from_days(days);
        Self {
            year: year as i32,
            month,
            day,
            calendar: Calendar::Iso8601,
        }
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + duration` with the day clamped into the target month.
    ///
    /// Only years, months and days take part; hours and finer are below the
    /// resolution of a date and are ignored.
    pub fn checked_add(&self, duration: &Duration) -> TemporalResult<Self> {
        self.add_with_overflow(duration, Overflow::Constrain)
    }

    /// `self - duration` with the day clamped into the target month.
    pub fn checked_sub(&self, duration: &Duration) -> TemporalResult<Self> {
        self.add_with_overflow(&duration.negated(), Overflow::Constrain)
    }

    /// `self + duration` under an explicit [`Overflow`] policy.
    pub fn add_with_overflow(&self, duration: &Duration, overflow: Overflow) -> TemporalResult<Self> {
        let months = duration
            .years()
            .checked_mul(12)
            .and_then(|m| m.checked_add(duration.months()))
            .ok_or_else(|| TemporalError::range("month offset overflows"))?;
        let shifted = self.add_months(months, overflow)?;
        let days = duration.days() + duration.weeks() * 7;
        if days == 0 {
            return Ok(shifted);
        }
        Self::from_epoch_days(shifted.epoch_days() + days)
    }

    /// Moves the month counter by `months`, resolving the day of month.
    pub(crate) fn add_months(&self, months: i64, overflow: Overflow) -> TemporalResult<Self> {
        if months == 0 {
            return Ok(*self);
        }
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + months;
        let year = index.div_euclid(12);
        let month = (index.rem_euclid(12) + 1) as u8;
        let year = i32::try_from(year).map_err(|_| {
            TemporalError::field_range("year", year, i32::MIN.into(), i32::MAX.into())
        })?;
        let last = self.calendar.days_in_month(year, month);
        let day = match overflow {
            Overflow::Constrain => self.day.min(last),
            Overflow::Reject if self.day > last => {
                return Err(TemporalError::field_range("day", self.day.into(), 1, last.into()))
            }
            Overflow::Reject => self.day,
        };
        Self::new_with_calendar(year, month, day, self.calendar)
    }

    /// Whole days from `other` to `self`.
    pub fn since(&self, other: &PlainDate) -> Duration {
        Duration::from_days(self.epoch_days() - other.epoch_days())
    }

    /// Whole days from `self` to `other`.
    pub fn until(&self, other: &PlainDate) -> Duration {
        other.since(self)
    }

    pub fn with_fields(&self, partial: PartialDate) -> TemporalResult<Self> {
        Self::new_with_calendar(
            partial.year.unwrap_or(self.year),
            partial.month.unwrap_or(self.month),
            partial.day.unwrap_or(self.day),
            self.calendar,
        )
    }

    // ── conversions ───────────────────────────────────────────────────

    /// Combines this date with a time of day.
    #[inline]
    pub fn at(&self, time: PlainTime) -> PlainDateTime {
        PlainDateTime::from_parts(*self, time)
    }

    /// Midnight at the start of this date.
    #[inline]
    pub fn start_of_day(&self) -> PlainDateTime {
        self.at(PlainTime::MIDNIGHT)
    }

    /// Current date in `tz`, read from the system clock.
    pub fn today(tz: &TimeZone) -> PlainDate {
        ZonedDateTime::now(tz.clone()).to_plain_date()
    }
}

impl Sub for PlainDate {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.since(&rhs)
    }
}

impl fmt::Display for PlainDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        parse::write_year(f, self.year)?;
        write!(f, "-{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for PlainDate {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cur = Cursor::new(s);
        let (y, m, d) = parse::date_fields(&mut cur)
            .filter(|_| cur.is_done())
            .ok_or_else(|| TemporalError::format("date", s))?;
        Self::from_raw(y, m, d).map_err(|e| e.into_format("date", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::DurationFields;

    fn d(y: i32, m: u8, day: u8) -> PlainDate {
        PlainDate::new(y, m, day).unwrap()
    }

    #[test]
    fn test_constructor() {
        let date = d(2023, 6, 15);
        assert_eq!((date.year(), date.month(), date.day()), (2023, 6, 15));
        assert_eq!(date.calendar(), "iso8601".parse::<Calendar>().unwrap());
    }

    #[test]
    fn test_invalid_dates() {
        let err = PlainDate::new(2023, 13, 15).unwrap_err();
        assert!(matches!(err, TemporalError::Range(_)));
        assert!(err.message().starts_with("month"));

        let err = PlainDate::new(2023, 2, 29).unwrap_err();
        assert!(err.message().starts_with("day"));
        assert!(PlainDate::new(2024, 2, 29).is_ok());
        assert!(PlainDate::new(2023, 6, 0).is_err());
    }

    #[test]
    fn test_calendar_queries() {
        let date = d(2023, 6, 15);
        assert_eq!(date.day_of_week(), 4);
        assert_eq!(date.day_of_year(), 166);
        assert_eq!(date.days_in_month(), 30);
        assert_eq!(date.days_in_year(), 365);
        assert!(!date.in_leap_year());
    }

    #[test]
    fn test_add_and_subtract_days() {
        assert_eq!(d(2023, 6, 15).checked_add(&Duration::from_days(10)).unwrap(), d(2023, 6, 25));
        assert_eq!(d(2023, 6, 15).checked_sub(&Duration::from_days(5)).unwrap(), d(2023, 6, 10));
        assert_eq!(d(2023, 12, 31).checked_add(&Duration::from_days(1)).unwrap(), d(2024, 1, 1));
        assert_eq!(d(2024, 3, 1).checked_sub(&Duration::from_days(1)).unwrap(), d(2024, 2, 29));
    }

    #[test]
    fn test_month_overflow_is_constrained() {
        let jan31 = d(2023, 1, 31);
        assert_eq!(jan31.checked_add(&Duration::from_months(1)).unwrap(), d(2023, 2, 28));
        assert_eq!(d(2024, 1, 31).checked_add(&Duration::from_months(1)).unwrap(), d(2024, 2, 29));
        assert_eq!(d(2024, 2, 29).checked_add(&Duration::from_years(1)).unwrap(), d(2025, 2, 28));
        assert_eq!(d(2023, 3, 31).checked_sub(&Duration::from_months(13)).unwrap(), d(2022, 2, 28));
    }

    #[test]
    fn test_month_overflow_reject() {
        let err = d(2023, 1, 31)
            .add_with_overflow(&Duration::from_months(1), Overflow::Reject)
            .unwrap_err();
        assert!(matches!(err, TemporalError::Range(_)));
        assert_eq!(
            d(2023, 1, 28)
                .add_with_overflow(&Duration::from_months(1), Overflow::Reject)
                .unwrap(),
            d(2023, 2, 28)
        );
    }

    #[test]
    fn test_calendar_fields_then_days() {
        let step = Duration::from_fields(DurationFields {
            months: 1,
            days: 1,
            ..Default::default()
        })
        .unwrap();
        // Clamp to Feb 28 first, then step one day.
        assert_eq!(d(2023, 1, 31).checked_add(&step).unwrap(), d(2023, 3, 1));
    }

    #[test]
    fn test_subtract_dates() {
        let span = d(2023, 6, 20) - d(2023, 6, 15);
        assert_eq!(span.days(), 5);
        assert_eq!(d(2023, 6, 15).since(&d(2023, 6, 20)).days(), -5);
        assert_eq!(d(2023, 1, 1).until(&d(2024, 1, 1)).days(), 365);
    }

    #[test]
    fn test_with_fields() {
        let date = d(2023, 6, 15)
            .with_fields(PartialDate {
                year: Some(2024),
                day: Some(20),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(date, d(2024, 6, 20));
        assert!(date
            .with_fields(PartialDate {
                month: Some(2),
                day: Some(30),
                ..Default::default()
            })
            .is_err());
    }

    #[test]
    fn test_comparison() {
        assert!(d(2023, 6, 15) < d(2023, 6, 20));
        assert!(d(2023, 12, 31) < d(2024, 1, 1));
        assert!(d(-1, 12, 31) < d(0, 1, 1));
        assert_eq!(d(2023, 6, 15), d(2023, 6, 15));
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(d(1970, 1, 1).epoch_days(), 0);
        assert_eq!(PlainDate::from_epoch_days(19_523).unwrap(), d(2023, 6, 15));
        assert!(PlainDate::from_epoch_days(i64::MAX).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(d(2023, 6, 15).to_string(), "2023-06-15");
        assert_eq!(d(33, 1, 2).to_string(), "0033-01-02");
        assert_eq!(d(-44, 3, 15).to_string(), "-0044-03-15");
        assert_eq!(d(12_345, 1, 1).to_string(), "+12345-01-01");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("2023-06-15".parse::<PlainDate>().unwrap(), d(2023, 6, 15));
        for bad in ["2023-02-30", "2023-13-01", "2023-6-15", "2023-06-15T00:00:00", "June"] {
            let err = bad.parse::<PlainDate>().unwrap_err();
            assert!(matches!(err, TemporalError::Format(_)), "{bad}");
        }
    }

    #[test]
    fn test_string_round_trip() {
        for date in [d(2023, 6, 15), d(2024, 2, 29), d(-44, 3, 15), d(12_345, 12, 31), d(0, 1, 1)] {
            assert_eq!(date.to_string().parse::<PlainDate>().unwrap(), date);
        }
    }
}
