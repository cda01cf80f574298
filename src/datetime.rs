// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil date and time of day, with no zone attached.

use crate::calendar::Calendar;
use crate::date::{Overflow, PartialDate, PlainDate};
use crate::duration::{Duration, DurationFields, MICROS_PER_DAY};
use crate::error::{TemporalError, TemporalResult};
use crate::parse::{self, Cursor};
use crate::time::{PartialTime, PlainTime};
use crate::timezone::{Disambiguation, TimeZone};
use crate::zoned::ZonedDateTime;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// A [`PlainDate`] paired with a [`PlainTime`].
///
/// Ordering compares the date first and the time second.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlainDateTime {
    date: PlainDate,
    time: PlainTime,
}

/// Field overrides for [`PlainDateTime::with_fields`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PartialDateTime {
    pub date: PartialDate,
    pub time: PartialTime,
}

impl PlainDateTime {
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        microsecond: u32,
    ) -> TemporalResult<Self> {
        Ok(Self {
            date: PlainDate::new(year, month, day)?,
            time: PlainTime::new(hour, minute, second, microsecond)?,
        })
    }

    #[inline]
    pub const fn from_parts(date: PlainDate, time: PlainTime) -> Self {
        Self { date, time }
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn year(&self) -> i32 {
        self.date.year()
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.date.month()
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.date.day()
    }

    #[inline]
    pub const fn hour(&self) -> u8 {
        self.time.hour()
    }

    #[inline]
    pub const fn minute(&self) -> u8 {
        self.time.minute()
    }

    #[inline]
    pub const fn second(&self) -> u8 {
        self.time.second()
    }

    #[inline]
    pub const fn microsecond(&self) -> u32 {
        self.time.microsecond()
    }

    #[inline]
    pub const fn calendar(&self) -> Calendar {
        self.date.calendar()
    }

    pub fn day_of_week(&self) -> u8 {
        self.date.day_of_week()
    }

    pub fn day_of_year(&self) -> u16 {
        self.date.day_of_year()
    }

    pub fn days_in_month(&self) -> u8 {
        self.date.days_in_month()
    }

    pub fn days_in_year(&self) -> u16 {
        self.date.days_in_year()
    }

    pub fn in_leap_year(&self) -> bool {
        self.date.in_leap_year()
    }

    #[inline]
    pub const fn to_plain_date(&self) -> PlainDate {
        self.date
    }

    #[inline]
    pub const fn to_plain_time(&self) -> PlainTime {
        self.time
    }

    // ── microsecond line ──────────────────────────────────────────────

    /// Microseconds since 1970-01-01T00:00:00 on the local line.
    pub(crate) fn epoch_micros(&self) -> i128 {
        i128::from(self.date.epoch_days()) * i128::from(MICROS_PER_DAY)
            + i128::from(self.time.micros_of_day())
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + duration`, constraining the day of month when years or
    /// months land on a shorter month.
    pub fn checked_add(&self, duration: &Duration) -> TemporalResult<Self> {
        self.add_with_overflow(duration, Overflow::Constrain)
    }

    pub fn checked_sub(&self, duration: &Duration) -> TemporalResult<Self> {
        self.add_with_overflow(&duration.negated(), Overflow::Constrain)
    }

    /// Adds the time fields to the clock first; the day they carry joins the
    /// duration's own days when the date part is advanced.
    pub fn add_with_overflow(&self, duration: &Duration, overflow: Overflow) -> TemporalResult<Self> {
        let (time, carry) = self.time.add_with_carry(duration);
        let date_part = Duration::from_fields(DurationFields {
            years: duration.years(),
            months: duration.months(),
            days: duration.days() + carry,
            ..Default::default()
        })?;
        let date = self.date.add_with_overflow(&date_part, overflow)?;
        Ok(Self::from_parts(date, time))
    }

    /// Same wall-clock time, `months` calendar months away.
    pub(crate) fn add_months_constrained(&self, months: i64) -> TemporalResult<Self> {
        let date = self.date.add_months(months, Overflow::Constrain)?;
        Ok(Self::from_parts(date, self.time))
    }

    /// Exact elapsed time from `other` to `self`, balanced up to days.
    pub fn since(&self, other: &PlainDateTime) -> Duration {
        Duration::from_fixed_micros(self.epoch_micros() - other.epoch_micros())
    }

    pub fn until(&self, other: &PlainDateTime) -> Duration {
        other.since(self)
    }

    pub fn with_fields(&self, partial: PartialDateTime) -> TemporalResult<Self> {
        Ok(Self::from_parts(
            self.date.with_fields(partial.date)?,
            self.time.with_fields(partial.time)?,
        ))
    }

    /// Same date at a different time of day.
    #[inline]
    pub fn with_time(&self, time: PlainTime) -> Self {
        Self::from_parts(self.date, time)
    }

    // ── zone bridge ───────────────────────────────────────────────────

    /// Current wall-clock date-time in `tz`, read from the system clock.
    pub fn now(tz: &TimeZone) -> PlainDateTime {
        ZonedDateTime::now(tz.clone()).to_plain_date_time()
    }

    /// Resolves this wall-clock reading in `tz`.
    pub fn to_zoned_date_time(
        &self,
        tz: TimeZone,
        disambiguation: Disambiguation,
    ) -> TemporalResult<ZonedDateTime> {
        ZonedDateTime::from_plain_date_time(*self, tz, disambiguation)
    }
}

impl Sub for PlainDateTime {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.since(&rhs)
    }
}

impl fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

impl FromStr for PlainDateTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cur = Cursor::new(s);
        let fields = date_time_fields(&mut cur)
            .filter(|_| cur.is_done())
            .ok_or_else(|| TemporalError::format("date-time", s))?;
        from_raw_fields(fields).map_err(|e| e.into_format("date-time", s))
    }
}

/// Raw `(y, mo, d, h, mi, s, µs)` of a `<date>T<time>` production.
pub(crate) type RawDateTime = ((i64, i64, i64), (i64, i64, i64, i64));

pub(crate) fn date_time_fields(cur: &mut Cursor<'_>) -> Option<RawDateTime> {
    let date = parse::date_fields(cur)?;
    cur.expect(b'T')?;
    let time = parse::time_fields(cur)?;
    Some((date, time))
}

pub(crate) fn from_raw_fields(((y, mo, d), (h, mi, s, us)): RawDateTime) -> TemporalResult<PlainDateTime> {
    Ok(PlainDateTime::from_parts(
        PlainDate::from_raw(y, mo, d)?,
        PlainTime::from_raw(h, mi, s, us)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> PlainDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_constructor() {
        let value = PlainDateTime::new(2023, 6, 15, 14, 30, 45, 123_456).unwrap();
        assert_eq!(
            (value.year(), value.month(), value.day()),
            (2023, 6, 15)
        );
        assert_eq!(
            (value.hour(), value.minute(), value.second(), value.microsecond()),
            (14, 30, 45, 123_456)
        );
        assert_eq!(value.calendar(), Calendar::Iso8601);
        assert!(PlainDateTime::new(2023, 2, 29, 0, 0, 0, 0).is_err());
        assert!(PlainDateTime::new(2023, 2, 28, 24, 0, 0, 0).is_err());
    }

    #[test]
    fn test_parts() {
        let value = dt("2023-06-15T14:30:45.123456");
        assert_eq!(value.to_plain_date(), PlainDate::new(2023, 6, 15).unwrap());
        assert_eq!(value.to_plain_time(), PlainTime::new(14, 30, 45, 123_456).unwrap());
        assert_eq!(value.day_of_week(), 4);
        assert_eq!(value.day_of_year(), 166);
        assert_eq!(PlainDate::new(2023, 6, 15).unwrap().at(value.to_plain_time()), value);
    }

    #[test]
    fn test_add_with_day_carry() {
        let value = dt("2023-06-15T22:30:00").checked_add(&Duration::from_hours(3)).unwrap();
        assert_eq!(value, dt("2023-06-16T01:30:00"));

        let value = dt("2023-01-01T00:30:00").checked_sub(&Duration::from_hours(1)).unwrap();
        assert_eq!(value, dt("2022-12-31T23:30:00"));
    }

    #[test]
    fn test_add_calendar_and_time_fields() {
        let step = Duration::from_fields(DurationFields {
            months: 1,
            days: 2,
            hours: 12,
            ..Default::default()
        })
        .unwrap();
        let value = dt("2023-01-31T18:00:00").checked_add(&step).unwrap();
        // Feb 28 (constrained) + 2 days + 1 carried day.
        assert_eq!(value, dt("2023-03-03T06:00:00"));
    }

    #[test]
    fn test_subtract_date_times() {
        let span = dt("2023-06-16T14:30:45") - dt("2023-06-15T12:15:30");
        assert_eq!(
            (span.days(), span.hours(), span.minutes(), span.seconds()),
            (1, 2, 15, 15)
        );
        let back = dt("2023-06-15T12:15:30").since(&dt("2023-06-16T14:30:45"));
        assert_eq!(back, span.negated());
    }

    #[test]
    fn test_with_fields() {
        let value = dt("2023-06-15T14:30:45")
            .with_fields(PartialDateTime {
                date: PartialDate {
                    day: Some(1),
                    ..Default::default()
                },
                time: PartialTime {
                    hour: Some(0),
                    ..Default::default()
                },
            })
            .unwrap();
        assert_eq!(value, dt("2023-06-01T00:30:45"));
    }

    #[test]
    fn test_epoch_micros_before_1970() {
        let value = dt("1969-12-31T23:59:59.999999");
        assert_eq!(value.epoch_micros(), -1);
    }

    #[test]
    fn test_comparison() {
        assert!(dt("2023-06-15T23:59:59") < dt("2023-06-16T00:00:00"));
        assert!(dt("2023-06-15T10:00:00") < dt("2023-06-15T10:00:00.000001"));
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(dt("2023-06-15T14:30:45").to_string(), "2023-06-15T14:30:45");
        assert_eq!(dt("2023-06-15t14:30:45.5").to_string(), "2023-06-15T14:30:45.5");
        for bad in ["2023-06-15", "2023-06-15 14:30:45", "2023-06-15T25:00:00", "2023-06-15T14:30:45Z"] {
            let err = bad.parse::<PlainDateTime>().unwrap_err();
            assert!(matches!(err, TemporalError::Format(_)), "{bad}");
        }
    }
}
