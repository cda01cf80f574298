// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Absolute points on the timeline.
//!
//! [`Instant`] stores a single signed count of microseconds since
//! 1970-01-01T00:00:00Z. It carries no calendar and no offset: civil fields
//! only appear once it is paired with a [`TimeZone`](crate::TimeZone).
//!
//! The representable span is ±10⁸ days around the epoch
//! (`|µs| ≤ 8.64 × 10¹⁸`), which comfortably covers every civil date the
//! other types can express once an offset is applied.

use crate::clock::{Clock, SystemClock};
use crate::datetime::{self, PlainDateTime};
use crate::date::PlainDate;
use crate::duration::{Duration, MICROS_PER_DAY};
use crate::error::{TemporalError, TemporalResult};
use crate::parse::{self, Cursor, MICROS_PER_SECOND};
use crate::time::PlainTime;
use crate::timezone::TimeZone;
use crate::zoned::ZonedDateTime;
use chrono::{DateTime, Utc};
use qtty::Seconds;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// An exact point in time, microsecond resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instant {
    micros: i64,
}

impl Instant {
    /// Largest representable distance from the epoch, in microseconds.
    pub const MAX_EPOCH_MICROS: i64 = 8_640_000_000_000_000_000;

    /// 1970-01-01T00:00:00Z.
    pub const EPOCH: Self = Self { micros: 0 };

    // ── constructors ──────────────────────────────────────────────────

    pub fn from_epoch_microseconds(micros: i64) -> TemporalResult<Self> {
        if !(-Self::MAX_EPOCH_MICROS..=Self::MAX_EPOCH_MICROS).contains(&micros) {
            return Err(TemporalError::field_range(
                "epoch microseconds",
                micros,
                -Self::MAX_EPOCH_MICROS,
                Self::MAX_EPOCH_MICROS,
            ));
        }
        Ok(Self { micros })
    }

    /// From real-valued milliseconds, rounded to the nearest microsecond.
    pub fn from_epoch_milliseconds(millis: f64) -> TemporalResult<Self> {
        Self::from_scaled(millis, 1_000.0, "epoch milliseconds")
    }

    /// From real-valued seconds, rounded to the nearest microsecond.
    pub fn from_epoch_seconds(seconds: f64) -> TemporalResult<Self> {
        Self::from_scaled(seconds, MICROS_PER_SECOND as f64, "epoch seconds")
    }

    fn from_scaled(value: f64, micros_per_unit: f64, name: &str) -> TemporalResult<Self> {
        if !value.is_finite() {
            return Err(TemporalError::argument(format!("{name} must be a finite number")));
        }
        let micros = (value * micros_per_unit).round();
        if micros.abs() > Self::MAX_EPOCH_MICROS as f64 {
            return Err(TemporalError::range(format!("{name} {value} is out of range")));
        }
        Self::from_epoch_microseconds(micros as i64)
    }

    pub(crate) fn from_epoch_micros_wide(micros: i128) -> TemporalResult<Self> {
        let narrowed = i64::try_from(micros)
            .map_err(|_| TemporalError::range("instant outside the supported range"))?;
        Self::from_epoch_microseconds(narrowed)
    }

    /// Reads the system clock.
    pub fn now() -> Self {
        SystemClock.now()
    }

    /// Reads an arbitrary [`Clock`].
    pub fn now_from(clock: &dyn Clock) -> Self {
        clock.now()
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn epoch_microseconds(&self) -> i64 {
        self.micros
    }

    #[inline]
    pub fn epoch_milliseconds(&self) -> f64 {
        self.micros as f64 / 1_000.0
    }

    /// Seconds since the epoch as a typed quantity.
    #[inline]
    pub fn epoch_seconds(&self) -> Seconds {
        Seconds::new(self.micros as f64 / MICROS_PER_SECOND as f64)
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + duration`.
    ///
    /// Days count as exactly 24 hours. Years and months have no fixed length
    /// on the absolute timeline, so any non-zero value is an argument error.
    pub fn checked_add(&self, duration: &Duration) -> TemporalResult<Self> {
        if !duration.is_fixed() {
            return Err(TemporalError::argument(format!(
                "cannot add calendar units to an instant: {duration}"
            )));
        }
        Self::from_epoch_micros_wide(i128::from(self.micros) + duration.fixed_micros())
    }

    pub fn checked_sub(&self, duration: &Duration) -> TemporalResult<Self> {
        self.checked_add(&duration.negated())
    }

    /// Exact elapsed time from `other` to `self` in days and finer units.
    pub fn since(&self, other: &Instant) -> Duration {
        Duration::from_fixed_micros(i128::from(self.micros) - i128::from(other.micros))
    }

    pub fn until(&self, other: &Instant) -> Duration {
        other.since(self)
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    // ── conversions ───────────────────────────────────────────────────

    /// Pairs this instant with `tz`; civil fields are derived on access.
    #[inline]
    pub fn to_zoned_date_time(&self, tz: TimeZone) -> ZonedDateTime {
        ZonedDateTime::new(*self, tz)
    }

    /// Wall-clock reading at a fixed offset from UTC.
    ///
    /// Offsets are bounded by one day, so the shifted count stays inside
    /// `i64` and the year inside `i32`.
    pub(crate) fn civil_at(&self, offset_seconds: i32) -> PlainDateTime {
        let shifted = self.micros + i64::from(offset_seconds) * MICROS_PER_SECOND;
        let days = shifted.div_euclid(MICROS_PER_DAY);
        let time = PlainTime::from_micros_of_day(shifted.rem_euclid(MICROS_PER_DAY));
        PlainDateTime::from_parts(PlainDate::from_epoch_days_in_range(days), time)
    }

    /// `None` when the instant lies outside chrono's supported range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.micros)
    }

    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        // chrono's range is narrower than ours, so this never clamps.
        Self {
            micros: datetime.timestamp_micros(),
        }
    }
}

impl From<DateTime<Utc>> for Instant {
    #[inline]
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from_utc(datetime)
    }
}

impl Sub for Instant {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.since(&rhs)
    }
}

impl fmt::Display for Instant {
    /// Always rendered in UTC with a `Z` suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.civil_at(0))?;
        parse::write_offset(f, 0)
    }
}

impl FromStr for Instant {
    type Err = TemporalError;

    /// Accepts `<date>T<time>` followed by `Z` or a numeric offset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cur = Cursor::new(s);
        let (fields, offset) = datetime::date_time_fields(&mut cur)
            .zip(parse::offset_seconds(&mut cur))
            .filter(|_| cur.is_done())
            .ok_or_else(|| TemporalError::format("instant", s))?;
        let local = datetime::from_raw_fields(fields).map_err(|e| e.into_format("instant", s))?;
        let micros = local.epoch_micros() - i128::from(offset) * i128::from(MICROS_PER_SECOND);
        Self::from_epoch_micros_wide(micros).map_err(|e| e.into_format("instant", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::duration::DurationFields;
    use chrono::TimeZone as _;

    #[test]
    fn test_epoch_constructors() {
        let a = Instant::from_epoch_seconds(1_686_835_845.123_456).unwrap();
        assert_eq!(a.epoch_microseconds(), 1_686_835_845_123_456);
        let b = Instant::from_epoch_milliseconds(1_686_835_845_123.456).unwrap();
        assert_eq!(a, b);
        assert_eq!(Instant::from_epoch_microseconds(0).unwrap(), Instant::EPOCH);
        assert_eq!(a.epoch_seconds().value(), 1_686_835_845.123_456);
    }

    #[test]
    fn test_epoch_constructors_reject_bad_input() {
        assert!(matches!(
            Instant::from_epoch_seconds(f64::INFINITY),
            Err(TemporalError::Argument(_))
        ));
        assert!(matches!(
            Instant::from_epoch_seconds(1e20),
            Err(TemporalError::Range(_))
        ));
        assert!(Instant::from_epoch_microseconds(i64::MAX).is_err());
    }

    #[test]
    fn test_add_fixed_duration() {
        let start = Instant::from_epoch_seconds(0.0).unwrap();
        let later = start.checked_add(&Duration::from_hours(1)).unwrap();
        assert_eq!(later.epoch_microseconds(), 3_600_000_000);
        let day = start.checked_add(&Duration::from_days(1)).unwrap();
        assert_eq!(day.epoch_microseconds(), 86_400_000_000);
        assert_eq!(later.checked_sub(&Duration::from_hours(1)).unwrap(), start);
    }

    #[test]
    fn test_add_calendar_duration_is_rejected() {
        let err = Instant::EPOCH.checked_add(&Duration::from_months(1)).unwrap_err();
        assert!(matches!(err, TemporalError::Argument(_)));
        assert!(Instant::EPOCH.checked_sub(&Duration::from_years(1)).is_err());
    }

    #[test]
    fn test_difference() {
        let a = Instant::from_epoch_seconds(0.0).unwrap();
        let b = Instant::from_epoch_seconds(3_600.0).unwrap();
        let span = b - a;
        assert_eq!(span.hours(), 1);
        assert_eq!(a.since(&b).hours(), -1);

        let span = b.since(&Instant::from_epoch_seconds(-90_061.5).unwrap());
        let expected = Duration::from_fields(DurationFields {
            days: 1,
            hours: 2,
            minutes: 1,
            seconds: 1,
            microseconds: 500_000,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(span, expected);
    }

    #[test]
    fn test_ordering() {
        let a = Instant::from_epoch_microseconds(-1).unwrap();
        let b = Instant::EPOCH;
        assert!(a < b);
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn test_chrono_bridge() {
        let utc = Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 45).unwrap();
        let instant = Instant::from(utc);
        assert_eq!(instant.to_utc(), Some(utc));
        assert_eq!(instant.to_string(), "2023-06-15T14:30:45Z");
    }

    #[test]
    fn test_now_from_clock() {
        let fixed = Instant::from_epoch_seconds(1_700_000_000.0).unwrap();
        assert_eq!(Instant::now_from(&FixedClock::new(fixed)), fixed);
        assert!(Instant::now().epoch_microseconds() > 1_600_000_000_000_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Instant::EPOCH.to_string(), "1970-01-01T00:00:00Z");
        let before = Instant::from_epoch_microseconds(-500_000).unwrap();
        assert_eq!(before.to_string(), "1969-12-31T23:59:59.5Z");
    }

    #[test]
    fn test_from_str_applies_offset() {
        let utc: Instant = "2023-06-15T14:30:45Z".parse().unwrap();
        let shifted: Instant = "2023-06-15T16:30:45+02:00".parse().unwrap();
        assert_eq!(utc, shifted);
        assert_eq!(utc.to_string().parse::<Instant>().unwrap(), utc);
        for bad in ["2023-06-15T14:30:45", "2023-06-15T14:30:45+2", "2023-02-30T00:00:00Z"] {
            assert!(matches!(bad.parse::<Instant>(), Err(TemporalError::Format(_))), "{bad}");
        }
    }
}
