// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Wall-clock time of day without a date or zone.

use crate::duration::{Duration, MICROS_PER_DAY, MICROS_PER_HOUR, MICROS_PER_MINUTE};
use crate::error::{TemporalError, TemporalResult};
use crate::parse::{self, Cursor, MICROS_PER_SECOND};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A time of day at microsecond resolution, `00:00:00` through
/// `23:59:59.999999`.
///
/// The derived ordering follows field order, which is chronological.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlainTime {
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: u32,
}

/// Field overrides for [`PlainTime::with_fields`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PartialTime {
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub microsecond: Option<u32>,
}

impl PlainTime {
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        microsecond: 0,
    };

    /// Validates every field; the first one out of range is named in the
    /// returned [`TemporalError::Range`].
    pub fn new(hour: u8, minute: u8, second: u8, microsecond: u32) -> TemporalResult<Self> {
        if hour > 23 {
            return Err(TemporalError::field_range("hour", hour.into(), 0, 23));
        }
        if minute > 59 {
            return Err(TemporalError::field_range("minute", minute.into(), 0, 59));
        }
        if second > 59 {
            return Err(TemporalError::field_range("second", second.into(), 0, 59));
        }
        if i64::from(microsecond) >= MICROS_PER_SECOND {
            return Err(TemporalError::field_range(
                "microsecond",
                microsecond.into(),
                0,
                MICROS_PER_SECOND - 1,
            ));
        }
        Ok(Self {
            hour,
            minute,
            second,
            microsecond,
        })
    }

    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[inline]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    #[inline]
    pub const fn second(&self) -> u8 {
        self.second
    }

    #[inline]
    pub const fn microsecond(&self) -> u32 {
        self.microsecond
    }

    /// Microseconds elapsed since midnight.
    pub(crate) fn micros_of_day(&self) -> i64 {
        i64::from(self.hour) * MICROS_PER_HOUR
            + i64::from(self.minute) * MICROS_PER_MINUTE
            + i64::from(self.second) * MICROS_PER_SECOND
            + i64::from(self.microsecond)
    }

    /// Inverse of [`micros_of_day`](Self::micros_of_day); the input must lie
    /// in `0..MICROS_PER_DAY`.
    pub(crate) fn from_micros_of_day(micros: i64) -> Self {
        debug_assert!((0..MICROS_PER_DAY).contains(&micros));
        Self {
            hour: (micros / MICROS_PER_HOUR) as u8,
            minute: (micros % MICROS_PER_HOUR / MICROS_PER_MINUTE) as u8,
            second: (micros % MICROS_PER_MINUTE / MICROS_PER_SECOND) as u8,
            microsecond: (micros % MICROS_PER_SECOND) as u32,
        }
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Adds the hour..microsecond fields of `duration`, wrapping at midnight.
    ///
    /// Returns the wrapped time and the number of whole days carried out of
    /// (positive) or borrowed from (negative) the day. The duration's day and
    /// calendar fields are not looked at.
    pub fn add_with_carry(&self, duration: &Duration) -> (PlainTime, i64) {
        let day = i128::from(MICROS_PER_DAY);
        let total = i128::from(self.micros_of_day()) + duration.time_micros();
        let carry = total.div_euclid(day) as i64;
        let wrapped = total.rem_euclid(day) as i64;
        (Self::from_micros_of_day(wrapped), carry)
    }

    /// `self + duration`, wrapping around midnight.
    pub fn wrapping_add(&self, duration: &Duration) -> Self {
        self.add_with_carry(duration).0
    }

    /// `self - duration`, wrapping around midnight.
    pub fn wrapping_sub(&self, duration: &Duration) -> Self {
        self.add_with_carry(&duration.negated()).0
    }

    /// Elapsed time from `other` to `self`; negative when `other` is later.
    pub fn since(&self, other: &PlainTime) -> Duration {
        Duration::from_fixed_micros(i128::from(self.micros_of_day() - other.micros_of_day()))
    }

    /// Elapsed time from `self` to `other`.
    pub fn until(&self, other: &PlainTime) -> Duration {
        other.since(self)
    }

    pub fn with_fields(&self, partial: PartialTime) -> TemporalResult<Self> {
        Self::new(
            partial.hour.unwrap_or(self.hour),
            partial.minute.unwrap_or(self.minute),
            partial.second.unwrap_or(self.second),
            partial.microsecond.unwrap_or(self.microsecond),
        )
    }

    /// Builds from raw parsed integers, range-checking before narrowing.
    pub(crate) fn from_raw(hour: i64, minute: i64, second: i64, micros: i64) -> TemporalResult<Self> {
        let narrow = |name: &str, value: i64, max: i64| -> TemporalResult<i64> {
            if (0..=max).contains(&value) {
                Ok(value)
            } else {
                Err(TemporalError::field_range(name, value, 0, max))
            }
        };
        Self::new(
            narrow("hour", hour, 23)? as u8,
            narrow("minute", minute, 59)? as u8,
            narrow("second", second, 59)? as u8,
            narrow("microsecond", micros, MICROS_PER_SECOND - 1)? as u32,
        )
    }
}

impl Add<Duration> for PlainTime {
    type Output = PlainTime;
    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.wrapping_add(&rhs)
    }
}

impl Sub<Duration> for PlainTime {
    type Output = PlainTime;
    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.wrapping_sub(&rhs)
    }
}

impl Sub for PlainTime {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.since(&rhs)
    }
}

impl fmt::Display for PlainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        parse::write_fraction(f, self.microsecond)
    }
}

impl FromStr for PlainTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cur = Cursor::new(s);
        let (h, m, sec, us) = parse::time_fields(&mut cur)
            .filter(|_| cur.is_done())
            .ok_or_else(|| TemporalError::format("time", s))?;
        Self::from_raw(h, m, sec, us).map_err(|e| e.into_format("time", s))
    }
}
