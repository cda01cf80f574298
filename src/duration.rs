// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Signed multi-unit spans of time.
//!
//! A [`Duration`] holds eight whole-number fields. Construction always
//! normalizes them:
//!
//! 1. the fixed-ratio chain `µs → s → min → h → day` is reduced so every
//!    field sits inside its modulus (`10⁶`, `60`, `60`, `24`), carrying the
//!    overflow into the next coarser unit;
//! 2. weeks are folded into days (`× 7`), so `weeks()` is always zero on a
//!    constructed value;
//! 3. years and months are left alone: their length depends on where they
//!    are applied, so they are never mixed with the fixed units.
//!
//! A field only carries once its magnitude reaches the modulus, and the
//! carry floors: `P1DT-25H` becomes `P-1DT23H`. Seconds and microseconds
//! are then brought to a common sign. Other fields of different signs are
//! accepted as given; see [`Duration::sign`].

use crate::datetime::PlainDateTime;
use crate::error::{TemporalError, TemporalResult};
use crate::parse::{self, Cursor, MICROS_PER_SECOND};
use qtty::{Day, Days, Second, Seconds};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

pub(crate) const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
pub(crate) const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
pub(crate) const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// Largest magnitude any single field may hold (`2⁵³ − 1`).
pub const MAX_FIELD: i64 = 9_007_199_254_740_991;

/// Mean Gregorian month used when no reference date is available.
const APPROX_DAYS_PER_MONTH: f64 = 30.44;
/// Julian year used when no reference date is available.
const APPROX_DAYS_PER_YEAR: f64 = 365.25;

static TRUNCATION_REPORTED: AtomicBool = AtomicBool::new(false);

// ═══════════════════════════════════════════════════════════════════════════
// Units
// ═══════════════════════════════════════════════════════════════════════════

/// Duration unit, from coarsest to finest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Microsecond,
}

impl Unit {
    /// Plural lower-case name (`"years"`, `"microseconds"`, …).
    pub const fn name(&self) -> &'static str {
        match self {
            Unit::Year => "years",
            Unit::Month => "months",
            Unit::Week => "weeks",
            Unit::Day => "days",
            Unit::Hour => "hours",
            Unit::Minute => "minutes",
            Unit::Second => "seconds",
            Unit::Microsecond => "microseconds",
        }
    }

    /// `true` for years and months, whose length is not fixed.
    pub const fn is_calendar(&self) -> bool {
        matches!(self, Unit::Year | Unit::Month)
    }

    /// Length in microseconds for the fixed units.
    const fn fixed_micros(&self) -> Option<i64> {
        match self {
            Unit::Year | Unit::Month => None,
            Unit::Week => Some(7 * MICROS_PER_DAY),
            Unit::Day => Some(MICROS_PER_DAY),
            Unit::Hour => Some(MICROS_PER_HOUR),
            Unit::Minute => Some(MICROS_PER_MINUTE),
            Unit::Second => Some(MICROS_PER_SECOND),
            Unit::Microsecond => Some(1),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = TemporalError;

    /// Accepts singular and plural names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let unit = match lower.strip_suffix('s').unwrap_or(lower.as_str()) {
            "year" => Unit::Year,
            "month" => Unit::Month,
            "week" => Unit::Week,
            "day" => Unit::Day,
            "hour" => Unit::Hour,
            "minute" => Unit::Minute,
            "second" => Unit::Second,
            "microsecond" => Unit::Microsecond,
            _ => return Err(TemporalError::argument(format!("invalid unit {s:?}"))),
        };
        Ok(unit)
    }
}

/// Result of [`Duration::total`].
///
/// Totals that had to fall back on the 30.44-day month or the 365.25-day
/// year are tagged [`Total::Approximate`] so callers can tell them apart.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Total {
    Exact(f64),
    Approximate(f64),
}

impl Total {
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Total::Exact(v) | Total::Approximate(v) => v,
        }
    }

    #[inline]
    pub fn is_exact(self) -> bool {
        matches!(self, Total::Exact(_))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Field records
// ═══════════════════════════════════════════════════════════════════════════

/// Whole-number input for [`Duration::from_fields`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DurationFields {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub microseconds: i64,
}

/// Real-valued input for [`Duration::from_float_fields`].
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FloatDurationFields {
    pub years: f64,
    pub months: f64,
    pub weeks: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub microseconds: f64,
}

/// Field overrides for [`Duration::with_fields`]; `None` keeps the current value.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PartialDuration {
    pub years: Option<i64>,
    pub months: Option<i64>,
    pub weeks: Option<i64>,
    pub days: Option<i64>,
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
    pub microseconds: Option<i64>,
}

impl DurationFields {
    fn named(&self) -> [(&'static str, i64); 8] {
        [
            ("years", self.years),
            ("months", self.months),
            ("weeks", self.weeks),
            ("days", self.days),
            ("hours", self.hours),
            ("minutes", self.minutes),
            ("seconds", self.seconds),
            ("microseconds", self.microseconds),
        ]
    }

    fn check_bounds(&self) -> TemporalResult<()> {
        for (name, value) in self.named() {
            if !(-MAX_FIELD..=MAX_FIELD).contains(&value) {
                return Err(TemporalError::field_range(name, value, -MAX_FIELD, MAX_FIELD));
            }
        }
        Ok(())
    }

    /// Applies the carry chain. Inputs must already be within [`MAX_FIELD`],
    /// which keeps every intermediate sum inside `i64`.
    ///
    /// A field carries only once its magnitude reaches the modulus, and then
    /// by floor division: `seconds = -90` becomes `-2` minutes and `30`
    /// seconds, while `hours = -23` stays as it is.
    fn normalize(mut self) -> TemporalResult<Duration> {
        self.check_bounds()?;

        carry(&mut self.microseconds, &mut self.seconds, MICROS_PER_SECOND);
        carry(&mut self.seconds, &mut self.minutes, 60);
        // Seconds and microseconds share one `S` component, so they must
        // agree in sign.
        if self.seconds > 0 && self.microseconds < 0 {
            self.seconds -= 1;
            self.microseconds += MICROS_PER_SECOND;
        } else if self.seconds < 0 && self.microseconds > 0 {
            self.seconds += 1;
            self.microseconds -= MICROS_PER_SECOND;
        }
        carry(&mut self.minutes, &mut self.hours, 60);
        carry(&mut self.hours, &mut self.days, 24);
        self.days += self.weeks * 7;
        self.weeks = 0;

        self.check_bounds()?;
        Ok(Duration {
            years: self.years,
            months: self.months,
            weeks: 0,
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            microseconds: self.microseconds,
        })
    }
}

fn carry(field: &mut i64, coarser: &mut i64, modulus: i64) {
    if field.abs() >= modulus {
        *coarser += field.div_euclid(modulus);
        *field = field.rem_euclid(modulus);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════════════════════════════════════

/// An immutable, normalized, signed span of time.
///
/// Equality is field-wise. There is no `Ord`: `P1Y` and `P12M`
/// compare as equal under [`Duration::compare`] while being different values.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Duration {
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    microseconds: i64,
}

impl Duration {
    /// The zero-length duration, `PT0S`.
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        weeks: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        microseconds: 0,
    };

    // ── constructors ──────────────────────────────────────────────────

    /// Builds and normalizes a duration from whole-number fields.
    ///
    /// Fails with a range error when a field, before or after carrying,
    /// exceeds [`MAX_FIELD`] in magnitude.
    pub fn from_fields(fields: DurationFields) -> TemporalResult<Self> {
        fields.normalize()
    }

    /// Builds a duration from real-valued fields.
    ///
    /// Fractional parts are truncated toward zero. The first truncation in a
    /// process emits a `WARN` event through `tracing`; later ones are logged
    /// at `DEBUG`. Non-finite values are rejected with an argument error.
    pub fn from_float_fields(fields: FloatDurationFields) -> TemporalResult<Self> {
        let whole = |name: &'static str, value: f64| -> TemporalResult<i64> {
            if !value.is_finite() {
                return Err(TemporalError::argument(format!("{name} must be a finite number")));
            }
            let truncated = value.trunc();
            if truncated != value {
                report_truncation(name, value, truncated);
            }
            if truncated.abs() > MAX_FIELD as f64 {
                return Err(TemporalError::range(format!(
                    "{name} must be in {}..={MAX_FIELD}, got {value}",
                    -MAX_FIELD
                )));
            }
            Ok(truncated as i64)
        };
        Self::from_fields(DurationFields {
            years: whole("years", fields.years)?,
            months: whole("months", fields.months)?,
            weeks: whole("weeks", fields.weeks)?,
            days: whole("days", fields.days)?,
            hours: whole("hours", fields.hours)?,
            minutes: whole("minutes", fields.minutes)?,
            seconds: whole("seconds", fields.seconds)?,
            microseconds: whole("microseconds", fields.microseconds)?,
        })
    }

    fn single(fields: DurationFields) -> Self {
        // Any single field within MAX_FIELD normalizes without overflow.
        fields.normalize().unwrap_or(Self::ZERO)
    }

    fn clamp_field(value: i64) -> i64 {
        value.clamp(-MAX_FIELD, MAX_FIELD)
    }

    /// Calendar years. Magnitudes beyond [`MAX_FIELD`] saturate.
    pub fn from_years(years: i64) -> Self {
        Self::single(DurationFields {
            years: Self::clamp_field(years),
            ..DurationFields::default()
        })
    }

    /// Calendar months. Magnitudes beyond [`MAX_FIELD`] saturate.
    pub fn from_months(months: i64) -> Self {
        Self::single(DurationFields {
            months: Self::clamp_field(months),
            ..DurationFields::default()
        })
    }

    /// Days. Magnitudes beyond [`MAX_FIELD`] saturate.
    pub fn from_days(days: i64) -> Self {
        Self::single(DurationFields {
            days: Self::clamp_field(days),
            ..DurationFields::default()
        })
    }

    /// Hours, carried into days. Magnitudes beyond [`MAX_FIELD`] saturate.
    pub fn from_hours(hours: i64) -> Self {
        Self::single(DurationFields {
            hours: Self::clamp_field(hours),
            ..DurationFields::default()
        })
    }

    /// Minutes, carried upward. Magnitudes beyond [`MAX_FIELD`] saturate.
    pub fn from_minutes(minutes: i64) -> Self {
        Self::single(DurationFields {
            minutes: Self::clamp_field(minutes),
            ..DurationFields::default()
        })
    }

    /// Seconds, carried upward. Magnitudes beyond [`MAX_FIELD`] saturate.
    pub fn from_seconds(seconds: i64) -> Self {
        Self::single(DurationFields {
            seconds: Self::clamp_field(seconds),
            ..DurationFields::default()
        })
    }

    /// Microseconds, carried upward. Magnitudes beyond [`MAX_FIELD`] saturate.
    pub fn from_microseconds(microseconds: i64) -> Self {
        Self::single(DurationFields {
            microseconds: Self::clamp_field(microseconds),
            ..DurationFields::default()
        })
    }

    /// Balances an exact microsecond count into days and time fields.
    ///
    /// Callers guarantee the day count stays within [`MAX_FIELD`], which
    /// holds for differences between any two representable civil values.
    pub(crate) fn from_fixed_micros(micros: i128) -> Self {
        let day = i128::from(MICROS_PER_DAY);
        let days = micros / day;
        let rest = (micros % day) as i64;
        Self {
            days: days as i64,
            hours: rest / MICROS_PER_HOUR,
            minutes: rest % MICROS_PER_HOUR / MICROS_PER_MINUTE,
            seconds: rest % MICROS_PER_MINUTE / MICROS_PER_SECOND,
            microseconds: rest % MICROS_PER_SECOND,
            ..Self::ZERO
        }
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn years(&self) -> i64 {
        self.years
    }

    #[inline]
    pub const fn months(&self) -> i64 {
        self.months
    }

    /// Always zero once constructed: weeks are folded into days.
    #[inline]
    pub const fn weeks(&self) -> i64 {
        self.weeks
    }

    #[inline]
    pub const fn days(&self) -> i64 {
        self.days
    }

    #[inline]
    pub const fn hours(&self) -> i64 {
        self.hours
    }

    #[inline]
    pub const fn minutes(&self) -> i64 {
        self.minutes
    }

    #[inline]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    #[inline]
    pub const fn microseconds(&self) -> i64 {
        self.microseconds
    }

    /// All eight fields as a plain record.
    pub const fn fields(&self) -> DurationFields {
        DurationFields {
            years: self.years,
            months: self.months,
            weeks: self.weeks,
            days: self.days,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            microseconds: self.microseconds,
        }
    }

    /// `0` when every field is zero, `-1` when any field is negative, `1`
    /// otherwise.
    ///
    /// Mixed-sign durations (say `days = 1, hours = -1`) are kept as built
    /// and report `-1`.
    pub fn sign(&self) -> i8 {
        let fields = self.fields().named();
        if fields.iter().all(|(_, v)| *v == 0) {
            0
        } else if fields.iter().any(|(_, v)| *v < 0) {
            -1
        } else {
            1
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// `true` when years and months are both zero.
    #[inline]
    pub const fn is_fixed(&self) -> bool {
        self.years == 0 && self.months == 0
    }

    /// Exact length of the fixed-unit fields (days through microseconds).
    pub(crate) fn fixed_micros(&self) -> i128 {
        i128::from(self.days) * i128::from(MICROS_PER_DAY)
            + i128::from(self.hours) * i128::from(MICROS_PER_HOUR)
            + i128::from(self.minutes) * i128::from(MICROS_PER_MINUTE)
            + i128::from(self.seconds) * i128::from(MICROS_PER_SECOND)
            + i128::from(self.microseconds)
    }

    /// Exact length of the hour..microsecond fields.
    pub(crate) fn time_micros(&self) -> i128 {
        self.fixed_micros() - i128::from(self.days) * i128::from(MICROS_PER_DAY)
    }

    /// Fixed-unit length in seconds; years and months are ignored.
    pub fn total_seconds(&self) -> f64 {
        self.fixed_micros() as f64 / MICROS_PER_SECOND as f64
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// Field-wise sum, re-normalized.
    pub fn checked_add(&self, other: &Duration) -> TemporalResult<Self> {
        self.zip(other, |a, b| a + b)
    }

    /// Field-wise difference, re-normalized.
    pub fn checked_sub(&self, other: &Duration) -> TemporalResult<Self> {
        self.zip(other, |a, b| a - b)
    }

    fn zip(&self, other: &Duration, op: impl Fn(i64, i64) -> i64) -> TemporalResult<Self> {
        let (a, b) = (self.fields(), other.fields());
        Self::from_fields(DurationFields {
            years: op(a.years, b.years),
            months: op(a.months, b.months),
            weeks: op(a.weeks, b.weeks),
            days: op(a.days, b.days),
            hours: op(a.hours, b.hours),
            minutes: op(a.minutes, b.minutes),
            seconds: op(a.seconds, b.seconds),
            microseconds: op(a.microseconds, b.microseconds),
        })
    }

    /// Every field negated. Bounds are symmetric, so this cannot fail.
    pub fn negated(&self) -> Self {
        self.map(i64::neg)
    }

    /// Every field replaced by its magnitude.
    pub fn abs(&self) -> Self {
        self.map(i64::abs)
    }

    fn map(&self, op: impl Fn(i64) -> i64) -> Self {
        Self {
            years: op(self.years),
            months: op(self.months),
            weeks: op(self.weeks),
            days: op(self.days),
            hours: op(self.hours),
            minutes: op(self.minutes),
            seconds: op(self.seconds),
            microseconds: op(self.microseconds),
        }
    }

    /// Copy with the given fields replaced, then re-normalized.
    pub fn with_fields(&self, partial: PartialDuration) -> TemporalResult<Self> {
        Self::from_fields(DurationFields {
            years: partial.years.unwrap_or(self.years),
            months: partial.months.unwrap_or(self.months),
            weeks: partial.weeks.unwrap_or(self.weeks),
            days: partial.days.unwrap_or(self.days),
            hours: partial.hours.unwrap_or(self.hours),
            minutes: partial.minutes.unwrap_or(self.minutes),
            seconds: partial.seconds.unwrap_or(self.seconds),
            microseconds: partial.microseconds.unwrap_or(self.microseconds),
        })
    }

    // ── comparison ────────────────────────────────────────────────────

    /// Orders by `years × 12 + months` first, then by the exact fixed-unit
    /// length.
    pub fn compare(a: &Duration, b: &Duration) -> Ordering {
        let months = |d: &Duration| d.years * 12 + d.months;
        months(a)
            .cmp(&months(b))
            .then_with(|| a.fixed_micros().cmp(&b.fixed_micros()))
    }

    // ── totals ────────────────────────────────────────────────────────

    /// The whole duration expressed as a real number of `unit`.
    ///
    /// With a `relative_to` point the duration is laid onto the calendar
    /// starting there and the result is [`Total::Exact`]. Without one:
    ///
    /// * `Unit::Year` and `Unit::Month` fail with an argument error;
    /// * fixed units treat a year as 365.25 days and a month as 30.44 days,
    ///   and the result is [`Total::Approximate`] whenever years or months
    ///   were non-zero.
    pub fn total(&self, unit: Unit, relative_to: Option<PlainDateTime>) -> TemporalResult<Total> {
        match relative_to {
            Some(start) => self.total_relative(unit, start).map(Total::Exact),
            None if unit.is_calendar() => Err(TemporalError::argument(format!(
                "a reference date is required to total {unit}"
            ))),
            None => {
                let calendar_days = Days::new(
                    self.years as f64 * APPROX_DAYS_PER_YEAR
                        + self.months as f64 * APPROX_DAYS_PER_MONTH,
                );
                let seconds = Seconds::new(self.total_seconds()) + calendar_days.to::<Second>();
                let value = seconds_in_unit(seconds, unit);
                Ok(if self.is_fixed() {
                    Total::Exact(value)
                } else {
                    Total::Approximate(value)
                })
            }
        }
    }

    fn total_relative(&self, unit: Unit, start: PlainDateTime) -> TemporalResult<f64> {
        let end = start.checked_add(self)?;
        match unit {
            Unit::Year => calendar_units_between(&start, &end, 12),
            Unit::Month => calendar_units_between(&start, &end, 1),
            Unit::Microsecond => Ok((end.epoch_micros() - start.epoch_micros()) as f64),
            fixed => {
                let micros = end.epoch_micros() - start.epoch_micros();
                let seconds = Seconds::new(micros as f64 / MICROS_PER_SECOND as f64);
                Ok(seconds_in_unit(seconds, fixed))
            }
        }
    }

    // ── rounding ──────────────────────────────────────────────────────

    /// Rounds toward zero to a multiple of `increment` × `smallest_unit`.
    ///
    /// Fields finer than `smallest_unit` are folded into it before
    /// truncation. The time fields fold into days (and weeks, which are
    /// expressed as days); years and months are each rounded on their own
    /// and never receive carries from the fixed units.
    pub fn round(&self, smallest_unit: Unit, increment: u32) -> TemporalResult<Self> {
        if increment == 0 {
            return Err(TemporalError::field_range("increment", 0, 1, i64::from(u32::MAX)));
        }
        let step = i64::from(increment);
        let fields = match smallest_unit {
            Unit::Year => DurationFields {
                years: self.years / step * step,
                ..DurationFields::default()
            },
            Unit::Month => DurationFields {
                years: self.years,
                months: self.months / step * step,
                ..DurationFields::default()
            },
            fixed => {
                let quantum = i128::from(fixed.fixed_micros().unwrap_or(1)) * i128::from(step);
                let kept = self.fixed_micros() / quantum * quantum;
                let balanced = Self::from_fixed_micros(kept);
                DurationFields {
                    years: self.years,
                    months: self.months,
                    ..balanced.fields()
                }
            }
        };
        Self::from_fields(fields)
    }
}

/// Converts a second count to `unit`; day-based units go through `qtty`.
fn seconds_in_unit(seconds: Seconds, unit: Unit) -> f64 {
    let days = seconds.to::<Day>().value();
    match unit {
        Unit::Microsecond => seconds.value() * MICROS_PER_SECOND as f64,
        Unit::Second => seconds.value(),
        Unit::Minute => seconds.value() / 60.0,
        Unit::Hour => seconds.value() / 3_600.0,
        Unit::Day => days,
        Unit::Week => days / 7.0,
        Unit::Month => days / APPROX_DAYS_PER_MONTH,
        Unit::Year => days / APPROX_DAYS_PER_YEAR,
    }
}

/// Fractional count of `step_months`-month periods between two civil points.
///
/// The whole part is the largest number of periods that can be added to
/// `start` without passing `end`; the remainder is measured against the
/// actual length of the next period.
fn calendar_units_between(
    start: &PlainDateTime,
    end: &PlainDateTime,
    step_months: i64,
) -> TemporalResult<f64> {
    let (from, to) = (start.epoch_micros(), end.epoch_micros());
    if from == to {
        return Ok(0.0);
    }
    let sign: i64 = if to > from { 1 } else { -1 };
    let month_delta = (i64::from(end.year()) - i64::from(start.year())) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    let mut whole = month_delta / step_months;

    let shift = |periods: i64| -> TemporalResult<i128> {
        Ok(start.add_months_constrained(periods * step_months)?.epoch_micros())
    };
    let passed = |micros: i128| if sign > 0 { micros > to } else { micros < to };

    let mut anchor = shift(whole)?;
    while passed(anchor) {
        whole -= sign;
        anchor = shift(whole)?;
    }
    let mut next = shift(whole + sign)?;
    while !passed(next) && next != to {
        whole += sign;
        anchor = next;
        next = shift(whole + sign)?;
    }
    if next == to {
        return Ok((whole + sign) as f64);
    }
    let fraction = (to - anchor) as f64 / (next - anchor) as f64;
    Ok(whole as f64 + fraction)
}

fn report_truncation(name: &str, value: f64, truncated: f64) {
    if TRUNCATION_REPORTED.swap(true, AtomicOrdering::Relaxed) {
        tracing::debug!(field = name, value, truncated, "fractional duration field truncated");
    } else {
        tracing::warn!(
            field = name,
            value,
            truncated,
            "converting fractional duration field to a whole number, precision may be lost"
        );
    }
}

impl Neg for Duration {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        self.negated()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// String form: P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for Duration {
    /// Sign-consistent durations get a single leading `-`; mixed-sign ones
    /// carry a sign on each negative component.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        let uniform_negative = self.fields().named().iter().all(|(_, v)| *v <= 0);
        let d = if uniform_negative {
            f.write_str("-")?;
            self.abs()
        } else {
            *self
        };

        f.write_str("P")?;
        for (value, designator) in [(d.years, 'Y'), (d.months, 'M'), (d.weeks, 'W'), (d.days, 'D')] {
            if value != 0 {
                write!(f, "{value}{designator}")?;
            }
        }
        if d.hours == 0 && d.minutes == 0 && d.seconds == 0 && d.microseconds == 0 {
            return Ok(());
        }
        f.write_str("T")?;
        if d.hours != 0 {
            write!(f, "{}H", d.hours)?;
        }
        if d.minutes != 0 {
            write!(f, "{}M", d.minutes)?;
        }
        if d.seconds != 0 || d.microseconds != 0 {
            // Normalization keeps the two fields sign-aligned.
            let sign = if d.seconds < 0 || d.microseconds < 0 { "-" } else { "" };
            write!(f, "{sign}{}", d.seconds.unsigned_abs())?;
            // |microseconds| < 10^6 after normalization.
            parse::write_fraction(f, d.microseconds.unsigned_abs() as u32)?;
            f.write_str("S")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = parse_duration(s).ok_or_else(|| TemporalError::format("duration", s))?;
        Self::from_fields(fields).map_err(|e| e.into_format("duration", s))
    }
}

fn parse_duration(s: &str) -> Option<DurationFields> {
    let mut cur = Cursor::new(s);
    // Components may be signed only when the whole duration is not.
    let component_signs = !matches!(cur.peek(), Some(b'-' | b'+'));
    let sign = cur.sign();
    cur.expect(b'P')?;

    let mut fields = DurationFields::default();
    let mut seen_any = false;
    // Designators must appear in grammar order; `rank` tracks the last one.
    let mut rank = 0;

    while !cur.is_done() && cur.peek() != Some(b'T') && cur.peek() != Some(b't') {
        let (value, designator) = component(&mut cur, component_signs)?;
        let (slot, next_rank) = match designator.to_ascii_uppercase() {
            b'Y' => (&mut fields.years, 1),
            b'M' => (&mut fields.months, 2),
            b'W' => (&mut fields.weeks, 3),
            b'D' => (&mut fields.days, 4),
            _ => return None,
        };
        if next_rank <= rank {
            return None;
        }
        rank = next_rank;
        *slot = value;
        seen_any = true;
    }

    if cur.eat(b'T') {
        let mut time_seen = false;
        rank = 0;
        while !cur.is_done() {
            let negative = component_signs && cur.eat(b'-');
            let (whole, _) = cur.digits_min(1)?;
            let whole = if negative { -whole } else { whole };
            if let Some(fraction) = cur.fraction_micros()? {
                cur.expect(b'S')?;
                if !cur.is_done() || rank >= 3 {
                    return None;
                }
                let micros = i64::from(fraction);
                fields.seconds = whole;
                fields.microseconds = if negative { -micros } else { micros };
                time_seen = true;
                break;
            }
            let designator = cur.peek()?.to_ascii_uppercase();
            cur.expect(designator)?;
            let (slot, next_rank) = match designator {
                b'H' => (&mut fields.hours, 1),
                b'M' => (&mut fields.minutes, 2),
                b'S' => (&mut fields.seconds, 3),
                _ => return None,
            };
            if next_rank <= rank {
                return None;
            }
            rank = next_rank;
            *slot = whole;
            time_seen = true;
        }
        if !time_seen {
            return None;
        }
        seen_any = true;
    }

    if !seen_any || !cur.is_done() {
        return None;
    }
    if sign < 0 {
        for slot in [
            &mut fields.years,
            &mut fields.months,
            &mut fields.weeks,
            &mut fields.days,
            &mut fields.hours,
            &mut fields.minutes,
            &mut fields.seconds,
            &mut fields.microseconds,
        ] {
            *slot = -*slot;
        }
    }
    Some(fields)
}

/// `[-]digits designator` inside the date part.
fn component(cur: &mut Cursor<'_>, signed: bool) -> Option<(i64, u8)> {
    let negative = signed && cur.eat(b'-');
    let (value, _) = cur.digits_min(1)?;
    let designator = cur.peek()?;
    cur.expect(designator)?;
    Some((if negative { -value } else { value }, designator))
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
