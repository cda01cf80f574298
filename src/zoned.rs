// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Instants viewed through a time zone.
//!
//! A [`ZonedDateTime`] stores only an [`Instant`] and a [`TimeZone`]. Every
//! civil field is derived on access from the offset the zone reports for
//! that instant, so [`ZonedDateTime::to_instant`] always returns exactly
//! what the value was built from.
//!
//! Arithmetic takes two paths:
//!
//! * years, months, weeks and days move the **wall clock**: the civil
//!   reading is advanced and then re-resolved in the zone, so "one day
//!   later" keeps the local time of day across an offset change;
//! * hours and finer move the **timeline**: they are added to the instant,
//!   so "6 hours later" is exactly 21 600 s even when the local clock
//!   jumps in between.
//!
//! Durations carry whole days out of their hour field, so `PT24H` is the
//! same value as `P1D` and follows the wall clock. An exact 24 hours across
//! a transition goes through the instant:
//!
//! ```
//! use civtime::{Duration, TimeZone, ZonedDateTime};
//!
//! let tz = TimeZone::fixed(3_600).unwrap();
//! let zdt: ZonedDateTime = "2024-03-30T12:00:00+01:00".parse().unwrap();
//! let exact = zdt.to_instant().checked_add(&Duration::from_hours(24)).unwrap();
//! assert_eq!(exact.to_zoned_date_time(tz).hour(), 12);
//! ```

use crate::calendar::Calendar;
use crate::clock::{Clock, SystemClock};
use crate::date::PlainDate;
use crate::datetime::{self, PartialDateTime, PlainDateTime};
use crate::duration::{Duration, DurationFields};
use crate::error::{TemporalError, TemporalResult};
use crate::instant::Instant;
use crate::parse::{self, Cursor, MICROS_PER_SECOND};
use crate::time::PlainTime;
use crate::timezone::{Disambiguation, TimeZone};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An exact instant paired with the zone it is displayed in.
///
/// Equality requires the same instant and the same zone identifier. The
/// ordering compares instants first and zone identifiers second.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZonedDateTime {
    instant: Instant,
    tz: TimeZone,
}

impl ZonedDateTime {
    /// Pairs `instant` with `tz`. Never fails: every instant has exactly one
    /// civil reading in every zone.
    #[inline]
    pub fn new(instant: Instant, tz: TimeZone) -> Self {
        Self { instant, tz }
    }

    /// Resolves a wall-clock reading in `tz` under `disambiguation`.
    pub fn from_plain_date_time(
        local: PlainDateTime,
        tz: TimeZone,
        disambiguation: Disambiguation,
    ) -> TemporalResult<Self> {
        let instant = tz.instant_for(&local, disambiguation)?;
        Ok(Self::new(instant, tz))
    }

    /// Current time in `tz`, read from the system clock.
    pub fn now(tz: TimeZone) -> Self {
        Self::now_from(&SystemClock, tz)
    }

    pub fn now_from(clock: &dyn Clock, tz: TimeZone) -> Self {
        Self::new(clock.now(), tz)
    }

    // ── stored parts ──────────────────────────────────────────────────

    #[inline]
    pub const fn to_instant(&self) -> Instant {
        self.instant
    }

    #[inline]
    pub fn timezone(&self) -> &TimeZone {
        &self.tz
    }

    // ── derived fields ────────────────────────────────────────────────

    /// Offset from UTC in seconds at this instant.
    pub fn offset_seconds(&self) -> i32 {
        self.tz.offset_at(self.instant)
    }

    /// `Z` for a zero offset, otherwise `±HH:MM` (`±HH:MM:SS` for the rare
    /// historical offsets with seconds).
    pub fn offset_string(&self) -> String {
        parse::offset_string(self.offset_seconds())
    }

    /// The wall-clock reading in this zone.
    pub fn to_plain_date_time(&self) -> PlainDateTime {
        self.instant.civil_at(self.offset_seconds())
    }

    pub fn to_plain_date(&self) -> PlainDate {
        self.to_plain_date_time().to_plain_date()
    }

    pub fn to_plain_time(&self) -> PlainTime {
        self.to_plain_date_time().to_plain_time()
    }

    pub fn year(&self) -> i32 {
        self.to_plain_date_time().year()
    }

    pub fn month(&self) -> u8 {
        self.to_plain_date_time().month()
    }

    pub fn day(&self) -> u8 {
        self.to_plain_date_time().day()
    }

    pub fn hour(&self) -> u8 {
        self.to_plain_date_time().hour()
    }

    pub fn minute(&self) -> u8 {
        self.to_plain_date_time().minute()
    }

    pub fn second(&self) -> u8 {
        self.to_plain_date_time().second()
    }

    pub fn microsecond(&self) -> u32 {
        self.to_plain_date_time().microsecond()
    }

    pub fn day_of_week(&self) -> u8 {
        self.to_plain_date_time().day_of_week()
    }

    pub fn day_of_year(&self) -> u16 {
        self.to_plain_date_time().day_of_year()
    }

    #[inline]
    pub fn calendar(&self) -> Calendar {
        Calendar::Iso8601
    }

    // ── re-pairing ────────────────────────────────────────────────────

    /// Same instant, displayed in `tz`.
    pub fn with_timezone(&self, tz: TimeZone) -> Self {
        Self::new(self.instant, tz)
    }

    /// Replaces civil fields and re-resolves with
    /// [`Disambiguation::Compatible`].
    pub fn with_fields(&self, partial: PartialDateTime) -> TemporalResult<Self> {
        let local = self.to_plain_date_time().with_fields(partial)?;
        Self::from_plain_date_time(local, self.tz.clone(), Disambiguation::Compatible)
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + duration`; see the module docs for the two arithmetic paths.
    pub fn checked_add(&self, duration: &Duration) -> TemporalResult<Self> {
        let calendar_part = DurationFields {
            years: duration.years(),
            months: duration.months(),
            weeks: duration.weeks(),
            days: duration.days(),
            ..Default::default()
        };
        let base = if calendar_part == DurationFields::default() {
            self.instant
        } else {
            let local = self
                .to_plain_date_time()
                .checked_add(&Duration::from_fields(calendar_part)?)?;
            self.tz.instant_for(&local, Disambiguation::Compatible)?
        };
        let exact = Duration::from_fixed_micros(duration.time_micros());
        Ok(Self::new(base.checked_add(&exact)?, self.tz.clone()))
    }

    pub fn checked_sub(&self, duration: &Duration) -> TemporalResult<Self> {
        self.checked_add(&duration.negated())
    }

    /// Exact elapsed time from `other` to `self`, in days and finer units.
    pub fn since(&self, other: &ZonedDateTime) -> Duration {
        self.instant.since(&other.instant)
    }

    pub fn until(&self, other: &ZonedDateTime) -> Duration {
        other.since(self)
    }
}

impl PartialOrd for ZonedDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZonedDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant
            .cmp(&other.instant)
            .then_with(|| self.tz.id().cmp(other.tz.id()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// String form: <date>T<time><offset>[<zone id>]
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for ZonedDateTime {
    /// The bracketed zone annotation is written only for zones that are not
    /// a plain fixed offset, since the offset already identifies those.
    ///
    /// The offset is `Z` or `±HH:MM`, extended to `±HH:MM:SS` when the zone's
    /// offset has a seconds part (local mean time entries in tzdb, or
    /// [`TimeZone::fixed`] with such a value). The parser accepts both.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = self.offset_seconds();
        write!(f, "{}", self.instant.civil_at(offset))?;
        parse::write_offset(f, offset)?;
        if self.tz.fixed_offset().is_none() {
            write!(f, "[{}]", self.tz.id())?;
        }
        Ok(())
    }
}

/// Parses `<date>T<time><offset>[<zone id>]`.
///
/// The annotation is resolved through [`TimeZone::named`], so only `UTC`,
/// offsets and (with `tzdb`) IANA names come back. Text written for a
/// [`TimeZone::custom`] zone does not parse: its identifier is unknown here,
/// and the result is a format error.
impl FromStr for ZonedDateTime {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cur = Cursor::new(s);
        let (fields, offset) = datetime::date_time_fields(&mut cur)
            .zip(parse::offset_seconds(&mut cur))
            .ok_or_else(|| TemporalError::format("zoned date-time", s))?;
        let annotation = if cur.eat(b'[') {
            let rest = cur.rest();
            let id = rest
                .strip_suffix(']')
                .filter(|id| !id.is_empty() && !id.contains(']'))
                .ok_or_else(|| TemporalError::format("zoned date-time", s))?;
            Some(id)
        } else if cur.is_done() {
            None
        } else {
            return Err(TemporalError::format("zoned date-time", s));
        };
        build(fields, offset, annotation).map_err(|e| e.into_format("zoned date-time", s))
    }
}

fn build(fields: datetime::RawDateTime, offset: i64, annotation: Option<&str>) -> TemporalResult<ZonedDateTime> {
    let local = datetime::from_raw_fields(fields)?;
    let offset = i32::try_from(offset)
        .map_err(|_| TemporalError::field_range("offset", offset, -86_399, 86_399))?;
    let instant = Instant::from_epoch_micros_wide(
        local.epoch_micros() - i128::from(offset) * i128::from(MICROS_PER_SECOND),
    )?;
    let tz = match annotation {
        Some(id) => TimeZone::named(id)?,
        None => TimeZone::fixed(offset)?,
    };
    let actual = tz.offset_at(instant);
    if actual != offset {
        return Err(TemporalError::range(format!(
            "offset {} does not match {} at that time ({})",
            parse::offset_string(offset),
            tz.id(),
            parse::offset_string(actual)
        )));
    }
    Ok(ZonedDateTime::new(instant, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::timezone::ZoneRules;

    /// Two fixed periods: UTC-5 before `SWITCH`, UTC-4 from it on.
    #[derive(Debug)]
    struct SpringForward;

    /// 2023-03-12T07:00:00Z.
    const SWITCH: i64 = 1_678_604_400_000_000;

    impl ZoneRules for SpringForward {
        fn offset_at(&self, instant: Instant) -> i32 {
            if instant.epoch_microseconds() < SWITCH {
                -18_000
            } else {
                -14_400
            }
        }
    }

    fn zone() -> TimeZone {
        TimeZone::custom("Test/Eastern", SpringForward)
    }

    fn local(s: &str) -> PlainDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_instant_in_utc() {
        let instant: Instant = "2023-06-15T14:30:45Z".parse().unwrap();
        let zdt = instant.to_zoned_date_time(TimeZone::utc());
        assert_eq!((zdt.year(), zdt.month(), zdt.day()), (2023, 6, 15));
        assert_eq!((zdt.hour(), zdt.minute(), zdt.second()), (14, 30, 45));
        assert_eq!(zdt.offset_string(), "Z");
        assert_eq!(zdt.to_instant(), instant);
        assert_eq!(zdt.calendar(), Calendar::Iso8601);
    }

    #[test]
    fn test_fixed_offset_fields() {
        let instant: Instant = "2023-06-15T23:30:00Z".parse().unwrap();
        let zdt = instant.to_zoned_date_time(TimeZone::fixed(5 * 3_600 + 1_800).unwrap());
        assert_eq!(zdt.to_plain_date_time(), local("2023-06-16T05:00:00"));
        assert_eq!(zdt.offset_string(), "+05:30");
        assert_eq!(zdt.day_of_week(), 5);
    }

    #[test]
    fn test_with_timezone_keeps_instant() {
        let zdt = ZonedDateTime::from_plain_date_time(
            local("2023-06-15T12:00:00"),
            zone(),
            Disambiguation::Compatible,
        )
        .unwrap();
        let utc = zdt.with_timezone(TimeZone::utc());
        assert_eq!(utc.to_instant(), zdt.to_instant());
        assert_eq!(utc.hour(), 16);
        assert_ne!(utc, zdt);
    }

    #[test]
    fn test_calendar_days_keep_wall_clock() {
        let before = ZonedDateTime::from_plain_date_time(
            local("2023-03-11T12:00:00"),
            zone(),
            Disambiguation::Compatible,
        )
        .unwrap();
        let next_day = before.checked_add(&Duration::from_days(1)).unwrap();
        assert_eq!(next_day.to_plain_date_time(), local("2023-03-12T12:00:00"));
        assert_eq!(next_day.since(&before).hours(), 23);

        let exact = before.to_instant().checked_add(&Duration::from_hours(24)).unwrap();
        let plus_24h = exact.to_zoned_date_time(zone());
        assert_eq!(plus_24h.to_plain_date_time(), local("2023-03-12T13:00:00"));
        assert_eq!(plus_24h.since(&before).days(), 1);
    }

    #[test]
    fn test_hours_follow_the_timeline() {
        let midnight = ZonedDateTime::from_plain_date_time(
            local("2023-03-12T00:00:00"),
            zone(),
            Disambiguation::Compatible,
        )
        .unwrap();
        let later = midnight.checked_add(&Duration::from_hours(12)).unwrap();
        assert_eq!(later.to_plain_date_time(), local("2023-03-12T13:00:00"));
        assert_eq!(later.since(&midnight), Duration::from_hours(12));
    }

    #[test]
    fn test_mixed_duration_applies_calendar_part_first() {
        let start = ZonedDateTime::from_plain_date_time(
            local("2023-03-11T23:00:00"),
            zone(),
            Disambiguation::Compatible,
        )
        .unwrap();
        let step = Duration::from_fields(DurationFields {
            days: 1,
            hours: 2,
            ..Default::default()
        })
        .unwrap();
        // 2023-03-12T23:00 EDT, then two exact hours.
        let end = start.checked_add(&step).unwrap();
        assert_eq!(end.to_plain_date_time(), local("2023-03-13T01:00:00"));
        assert_eq!(end.checked_sub(&step).unwrap(), start);
    }

    #[test]
    fn test_add_into_gap_shifts_forward() {
        let start = ZonedDateTime::from_plain_date_time(
            local("2023-03-11T02:30:00"),
            zone(),
            Disambiguation::Compatible,
        )
        .unwrap();
        let next = start.checked_add(&Duration::from_days(1)).unwrap();
        assert_eq!(next.to_plain_date_time(), local("2023-03-12T03:30:00"));
    }

    #[test]
    fn test_with_fields() {
        let zdt = ZonedDateTime::from_plain_date_time(
            local("2023-03-12T12:00:00"),
            zone(),
            Disambiguation::Compatible,
        )
        .unwrap();
        let morning = zdt
            .with_fields(PartialDateTime {
                time: crate::time::PartialTime {
                    hour: Some(1),
                    ..Default::default()
                },
                ..Default::default()
            })
            .unwrap();
        assert_eq!(morning.offset_seconds(), -18_000);
        assert_eq!(morning.hour(), 1);
    }

    #[test]
    fn test_ordering() {
        let instant = Instant::EPOCH;
        let a = instant.to_zoned_date_time(TimeZone::utc());
        let b = instant.to_zoned_date_time(zone());
        let c = Instant::from_epoch_microseconds(1).unwrap().to_zoned_date_time(TimeZone::utc());
        assert!(b < a, "same instant falls back to the zone id");
        assert!(a < c);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_now_from_clock() {
        let fixed: Instant = "2024-02-29T12:00:00Z".parse().unwrap();
        let zdt = ZonedDateTime::now_from(&FixedClock::new(fixed), TimeZone::utc());
        assert_eq!(zdt.to_plain_date(), PlainDate::new(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_display() {
        let instant: Instant = "2023-06-15T14:30:45.5Z".parse().unwrap();
        assert_eq!(
            instant.to_zoned_date_time(TimeZone::utc()).to_string(),
            "2023-06-15T14:30:45.5Z"
        );
        assert_eq!(
            instant.to_zoned_date_time(TimeZone::fixed(-14_400).unwrap()).to_string(),
            "2023-06-15T10:30:45.5-04:00"
        );
        assert_eq!(
            instant.to_zoned_date_time(zone()).to_string(),
            "2023-06-15T10:30:45.5-04:00[Test/Eastern]"
        );
    }

    #[test]
    fn test_parse_fixed_offsets() {
        let zdt: ZonedDateTime = "2023-06-15T10:30:45-04:00".parse().unwrap();
        assert_eq!(zdt.timezone().fixed_offset(), Some(-14_400));
        assert_eq!(zdt.to_instant(), "2023-06-15T14:30:45Z".parse::<Instant>().unwrap());
        let utc: ZonedDateTime = "2023-06-15T14:30:45Z".parse().unwrap();
        assert_eq!(utc.timezone(), &TimeZone::utc());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "2023-06-15T10:30:45",
            "2023-06-15T10:30:45-04:00[",
            "2023-06-15T10:30:45-04:00[]",
            "2023-06-15T10:30:45-04:00x",
            "2023-06-15T10:30:45-04:00[UTC]",
            "2023-06-15T10:30:45+00:00[Nowhere/Atlantis]",
        ] {
            let err = bad.parse::<ZonedDateTime>().unwrap_err();
            assert!(matches!(err, TemporalError::Format(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn test_string_round_trip() {
        let instant: Instant = "2023-11-05T06:30:00Z".parse().unwrap();
        for tz in [TimeZone::utc(), TimeZone::fixed(-17_762).unwrap(), TimeZone::fixed(3_600).unwrap()] {
            let zdt = instant.to_zoned_date_time(tz);
            assert_eq!(zdt.to_string().parse::<ZonedDateTime>().unwrap(), zdt);
        }
    }

    #[test]
    fn test_offset_with_seconds() {
        let instant: Instant = "1883-11-18T12:00:00Z".parse().unwrap();
        let zdt = instant.to_zoned_date_time(TimeZone::fixed(-17_762).unwrap());
        assert_eq!(zdt.offset_string(), "-04:56:02");
        assert_eq!(zdt.to_string(), "1883-11-18T07:03:58-04:56:02");
    }

    #[test]
    fn test_custom_zone_text_does_not_parse_back() {
        let zdt = Instant::EPOCH.to_zoned_date_time(zone());
        let text = zdt.to_string();
        assert_eq!(text, "1969-12-31T19:00:00-05:00[Test/Eastern]");
        let err = text.parse::<ZonedDateTime>().unwrap_err();
        assert!(matches!(err, TemporalError::Format(_)), "{err}");
        assert!(err.message().contains("Test/Eastern"), "{err}");
    }

    #[cfg(feature = "tzdb")]
    #[test]
    fn test_iana_round_trip() {
        let tz = TimeZone::named("America/New_York").unwrap();
        for stamp in ["2023-11-05T05:30:00Z", "2023-11-05T06:30:00Z", "2023-07-01T00:00:00Z"] {
            let zdt = stamp.parse::<Instant>().unwrap().to_zoned_date_time(tz.clone());
            let text = zdt.to_string();
            assert!(text.ends_with("[America/New_York]"), "{text}");
            assert_eq!(text.parse::<ZonedDateTime>().unwrap(), zdt);
        }
    }
}
