// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time zones: mapping instants to UTC offsets and back.
//!
//! A [`TimeZone`] is an identifier plus a [`ZoneRules`] source. The forward
//! direction (`Instant → offset`) is always a single answer. The inverse
//! (`local wall-clock → Instant`) is a three-state classification:
//!
//! | State | Candidates | Typical cause |
//! |-------|-----------|---------------|
//! | [`LocalResolution::Unique`]  | 1 | ordinary local time |
//! | [`LocalResolution::Gap`]     | 0 | clocks jumped forward over it |
//! | [`LocalResolution::Overlap`] | 2 | clocks fell back and repeated it |
//!
//! A [`Disambiguation`] policy turns a classification into one instant.
//!
//! Three kinds of zone are available:
//!
//! * `UTC` and fixed `±HH:MM[:SS]` offsets;
//! * IANA names such as `Europe/Madrid`, backed by `chrono-tz` (feature
//!   `tzdb`, on by default);
//! * caller-supplied rules via [`TimeZone::custom`].

use crate::datetime::PlainDateTime;
use crate::duration::MICROS_PER_DAY;
use crate::error::{TemporalError, TemporalResult};
use crate::instant::Instant;
use crate::parse::{self, Cursor, MICROS_PER_SECOND};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Offsets must stay strictly inside one day.
const MAX_OFFSET_SECONDS: i32 = 86_399;

// ═══════════════════════════════════════════════════════════════════════════
// Zone rule source
// ═══════════════════════════════════════════════════════════════════════════

/// Classification of a local wall-clock reading in a zone.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocalResolution {
    /// Exactly one instant shows this wall-clock reading.
    Unique(Instant),
    /// No instant shows it; the offset jumped from `offset_before` to
    /// `offset_after` across it.
    Gap { offset_before: i32, offset_after: i32 },
    /// Two instants show it, `earlier` under the pre-transition offset.
    Overlap { earlier: Instant, later: Instant },
}

/// Policy for turning a [`LocalResolution`] into a single instant.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Disambiguation {
    /// Gap: shift forward by the gap length. Overlap: the earlier instant.
    #[default]
    Compatible,
    /// Gap: the instant just before the transition. Overlap: the earlier one.
    Earlier,
    /// Gap: the instant just after the transition. Overlap: the later one.
    Later,
    /// Fail with a range error on a gap or an overlap.
    Reject,
}

/// Source of UTC offsets for one zone.
///
/// Only [`offset_at`](ZoneRules::offset_at) is required. The default
/// [`resolve_local`](ZoneRules::resolve_local) finds local-time candidates
/// by probing the offsets in force one day either side of the reading, which
/// is exact for any zone whose transitions are more than a day apart.
pub trait ZoneRules: fmt::Debug + Send + Sync {
    /// Offset from UTC, in seconds, in force at `instant`.
    fn offset_at(&self, instant: Instant) -> i32;

    /// Classifies a wall-clock reading.
    fn resolve_local(&self, local: &PlainDateTime) -> TemporalResult<LocalResolution> {
        enumerate_candidates(self, local)
    }
}

fn offset_micros(offset_seconds: i32) -> i128 {
    i128::from(offset_seconds) * i128::from(MICROS_PER_SECOND)
}

/// Offsets in force one day before and one day after `local`, read as if it
/// were UTC.
fn neighbour_offsets<R: ZoneRules + ?Sized>(rules: &R, local: i128) -> TemporalResult<(i32, i32)> {
    let day = i128::from(MICROS_PER_DAY);
    let probe = |at: i128| -> TemporalResult<i32> {
        let bounded = at.clamp(
            -i128::from(Instant::MAX_EPOCH_MICROS),
            i128::from(Instant::MAX_EPOCH_MICROS),
        );
        Ok(rules.offset_at(Instant::from_epoch_micros_wide(bounded)?))
    };
    Ok((probe(local - day)?, probe(local + day)?))
}

fn enumerate_candidates<R: ZoneRules + ?Sized>(
    rules: &R,
    local: &PlainDateTime,
) -> TemporalResult<LocalResolution> {
    let wall = local.epoch_micros();
    let (before, after) = neighbour_offsets(rules, wall)?;

    let mut candidates = Vec::with_capacity(2);
    for offset in [before, after] {
        let Ok(instant) = Instant::from_epoch_micros_wide(wall - offset_micros(offset)) else {
            continue;
        };
        if rules.offset_at(instant) == offset {
            candidates.push(instant);
        }
    }
    candidates.sort();
    candidates.dedup();

    match candidates.as_slice() {
        [] => {
            if before == after {
                // Steady offset, but the reading itself is off the timeline.
                return Err(TemporalError::range(format!(
                    "{local} is outside the supported range"
                )));
            }
            Ok(LocalResolution::Gap {
                offset_before: before,
                offset_after: after,
            })
        }
        [only] => Ok(LocalResolution::Unique(*only)),
        [earlier, .., later] => Ok(LocalResolution::Overlap {
            earlier: *earlier,
            later: *later,
        }),
    }
}

// ── built-in rule sources ─────────────────────────────────────────────

#[derive(Debug, Copy, Clone)]
struct FixedRules(i32);

impl ZoneRules for FixedRules {
    #[inline]
    fn offset_at(&self, _instant: Instant) -> i32 {
        self.0
    }

    fn resolve_local(&self, local: &PlainDateTime) -> TemporalResult<LocalResolution> {
        let instant = Instant::from_epoch_micros_wide(local.epoch_micros() - offset_micros(self.0))?;
        Ok(LocalResolution::Unique(instant))
    }
}

#[cfg(feature = "tzdb")]
mod tzdb {
    use super::*;
    use chrono::{DateTime, LocalResult, NaiveDate, Offset, TimeZone as _, Utc};
    use chrono_tz::Tz;

    impl ZoneRules for Tz {
        fn offset_at(&self, instant: Instant) -> i32 {
            let utc = instant.to_utc().unwrap_or(if instant.epoch_microseconds() < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
            let offset = self.offset_from_utc_datetime(&utc.naive_utc()).fix().local_minus_utc();
            tracing::trace!(zone = self.name(), %instant, offset, "resolved tzdb offset");
            offset
        }

        fn resolve_local(&self, local: &PlainDateTime) -> TemporalResult<LocalResolution> {
            let naive = NaiveDate::from_ymd_opt(local.year(), local.month().into(), local.day().into())
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        local.hour().into(),
                        local.minute().into(),
                        local.second().into(),
                        local.microsecond(),
                    )
                });
            let Some(naive) = naive else {
                // Outside chrono's calendar range.
                return enumerate_candidates(self, local);
            };
            let to_instant = |dt: DateTime<Tz>| Instant::from_utc(dt.with_timezone(&Utc));
            match self.from_local_datetime(&naive) {
                LocalResult::Single(dt) => Ok(LocalResolution::Unique(to_instant(dt))),
                LocalResult::Ambiguous(a, b) => {
                    let (a, b) = (to_instant(a), to_instant(b));
                    Ok(LocalResolution::Overlap {
                        earlier: a.min(b),
                        later: a.max(b),
                    })
                }
                LocalResult::None => {
                    let (offset_before, offset_after) =
                        neighbour_offsets(self, local.epoch_micros())?;
                    Ok(LocalResolution::Gap {
                        offset_before,
                        offset_after,
                    })
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeZone
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
enum Kind {
    Fixed(FixedRules),
    #[cfg(feature = "tzdb")]
    Iana(chrono_tz::Tz),
    Custom(Arc<dyn ZoneRules>),
}

/// A named source of UTC offsets.
///
/// Two zones are equal when their identifiers are equal.
#[derive(Debug, Clone)]
pub struct TimeZone {
    id: Arc<str>,
    kind: Kind,
}

impl TimeZone {
    // ── constructors ──────────────────────────────────────────────────

    /// The `UTC` zone.
    pub fn utc() -> Self {
        Self {
            id: Arc::from("UTC"),
            kind: Kind::Fixed(FixedRules(0)),
        }
    }

    /// A constant offset east of UTC, in seconds. Zero yields [`TimeZone::utc`].
    pub fn fixed(offset_seconds: i32) -> TemporalResult<Self> {
        if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&offset_seconds) {
            return Err(TemporalError::field_range(
                "offset seconds",
                offset_seconds.into(),
                (-MAX_OFFSET_SECONDS).into(),
                MAX_OFFSET_SECONDS.into(),
            ));
        }
        if offset_seconds == 0 {
            return Ok(Self::utc());
        }
        Ok(Self {
            id: Arc::from(parse::offset_id(offset_seconds)),
            kind: Kind::Fixed(FixedRules(offset_seconds)),
        })
    }

    /// Looks up a zone by identifier: `UTC`, a `±HH:MM[:SS]` offset, or an
    /// IANA name when the `tzdb` feature is enabled.
    pub fn named(id: &str) -> TemporalResult<Self> {
        if id.eq_ignore_ascii_case("UTC") || id.eq_ignore_ascii_case("Z") {
            return Ok(Self::utc());
        }
        let mut cur = Cursor::new(id);
        if let Some(offset) = parse::offset_seconds(&mut cur).filter(|_| cur.is_done()) {
            let offset = i32::try_from(offset)
                .map_err(|_| TemporalError::argument(format!("unknown time zone {id:?}")))?;
            return Self::fixed(offset);
        }
        Self::named_iana(id)
    }

    #[cfg(feature = "tzdb")]
    fn named_iana(id: &str) -> TemporalResult<Self> {
        let tz = chrono_tz::Tz::from_str(id)
            .map_err(|_| TemporalError::argument(format!("unknown time zone {id:?}")))?;
        Ok(Self {
            id: Arc::from(tz.name()),
            kind: Kind::Iana(tz),
        })
    }

    #[cfg(not(feature = "tzdb"))]
    fn named_iana(id: &str) -> TemporalResult<Self> {
        Err(TemporalError::argument(format!("unknown time zone {id:?}")))
    }

    /// A zone backed by caller-supplied rules.
    pub fn custom(id: impl Into<String>, rules: impl ZoneRules + 'static) -> Self {
        let id: String = id.into();
        Self {
            id: Arc::from(id),
            kind: Kind::Custom(Arc::new(rules)),
        }
    }

    // ── queries ───────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The constant offset of `UTC` and `±HH:MM` zones.
    pub fn fixed_offset(&self) -> Option<i32> {
        match &self.kind {
            Kind::Fixed(rules) => Some(rules.0),
            _ => None,
        }
    }

    fn rules(&self) -> &dyn ZoneRules {
        match &self.kind {
            Kind::Fixed(rules) => rules,
            #[cfg(feature = "tzdb")]
            Kind::Iana(tz) => tz,
            Kind::Custom(rules) => rules.as_ref(),
        }
    }

    /// Offset from UTC, in seconds, at `instant`.
    pub fn offset_at(&self, instant: Instant) -> i32 {
        self.rules().offset_at(instant)
    }

    /// Unique / Gap / Overlap classification of a wall-clock reading.
    pub fn resolve_local(&self, local: &PlainDateTime) -> TemporalResult<LocalResolution> {
        self.rules().resolve_local(local)
    }

    /// Every instant that shows `local` on this zone's clocks, in order.
    ///
    /// Empty inside a gap, two entries inside an overlap.
    pub fn possible_instants_for(&self, local: &PlainDateTime) -> TemporalResult<Vec<Instant>> {
        Ok(match self.resolve_local(local)? {
            LocalResolution::Unique(instant) => vec![instant],
            LocalResolution::Gap { .. } => Vec::new(),
            LocalResolution::Overlap { earlier, later } => vec![earlier, later],
        })
    }

    /// The single instant `local` maps to under `disambiguation`.
    pub fn instant_for(
        &self,
        local: &PlainDateTime,
        disambiguation: Disambiguation,
    ) -> TemporalResult<Instant> {
        match self.resolve_local(local)? {
            LocalResolution::Unique(instant) => Ok(instant),
            LocalResolution::Gap {
                offset_before,
                offset_after,
            } => {
                let offset = match disambiguation {
                    Disambiguation::Compatible | Disambiguation::Later => offset_before,
                    Disambiguation::Earlier => offset_after,
                    Disambiguation::Reject => {
                        return Err(TemporalError::range(format!(
                            "{local} does not exist in {}",
                            self.id
                        )))
                    }
                };
                tracing::debug!(zone = %self.id, %local, ?disambiguation, "local time falls in a gap");
                Instant::from_epoch_micros_wide(local.epoch_micros() - offset_micros(offset))
            }
            LocalResolution::Overlap { earlier, later } => {
                tracing::debug!(zone = %self.id, %local, ?disambiguation, "local time is ambiguous");
                match disambiguation {
                    Disambiguation::Compatible | Disambiguation::Earlier => Ok(earlier),
                    Disambiguation::Later => Ok(later),
                    Disambiguation::Reject => Err(TemporalError::range(format!(
                        "{local} is ambiguous in {}",
                        self.id
                    ))),
                }
            }
        }
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TimeZone {}

impl Hash for TimeZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl FromStr for TimeZone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::named(s)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
