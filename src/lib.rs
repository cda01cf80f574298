// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil Time
//!
//! Immutable, validated date and time values with calendar-aware
//! arithmetic and a round-tripping ISO-8601 string form.
//!
//! # Core types
//!
//! - [`Duration`]: signed multi-unit span, normalized on construction.
//! - [`PlainDate`], [`PlainTime`], [`PlainDateTime`]: civil readings with
//!   no zone attached.
//! - [`Instant`]: an exact point on the timeline (epoch microseconds).
//! - [`TimeZone`]: maps instants to UTC offsets and local readings back to
//!   instants, classifying each reading as unique, in a gap or in an overlap.
//! - [`ZonedDateTime`]: an instant viewed through a zone; civil fields are
//!   derived on access.
//!
//! # String forms
//!
//! | Type | Example |
//! |------|---------|
//! | [`PlainDate`] | `2023-06-15` |
//! | [`PlainTime`] | `14:30:45.123456` |
//! | [`PlainDateTime`] | `2023-06-15T14:30:45` |
//! | [`Instant`] | `2023-06-15T14:30:45Z` |
//! | [`ZonedDateTime`] | `2023-06-15T10:30:45-04:00[America/New_York]` |
//! | [`Duration`] | `P1Y2M3DT4H5M6.5S` |
//!
//! Every type implements `Display` and `FromStr`, and `parse(to_string(v))`
//! returns `v`.
//!
//! # Errors
//!
//! Fallible operations return [`TemporalResult`]. The error type separates
//! bad arguments, out-of-range fields and malformed strings; see
//! [`TemporalError`].
//!
//! # Features
//!
//! - `tzdb` (default): IANA zone names through `chrono-tz`.
//! - `serde`: string-form `Serialize`/`Deserialize` for every value type.
//!
//! ```
//! use civtime::{Disambiguation, Duration, PlainDateTime, TimeZone};
//!
//! let local: PlainDateTime = "2023-06-15T09:00:00".parse().unwrap();
//! let zdt = local
//!     .to_zoned_date_time(TimeZone::fixed(2 * 3_600).unwrap(), Disambiguation::Compatible)
//!     .unwrap();
//! assert_eq!(zdt.to_instant().to_string(), "2023-06-15T07:00:00Z");
//!
//! let later = zdt.checked_add(&Duration::from_hours(36)).unwrap();
//! assert_eq!(later.to_string(), "2023-06-16T21:00:00+02:00");
//! ```

pub mod calendar;
mod clock;
mod date;
mod datetime;
mod duration;
mod error;
mod instant;
mod parse;
#[cfg(feature = "serde")]
mod serde_impls;
mod time;
mod timezone;
mod zoned;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::Calendar;
pub use clock::{Clock, FixedClock, SystemClock};
pub use date::{Overflow, PartialDate, PlainDate};
pub use datetime::{PartialDateTime, PlainDateTime};
pub use duration::{Duration, DurationFields, FloatDurationFields, PartialDuration, Total, Unit, MAX_FIELD};
pub use error::{ErrorKind, TemporalError, TemporalResult};
pub use instant::Instant;
pub use time::{PartialTime, PlainTime};
pub use timezone::{Disambiguation, LocalResolution, TimeZone, ZoneRules};
pub use zoned::ZonedDateTime;
