// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Shared pieces of the textual grammar.
//!
//! ```text
//! date      = [sign] 4*DIGIT "-" 2DIGIT "-" 2DIGIT
//! time      = 2DIGIT ":" 2DIGIT ":" 2DIGIT [ "." 1*6DIGIT ]
//! date-time = date "T" time
//! offset    = "Z" / sign 2DIGIT ":" 2DIGIT [ ":" 2DIGIT ]
//! ```
//!
//! The routines below only recognise syntax and hand back raw field values.
//! Range validation is left to the value constructors.

use std::fmt;

pub(crate) const MICROS_PER_SECOND: i64 = 1_000_000;

/// Maximum number of fractional-second digits accepted and emitted.
const FRACTION_DIGITS: usize = 6;

/// Byte cursor over an ASCII grammar. Every method either consumes what it
/// recognised or leaves the position untouched.
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        self.pos == self.bytes.len()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Remaining unparsed input.
    pub(crate) fn rest(&self) -> &'a str {
        // Only ever advanced over ASCII bytes, so this is a char boundary.
        std::str::from_utf8(&self.bytes[self.pos..]).unwrap_or("")
    }

    /// Consume `byte` (ASCII case-insensitive) if it is next.
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        match self.peek() {
            Some(b) if b.eq_ignore_ascii_case(&byte) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn expect(&mut self, byte: u8) -> Option<()> {
        self.eat(byte).then_some(())
    }

    /// Consume an optional `+`/`-` and return the matching sign.
    pub(crate) fn sign(&mut self) -> i64 {
        if self.eat(b'-') {
            -1
        } else {
            self.eat(b'+');
            1
        }
    }

    /// Exactly `n` ASCII digits.
    pub(crate) fn digits_exact(&mut self, n: usize) -> Option<i64> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        let value = accumulate(slice)?;
        self.pos = end;
        Some(value)
    }

    /// A run of at least `min` digits; returns the value and the run length.
    pub(crate) fn digits_min(&mut self, min: usize) -> Option<(i64, usize)> {
        let len = self.bytes[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if len < min {
            return None;
        }
        let value = accumulate(&self.bytes[self.pos..self.pos + len])?;
        self.pos += len;
        Some((value, len))
    }

    /// An optional `.` followed by 1 to 6 digits, scaled to microseconds.
    pub(crate) fn fraction_micros(&mut self) -> Option<Option<u32>> {
        if !self.eat(b'.') {
            return Some(None);
        }
        let (value, len) = self.digits_min(1)?;
        if len > FRACTION_DIGITS {
            return None;
        }
        let scale = 10_i64.pow((FRACTION_DIGITS - len) as u32);
        u32::try_from(value * scale).ok().map(Some)
    }
}

fn accumulate(digits: &[u8]) -> Option<i64> {
    digits.iter().try_fold(0_i64, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))
    })
}

// ---------------------------------------------------------------------------
// Sub-grammars
// ---------------------------------------------------------------------------

/// Raw `(year, month, day)` of a date production.
pub(crate) fn date_fields(cur: &mut Cursor<'_>) -> Option<(i64, i64, i64)> {
    let sign = cur.sign();
    let (year, _) = cur.digits_min(4)?;
    cur.expect(b'-')?;
    let month = cur.digits_exact(2)?;
    cur.expect(b'-')?;
    let day = cur.digits_exact(2)?;
    Some((sign * year, month, day))
}

/// Raw `(hour, minute, second, microsecond)` of a time production.
pub(crate) fn time_fields(cur: &mut Cursor<'_>) -> Option<(i64, i64, i64, i64)> {
    let hour = cur.digits_exact(2)?;
    cur.expect(b':')?;
    let minute = cur.digits_exact(2)?;
    cur.expect(b':')?;
    let second = cur.digits_exact(2)?;
    let micros = cur.fraction_micros()?.unwrap_or(0);
    Some((hour, minute, second, i64::from(micros)))
}

/// A UTC offset in seconds. `Z` is zero.
pub(crate) fn offset_seconds(cur: &mut Cursor<'_>) -> Option<i64> {
    if cur.eat(b'Z') {
        return Some(0);
    }
    let sign = match cur.peek()? {
        b'+' | b'-' => cur.sign(),
        _ => return None,
    };
    let hours = cur.digits_exact(2)?;
    cur.expect(b':')?;
    let minutes = cur.digits_exact(2)?;
    let seconds = if cur.eat(b':') {
        cur.digits_exact(2)?
    } else {
        0
    };
    if minutes > 59 || seconds > 59 {
        return None;
    }
    Some(sign * (hours * 3_600 + minutes * 60 + seconds))
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Four-digit zero-padded years, with an explicit sign outside `0..=9999`.
pub(crate) fn write_year(f: &mut fmt::Formatter<'_>, year: i32) -> fmt::Result {
    if (0..=9999).contains(&year) {
        write!(f, "{year:04}")
    } else if year < 0 {
        write!(f, "-{:04}", year.unsigned_abs())
    } else {
        write!(f, "+{year}")
    }
}

/// `.ffffff` with trailing zeros removed; nothing at all for zero.
pub(crate) fn write_fraction(f: &mut fmt::Formatter<'_>, micros: u32) -> fmt::Result {
    if micros == 0 {
        return Ok(());
    }
    let digits = format!("{micros:06}");
    write!(f, ".{}", digits.trim_end_matches('0'))
}

/// `Z` for zero, otherwise `±HH:MM` (with `:SS` only when needed).
pub(crate) fn write_offset(f: &mut fmt::Formatter<'_>, offset_seconds: i32) -> fmt::Result {
    if offset_seconds == 0 {
        return f.write_str("Z");
    }
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let abs = offset_seconds.unsigned_abs();
    write!(f, "{sign}{:02}:{:02}", abs / 3_600, abs / 60 % 60)?;
    if abs % 60 != 0 {
        write!(f, ":{:02}", abs % 60)?;
    }
    Ok(())
}

/// Owned rendering of [`write_offset`].
pub(crate) fn offset_string(offset_seconds: i32) -> String {
    struct Offset(i32);
    impl fmt::Display for Offset {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_offset(f, self.0)
        }
    }
    Offset(offset_seconds).to_string()
}

/// Zone identifier for a fixed offset: `+00:00` for zero, otherwise the
/// same text as [`offset_string`].
pub(crate) fn offset_id(offset_seconds: i32) -> String {
    if offset_seconds == 0 {
        "+00:00".to_owned()
    } else {
        offset_string(offset_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_fields() {
        let mut cur = Cursor::new("2023-06-15");
        assert_eq!(date_fields(&mut cur), Some((2023, 6, 15)));
        assert!(cur.is_done());

        let mut cur = Cursor::new("-0044-03-15");
        assert_eq!(date_fields(&mut cur), Some((-44, 3, 15)));

        let mut cur = Cursor::new("+12345-01-02T");
        assert_eq!(date_fields(&mut cur), Some((12_345, 1, 2)));
        assert_eq!(cur.rest(), "T");
    }

    #[test]
    fn test_date_fields_rejects_short_fields() {
        assert_eq!(date_fields(&mut Cursor::new("23-06-15")), None);
        assert_eq!(date_fields(&mut Cursor::new("2023-6-15")), None);
        assert_eq!(date_fields(&mut Cursor::new("2023/06/15")), None);
    }

    #[test]
    fn test_time_fields_with_fraction() {
        let mut cur = Cursor::new("14:30:45.5");
        assert_eq!(time_fields(&mut cur), Some((14, 30, 45, 500_000)));

        let mut cur = Cursor::new("14:30:45.123456");
        assert_eq!(time_fields(&mut cur), Some((14, 30, 45, 123_456)));

        assert_eq!(time_fields(&mut Cursor::new("14:30:45.1234567")), None);
        assert_eq!(time_fields(&mut Cursor::new("14:30:45.")), None);
    }

    #[test]
    fn test_offsets() {
        assert_eq!(offset_seconds(&mut Cursor::new("Z")), Some(0));
        assert_eq!(offset_seconds(&mut Cursor::new("z")), Some(0));
        assert_eq!(offset_seconds(&mut Cursor::new("+05:30")), Some(19_800));
        assert_eq!(offset_seconds(&mut Cursor::new("-04:00")), Some(-14_400));
        assert_eq!(offset_seconds(&mut Cursor::new("-04:56:02")), Some(-17_762));
        assert_eq!(offset_seconds(&mut Cursor::new("+0530")), None);
        assert_eq!(offset_seconds(&mut Cursor::new("+05:75")), None);
    }

    #[test]
    fn test_offset_id() {
        assert_eq!(offset_string(0), "Z");
        assert_eq!(offset_string(-14_400), "-04:00");
        assert_eq!(offset_id(0), "+00:00");
        assert_eq!(offset_id(19_800), "+05:30");
        assert_eq!(offset_id(-17_762), "-04:56:02");
    }
}
