// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy shared by every value type.
//!
//! All failures are detected locally, at construction, parsing or
//! arithmetic time, and are always handed back to the caller:
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`TemporalError::Argument`] | the input has the wrong shape (unknown unit, calendar delta on an instant, …) |
//! | [`TemporalError::Range`] | a field lies outside its legal domain (`month = 13`, `hour = 25`, …) |
//! | [`TemporalError::Format`] | a string does not match the grammar of its target type |

use std::fmt;

/// Result alias used throughout the crate.
pub type TemporalResult<T> = Result<T, TemporalError>;

/// Error returned by fallible operations on temporal values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemporalError {
    /// Input of the wrong kind or shape.
    #[error("invalid argument: {0}")]
    Argument(String),
    /// A field value outside its legal domain.
    #[error("out of range: {0}")]
    Range(String),
    /// A string that fails the grammar for its target type.
    #[error("invalid format: {0}")]
    Format(String),
}

/// Discriminant of a [`TemporalError`], for matching without the message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Argument,
    Range,
    Format,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Argument => "ArgumentError",
            ErrorKind::Range => "RangeError",
            ErrorKind::Format => "FormatError",
        };
        f.write_str(label)
    }
}

impl TemporalError {
    /// Which of the three error classes this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TemporalError::Argument(_) => ErrorKind::Argument,
            TemporalError::Range(_) => ErrorKind::Range,
            TemporalError::Format(_) => ErrorKind::Format,
        }
    }

    /// The human readable message, without the class prefix.
    pub fn message(&self) -> &str {
        match self {
            TemporalError::Argument(msg) | TemporalError::Range(msg) | TemporalError::Format(msg) => {
                msg
            }
        }
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        TemporalError::Argument(msg.into())
    }

    pub(crate) fn range(msg: impl Into<String>) -> Self {
        TemporalError::Range(msg.into())
    }

    /// Range error naming `field` and its legal closed interval.
    pub(crate) fn field_range(field: &str, value: i64, min: i64, max: i64) -> Self {
        TemporalError::Range(format!("{field} must be in {min}..={max}, got {value}"))
    }

    /// Format error for `input` that was meant to be a `kind` string.
    pub(crate) fn format(kind: &str, input: &str) -> Self {
        TemporalError::Format(format!("invalid {kind} string {input:?}"))
    }

    /// Re-labels any error raised while building a value out of a parsed
    /// string as a format error, keeping the original cause in the message.
    pub(crate) fn into_format(self, kind: &str, input: &str) -> Self {
        match self {
            TemporalError::Format(_) => self,
            other => TemporalError::Format(format!(
                "invalid {kind} string {input:?}: {}",
                other.message()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_range_names_the_field() {
        let err = TemporalError::field_range("month", 13, 1, 12);
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.to_string(), "out of range: month must be in 1..=12, got 13");
    }

    #[test]
    fn test_into_format_keeps_cause() {
        let err = TemporalError::field_range("hour", 25, 0, 23).into_format("time", "25:00:00");
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.message().contains("hour must be in 0..=23"));
        assert!(err.message().contains("25:00:00"));
    }

    #[test]
    fn test_into_format_is_identity_for_format_errors() {
        let err = TemporalError::format("date", "nope");
        assert_eq!(err.clone().into_format("date", "other"), err);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::Argument.to_string(), "ArgumentError");
        assert_eq!(ErrorKind::Range.to_string(), "RangeError");
        assert_eq!(ErrorKind::Format.to_string(), "FormatError");
    }
}
