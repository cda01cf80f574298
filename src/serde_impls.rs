// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! `serde` support (feature `serde`).
//!
//! Every value type serializes as its canonical string and deserializes
//! through its `FromStr` implementation, so the wire form is exactly the
//! textual grammar.

use crate::{Duration, Instant, PlainDate, PlainDateTime, PlainTime, TimeZone, ZonedDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;

macro_rules! string_serde {
    ($($ty:ty),+ $(,)?) => {$(
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let text = Cow::<'de, str>::deserialize(deserializer)?;
                text.parse().map_err(D::Error::custom)
            }
        }
    )+};
}

string_serde!(Duration, PlainDate, PlainTime, PlainDateTime, Instant, TimeZone, ZonedDateTime);
