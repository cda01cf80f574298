// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sources of the current instant.

use crate::instant::Instant;
use chrono::Utc;

/// Anything that can report "now".
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The operating-system wall clock, read through `chrono`.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::from_utc(Utc::now())
    }
}

/// A clock stuck at one instant, for reproducible runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(Instant);

impl FixedClock {
    #[inline]
    pub const fn new(instant: Instant) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> Instant {
        self.0
    }
}
