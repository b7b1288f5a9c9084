// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for fallible [`Instant`](crate::Instant) operations.

use crate::calendar::{YEAR_MAX, YEAR_MIN};

/// Broad category of a [`TimeError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An input value fell outside its documented domain.
    Range,
    /// Text input did not match one of the accepted fixed-width layouts.
    Parse,
}

/// Error type for all fallible operations in this crate.
///
/// Every variant is returned before any state is mutated, so an `Instant`
/// that produced an error still holds its previous value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    /// Year outside `[YEAR_MIN, YEAR_MAX]`.
    ///
    /// Carried as `i64` because epochs far outside the supported range
    /// decompose to years that do not fit an `i32`.
    #[error("year must be in range [{lo},{hi}], got {year}", lo = YEAR_MIN, hi = YEAR_MAX)]
    YearOutOfRange { year: i64 },

    #[error("month must be in range [1,12], got {month}")]
    InvalidMonth { month: i32 },

    /// Day of month outside `[1, max_day]` for the given year and month.
    #[error("day of month must be in range [1,{max_day}] for {year:04}-{month:02}, got {day}")]
    InvalidDayOfMonth {
        year: i32,
        month: i32,
        day: i32,
        max_day: i32,
    },

    /// Day of year outside `[1, 365]` or `[1, 366]` in a leap year.
    #[error("day of year must be in range [1,{max_day}], got {day_of_year}")]
    InvalidDayOfYear { day_of_year: i32, max_day: i32 },

    /// Day of year that disagrees with the month and day of month.
    #[error("day of year {day_of_year} does not match {year:04}-{month:02}-{day:02} (day {expected})")]
    DayOfYearMismatch {
        year: i32,
        month: i32,
        day: i32,
        day_of_year: i32,
        expected: i32,
    },

    #[error("hour must be in range [0,23], got {hour}")]
    InvalidHour { hour: i32 },

    #[error("minute must be in range [0,59], got {minute}")]
    InvalidMinute { minute: i32 },

    #[error("second must be in range [0,59], got {second}")]
    InvalidSecond { second: i32 },

    #[error("microsecond must be in range [0,999999], got {microsecond}")]
    InvalidMicrosecond { microsecond: i32 },

    /// NaN or infinite epoch value.
    #[error("epoch must be a finite number of seconds, got {value}")]
    NonFiniteEpoch { value: f64 },

    /// Text whose length is neither 19 nor 26 characters.
    #[error("cannot parse {input:?} with length = {len}")]
    InvalidLength { input: String, len: usize },

    /// Text of an accepted length with a bad separator or non-digit field.
    #[error("cannot parse {input:?}: {reason}")]
    Malformed { input: String, reason: &'static str },
}

impl TimeError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TimeError::InvalidLength { .. } | TimeError::Malformed { .. } => ErrorKind::Parse,
            _ => ErrorKind::Range,
        }
    }
}
