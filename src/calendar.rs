// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Proleptic Gregorian calendar engine.
//!
//! Pure functions converting between seconds since the Unix epoch
//! (1970-01-01T00:00:00 UTC) and civil calendar fields. Nothing here holds
//! state; [`Instant`](crate::Instant) is the only caller that mutates.
//!
//! Day counts use the civil-from-days / days-from-civil algorithms of
//! Howard Hinnant (<http://howardhinnant.github.io/date_algorithms.html>),
//! which work in 400-year eras so every intermediate is an exact integer.
//!
//! # Rounding
//!
//! [`decompose`] splits an `f64` epoch with `floor`, then rounds the
//! fractional remainder to the nearest microsecond **half away from zero**.
//! A remainder that rounds up to a full second carries into the second
//! count, so `microsecond` is always in `[0, 999_999]`, including for
//! negative epochs (`-0.25` is `1969-12-31T23:59:59.750000`).

use crate::error::TimeError;

/// Earliest supported year.
pub const YEAR_MIN: i32 = -1000;

/// Latest supported year.
pub const YEAR_MAX: i32 = 2999;

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;
pub(crate) const MICROS_PER_SECOND: i64 = 1_000_000;

/// Days from 0000-03-01 to 1970-01-01.
const UNIX_EPOCH_DAYS: i64 = 719_468;

/// Days before the first of each month in a non-leap year (index 0 unused).
const DAYS_BEFORE_MONTH: [i32; 13] = [0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Days in each month of a non-leap year (index 0 unused).
const DAYS_PER_MONTH: [i32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// ═══════════════════════════════════════════════════════════════════════════
// CivilFields
// ═══════════════════════════════════════════════════════════════════════════

/// The calendar view of an instant.
///
/// Values produced by this module always satisfy the field ranges and have
/// `day_of_year` consistent with `(year, month, day_of_month)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CivilFields {
    pub year: i32,
    pub month: i32,
    pub day_of_month: i32,
    pub day_of_year: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub microsecond: i32,
}

impl CivilFields {
    /// 1970-01-01T00:00:00.000000.
    pub const UNIX_EPOCH: Self = Self {
        year: 1970,
        month: 1,
        day_of_month: 1,
        day_of_year: 1,
        hour: 0,
        minute: 0,
        second: 0,
        microsecond: 0,
    };

    #[inline]
    fn seconds_of_day(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }

    /// Whole seconds since the Unix epoch, ignoring `microsecond`.
    #[inline]
    pub(crate) fn whole_seconds(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day_of_month) * SECONDS_PER_DAY
            + self.seconds_of_day()
    }
}

impl Default for CivilFields {
    fn default() -> Self {
        Self::UNIX_EPOCH
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Leap years, month lengths, day of year
// ═══════════════════════════════════════════════════════════════════════════

/// Returns `true` if `year` has 366 days.
///
/// Divisible by 4, except centuries, except multiples of 400.
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `year`.
#[inline]
pub const fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Number of days in `month` (1..=12) of `year`. Returns 0 for any other
/// month.
#[inline]
pub const fn days_in_month(year: i32, month: i32) -> i32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_PER_MONTH[month as usize],
        _ => 0,
    }
}

/// 1-based day of the year of a date.
///
/// # Errors
///
/// [`TimeError::InvalidMonth`] or [`TimeError::InvalidDayOfMonth`] if the
/// date does not exist.
pub fn day_of_year(year: i32, month: i32, day_of_month: i32) -> Result<i32, TimeError> {
    let day_of_month = check_day_of_month(year, month, day_of_month)?;
    Ok(ordinal(year, month, day_of_month))
}

/// Day of the year of a date already known to exist.
#[inline]
pub(crate) const fn ordinal(year: i32, month: i32, day_of_month: i32) -> i32 {
    let leap_day = if month > 2 && is_leap_year(year) { 1 } else { 0 };
    DAYS_BEFORE_MONTH[month as usize] + day_of_month + leap_day
}

/// Inverse of [`day_of_year`].
///
/// # Errors
///
/// [`TimeError::InvalidDayOfYear`] if `day_of_year` is outside
/// `[1, days_in_year(year)]`.
pub fn month_day_from_day_of_year(year: i32, day_of_year: i32) -> Result<(i32, i32), TimeError> {
    check_day_of_year(year, day_of_year)?;
    let mut month = 12;
    while day_of_year <= month_start_offset(year, month) {
        month -= 1;
    }
    Ok((month, day_of_year - month_start_offset(year, month)))
}

/// Days of the year elapsed before the first of `month`.
#[inline]
const fn month_start_offset(year: i32, month: i32) -> i32 {
    ordinal(year, month, 1) - 1
}

// ═══════════════════════════════════════════════════════════════════════════
// Day counts
// ═══════════════════════════════════════════════════════════════════════════

/// Days since 1970-01-01 for a proleptic Gregorian date.
pub const fn days_from_civil(year: i32, month: i32, day_of_month: i32) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let m = month as i64;
    let mp = if m > 2 { m - 3 } else { m + 9 }; // March = 0
    let doy = (153 * mp + 2) / 5 + day_of_month as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146_097 + doe - UNIX_EPOCH_DAYS
}

/// Proleptic Gregorian `(year, month, day_of_month)` for a count of days
/// since 1970-01-01.
///
/// The year is returned as `i64` so that callers can range-check day
/// counts far outside the supported years without truncation.
pub const fn civil_from_days(days: i64) -> (i64, i32, i32) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let day = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let month = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month as i32, day as i32)
}

// ═══════════════════════════════════════════════════════════════════════════
// Epoch ↔ fields
// ═══════════════════════════════════════════════════════════════════════════

/// Decomposes seconds since the Unix epoch into calendar fields.
///
/// See the [module documentation](self) for the rounding policy.
///
/// # Errors
///
/// - [`TimeError::NonFiniteEpoch`] for NaN or infinite input.
/// - [`TimeError::YearOutOfRange`] if the instant falls outside
///   `[YEAR_MIN, YEAR_MAX]`.
pub fn decompose(epoch_seconds: f64) -> Result<CivilFields, TimeError> {
    if !epoch_seconds.is_finite() {
        return Err(TimeError::NonFiniteEpoch {
            value: epoch_seconds,
        });
    }
    let floor = epoch_seconds.floor();
    // Saturating cast; anything that saturates is far outside YEAR_MAX.
    let mut seconds = floor as i64;
    let mut microsecond = ((epoch_seconds - floor) * 1e6).round() as i64;
    if microsecond == MICROS_PER_SECOND {
        seconds = seconds.saturating_add(1);
        microsecond = 0;
    }
    fields_from_seconds(seconds, microsecond as i32)
}

/// Decomposes an exact count of microseconds since the Unix epoch.
///
/// # Errors
///
/// [`TimeError::YearOutOfRange`] if the instant falls outside
/// `[YEAR_MIN, YEAR_MAX]`.
pub fn decompose_micros(micros: i64) -> Result<CivilFields, TimeError> {
    let seconds = micros.div_euclid(MICROS_PER_SECOND);
    let microsecond = micros.rem_euclid(MICROS_PER_SECOND) as i32;
    fields_from_seconds(seconds, microsecond)
}

fn fields_from_seconds(seconds: i64, microsecond: i32) -> Result<CivilFields, TimeError> {
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let seconds_of_day = seconds.rem_euclid(SECONDS_PER_DAY) as i32;
    let (year, month, day_of_month) = civil_from_days(days);
    let year = check_year_wide(year)?;
    Ok(CivilFields {
        year,
        month,
        day_of_month,
        day_of_year: ordinal(year, month, day_of_month),
        hour: seconds_of_day / 3600,
        minute: seconds_of_day % 3600 / 60,
        second: seconds_of_day % 60,
        microsecond,
    })
}

/// Composes calendar fields into seconds since the Unix epoch.
///
/// The whole-second part is computed exactly in `i64`; only the final
/// addition of `microsecond` happens in floating point.
pub fn compose(fields: &CivilFields) -> f64 {
    fields.whole_seconds() as f64 + f64::from(fields.microsecond) / 1e6
}

/// Composes calendar fields into an exact count of microseconds since the
/// Unix epoch.
pub fn compose_micros(fields: &CivilFields) -> i64 {
    fields.whole_seconds() * MICROS_PER_SECOND + i64::from(fields.microsecond)
}

// ═══════════════════════════════════════════════════════════════════════════
// Field validation
// ═══════════════════════════════════════════════════════════════════════════

/// Checks `year` against `[YEAR_MIN, YEAR_MAX]`.
pub fn check_year(year: i32) -> Result<i32, TimeError> {
    check_year_wide(i64::from(year))
}

fn check_year_wide(year: i64) -> Result<i32, TimeError> {
    if (i64::from(YEAR_MIN)..=i64::from(YEAR_MAX)).contains(&year) {
        Ok(year as i32)
    } else {
        Err(TimeError::YearOutOfRange { year })
    }
}

pub fn check_month(month: i32) -> Result<i32, TimeError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(TimeError::InvalidMonth { month })
    }
}

/// Checks `day` against the actual length of `month` in `year`.
pub fn check_day_of_month(year: i32, month: i32, day: i32) -> Result<i32, TimeError> {
    let month = check_month(month)?;
    let max_day = days_in_month(year, month);
    if (1..=max_day).contains(&day) {
        Ok(day)
    } else {
        Err(TimeError::InvalidDayOfMonth {
            year,
            month,
            day,
            max_day,
        })
    }
}

/// Checks `day_of_year` against 365 or 366 depending on `year`.
pub fn check_day_of_year(year: i32, day_of_year: i32) -> Result<i32, TimeError> {
    let max_day = days_in_year(year);
    if (1..=max_day).contains(&day_of_year) {
        Ok(day_of_year)
    } else {
        Err(TimeError::InvalidDayOfYear {
            day_of_year,
            max_day,
        })
    }
}

pub fn check_hour(hour: i32) -> Result<i32, TimeError> {
    if (0..=23).contains(&hour) {
        Ok(hour)
    } else {
        Err(TimeError::InvalidHour { hour })
    }
}

pub fn check_minute(minute: i32) -> Result<i32, TimeError> {
    if (0..=59).contains(&minute) {
        Ok(minute)
    } else {
        Err(TimeError::InvalidMinute { minute })
    }
}

pub fn check_second(second: i32) -> Result<i32, TimeError> {
    if (0..=59).contains(&second) {
        Ok(second)
    } else {
        Err(TimeError::InvalidSecond { second })
    }
}

pub fn check_microsecond(microsecond: i32) -> Result<i32, TimeError> {
    if (0..=999_999).contains(&microsecond) {
        Ok(microsecond)
    } else {
        Err(TimeError::InvalidMicrosecond { microsecond })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
