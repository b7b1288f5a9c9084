// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The UTC [`Instant`] value type.
//!
//! An `Instant` stores calendar fields and a lazily computed epoch. Field
//! setters validate their input, update the fields in place and mark the
//! cached epoch stale; the next call to [`Instant::epoch`] composes the
//! fields once and caches the result.
//!
//! Arithmetic goes through the epoch and always yields a new `Instant`.
//! Equality compares the calendar fields; ordering compares epochs.

use crate::calendar::{self, CivilFields};
use crate::error::TimeError;
use chrono::{DateTime, Utc};
use qtty::{Days, Second, Seconds};
use std::cell::Cell;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Sub, SubAssign};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════════════════════
// Epoch cache
// ═══════════════════════════════════════════════════════════════════════════

/// Memoized epoch for the current calendar fields.
#[derive(Debug, Copy, Clone, PartialEq)]
enum EpochCache {
    /// Seconds since the Unix epoch for exactly the current fields.
    Cached(f64),
    /// Fields changed since the epoch was last computed.
    Stale,
}

// ═══════════════════════════════════════════════════════════════════════════
// Instant
// ═══════════════════════════════════════════════════════════════════════════

/// A UTC instant with microsecond resolution, viewable either as seconds
/// since 1970-01-01T00:00:00 or as proleptic Gregorian calendar fields.
///
/// Years are limited to [`YEAR_MIN`](crate::YEAR_MIN)..=[`YEAR_MAX`](crate::YEAR_MAX).
/// Every fallible operation validates first and leaves `self` untouched
/// on error.
///
/// `Instant` is `Send` but not `Sync`: the epoch cache lives in a
/// [`Cell`] so that [`epoch`](Self::epoch) can take `&self`.
///
/// # Examples
///
/// ```
/// use utctime::Instant;
///
/// let mut t = Instant::new();
/// t.set_year(2012)?;
/// t.set_month_and_day(5, 7)?;
/// t.set_hour(15)?;
/// assert_eq!(t.day_of_year(), 128);
/// assert_eq!(t.to_string(), "2012-05-07T15:00:00.000000");
/// # Ok::<(), utctime::TimeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Instant {
    fields: CivilFields,
    epoch: Cell<EpochCache>,
}

impl Instant {
    // ── constructors ──────────────────────────────────────────────────

    /// The Unix epoch, 1970-01-01T00:00:00.000000.
    pub const fn new() -> Self {
        Self {
            fields: CivilFields::UNIX_EPOCH,
            epoch: Cell::new(EpochCache::Cached(0.0)),
        }
    }

    /// Build from seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// See [`set_epoch`](Self::set_epoch).
    pub fn from_epoch(epoch_seconds: f64) -> Result<Self, TimeError> {
        let mut instant = Self::new();
        instant.set_epoch(epoch_seconds)?;
        Ok(instant)
    }

    /// Build from an exact count of microseconds since the Unix epoch.
    pub fn from_unix_micros(micros: i64) -> Result<Self, TimeError> {
        let fields = calendar::decompose_micros(micros).inspect_err(|e| rejected("epoch", e))?;
        Ok(Self::from_valid_fields(fields))
    }

    /// Build from calendar fields. The day of the year is derived.
    ///
    /// # Errors
    ///
    /// The first range violation found, checked from year down to
    /// microsecond.
    pub fn from_calendar(
        year: i32,
        month: i32,
        day_of_month: i32,
        hour: i32,
        minute: i32,
        second: i32,
        microsecond: i32,
    ) -> Result<Self, TimeError> {
        let validated = (|| -> Result<CivilFields, TimeError> {
            let year = calendar::check_year(year)?;
            let month = calendar::check_month(month)?;
            let day_of_month = calendar::check_day_of_month(year, month, day_of_month)?;
            Ok(CivilFields {
                year,
                month,
                day_of_month,
                day_of_year: calendar::ordinal(year, month, day_of_month),
                hour: calendar::check_hour(hour)?,
                minute: calendar::check_minute(minute)?,
                second: calendar::check_second(second)?,
                microsecond: calendar::check_microsecond(microsecond)?,
            })
        })();
        let fields = validated.inspect_err(|e| rejected("calendar", e))?;
        Ok(Self::from_valid_fields(fields))
    }

    /// Build from a complete calendar record.
    ///
    /// Every field is range checked and `day_of_year` must agree with
    /// `(year, month, day_of_month)`.
    ///
    /// # Errors
    ///
    /// The same range errors as [`from_calendar`](Self::from_calendar),
    /// [`TimeError::InvalidDayOfYear`] for a day of year outside the year,
    /// or [`TimeError::DayOfYearMismatch`] when it names a different day.
    pub fn from_fields(fields: CivilFields) -> Result<Self, TimeError> {
        let instant = Self::from_calendar(
            fields.year,
            fields.month,
            fields.day_of_month,
            fields.hour,
            fields.minute,
            fields.second,
            fields.microsecond,
        )?;
        let expected = instant.fields.day_of_year;
        calendar::check_day_of_year(fields.year, fields.day_of_year)
            .and_then(|day_of_year| {
                if day_of_year == expected {
                    Ok(())
                } else {
                    Err(TimeError::DayOfYearMismatch {
                        year: fields.year,
                        month: fields.month,
                        day: fields.day_of_month,
                        day_of_year,
                        expected,
                    })
                }
            })
            .inspect_err(|e| rejected("day_of_year", e))?;
        Ok(instant)
    }

    /// Build from a `chrono::DateTime<Utc>`.
    ///
    /// Sub-microsecond precision is rounded half away from zero; a leap
    /// second folds into the following second.
    pub fn from_utc(datetime: DateTime<Utc>) -> Result<Self, TimeError> {
        let nanos = i64::from(datetime.timestamp_subsec_nanos());
        let micros = datetime
            .timestamp()
            .saturating_mul(calendar::MICROS_PER_SECOND)
            .saturating_add((nanos + 500) / 1000);
        Self::from_unix_micros(micros)
    }

    fn from_valid_fields(fields: CivilFields) -> Self {
        Self {
            fields,
            epoch: Cell::new(EpochCache::Stale),
        }
    }

    // ── epoch ─────────────────────────────────────────────────────────

    /// Seconds since the Unix epoch.
    ///
    /// Returns the cached value when the fields have not changed since the
    /// last computation; otherwise composes the fields and caches the
    /// result. The calendar fields are never modified.
    pub fn epoch(&self) -> f64 {
        match self.epoch.get() {
            EpochCache::Cached(value) => value,
            EpochCache::Stale => {
                let value = calendar::compose(&self.fields);
                trace!(epoch = value, "recomputed epoch from calendar fields");
                self.epoch.set(EpochCache::Cached(value));
                value
            }
        }
    }

    /// Seconds since the Unix epoch as a typed quantity.
    #[inline]
    pub fn epoch_seconds(&self) -> Seconds {
        Seconds::new(self.epoch())
    }

    /// Exact microseconds since the Unix epoch.
    #[inline]
    pub fn unix_micros(&self) -> i64 {
        calendar::compose_micros(&self.fields)
    }

    /// Overwrite every calendar field from seconds since the Unix epoch.
    ///
    /// The value is snapped to the microsecond grid (see
    /// [`calendar::decompose`]), and the cached epoch is the composition of
    /// the resulting fields, so instants with equal fields always report
    /// equal epochs.
    ///
    /// # Errors
    ///
    /// - [`TimeError::NonFiniteEpoch`] for NaN or infinite values.
    /// - [`TimeError::YearOutOfRange`] if the year would leave
    ///   `[YEAR_MIN, YEAR_MAX]`.
    pub fn set_epoch(&mut self, epoch_seconds: f64) -> Result<(), TimeError> {
        let fields = calendar::decompose(epoch_seconds).inspect_err(|e| rejected("epoch", e))?;
        self.fields = fields;
        self.epoch.set(EpochCache::Cached(calendar::compose(&fields)));
        Ok(())
    }

    // ── date ──────────────────────────────────────────────────────────

    #[inline]
    pub fn year(&self) -> i32 {
        self.fields.year
    }

    /// Set the year, keeping month and day of month.
    ///
    /// # Errors
    ///
    /// [`TimeError::YearOutOfRange`] outside `[-1000, 2999]`, or
    /// [`TimeError::InvalidDayOfMonth`] if the current month and day do not
    /// exist in `year` (February 29 in a common year).
    pub fn set_year(&mut self, year: i32) -> Result<(), TimeError> {
        let CivilFields {
            month,
            day_of_month,
            ..
        } = self.fields;
        let year = calendar::check_year(year)
            .and_then(|year| calendar::check_day_of_month(year, month, day_of_month).map(|_| year))
            .inspect_err(|e| rejected("year", e))?;
        self.fields.year = year;
        self.fields.day_of_year = calendar::ordinal(year, month, day_of_month);
        self.invalidate();
        Ok(())
    }

    /// `true` if the current year has 366 days.
    #[inline]
    pub fn is_leap_year(&self) -> bool {
        calendar::is_leap_year(self.fields.year)
    }

    #[inline]
    pub fn month(&self) -> i32 {
        self.fields.month
    }

    #[inline]
    pub fn day_of_month(&self) -> i32 {
        self.fields.day_of_month
    }

    /// `(month, day_of_month)`.
    #[inline]
    pub fn month_and_day(&self) -> (i32, i32) {
        (self.fields.month, self.fields.day_of_month)
    }

    /// Set month and day of month in the current year.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidMonth`] outside `[1, 12]`, or
    /// [`TimeError::InvalidDayOfMonth`] if `day` does not exist in that
    /// month of the current year.
    pub fn set_month_and_day(&mut self, month: i32, day: i32) -> Result<(), TimeError> {
        let year = self.fields.year;
        let day = calendar::check_day_of_month(year, month, day)
            .inspect_err(|e| rejected("month_and_day", e))?;
        self.fields.month = month;
        self.fields.day_of_month = day;
        self.fields.day_of_year = calendar::ordinal(year, month, day);
        self.invalidate();
        Ok(())
    }

    #[inline]
    pub fn day_of_year(&self) -> i32 {
        self.fields.day_of_year
    }

    /// Set the day of the year, recomputing month and day of month.
    ///
    /// # Errors
    ///
    /// [`TimeError::InvalidDayOfYear`] outside `[1, 365]`, or `[1, 366]`
    /// when the current year is a leap year.
    pub fn set_day_of_year(&mut self, day_of_year: i32) -> Result<(), TimeError> {
        let (month, day) = calendar::month_day_from_day_of_year(self.fields.year, day_of_year)
            .inspect_err(|e| rejected("day_of_year", e))?;
        self.fields.month = month;
        self.fields.day_of_month = day;
        self.fields.day_of_year = day_of_year;
        self.invalidate();
        Ok(())
    }

    // ── time of day ───────────────────────────────────────────────────

    #[inline]
    pub fn hour(&self) -> i32 {
        self.fields.hour
    }

    /// # Errors
    ///
    /// [`TimeError::InvalidHour`] outside `[0, 23]`.
    pub fn set_hour(&mut self, hour: i32) -> Result<(), TimeError> {
        self.fields.hour = calendar::check_hour(hour).inspect_err(|e| rejected("hour", e))?;
        self.invalidate();
        Ok(())
    }

    #[inline]
    pub fn minute(&self) -> i32 {
        self.fields.minute
    }

    /// # Errors
    ///
    /// [`TimeError::InvalidMinute`] outside `[0, 59]`.
    pub fn set_minute(&mut self, minute: i32) -> Result<(), TimeError> {
        self.fields.minute =
            calendar::check_minute(minute).inspect_err(|e| rejected("minute", e))?;
        self.invalidate();
        Ok(())
    }

    #[inline]
    pub fn second(&self) -> i32 {
        self.fields.second
    }

    /// # Errors
    ///
    /// [`TimeError::InvalidSecond`] outside `[0, 59]`. Leap seconds are not
    /// representable.
    pub fn set_second(&mut self, second: i32) -> Result<(), TimeError> {
        self.fields.second =
            calendar::check_second(second).inspect_err(|e| rejected("second", e))?;
        self.invalidate();
        Ok(())
    }

    #[inline]
    pub fn microsecond(&self) -> i32 {
        self.fields.microsecond
    }

    /// # Errors
    ///
    /// [`TimeError::InvalidMicrosecond`] outside `[0, 999999]`.
    pub fn set_microsecond(&mut self, microsecond: i32) -> Result<(), TimeError> {
        self.fields.microsecond = calendar::check_microsecond(microsecond)
            .inspect_err(|e| rejected("microsecond", e))?;
        self.invalidate();
        Ok(())
    }

    // ── whole value ───────────────────────────────────────────────────

    /// Copy of the calendar fields.
    #[inline]
    pub fn fields(&self) -> CivilFields {
        self.fields
    }

    /// Reset to the Unix epoch.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline]
    fn invalidate(&self) {
        self.epoch.set(EpochCache::Stale);
    }

    #[cfg(test)]
    fn is_epoch_cached(&self) -> bool {
        matches!(self.epoch.get(), EpochCache::Cached(_))
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + rhs`, where `rhs` is a seconds offset or another instant's
    /// epoch.
    ///
    /// # Errors
    ///
    /// Propagates [`set_epoch`](Self::set_epoch) errors for results outside
    /// the supported range.
    pub fn checked_add<T: IntoSeconds>(&self, rhs: T) -> Result<Self, TimeError> {
        Self::from_epoch(self.epoch() + rhs.into_seconds())
    }

    /// `self - rhs`, where `rhs` is a seconds offset or another instant's
    /// epoch.
    ///
    /// # Errors
    ///
    /// Propagates [`set_epoch`](Self::set_epoch) errors for results outside
    /// the supported range.
    pub fn checked_sub<T: IntoSeconds>(&self, rhs: T) -> Result<Self, TimeError> {
        Self::from_epoch(self.epoch() - rhs.into_seconds())
    }

    // ── chrono interop ────────────────────────────────────────────────

    /// Convert to a `chrono::DateTime<Utc>`.
    ///
    /// Returns `None` only if chrono cannot represent the instant.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        // microsecond <= 999_999, so the nanosecond count fits u32.
        let nanos = self.fields.microsecond as u32 * 1000;
        DateTime::<Utc>::from_timestamp(self.fields.whole_seconds(), nanos)
    }
}

fn rejected(field: &'static str, error: &TimeError) {
    debug!(field, %error, "rejected input");
}

// ═══════════════════════════════════════════════════════════════════════════
// Generic trait implementations
// ═══════════════════════════════════════════════════════════════════════════

impl Default for Instant {
    fn default() -> Self {
        Self::new()
    }
}

// ── Comparison ────────────────────────────────────────────────────────────

/// Field-by-field equality over year, month, day of year, day of month,
/// hour, minute, second and microsecond. The epoch is not consulted.
impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.fields, &other.fields);
        a.year == b.year
            && a.month == b.month
            && a.day_of_year == b.day_of_year
            && a.day_of_month == b.day_of_month
            && a.hour == b.hour
            && a.minute == b.minute
            && a.second == b.second
            && a.microsecond == b.microsecond
    }
}

impl Eq for Instant {}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fields.hash(state);
    }
}

/// Chronological order. Compares exact microsecond counts, which agree
/// with the epoch order and never tie for instants with different fields.
impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.unix_micros().cmp(&other.unix_micros())
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Instant {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InstantVisitor;

        impl serde::de::Visitor<'_> for InstantVisitor {
            type Value = Instant;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a UTC timestamp in YYYY-MM-DDTHH:MM:SS[.ssssss] form")
            }

            fn visit_str<E>(self, v: &str) -> Result<Instant, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(InstantVisitor)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════════

/// Right-hand operands accepted by [`Instant`] arithmetic, as seconds.
///
/// A bare number is a seconds offset; an `Instant` contributes its epoch,
/// so `a - b` for two instants is the instant `a.epoch() - b.epoch()`
/// seconds after 1970-01-01.
pub trait IntoSeconds {
    fn into_seconds(self) -> f64;
}

impl IntoSeconds for f64 {
    #[inline]
    fn into_seconds(self) -> f64 {
        self
    }
}

impl IntoSeconds for i32 {
    #[inline]
    fn into_seconds(self) -> f64 {
        f64::from(self)
    }
}

impl IntoSeconds for i64 {
    #[inline]
    fn into_seconds(self) -> f64 {
        self as f64
    }
}

impl IntoSeconds for Seconds {
    #[inline]
    fn into_seconds(self) -> f64 {
        self.value()
    }
}

impl IntoSeconds for Days {
    #[inline]
    fn into_seconds(self) -> f64 {
        self.to::<Second>().value()
    }
}

impl IntoSeconds for &Instant {
    #[inline]
    fn into_seconds(self) -> f64 {
        self.epoch()
    }
}

impl IntoSeconds for Instant {
    #[inline]
    fn into_seconds(self) -> f64 {
        self.epoch()
    }
}

/// Adds seconds (or another instant's epoch) to an instant.
///
/// # Panics
///
/// If the result leaves the supported year range. Use
/// [`Instant::checked_add`] to handle that case without panicking.
impl<T: IntoSeconds> Add<T> for &Instant {
    type Output = Instant;

    fn add(self, rhs: T) -> Instant {
        self.checked_add(rhs)
            .expect("adding to instant left the supported year range")
    }
}

impl<T: IntoSeconds> Add<T> for Instant {
    type Output = Instant;

    #[inline]
    fn add(self, rhs: T) -> Instant {
        &self + rhs
    }
}

impl<T: IntoSeconds> AddAssign<T> for Instant {
    #[inline]
    fn add_assign(&mut self, rhs: T) {
        *self = &*self + rhs;
    }
}

/// Subtracts seconds (or another instant's epoch) from an instant.
///
/// # Panics
///
/// If the result leaves the supported year range. Use
/// [`Instant::checked_sub`] to handle that case without panicking.
impl<T: IntoSeconds> Sub<T> for &Instant {
    type Output = Instant;

    fn sub(self, rhs: T) -> Instant {
        self.checked_sub(rhs)
            .expect("subtracting from instant left the supported year range")
    }
}

impl<T: IntoSeconds> Sub<T> for Instant {
    type Output = Instant;

    #[inline]
    fn sub(self, rhs: T) -> Instant {
        &self - rhs
    }
}

impl<T: IntoSeconds> SubAssign<T> for Instant {
    #[inline]
    fn sub_assign(&mut self, rhs: T) {
        *self = &*self - rhs;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
