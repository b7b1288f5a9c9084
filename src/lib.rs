// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! UTC Time Module
//!
//! This crate provides a UTC instant with two equivalent views: seconds
//! since the Unix epoch (1970-01-01T00:00:00) and proleptic Gregorian
//! calendar fields.
//!
//! # Core types
//!
//! - [`Instant`] — calendar fields plus a lazily cached epoch; validated
//!   setters, arithmetic, comparison and a fixed-width text form.
//! - [`CivilFields`] — the plain calendar record produced by the engine.
//! - [`TimeError`] — range and parse failures.
//! - [`Version`] — build identity of this crate.
//!
//! # Calendar engine
//!
//! The [`calendar`] module holds the pure conversion functions:
//!
//! | Function | Maps |
//! |----------|------|
//! | [`calendar::decompose`] | epoch seconds → fields |
//! | [`calendar::compose`] | fields → epoch seconds |
//! | [`calendar::day_of_year`] | (year, month, day) → day of year |
//! | [`calendar::month_day_from_day_of_year`] | (year, day of year) → (month, day) |
//! | [`calendar::is_leap_year`] | year → 366 days? |
//! | [`calendar::days_in_month`] | (year, month) → 28..=31 |
//!
//! # Text form
//!
//! `YYYY-MM-DDTHH:MM:SS.ssssss` on output; the same or
//! `YYYY-MM-DDTHH:MM:SS` on input.
//!
//! ```
//! use utctime::Instant;
//!
//! let t: Instant = "2014-08-15T15:50:32.844000".parse()?;
//! assert_eq!(t.day_of_year(), 227);
//! assert!((t.epoch() - 1_408_117_832.844).abs() < 1e-6);
//!
//! let next_day = &t + 86_400.0;
//! assert_eq!(next_day.to_string(), "2014-08-16T15:50:32.844000");
//! # Ok::<(), utctime::TimeError>(())
//! ```
//!
//! # Features
//!
//! - `serde` — (de)serialize [`Instant`] as its text form.

pub mod calendar;
mod error;
pub(crate) mod instant;
mod text;
pub mod version;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use calendar::{CivilFields, YEAR_MAX, YEAR_MIN};
pub use error::{ErrorKind, TimeError};
pub use instant::{Instant, IntoSeconds};
pub use version::{Version, VERSION};
