// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fixed-width text form of an [`Instant`].
//!
//! ```text
//! YYYY-MM-DDTHH:MM:SS.ssssss   (26 bytes, output and input)
//! YYYY-MM-DDTHH:MM:SS          (19 bytes, input only, microsecond = 0)
//! ```
//!
//! Years before 0 are written as `-DDD` so the width stays fixed down to
//! year -999. Year -1000 needs five characters and cannot be read back.

use crate::error::TimeError;
use crate::instant::Instant;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const LONG_LEN: usize = 26;
const SHORT_LEN: usize = 19;

/// `(byte offset, expected separator)` shared by both layouts.
const SEPARATORS: [(usize, u8); 5] = [(4, b'-'), (7, b'-'), (10, b'T'), (13, b':'), (16, b':')];

// ── Display ───────────────────────────────────────────────────────────────

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}",
            self.year(),
            self.month(),
            self.day_of_month(),
            self.hour(),
            self.minute(),
            self.second(),
            self.microsecond()
        )
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────

impl FromStr for Instant {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).inspect_err(|error| debug!(input = s, %error, "rejected timestamp"))
    }
}

impl Instant {
    /// Parse `YYYY-MM-DDTHH:MM:SS.ssssss` or `YYYY-MM-DDTHH:MM:SS`.
    ///
    /// # Errors
    ///
    /// - [`TimeError::InvalidLength`] for any length other than 19 or 26.
    /// - [`TimeError::Malformed`] for a misplaced separator or a non-digit
    ///   field.
    /// - A range error if a field is out of range, including dates that do
    ///   not exist such as `2021-02-29`.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        s.parse()
    }

    /// Replace `self` with the parsed value of `s`.
    ///
    /// On error `self` is left unchanged.
    pub fn assign_str(&mut self, s: &str) -> Result<(), TimeError> {
        *self = s.parse()?;
        Ok(())
    }
}

fn parse(input: &str) -> Result<Instant, TimeError> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if len != LONG_LEN && len != SHORT_LEN {
        return Err(TimeError::InvalidLength {
            input: input.to_string(),
            len,
        });
    }
    let malformed = |reason| TimeError::Malformed {
        input: input.to_string(),
        reason,
    };

    for (at, sep) in SEPARATORS {
        if bytes[at] != sep {
            return Err(malformed("unexpected separator in date or time"));
        }
    }
    let microsecond = if len == LONG_LEN {
        if bytes[SHORT_LEN] != b'.' {
            return Err(malformed("expected '.' before the microseconds"));
        }
        digits(&bytes[20..26]).ok_or_else(|| malformed("microseconds must be 6 digits"))?
    } else {
        0
    };

    let year = match bytes[0] {
        b'-' => digits(&bytes[1..4]).map(|y| -y),
        _ => digits(&bytes[0..4]),
    }
    .ok_or_else(|| malformed("year must be 4 digits or '-' and 3 digits"))?;
    // Year zero is written `0000` only.
    if year == 0 && bytes[0] == b'-' {
        return Err(malformed("year zero has no sign"));
    }
    let month = digits(&bytes[5..7]).ok_or_else(|| malformed("month must be 2 digits"))?;
    let day = digits(&bytes[8..10]).ok_or_else(|| malformed("day must be 2 digits"))?;
    let hour = digits(&bytes[11..13]).ok_or_else(|| malformed("hour must be 2 digits"))?;
    let minute = digits(&bytes[14..16]).ok_or_else(|| malformed("minute must be 2 digits"))?;
    let second = digits(&bytes[17..19]).ok_or_else(|| malformed("second must be 2 digits"))?;

    Instant::from_calendar(year, month, day, hour, minute, second, microsecond)
}

/// Decimal value of an all-ASCII-digit slice of at most 9 bytes.
fn digits(bytes: &[u8]) -> Option<i32> {
    bytes.iter().try_fold(0i32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + i32::from(b - b'0'))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn display_is_fixed_width() {
        let t = Instant::from_calendar(2020, 1, 9, 0, 12, 8, 800_000).unwrap();
        assert_eq!(t.to_string(), "2020-01-09T00:12:08.800000");
        assert_eq!(Instant::new().to_string(), "1970-01-01T00:00:00.000000");
        let early = Instant::from_calendar(33, 7, 4, 1, 2, 3, 45).unwrap();
        assert_eq!(early.to_string(), "0033-07-04T01:02:03.000045");
    }

    #[test]
    fn display_negative_years() {
        let t = Instant::from_calendar(-5, 3, 1, 0, 0, 0, 0).unwrap();
        let s = t.to_string();
        assert_eq!(s, "-005-03-01T00:00:00.000000");
        assert_eq!(s.parse::<Instant>().unwrap(), t);

        let t = Instant::from_calendar(-1000, 1, 1, 0, 0, 0, 0).unwrap();
        assert_eq!(t.to_string().len(), 27);
    }

    #[test]
    fn year_zero_has_one_spelling() {
        let t: Instant = "0000-03-01T00:00:00".parse().unwrap();
        assert_eq!(t.to_string(), "0000-03-01T00:00:00.000000");

        for input in ["-000-03-01T00:00:00", "-000-03-01T00:00:00.000000"] {
            let err = input.parse::<Instant>().unwrap_err();
            assert!(matches!(err, TimeError::Malformed { .. }), "{input}: {err}");
        }
    }

    #[test]
    fn parse_long_form() {
        let t: Instant = "2020-03-17T08:01:33.009000".parse().unwrap();
        assert_eq!((t.year(), t.month(), t.day_of_month()), (2020, 3, 17));
        assert_eq!((t.hour(), t.minute(), t.second()), (8, 1, 33));
        assert_eq!(t.microsecond(), 9000);
        assert_eq!(t.day_of_year(), 77);
    }

    #[test]
    fn parse_short_form() {
        let t = Instant::parse("2020-03-17T08:01:33").unwrap();
        assert_eq!((t.year(), t.month(), t.day_of_month()), (2020, 3, 17));
        assert_eq!((t.hour(), t.minute(), t.second()), (8, 1, 33));
        assert_eq!(t.microsecond(), 0);
    }

    #[test]
    fn parse_rejects_other_lengths() {
        for s in ["", "2020-03-17", "2020-03-17T08:01:33.0", "2020-03-17T08:01:33.0090001"] {
            let err = Instant::parse(s).unwrap_err();
            assert_eq!(
                err,
                TimeError::InvalidLength {
                    input: s.to_string(),
                    len: s.len()
                }
            );
            assert_eq!(err.kind(), ErrorKind::Parse);
        }
    }

    #[test]
    fn parse_rejects_bad_separators_and_digits() {
        for s in [
            "2020/03/17T08:01:33",
            "2020-03-17 08:01:33",
            "2020-03-17T08-01-33",
            "2020-03-17T08:01:33,009000",
            "2020-0a-17T08:01:33",
            "2020-03-17T08:01:33.00900x",
            "+020-03-17T08:01:33",
            "20-0-03-17T08:01:33",
        ] {
            let err = Instant::parse(s).unwrap_err();
            assert!(
                matches!(err, TimeError::Malformed { .. }),
                "{s:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_out_of_range_fields() {
        assert_eq!(
            Instant::parse("2021-02-29T00:00:00").unwrap_err(),
            TimeError::InvalidDayOfMonth {
                year: 2021,
                month: 2,
                day: 29,
                max_day: 28
            }
        );
        assert_eq!(
            Instant::parse("2020-13-01T00:00:00").unwrap_err(),
            TimeError::InvalidMonth { month: 13 }
        );
        assert_eq!(
            Instant::parse("2020-01-01T24:00:00").unwrap_err(),
            TimeError::InvalidHour { hour: 24 }
        );
        assert_eq!(
            Instant::parse("2020-01-01T00:00:60").unwrap_err(),
            TimeError::InvalidSecond { second: 60 }
        );
        assert_eq!(
            Instant::parse("3000-01-01T00:00:00").unwrap_err(),
            TimeError::YearOutOfRange { year: 3000 }
        );
        assert!(Instant::parse("2020-01-01T00:00:00").is_ok());
    }

    #[test]
    fn assign_str_is_all_or_nothing() {
        let mut t = Instant::from_epoch(1_408_117_832.844).unwrap();
        let before = t.clone();
        assert!(t.assign_str("2020-02-30T00:00:00").is_err());
        assert!(t.assign_str("garbage").is_err());
        assert_eq!(t, before);

        t.assign_str("2020-02-29T23:59:59.999999").unwrap();
        assert_eq!(t.day_of_year(), 60);
        assert_eq!(t.to_string(), "2020-02-29T23:59:59.999999");
    }

    #[test]
    fn format_then_parse_preserves_fields() {
        let t = Instant::from_epoch(1_230_784_385.5).unwrap();
        let back: Instant = t.to_string().parse().unwrap();
        assert_eq!(back, t);
        assert_eq!(back.epoch(), t.epoch());
    }

    #[test]
    fn digits_helper() {
        assert_eq!(digits(b"0042"), Some(42));
        assert_eq!(digits(b"999999"), Some(999_999));
        assert_eq!(digits(b"4 2"), None);
        assert_eq!(digits(b"-1"), None);
    }
}
