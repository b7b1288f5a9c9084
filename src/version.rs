// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Build identity of this crate, taken from the Cargo package metadata.

use std::fmt;

/// The package version string, e.g. `"0.1.0"`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A `major.minor.patch` triple. Orders lexicographically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The version this crate was built as.
    pub const fn current() -> Self {
        Self::new(
            parse_u32(env!("CARGO_PKG_VERSION_MAJOR")),
            parse_u32(env!("CARGO_PKG_VERSION_MINOR")),
            parse_u32(env!("CARGO_PKG_VERSION_PATCH")),
        )
    }

    /// `true` if `self` is `major.minor.patch` or later.
    pub fn is_at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        *self >= Self::new(major, minor, patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// Cargo guarantees the component variables are plain decimal numbers.
const fn parse_u32(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut value = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        value = value * 10 + (bytes[i] - b'0') as u32;
        i += 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_matches_package_version() {
        assert_eq!(Version::current().to_string(), VERSION);
    }

    #[test]
    fn is_at_least_compares_components_in_order() {
        let v = Version::new(1, 4, 2);
        assert!(v.is_at_least(1, 4, 2));
        assert!(v.is_at_least(1, 3, 9));
        assert!(v.is_at_least(0, 99, 99));
        assert!(!v.is_at_least(1, 4, 3));
        assert!(!v.is_at_least(1, 5, 0));
        assert!(!v.is_at_least(2, 0, 0));
    }

    #[test]
    fn parse_u32_digits() {
        assert_eq!(parse_u32("0"), 0);
        assert_eq!(parse_u32("17"), 17);
        assert_eq!(parse_u32(""), 0);
    }
}
