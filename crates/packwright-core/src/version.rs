//! # Dotted Versions — Numeric Release Ordering
//!
//! Defines [`DottedVersion`], the version type used for platform-release
//! comparison in compatibility checks.
//!
//! ## Invariant
//!
//! Comparison is segment-by-segment numeric, never lexicographic:
//! `"10.0"` sorts above `"8.0"`, and `"8.0"` equals `"8.0.0"` (missing
//! trailing segments compare as zero). String comparison of release
//! numbers is the defect this type exists to prevent.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a dotted version string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    /// The version string was empty.
    #[error("empty version string")]
    Empty,

    /// A segment between dots was not a plain non-negative integer.
    #[error("invalid numeric segment {segment:?} in version {version:?}")]
    InvalidSegment {
        /// The full version string as given.
        version: String,
        /// The offending segment.
        segment: String,
    },
}

/// A dotted-numeric version such as `8.0` or `1.2.3`.
///
/// Keeps the original string for display; ordering and equality are
/// defined over the numeric segments with zero-fill, so construction from
/// `"8.0"` and `"8.0.0"` yields equal values that render differently.
#[derive(Debug, Clone)]
pub struct DottedVersion {
    raw: String,
    segments: Vec<u64>,
}

impl DottedVersion {
    /// Returns the numeric segments.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Returns the version string as originally given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for DottedVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }
        let mut segments = Vec::new();
        for segment in s.split('.') {
            let value: u64 = segment.parse().map_err(|_| {
                VersionParseError::InvalidSegment {
                    version: s.to_string(),
                    segment: segment.to_string(),
                }
            })?;
            segments.push(value);
        }
        Ok(Self {
            raw: s.to_string(),
            segments,
        })
    }
}

impl Ord for DottedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for DottedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DottedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DottedVersion {}

impl fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
