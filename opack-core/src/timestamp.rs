//! Absolute-instant type for OPack's `Timestamp` variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds between the Unix epoch (1970-01-01T00:00:00Z) and the OPack epoch
/// (1904-01-01T00:00:00Z, the classic Mac OS reference instant).
pub const UNIX_TO_OPACK_EPOCH_OFFSET: f64 = 2_082_844_800.0;

/// An absolute instant, stored the way the wire format stores it: a
/// (possibly fractional) number of seconds since 1904-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    seconds_since_1904: f64,
}

impl Timestamp {
    /// Construct a `Timestamp` directly from seconds since the 1904 epoch.
    pub fn from_seconds_since_1904(seconds: f64) -> Self {
        Self {
            seconds_since_1904: seconds,
        }
    }

    /// Construct a `Timestamp` from seconds since the Unix epoch.
    pub fn from_unix_seconds(seconds: f64) -> Self {
        Self {
            seconds_since_1904: seconds + UNIX_TO_OPACK_EPOCH_OFFSET,
        }
    }

    /// The wire value: seconds since 1904-01-01T00:00:00Z.
    pub fn as_seconds_since_1904(&self) -> f64 {
        self.seconds_since_1904
    }

    /// Seconds since the Unix epoch, for interop with the host's usual clock.
    pub fn as_unix_seconds(&self) -> f64 {
        self.seconds_since_1904 - UNIX_TO_OPACK_EPOCH_OFFSET
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s since 1904-01-01T00:00:00Z", self.seconds_since_1904)
    }
}
