// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Rational presentation timestamps.

/// Presentation time expressed as `value / timescale` seconds.
///
/// Mirrors the CoreMedia `CMTime` layout so platform backends can copy
/// timestamps across without reinterpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaTime {
    pub value: i64,
    pub timescale: i32,
    pub flags: u32,
}

impl MediaTime {
    pub const FLAG_VALID: u32 = 1 << 0;
    pub const FLAG_HAS_BEEN_ROUNDED: u32 = 1 << 1;
    pub const FLAG_POSITIVE_INFINITY: u32 = 1 << 2;
    pub const FLAG_NEGATIVE_INFINITY: u32 = 1 << 3;
    pub const FLAG_INDEFINITE: u32 = 1 << 4;

    const NON_NUMERIC: u32 =
        Self::FLAG_POSITIVE_INFINITY | Self::FLAG_NEGATIVE_INFINITY | Self::FLAG_INDEFINITE;

    /// A valid timestamp of `value / timescale` seconds.
    pub const fn new(value: i64, timescale: i32) -> Self {
        Self {
            value,
            timescale,
            flags: Self::FLAG_VALID,
        }
    }

    /// The invalid timestamp (`kCMTimeInvalid`).
    pub const fn invalid() -> Self {
        Self {
            value: 0,
            timescale: 0,
            flags: 0,
        }
    }

    /// Valid flag set, positive timescale, and a finite numeric value.
    pub const fn is_valid(&self) -> bool {
        self.flags & Self::FLAG_VALID != 0
            && self.flags & Self::NON_NUMERIC == 0
            && self.timescale > 0
    }

    /// Timestamp in fractional seconds, `None` when invalid.
    pub fn seconds(&self) -> Option<f64> {
        self.is_valid()
            .then(|| self.value as f64 / f64::from(self.timescale))
    }
}
