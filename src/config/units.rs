//! Unit types for physical quantities.
//!
//! Positions on the wire are microsteps; the scan is described in
//! centimeters. Keeping them apart prevents mixing the two.

use core::fmt;

use serde::Deserialize;

/// Stage position or distance in microsteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Microsteps(pub i32);

impl Microsteps {
    /// Create a new Microsteps value.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Distance to another position, without overflow.
    #[inline]
    pub const fn distance(self, other: Self) -> u32 {
        self.0.abs_diff(other.0)
    }

    /// Create from centimeters using a microsteps-per-cm ratio, rounding to
    /// the nearest microstep.
    #[inline]
    pub fn from_cm(cm: Centimeters, microsteps_per_cm: f64) -> Self {
        Self(libm::round(cm.0 * microsteps_per_cm) as i32)
    }

    /// Convert to centimeters using a microsteps-per-cm ratio.
    #[inline]
    pub fn to_cm(self, microsteps_per_cm: f64) -> Centimeters {
        Centimeters(self.0 as f64 / microsteps_per_cm)
    }
}

impl fmt::Display for Microsteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length in centimeters.
///
/// Used for configuration and user-facing API. Internally converted to [`Microsteps`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl Centimeters {
    /// Create a new Centimeters value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }
}
