//! Stage parameters derived from axis configuration.

use super::axis::{AxesConfig, AxisConfig};
use super::units::{Centimeters, Microsteps};

/// One addressable axis as the scan sees it.
///
/// Computed once at setup and used for bounds checks and wait estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisUnit {
    /// Unit id on the chain.
    pub id: u8,

    /// Microsteps per centimeter.
    pub microsteps_per_cm: f64,

    /// Total travel in microsteps.
    pub range: Microsteps,

    /// Calibrated time for one full traverse, in milliseconds.
    pub ms_per_full_traverse: f64,
}

impl AxisUnit {
    /// Create an axis from raw parameters.
    pub const fn new(id: u8, microsteps_per_cm: f64, range: i32, ms_per_full_traverse: f64) -> Self {
        Self {
            id,
            microsteps_per_cm,
            range: Microsteps(range),
            ms_per_full_traverse,
        }
    }

    /// Derive from configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        Self {
            id: config.unit_id,
            microsteps_per_cm: config.microsteps_per_cm,
            range: config.range,
            ms_per_full_traverse: config.ms_per_full_traverse,
        }
    }

    /// Whether a coordinate lies strictly inside (0, range).
    #[inline]
    pub fn contains(&self, position: Microsteps) -> bool {
        position.0 > 0 && position.0 < self.range.0
    }

    /// Convert centimeters to microsteps.
    #[inline]
    pub fn cm_to_microsteps(&self, cm: Centimeters) -> Microsteps {
        Microsteps::from_cm(cm, self.microsteps_per_cm)
    }
}

/// The X and Y axes used for one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPair {
    /// Axis commanded first at every grid point.
    pub x: AxisUnit,
    /// Axis commanded second.
    pub y: AxisUnit,
}

impl AxisPair {
    /// Create a pair.
    pub const fn new(x: AxisUnit, y: AxisUnit) -> Self {
        Self { x, y }
    }

    /// Derive both axes from configuration.
    pub fn from_config(config: &AxesConfig) -> Self {
        Self {
            x: AxisUnit::from_config(&config.x),
            y: AxisUnit::from_config(&config.y),
        }
    }
}
