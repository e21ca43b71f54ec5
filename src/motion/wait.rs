//! Move duration estimates.
//!
//! The stages report no completion, so the scan sleeps for a time derived
//! from the move distance: travel speed is taken as constant over the whole
//! range, with the calibrated full-traverse time as the only parameter.

use crate::config::units::Microsteps;
use crate::config::{AxisPair, AxisUnit, GridPoint};

/// Estimated move time in milliseconds.
///
/// `ms_per_full_traverse * |target - current| / range`. A non-positive range
/// yields 0.
pub fn estimate_ms(
    current: Microsteps,
    target: Microsteps,
    range: Microsteps,
    ms_per_full_traverse: f64,
) -> f64 {
    if range.0 <= 0 {
        return 0.0;
    }
    ms_per_full_traverse * current.distance(target) as f64 / range.0 as f64
}

/// Linear wait model over one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitModel {
    range: Microsteps,
    ms_per_full_traverse: f64,
}

impl WaitModel {
    /// Model for a configured axis.
    pub fn for_axis(axis: &AxisUnit) -> Self {
        Self {
            range: axis.range,
            ms_per_full_traverse: axis.ms_per_full_traverse,
        }
    }

    /// Estimated time for a move on this axis, in milliseconds.
    pub fn estimate(&self, current: Microsteps, target: Microsteps) -> f64 {
        estimate_ms(current, target, self.range, self.ms_per_full_traverse)
    }
}

/// Per-axis estimates for one grid step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepWait {
    /// X-axis estimate in ms.
    pub x_ms: f64,
    /// Y-axis estimate in ms.
    pub y_ms: f64,
}

impl StepWait {
    /// Estimates for moving both axes from `current` to `target`.
    pub fn between(axes: &AxisPair, current: GridPoint, target: GridPoint) -> Self {
        Self {
            x_ms: WaitModel::for_axis(&axes.x).estimate(current.x, target.x),
            y_ms: WaitModel::for_axis(&axes.y).estimate(current.y, target.y),
        }
    }

    /// Time to wait for both axes, rounded up to whole milliseconds.
    ///
    /// The axes move concurrently, so the longer estimate bounds the step.
    pub fn wait_ms(&self) -> u32 {
        let longest = if self.x_ms > self.y_ms { self.x_ms } else { self.y_ms };
        let ceiled = libm::ceil(longest);
        if ceiled <= 0.0 {
            0
        } else if ceiled >= u32::MAX as f64 {
            u32::MAX
        } else {
            ceiled as u32
        }
    }
}
