//! Scan grid configuration and point generation.

use serde::Deserialize;

use super::stage::{AxisPair, AxisUnit};
use super::units::{Centimeters, Microsteps};

/// One target position of the raster, in microsteps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GridPoint {
    /// X-axis target.
    pub x: Microsteps,
    /// Y-axis target.
    pub y: Microsteps,
}

impl GridPoint {
    /// Create a grid point from raw microsteps.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x: Microsteps(x),
            y: Microsteps(y),
        }
    }
}

/// Evenly spaced raster between an origin and a max corner.
#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// First X coordinate.
    #[serde(rename = "x_origin_cm")]
    pub x_origin: Centimeters,

    /// Last X coordinate.
    #[serde(rename = "x_max_cm")]
    pub x_max: Centimeters,

    /// Number of X positions (including both ends).
    pub steps_x: u16,

    /// First Y coordinate.
    #[serde(rename = "y_origin_cm")]
    pub y_origin: Centimeters,

    /// Last Y coordinate.
    #[serde(rename = "y_max_cm")]
    pub y_max: Centimeters,

    /// Number of Y positions (including both ends).
    pub steps_y: u16,
}

impl GridConfig {
    /// Spacing between X positions in cm.
    pub fn x_step_cm(&self) -> f64 {
        step_length(self.x_origin, self.x_max, self.steps_x)
    }

    /// Spacing between Y positions in cm.
    pub fn y_step_cm(&self) -> f64 {
        step_length(self.y_origin, self.y_max, self.steps_y)
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.steps_x as usize * self.steps_y as usize
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// X coordinate of column `i`.
    pub fn x_at(&self, i: u16, axis: &AxisUnit) -> Microsteps {
        let cm = self.x_origin.0 + i as f64 * self.x_step_cm();
        axis.cm_to_microsteps(Centimeters(cm))
    }

    /// Y coordinate of row `j`.
    pub fn y_at(&self, j: u16, axis: &AxisUnit) -> Microsteps {
        let cm = self.y_origin.0 + j as f64 * self.y_step_cm();
        axis.cm_to_microsteps(Centimeters(cm))
    }

    /// Visit order: for each X column, every Y row.
    pub fn points(&self, axes: AxisPair) -> impl Iterator<Item = GridPoint> + '_ {
        (0..self.steps_x).flat_map(move |i| {
            let x = self.x_at(i, &axes.x);
            (0..self.steps_y).map(move |j| GridPoint {
                x,
                y: self.y_at(j, &axes.y),
            })
        })
    }

    /// Collect the grid into a vector.
    #[cfg(feature = "alloc")]
    pub fn to_points(&self, axes: AxisPair) -> alloc::vec::Vec<GridPoint> {
        self.points(axes).collect()
    }
}

fn step_length(origin: Centimeters, max: Centimeters, steps: u16) -> f64 {
    if steps <= 1 {
        0.0
    } else {
        (max.0 - origin.0) / (steps - 1) as f64
    }
}
