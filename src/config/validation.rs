//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::axis::AxisConfig;
use super::grid::GridConfig;
use super::stage::AxisPair;
use super::ScanConfig;

/// Step lengths differing by more than this many cm distort the raster.
const ASPECT_WARNING_CM: f64 = 5.0;

/// Validate a scan configuration.
///
/// Checks:
/// - Unit ids are non-zero and distinct
/// - Axis ranges, resolutions and traverse times are positive
/// - Each axis has at least two grid steps and a non-empty extent
/// - Every grid coordinate stays strictly inside its axis travel
///
/// Logs a warning when X and Y step lengths differ noticeably.
pub fn validate_config(config: &ScanConfig) -> Result<()> {
    validate_axis(&config.axes.x)?;
    validate_axis(&config.axes.y)?;

    if config.axes.x.unit_id == config.axes.y.unit_id {
        return Err(Error::Config(ConfigError::InvalidUnitId(
            config.axes.y.unit_id,
        )));
    }

    validate_grid(&config.grid, config.axes())?;

    Ok(())
}

fn validate_axis(axis: &AxisConfig) -> Result<()> {
    // Unit 0 addresses the whole chain
    if axis.unit_id == 0 {
        return Err(Error::Config(ConfigError::InvalidUnitId(0)));
    }

    if axis.range.0 <= 0 {
        return Err(Error::Config(ConfigError::InvalidRange(axis.range.0)));
    }

    if !(axis.microsteps_per_cm > 0.0) {
        return Err(Error::Config(ConfigError::InvalidMicrostepsPerCm(
            axis.microsteps_per_cm,
        )));
    }

    if !(axis.ms_per_full_traverse > 0.0) {
        return Err(Error::Config(ConfigError::InvalidTraverseTime(
            axis.ms_per_full_traverse,
        )));
    }

    Ok(())
}

fn validate_grid(grid: &GridConfig, axes: AxisPair) -> Result<()> {
    for (axis, steps) in [("x", grid.steps_x), ("y", grid.steps_y)] {
        if steps <= 1 {
            return Err(Error::Config(ConfigError::InvalidStepCount { axis, steps }));
        }
    }

    for (axis, origin, max) in [
        ("x", grid.x_origin.0, grid.x_max.0),
        ("y", grid.y_origin.0, grid.y_max.0),
    ] {
        if !(origin < max) {
            return Err(Error::Config(ConfigError::InvalidExtent { axis, origin, max }));
        }
    }

    // Spacing is uniform, so the end points bound every coordinate.
    let x_ends = [grid.x_at(0, &axes.x), grid.x_at(grid.steps_x - 1, &axes.x)];
    for value in x_ends {
        if !axes.x.contains(value) {
            return Err(Error::Config(ConfigError::OutOfTravel {
                axis: "x",
                value: value.0,
                range: axes.x.range.0,
            }));
        }
    }

    let y_ends = [grid.y_at(0, &axes.y), grid.y_at(grid.steps_y - 1, &axes.y)];
    for value in y_ends {
        if !axes.y.contains(value) {
            return Err(Error::Config(ConfigError::OutOfTravel {
                axis: "y",
                value: value.0,
                range: axes.y.range.0,
            }));
        }
    }

    let (x_step, y_step) = (grid.x_step_cm(), grid.y_step_cm());
    if libm::fabs(x_step - y_step) > ASPECT_WARNING_CM {
        log::warn!(
            "check aspect ratio: each X step is {} cm, each Y step is {} cm",
            x_step,
            y_step
        );
    }

    Ok(())
}
