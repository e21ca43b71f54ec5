//! Axis configuration from TOML.

use serde::Deserialize;

use super::units::Microsteps;

/// Configuration of one stage axis.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Unit id assigned to this controller by renumbering (1 = first on the chain).
    pub unit_id: u8,

    /// Total travel in microsteps.
    #[serde(rename = "range_microsteps")]
    pub range: Microsteps,

    /// Microsteps per centimeter of travel.
    pub microsteps_per_cm: f64,

    /// Calibrated time for one full traverse, in milliseconds.
    pub ms_per_full_traverse: f64,
}

impl AxisConfig {
    /// Travel length in centimeters.
    pub fn travel_cm(&self) -> f64 {
        self.range.0 as f64 / self.microsteps_per_cm
    }
}

/// The two axes of the stage.
#[derive(Debug, Clone, Deserialize)]
pub struct AxesConfig {
    /// First axis; receives its move command first.
    pub x: AxisConfig,
    /// Second axis.
    pub y: AxisConfig,
}
