//! Configuration module for stepper-scan.
//!
//! Provides types for loading and validating stage axes, the scan grid and
//! timing parameters from TOML files (with `std` feature) or pre-built data.

mod axis;
mod grid;
#[cfg(feature = "std")]
mod loader;
mod stage;
mod system;
mod timing;
pub mod units;
mod validation;

pub use axis::{AxesConfig, AxisConfig};
pub use grid::{GridConfig, GridPoint};
pub use stage::{AxisPair, AxisUnit};
pub use system::ScanConfig;
pub use timing::TimingConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Centimeters, Microsteps};
