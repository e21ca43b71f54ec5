//! Scan configuration - root configuration structure.

use heapless::String;
use serde::Deserialize;

use crate::motor::ReplyPolicy;

use super::axis::AxesConfig;
use super::grid::GridConfig;
use super::stage::AxisPair;
use super::timing::TimingConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Serial device the chain is attached to.
    pub port: String<64>,

    /// Stage axes.
    pub axes: AxesConfig,

    /// Raster to visit.
    pub grid: GridConfig,

    /// Timing and verification.
    #[serde(default)]
    pub timing: TimingConfig,
}

impl ScanConfig {
    /// Runtime axis parameters.
    pub fn axes(&self) -> AxisPair {
        AxisPair::from_config(&self.axes)
    }

    /// Reply deadline and retry policy for position queries.
    pub fn reply_policy(&self) -> ReplyPolicy {
        ReplyPolicy {
            timeout_ms: self.timing.reply_timeout_ms,
            retries: self.timing.reply_retries,
            poll_interval_us: self.timing.poll_interval_us,
        }
    }

    /// Options for the scan engine.
    #[cfg(feature = "alloc")]
    pub fn scan_options(&self) -> crate::scan::ScanOptions {
        crate::scan::ScanOptions {
            dwell_ms: self.timing.dwell_ms,
            tolerance: self.timing.tolerance_microsteps,
        }
    }

    /// The grid in visit order.
    #[cfg(feature = "alloc")]
    pub fn grid_points(&self) -> alloc::vec::Vec<super::grid::GridPoint> {
        self.grid.to_points(self.axes())
    }
}
