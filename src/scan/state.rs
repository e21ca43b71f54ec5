//! Scan progress and outcome.

use alloc::collections::BTreeSet;

use crate::config::GridPoint;

/// Where the scan engine is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanPhase {
    /// Checking the grid before any traffic.
    Init,
    /// Renumbering the chain and reading initial positions.
    Homing,
    /// Moving to a grid point and verifying arrival.
    Iterating,
    /// Running the acquisition at a grid point.
    Acquiring,
    /// Persisting the point record.
    Advancing,
    /// Moving back to the first grid point.
    Returning,
    /// Channel released.
    Closed,
}

/// Tunables for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Pause after each acquisition, in ms.
    pub dwell_ms: u32,
    /// Accepted deviation from the target after a move, in microsteps.
    pub tolerance: u32,
}

/// Progress of a running scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Last known position of both axes.
    pub position: GridPoint,
    /// Grid point currently being visited.
    pub target: Option<GridPoint>,
    /// Points with a successful acquisition.
    pub completed: usize,
    /// Indices of points without a measurement.
    pub failed: BTreeSet<usize>,
}

impl ScanState {
    /// Fresh state at the given position.
    pub fn at(position: GridPoint) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Summary of the scan so far.
    pub fn result(&self, cancelled: bool) -> ScanResult {
        ScanResult {
            points_completed: self.completed,
            points_failed: self.failed.clone(),
            cancelled,
        }
    }
}

/// Outcome of a scan that ran to completion or was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Points with a measurement.
    pub points_completed: usize,
    /// Indices of points without a measurement.
    pub points_failed: BTreeSet<usize>,
    /// The scan stopped early on request.
    pub cancelled: bool,
}

impl ScanResult {
    /// Number of points visited.
    pub fn points_visited(&self) -> usize {
        self.points_completed + self.points_failed.len()
    }
}
