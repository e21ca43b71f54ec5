//! Scan module for stepper-scan.
//!
//! Drives the stage across a grid, interleaving moves with instrument
//! acquisition and persistence of one record per visited point.

mod collaborators;
mod engine;
mod state;

pub use collaborators::{Acquire, MemorySink, PointRecord, PointSink, StoredPoint};
pub use engine::{run_scan, validate_grid, ScanEngine};
pub use state::{ScanOptions, ScanPhase, ScanResult, ScanState};
