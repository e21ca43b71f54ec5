//! Motion module for stepper-scan.
//!
//! Provides the open-loop wait model used between commanded moves.

mod wait;

pub use wait::{estimate_ms, StepWait, WaitModel};
