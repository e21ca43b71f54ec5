//! # stepper-scan
//!
//! Raster scans over daisy-chained serial stepper stages.
//!
//! ## Features
//!
//! - **Packet framing**: six-byte `[unit][command][i32 LE]` packets assembled
//!   one polled byte at a time, with a 500 ms resync gap
//! - **Bounded queries**: position replies awaited with a deadline and retries,
//!   replies for other units parked in a mailbox
//! - **Open-loop waits**: move time estimated from distance and a calibrated
//!   full-traverse time, then checked against the reported position
//! - **Configuration-driven**: axes, grid and timing loaded from TOML files
//! - **no_std compatible**: codec, channel and controller work without the
//!   standard library; the scan engine needs `alloc`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_scan::protocol::{PacketChannel, StdClock, StdDelay};
//! use stepper_scan::{load_config, MemorySink, MotionController, ScanEngine};
//!
//! let config = load_config("tile.toml")?;
//!
//! let mut channel = PacketChannel::new(StdClock::new());
//! channel.open_port(&config.port)?;
//! let controller = MotionController::new(channel, StdDelay)
//!     .with_reply_policy(config.reply_policy());
//!
//! let mut engine = ScanEngine::new(controller, config.axes(), config.scan_options());
//! let mut acquire = |_index: usize, _point| -> Result<f64, ()> { Ok(0.0) };
//! let mut sink = MemorySink::new();
//! let result = engine.run(&config.grid_points(), &mut acquire, &mut sink)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and the serial port transport
//! - `alloc`: Enables the scan engine for no_std with allocator
//! - `defmt`: Enables defmt formatting for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod protocol;
#[cfg(feature = "alloc")]
pub mod scan;

// Re-exports for ergonomic API
pub use config::{validate_config, AxisPair, AxisUnit, GridConfig, GridPoint, ScanConfig};
pub use error::{Error, Result};
pub use motion::{StepWait, WaitModel};
pub use motor::{MotionController, ReplyPolicy, ReplyStatus};
pub use protocol::{Command, Packet, PacketChannel};

#[cfg(feature = "alloc")]
pub use scan::{run_scan, Acquire, MemorySink, PointRecord, PointSink, ScanEngine, ScanResult};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Centimeters, Microsteps};
