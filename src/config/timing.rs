//! Timing configuration: settle delays, reply deadlines and verification.

use serde::Deserialize;

/// Timing and verification parameters. Every field has a default.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay after renumbering before addressed traffic, in ms.
    pub settle_ms: u32,

    /// Idle gap after which a partial packet is discarded, in ms.
    pub resync_gap_ms: u64,

    /// Deadline for one position reply, in ms.
    pub reply_timeout_ms: u64,

    /// Extra queries sent after a reply deadline passes.
    pub reply_retries: u8,

    /// Sleep between empty polls, in microseconds.
    pub poll_interval_us: u32,

    /// Pause after each acquisition, in ms.
    pub dwell_ms: u32,

    /// Accepted deviation between target and reported position after a move.
    pub tolerance_microsteps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_ms: 1500,
            resync_gap_ms: 500,
            reply_timeout_ms: 2000,
            reply_retries: 3,
            poll_interval_us: 1000,
            dwell_ms: 500,
            tolerance_microsteps: 0,
        }
    }
}
