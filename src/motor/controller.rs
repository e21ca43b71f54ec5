//! Motion controller for addressable stage axes.
//!
//! Turns domain operations into packets on a shared [`PacketChannel`]. The
//! protocol has no completion event and no error replies: moves are fire and
//! forget, and a query is answered by a reply carrying the same
//! (unit, command) pair, or not at all.

use embedded_hal::delay::DelayNs;

use crate::config::units::Microsteps;
use crate::error::{MotionError, Result};
use crate::protocol::{
    Clock, Command, Packet, PacketChannel, Transport, BROADCAST_UNIT, QUERY_SENTINEL,
};

use super::mailbox::Mailbox;

/// Default settle time after renumbering, in milliseconds.
pub const DEFAULT_SETTLE_MS: u32 = 1500;

/// Upper bound on bytes read while parking replies before a query.
const DRAIN_LIMIT: usize = 4096;

/// Bounds for waiting on a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyPolicy {
    /// Deadline for one reply, in milliseconds.
    pub timeout_ms: u64,
    /// Extra queries sent after a deadline passes.
    pub retries: u8,
    /// Sleep between empty polls, in microseconds.
    pub poll_interval_us: u32,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            retries: 3,
            poll_interval_us: 1000,
        }
    }
}

/// Outcome of waiting for one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    /// The matching reply arrived.
    Received(Packet),
    /// The deadline passed first.
    Pending,
}

/// Controller for every unit on one daisy chain.
///
/// Owns the channel for its lifetime. Generic over:
/// - `T`: byte transport
/// - `C`: clock used for resync gaps and reply deadlines
/// - `D`: delay provider (`embedded_hal::delay::DelayNs`)
pub struct MotionController<T, C, D>
where
    T: Transport,
    C: Clock,
    D: DelayNs,
{
    channel: PacketChannel<T, C>,
    delay: D,
    mailbox: Mailbox,
    policy: ReplyPolicy,
    settle_ms: u32,
}

impl<T, C, D> MotionController<T, C, D>
where
    T: Transport,
    C: Clock,
    D: DelayNs,
{
    /// Create a controller over an (open or not yet open) channel.
    pub fn new(channel: PacketChannel<T, C>, delay: D) -> Self {
        Self {
            channel,
            delay,
            mailbox: Mailbox::new(),
            policy: ReplyPolicy::default(),
            settle_ms: DEFAULT_SETTLE_MS,
        }
    }

    /// Set the reply deadline and retry policy.
    pub fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the settle time after renumbering.
    pub fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Assign sequential unit ids along the chain.
    ///
    /// Must run before any addressed traffic. Waits for the firmware to
    /// settle, then drops whatever the units emitted meanwhile.
    ///
    /// # Errors
    ///
    /// Returns a channel error if the broadcast cannot be written.
    pub fn renumber_chain(&mut self) -> Result<()> {
        self.channel
            .send(BROADCAST_UNIT, Command::Renumber.id(), 0)?;
        log::info!("renumbering chain, settling for {} ms", self.settle_ms);
        self.delay.delay_ms(self.settle_ms);

        self.channel.flush_input()?;
        self.mailbox.clear();
        Ok(())
    }

    /// Command a move to an absolute position. Returns once the packet is
    /// written; the move itself completes later.
    ///
    /// # Errors
    ///
    /// Returns a channel error if the packet cannot be written.
    pub fn move_absolute(&mut self, unit: u8, target: Microsteps) -> Result<()> {
        log::debug!("unit {} move to {}", unit, target);
        self.channel
            .send(unit, Command::MoveAbsolute.id(), target.0)
    }

    /// Send a position query without waiting for the reply.
    ///
    /// Replies already on the line are parked first, and any reply parked
    /// for this unit is stale and dropped. A reply still in flight from an
    /// earlier query cannot be told apart from the answer to this one.
    ///
    /// # Errors
    ///
    /// Returns a channel error if the packet cannot be written.
    pub fn request_position(&mut self, unit: u8) -> Result<()> {
        let command = Command::ReturnPosition.id();
        self.park_pending()?;
        if self.mailbox.take(unit, command).is_some() {
            log::trace!("dropping stale position of unit {}", unit);
        }
        self.channel.send(unit, command, QUERY_SENTINEL)
    }

    /// Wait for the reply to an earlier [`request_position`](Self::request_position),
    /// re-sending the query after each missed deadline.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::ReplyTimeout` once every attempt has timed out,
    /// or a channel error.
    pub fn collect_position(&mut self, unit: u8) -> Result<Microsteps> {
        let command = Command::ReturnPosition.id();
        let attempts = self.policy.retries.saturating_add(1);

        for attempt in 1..=attempts {
            if attempt > 1 {
                log::warn!(
                    "no position from unit {}, querying again ({}/{})",
                    unit,
                    attempt,
                    attempts
                );
                self.channel.send(unit, command, QUERY_SENTINEL)?;
            }

            if let ReplyStatus::Received(packet) = self.poll_reply(unit, command)? {
                return Ok(Microsteps(packet.data));
            }
        }

        Err(MotionError::ReplyTimeout {
            unit,
            command,
            attempts,
        }
        .into())
    }

    /// Query the current position of one unit.
    ///
    /// # Errors
    ///
    /// See [`collect_position`](Self::collect_position).
    pub fn get_position(&mut self, unit: u8) -> Result<Microsteps> {
        self.request_position(unit)?;
        self.collect_position(unit)
    }

    /// Query a unit and check it reached `target`.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::MotionMismatch` if the reported position is more
    /// than `tolerance` microsteps from `target`, or any query error.
    pub fn verify_position(
        &mut self,
        unit: u8,
        target: Microsteps,
        tolerance: u32,
    ) -> Result<Microsteps> {
        let actual = self.get_position(unit)?;
        if actual.distance(target) > tolerance {
            return Err(MotionError::MotionMismatch {
                unit,
                target: target.0,
                actual: actual.0,
                tolerance,
            }
            .into());
        }
        Ok(actual)
    }

    /// Poll the line until the `(unit, command)` reply arrives or one reply
    /// deadline passes. Other replies are parked in the mailbox.
    ///
    /// # Errors
    ///
    /// Returns a channel error.
    pub fn poll_reply(&mut self, unit: u8, command: u8) -> Result<ReplyStatus> {
        let deadline = self
            .channel
            .clock()
            .now_ms()
            .saturating_add(self.policy.timeout_ms);

        loop {
            if let Some(data) = self.mailbox.take(unit, command) {
                return Ok(ReplyStatus::Received(Packet::new(unit, command, data)));
            }

            match self.channel.receive()? {
                Some(packet) if packet.matches(unit, command) => {
                    return Ok(ReplyStatus::Received(packet));
                }
                Some(packet) => {
                    log::trace!(
                        "parking reply from unit {} (command {})",
                        packet.unit,
                        packet.command
                    );
                    self.mailbox.deliver(packet);
                }
                None => self.delay.delay_us(self.policy.poll_interval_us),
            }

            if self.channel.clock().now_ms() >= deadline {
                return Ok(ReplyStatus::Pending);
            }
        }
    }

    /// Move every complete reply already readable into the mailbox.
    fn park_pending(&mut self) -> Result<()> {
        for _ in 0..DRAIN_LIMIT {
            let before = self.channel.pending_bytes();
            match self.channel.receive()? {
                Some(packet) => {
                    self.mailbox.deliver(packet);
                }
                None if self.channel.pending_bytes() == before => break,
                None => {}
            }
        }
        Ok(())
    }

    /// Block for a fixed time.
    pub fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Current time of the channel clock.
    pub fn now_ms(&self) -> u64 {
        self.channel.clock().now_ms()
    }

    /// Release the channel. Does nothing if already closed.
    pub fn close(&mut self) {
        self.channel.close();
        self.mailbox.clear();
    }

    /// Whether the channel is open.
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// The underlying channel.
    pub fn channel(&self) -> &PacketChannel<T, C> {
        &self.channel
    }

    /// Mutable access to the underlying channel (for opening it).
    pub fn channel_mut(&mut self) -> &mut PacketChannel<T, C> {
        &mut self.channel
    }

    /// Replies parked for later collection.
    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// The active reply policy.
    pub fn reply_policy(&self) -> ReplyPolicy {
        self.policy
    }
}
