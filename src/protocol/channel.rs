//! Packet framing over a polled byte transport.
//!
//! Devices on the chain answer with no acknowledgment and no framing byte, so
//! a packet boundary is only known by counting. A partial packet older than
//! the resync gap is dropped so it cannot splice with bytes from a different
//! reply.

use heapless::Vec;

use crate::error::{debug_message, ChannelError, Result};

use super::packet::{Packet, PACKET_SIZE};
use super::time::Clock;
use super::transport::Transport;

/// Idle gap after which a partial packet is discarded.
pub const RESYNC_GAP_MS: u64 = 500;

/// Upper bound on bytes discarded by one [`PacketChannel::flush_input`].
const FLUSH_LIMIT: usize = 4096;

/// Traffic counters for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Packets written.
    pub sent: u32,
    /// Complete packets decoded.
    pub received: u32,
    /// Partial packets dropped by the resync gap.
    pub resyncs: u32,
}

/// Six-byte packet channel over a shared half-duplex line.
pub struct PacketChannel<T, C>
where
    T: Transport,
    C: Clock,
{
    transport: Option<T>,
    clock: C,
    rx: Vec<u8, PACKET_SIZE>,
    last_byte_ms: u64,
    resync_gap_ms: u64,
    stats: ChannelStats,
}

impl<T, C> PacketChannel<T, C>
where
    T: Transport,
    C: Clock,
{
    /// Create a closed channel.
    pub fn new(clock: C) -> Self {
        Self {
            transport: None,
            clock,
            rx: Vec::new(),
            last_byte_ms: 0,
            resync_gap_ms: RESYNC_GAP_MS,
            stats: ChannelStats::default(),
        }
    }

    /// Override the resync gap.
    pub fn with_resync_gap(mut self, gap_ms: u64) -> Self {
        self.resync_gap_ms = gap_ms;
        self
    }

    /// Attach a transport.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::AlreadyOpen` if a transport is already attached.
    pub fn open(&mut self, transport: T) -> Result<()> {
        if self.transport.is_some() {
            return Err(ChannelError::AlreadyOpen.into());
        }
        self.transport = Some(transport);
        self.rx.clear();
        self.last_byte_ms = self.clock.now_ms();
        log::debug!("packet channel opened");
        Ok(())
    }

    /// Whether a transport is attached.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Release the transport. Does nothing if already closed.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            log::debug!(
                "packet channel closed: sent={} received={} resyncs={}",
                self.stats.sent,
                self.stats.received,
                self.stats.resyncs
            );
        }
        self.rx.clear();
    }

    /// Serialize and write one packet. No acknowledgment is implied.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::NotOpen` or `ChannelError::Io`.
    pub fn send(&mut self, unit: u8, command: u8, data: i32) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(ChannelError::NotOpen)?;
        let bytes = Packet::new(unit, command, data).encode();
        transport
            .write_all(&bytes)
            .map_err(|e| ChannelError::Io(debug_message(&e)))?;
        self.stats.sent = self.stats.sent.wrapping_add(1);
        log::trace!("tx unit={} command={} data={}", unit, command, data);
        Ok(())
    }

    /// Send a prebuilt packet.
    ///
    /// # Errors
    ///
    /// See [`PacketChannel::send`].
    pub fn send_packet(&mut self, packet: Packet) -> Result<()> {
        self.send(packet.unit, packet.command, packet.data)
    }

    /// Poll for one byte and return a packet once six have accumulated.
    ///
    /// `Ok(None)` means "not yet": no byte was waiting or the packet is still
    /// partial. Callers are expected to keep polling.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::NotOpen` or `ChannelError::Io`.
    pub fn receive(&mut self) -> Result<Option<Packet>> {
        let transport = self.transport.as_mut().ok_or(ChannelError::NotOpen)?;
        let now = self.clock.now_ms();

        if !self.rx.is_empty() && now.saturating_sub(self.last_byte_ms) > self.resync_gap_ms {
            log::debug!(
                "discarding {} stale byte(s) after {} ms idle",
                self.rx.len(),
                now.saturating_sub(self.last_byte_ms)
            );
            self.rx.clear();
            self.stats.resyncs = self.stats.resyncs.wrapping_add(1);
        }

        let byte = match transport
            .read_byte()
            .map_err(|e| ChannelError::Io(debug_message(&e)))?
        {
            Some(byte) => byte,
            None => return Ok(None),
        };

        if self.rx.push(byte).is_err() {
            // Unreachable while the buffer is drained at PACKET_SIZE.
            self.rx.clear();
        }
        self.last_byte_ms = now;

        if self.rx.len() < PACKET_SIZE {
            return Ok(None);
        }

        let mut bytes = [0u8; PACKET_SIZE];
        bytes.copy_from_slice(&self.rx);
        self.rx.clear();

        let packet = Packet::decode(&bytes);
        self.stats.received = self.stats.received.wrapping_add(1);
        log::trace!(
            "rx unit={} command={} data={}",
            packet.unit,
            packet.command,
            packet.data
        );
        Ok(Some(packet))
    }

    /// Discard every byte waiting on the line and any partial packet.
    ///
    /// Returns the number of bytes dropped.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::NotOpen` or `ChannelError::Io`.
    pub fn flush_input(&mut self) -> Result<usize> {
        let transport = self.transport.as_mut().ok_or(ChannelError::NotOpen)?;
        let mut dropped = self.rx.len();
        self.rx.clear();

        while dropped < FLUSH_LIMIT {
            match transport
                .read_byte()
                .map_err(|e| ChannelError::Io(debug_message(&e)))?
            {
                Some(_) => dropped += 1,
                None => break,
            }
        }

        if dropped > 0 {
            log::debug!("flushed {} byte(s) of stale input", dropped);
        }
        Ok(dropped)
    }

    /// Number of bytes in the partial packet.
    #[inline]
    pub fn pending_bytes(&self) -> usize {
        self.rx.len()
    }

    /// Traffic counters.
    #[inline]
    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    /// The clock this channel measures gaps with.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(feature = "std")]
impl<C: Clock> PacketChannel<super::transport::SerialTransport, C> {
    /// Open a serial device at 9600 8-N-1 and attach it.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::AlreadyOpen` if a transport is attached, or
    /// `ChannelError::Connect` if the device cannot be opened or configured.
    pub fn open_port(&mut self, path: &str) -> Result<()> {
        if self.is_open() {
            return Err(ChannelError::AlreadyOpen.into());
        }
        let transport = super::transport::SerialTransport::open(path).map_err(|e| {
            log::warn!("failed to open {}: {}", path, e);
            ChannelError::Connect(debug_message(&e))
        })?;
        log::info!("opened {} at {} baud", path, super::transport::BAUD_RATE);
        self.open(transport)
    }
}
