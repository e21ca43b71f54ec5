//! Six-byte packet codec.
//!
//! Layout on the wire: `[unit][command][data LSB .. data MSB]`, with data a
//! signed 32-bit little-endian integer.

use super::command::Command;

/// Number of bytes in every packet.
pub const PACKET_SIZE: usize = 6;

/// Unit id addressing every device on the chain.
pub const BROADCAST_UNIT: u8 = 0;

/// One framed packet of the motion-control protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// Addressed (or replying) unit id.
    pub unit: u8,
    /// Command id.
    pub command: u8,
    /// Command payload.
    pub data: i32,
}

impl Packet {
    /// Create a packet from raw fields.
    #[inline]
    pub const fn new(unit: u8, command: u8, data: i32) -> Self {
        Self {
            unit,
            command,
            data,
        }
    }

    /// Create a packet for a known command.
    #[inline]
    pub const fn command(unit: u8, command: Command, data: i32) -> Self {
        Self::new(unit, command.id(), data)
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> [u8; PACKET_SIZE] {
        let d = self.data.to_le_bytes();
        [self.unit, self.command, d[0], d[1], d[2], d[3]]
    }

    /// Deserialize from wire bytes.
    pub fn decode(bytes: &[u8; PACKET_SIZE]) -> Self {
        Self {
            unit: bytes[0],
            command: bytes[1],
            data: i32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        }
    }

    /// Check whether this packet is the reply `(unit, command)` is waiting for.
    #[inline]
    pub fn matches(&self, unit: u8, command: u8) -> bool {
        self.unit == unit && self.command == command
    }

    /// Whether the packet is addressed to every unit.
    #[inline]
    pub fn is_broadcast(&self) -> bool {
        self.unit == BROADCAST_UNIT
    }
}
