//! Protocol module for stepper-scan.
//!
//! Provides the six-byte packet codec, the command ids, and the polled packet
//! channel that frames replies from every unit sharing the serial line.

mod channel;
mod command;
mod packet;
pub mod time;
mod transport;

pub use channel::{ChannelStats, PacketChannel, RESYNC_GAP_MS};
pub use command::{Command, QUERY_SENTINEL};
pub use packet::{Packet, BROADCAST_UNIT, PACKET_SIZE};
pub use time::Clock;
pub use transport::Transport;

#[cfg(feature = "std")]
pub use time::{StdClock, StdDelay};
#[cfg(feature = "std")]
pub use transport::{SerialTransport, BAUD_RATE};
