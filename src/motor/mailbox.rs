//! Per-(unit, command) reply slots.
//!
//! Replies share one line and carry no request id, so a reply polled while
//! waiting for a different unit is parked here instead of being dropped.

use heapless::FnvIndexMap;

use crate::protocol::Packet;

/// Number of distinct (unit, command) slots.
pub const MAILBOX_CAPACITY: usize = 16;

/// Latest unclaimed reply per (unit, command).
#[derive(Debug, Default)]
pub struct Mailbox {
    slots: FnvIndexMap<(u8, u8), i32, MAILBOX_CAPACITY>,
}

impl Mailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self {
            slots: FnvIndexMap::new(),
        }
    }

    /// Park a packet. A newer reply replaces an older one for the same slot.
    ///
    /// Returns `false` if the mailbox is full and the packet was dropped.
    pub fn deliver(&mut self, packet: Packet) -> bool {
        let key = (packet.unit, packet.command);
        if let Some(slot) = self.slots.get_mut(&key) {
            *slot = packet.data;
            return true;
        }
        match self.slots.insert(key, packet.data) {
            Ok(_) => true,
            Err(_) => {
                log::warn!(
                    "mailbox full, dropping unit={} command={}",
                    packet.unit,
                    packet.command
                );
                false
            }
        }
    }

    /// Claim the reply for a slot.
    pub fn take(&mut self, unit: u8, command: u8) -> Option<i32> {
        self.slots.remove(&(unit, command))
    }

    /// Whether a reply is waiting for a slot.
    pub fn contains(&self, unit: u8, command: u8) -> bool {
        self.slots.contains_key(&(unit, command))
    }

    /// Drop every parked reply.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of parked replies.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
