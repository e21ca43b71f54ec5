//! Command ids understood by the stage controllers.

/// Data value sent with queries whose payload is ignored by the firmware.
pub const QUERY_SENTINEL: i32 = 64;

/// Commands used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Assign sequential unit ids along the chain (broadcast, data ignored).
    Renumber = 2,
    /// Move to an absolute position (data = target microsteps).
    MoveAbsolute = 20,
    /// Report current position (query data = sentinel, reply data = microsteps).
    ReturnPosition = 60,
}

impl Command {
    /// Wire id of the command.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look up a command by wire id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            2 => Some(Command::Renumber),
            20 => Some(Command::MoveAbsolute),
            60 => Some(Command::ReturnPosition),
            _ => None,
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command.id()
    }
}
