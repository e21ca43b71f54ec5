//! Byte transport seam.
//!
//! The channel only needs two things from the line: take one byte if one is
//! waiting, and write a whole packet. With `std`, [`SerialTransport`] provides
//! both on top of the `serialport` crate.

use core::fmt::Debug;

/// Non-blocking byte transport shared by every unit on the chain.
pub trait Transport {
    /// Transport error type.
    type Error: Debug;

    /// Take one byte if one is available. Must not block.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Write all bytes as one unit.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_byte()
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(bytes)
    }
}

#[cfg(feature = "std")]
pub use serial::{SerialTransport, BAUD_RATE};

#[cfg(feature = "std")]
mod serial {
    use std::io::{self, Read, Write};
    use std::time::Duration;

    use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

    use super::Transport;

    /// Fixed line speed of the stage controllers.
    pub const BAUD_RATE: u32 = 9600;

    /// Serial port configured 9600 8-N-1 without flow control.
    pub struct SerialTransport {
        port: Box<dyn SerialPort>,
    }

    impl SerialTransport {
        /// Open and configure a serial device.
        ///
        /// # Errors
        ///
        /// Returns the `serialport` error if the device cannot be opened or
        /// the line settings are rejected.
        pub fn open(path: &str) -> Result<Self, serialport::Error> {
            let port = serialport::new(path, BAUD_RATE)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(Duration::from_millis(10))
                .open()?;
            Ok(Self { port })
        }

        /// Device name, if the platform reports one.
        pub fn name(&self) -> Option<String> {
            self.port.name()
        }
    }

    impl Transport for SerialTransport {
        type Error = io::Error;

        fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
            if self.port.bytes_to_read()? == 0 {
                return Ok(None);
            }
            let mut byte = [0u8; 1];
            match self.port.read(&mut byte) {
                Ok(1) => Ok(Some(byte[0])),
                Ok(_) => Ok(None),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
                Err(e) => Err(e),
            }
        }

        fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            self.port.write_all(bytes)?;
            self.port.flush()
        }
    }
}
