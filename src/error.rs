//! Error types for stepper-scan.
//!
//! Provides unified error handling across configuration, the packet channel,
//! motion control and scan execution.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-scan operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Serial channel error
    Channel(ChannelError),
    /// Motion controller error
    Motion(MotionError),
    /// Scan execution error
    Scan(ScanError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Unit id is the broadcast id or shared by both axes
    InvalidUnitId(u8),
    /// Axis range must be > 0 microsteps
    InvalidRange(i32),
    /// Microsteps per cm must be > 0
    InvalidMicrostepsPerCm(f64),
    /// Full-traverse time must be > 0 ms
    InvalidTraverseTime(f64),
    /// Each axis needs at least two grid steps
    InvalidStepCount {
        /// Axis name ("x" or "y")
        axis: &'static str,
        /// Configured step count
        steps: u16,
    },
    /// Grid extent is empty or inverted (origin must be < max)
    InvalidExtent {
        /// Axis name ("x" or "y")
        axis: &'static str,
        /// Origin in cm
        origin: f64,
        /// Max in cm
        max: f64,
    },
    /// Grid leaves the physical travel of an axis
    OutOfTravel {
        /// Axis name ("x" or "y")
        axis: &'static str,
        /// Offending coordinate in microsteps
        value: i32,
        /// Axis range in microsteps
        range: i32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Serial channel errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelError {
    /// A transport is already attached to this channel
    AlreadyOpen,
    /// No transport is attached
    NotOpen,
    /// Opening or configuring the line failed
    Connect(heapless::String<128>),
    /// Transport read or write failed
    Io(heapless::String<128>),
}

/// Motion controller errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// No matching reply arrived within the bounded poll
    ReplyTimeout {
        /// Unit that was queried
        unit: u8,
        /// Command id of the expected reply
        command: u8,
        /// Number of queries sent
        attempts: u8,
    },
    /// Position after the computed wait differs from the commanded target
    MotionMismatch {
        /// Unit that was verified
        unit: u8,
        /// Commanded target in microsteps
        target: i32,
        /// Reported position in microsteps
        actual: i32,
        /// Accepted deviation in microsteps
        tolerance: u32,
    },
}

/// Scan execution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Grid has no points
    EmptyGrid,
    /// A grid coordinate is outside (0, range) of its axis
    BoundsViolation {
        /// Index of the grid point
        index: usize,
        /// Axis name ("x" or "y")
        axis: &'static str,
        /// Offending coordinate in microsteps
        value: i32,
        /// Axis range in microsteps
        range: i32,
    },
    /// The output sink rejected a record
    Sink(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Channel(e) => write!(f, "Channel error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Scan(e) => write!(f, "Scan error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidUnitId(id) => {
                write!(f, "Invalid unit id {}. Must be 1-255 and unique per chain", id)
            }
            ConfigError::InvalidRange(v) => write!(f, "Invalid axis range: {}. Must be > 0", v),
            ConfigError::InvalidMicrostepsPerCm(v) => {
                write!(f, "Invalid microsteps per cm: {}. Must be > 0", v)
            }
            ConfigError::InvalidTraverseTime(v) => {
                write!(f, "Invalid full-traverse time: {} ms. Must be > 0", v)
            }
            ConfigError::InvalidStepCount { axis, steps } => {
                write!(f, "Axis {} has {} steps. Must have more than 1", axis, steps)
            }
            ConfigError::InvalidExtent { axis, origin, max } => {
                write!(f, "Axis {} extent invalid: origin ({}) must be < max ({})", axis, origin, max)
            }
            ConfigError::OutOfTravel { axis, value, range } => {
                write!(f, "Axis {} coordinate {} outside travel (0, {})", axis, value, range)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::AlreadyOpen => write!(f, "Channel already open"),
            ChannelError::NotOpen => write!(f, "Channel not open"),
            ChannelError::Connect(msg) => write!(f, "Connection failed: {}", msg),
            ChannelError::Io(msg) => write!(f, "Transport I/O failed: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::ReplyTimeout { unit, command, attempts } => write!(
                f,
                "No reply to command {} from unit {} after {} attempts",
                command, unit, attempts
            ),
            MotionError::MotionMismatch { unit, target, actual, tolerance } => write!(
                f,
                "Unit {} at {} after move to {} (tolerance {})",
                unit, actual, target, tolerance
            ),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::EmptyGrid => write!(f, "Scan grid is empty"),
            ScanError::BoundsViolation { index, axis, value, range } => write!(
                f,
                "Grid point {} takes axis {} to {}, outside (0, {})",
                index, axis, value, range
            ),
            ScanError::Sink(msg) => write!(f, "Sink rejected record: {}", msg),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Error::Channel(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<ScanError> for Error {
    fn from(e: ScanError) -> Self {
        Error::Scan(e)
    }
}

/// Writer that keeps whole characters until the buffer is full.
struct Truncating<'a>(&'a mut heapless::String<128>);

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format a `Debug` value into a bounded message, truncating on overflow.
pub(crate) fn debug_message<E: fmt::Debug>(e: &E) -> heapless::String<128> {
    use core::fmt::Write;
    let mut buf = heapless::String::<128>::new();
    let _ = write!(Truncating(&mut buf), "{:?}", e);
    buf
}

/// Copy a message into a bounded string, truncating at a char boundary.
pub(crate) fn bounded_message(msg: &str) -> heapless::String<128> {
    use core::fmt::Write;
    let mut buf = heapless::String::<128>::new();
    let _ = Truncating(&mut buf).write_str(msg);
    buf
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for ScanError {}
