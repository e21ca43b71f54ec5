//! Time sources.
//!
//! The resync gap and the reply deadline are measured against a [`Clock`];
//! waiting goes through `embedded_hal::delay::DelayNs`. With `std`, both are
//! backed by the operating system.

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[cfg(feature = "std")]
pub use host::{StdClock, StdDelay};

#[cfg(feature = "std")]
mod host {
    use std::time::{Duration, Instant};

    use embedded_hal::delay::DelayNs;

    use super::Clock;

    /// Clock backed by `std::time::Instant`.
    #[derive(Debug, Clone, Copy)]
    pub struct StdClock {
        origin: Instant,
    }

    impl StdClock {
        /// Create a clock whose origin is now.
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
            }
        }
    }

    impl Default for StdClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for StdClock {
        fn now_ms(&self) -> u64 {
            self.origin.elapsed().as_millis() as u64
        }
    }

    /// Delay provider sleeping the current thread.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StdDelay;

    impl DelayNs for StdDelay {
        fn delay_ns(&mut self, ns: u32) {
            std::thread::sleep(Duration::from_nanos(ns as u64));
        }

        fn delay_us(&mut self, us: u32) {
            std::thread::sleep(Duration::from_micros(us as u64));
        }

        fn delay_ms(&mut self, ms: u32) {
            std::thread::sleep(Duration::from_millis(ms as u64));
        }
    }

}
