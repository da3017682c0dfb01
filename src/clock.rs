//! Microsecond timestamp source used to turn level changes into pulse widths.

/// A monotonic clock with microsecond resolution.
///
/// Only differences between two readings are used, so the origin is
/// arbitrary (boot, timer start, process start).
pub trait MicroClock {
    /// Current time in microseconds since the clock's origin.
    fn now_us(&mut self) -> u64;
}

impl<C: MicroClock + ?Sized> MicroClock for &mut C {
    fn now_us(&mut self) -> u64 {
        (**self).now_us()
    }
}

/// Clock backed by [`std::time::Instant`], for Linux GPIO hosts.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Creates a clock whose origin is the moment of construction.
    pub fn new() -> Self {
        StdClock {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MicroClock for StdClock {
    fn now_us(&mut self) -> u64 {
        // u64 microseconds wraps after ~584k years
        self.origin.elapsed().as_micros() as u64
    }
}
