use embedded_hal::digital::{InputPin, PinState};

use crate::clock::MicroClock;

/// Width reported for a pulse that outlasted the polling bound.
pub const TIMEOUT_WIDTH_US: u64 = 100;

/// Outcome of waiting for the line to change level.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pulse {
    /// The level changed after this many microseconds.
    Measured(u64),
    /// The level held for `max_counter` polls.
    TimedOut,
}

impl Pulse {
    /// Width in microseconds; a timeout counts as [`TIMEOUT_WIDTH_US`].
    pub fn width_us(self) -> u64 {
        match self {
            Pulse::Measured(width) => width,
            Pulse::TimedOut => TIMEOUT_WIDTH_US,
        }
    }

    /// Whether the wait hit the polling bound.
    pub fn is_timeout(self) -> bool {
        self == Pulse::TimedOut
    }
}

/// Where the previous measurement left the line: the level in effect and
/// the time it was first observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineState {
    /// Level in effect since `timestamp_us`.
    pub level: PinState,
    /// When `level` was first observed, in clock microseconds.
    pub timestamp_us: u64,
}

impl LineState {
    /// Baseline at `level`, first seen at `timestamp_us`.
    pub fn new(level: PinState, timestamp_us: u64) -> Self {
        LineState {
            level,
            timestamp_us,
        }
    }
}

impl Default for LineState {
    fn default() -> Self {
        Self::new(PinState::Low, 0)
    }
}

/// Busy-polls `pin` until its level differs from `line.level`.
///
/// On a change the width since `line.timestamp_us` is returned and `line`
/// moves to the new level. After `max_counter` polls at the old level the
/// wait is abandoned with [`Pulse::TimedOut`] and `line` is left untouched.
pub fn measure_pulse<PIN, CLOCK>(
    pin: &mut PIN,
    clock: &mut CLOCK,
    line: &mut LineState,
    max_counter: u32,
) -> Result<Pulse, PIN::Error>
where
    PIN: InputPin,
    CLOCK: MicroClock,
{
    let mut count: u32 = 0;
    loop {
        let level = PinState::from(pin.is_high()?);
        if level != line.level {
            let timestamp = clock.now_us();
            let width = timestamp.saturating_sub(line.timestamp_us);
            *line = LineState::new(level, timestamp);
            return Ok(Pulse::Measured(width));
        }

        count += 1;
        if count >= max_counter {
            return Ok(Pulse::TimedOut);
        }
    }
}
