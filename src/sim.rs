//! Test doubles: a scripted clock, and a line that plays back a sensor
//! response in simulated time.

use core::convert::Infallible;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin, PinState};

use crate::clock::MicroClock;

/// Clock returning a fixed list of timestamps, one per call.
pub struct ScriptedClock {
    stamps: VecDeque<u64>,
}

impl ScriptedClock {
    pub fn new(stamps: &[u64]) -> Self {
        ScriptedClock {
            stamps: stamps.iter().copied().collect(),
        }
    }

    pub fn done(&self) {
        assert!(
            self.stamps.is_empty(),
            "{} scripted timestamps never read",
            self.stamps.len()
        );
    }
}

impl MicroClock for ScriptedClock {
    fn now_us(&mut self) -> u64 {
        self.stamps
            .pop_front()
            .expect("clock read more often than scripted")
    }
}

pub const PULL_UP_US: u64 = 30;
pub const BIT_LOW_US: u64 = 50;
pub const ZERO_HIGH_US: u64 = 26;
pub const ONE_HIGH_US: u64 = 70;

/// Appends the checksum byte to four data bytes.
pub fn frame_for(data: [u8; 4]) -> [u8; 5] {
    let sum = data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    [data[0], data[1], data[2], data[3], sum]
}

/// Builds the waveform a sensor drives after the host releases the line.
///
/// Each entry is a level and how long it is held, in microseconds. The line
/// floats high once the waveform ends.
pub fn response(ack_low_us: u64, ack_high_us: u64, frame: &[u8; 5]) -> Vec<(PinState, u64)> {
    let mut wave = vec![
        (PinState::High, PULL_UP_US),
        (PinState::Low, ack_low_us),
        (PinState::High, ack_high_us),
    ];
    for byte in frame {
        for i in (0..8).rev() {
            let high = if (byte >> i) & 1 == 1 {
                ONE_HIGH_US
            } else {
                ZERO_HIGH_US
            };
            wave.push((PinState::Low, BIT_LOW_US));
            wave.push((PinState::High, high));
        }
    }
    wave.push((PinState::Low, BIT_LOW_US));
    wave
}

struct Shared {
    now_ns: u64,
    read_cost_ns: u64,
    driven_low: bool,
    released_at_ns: Option<u64>,
    response: Vec<(PinState, u64)>,
}

impl Shared {
    fn level(&self) -> PinState {
        if self.driven_low {
            return PinState::Low;
        }
        let Some(start) = self.released_at_ns else {
            return PinState::High;
        };
        let mut elapsed = self.now_ns - start;
        for &(level, held_us) in &self.response {
            let held_ns = held_us * 1000;
            if elapsed < held_ns {
                return level;
            }
            elapsed -= held_ns;
        }
        PinState::High
    }
}

/// A data line with a pull-up and a sensor on the other end.
///
/// Clones share one simulated time base: every level read costs
/// `read_cost_ns`, delays advance time by their length, and the clock
/// reports the current simulated time. The sensor starts playing its
/// response when the host releases the line after driving it low.
#[derive(Clone)]
pub struct SimLine(Rc<RefCell<Shared>>);

impl SimLine {
    pub fn new(read_cost_ns: u64, response: Vec<(PinState, u64)>) -> Self {
        SimLine(Rc::new(RefCell::new(Shared {
            now_ns: 0,
            read_cost_ns,
            driven_low: false,
            released_at_ns: None,
            response,
        })))
    }

    /// A line where nobody ever answers.
    pub fn silent(read_cost_ns: u64) -> Self {
        Self::new(read_cost_ns, Vec::new())
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut shared = self.0.borrow_mut();
        let level = shared.level();
        shared.now_ns += shared.read_cost_ns;
        Ok(level == PinState::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.is_high()?)
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().driven_low = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut shared = self.0.borrow_mut();
        if shared.driven_low {
            shared.released_at_ns = Some(shared.now_ns);
        }
        shared.driven_low = false;
        Ok(())
    }
}

impl DelayNs for SimLine {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_ns += u64::from(ns);
    }
}

impl MicroClock for SimLine {
    fn now_us(&mut self) -> u64 {
        self.0.borrow().now_ns / 1000
    }
}
