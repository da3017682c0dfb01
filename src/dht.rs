use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
};
use log::{debug, trace, warn};

use crate::calibration::calibrate;
use crate::clock::MicroClock;
use crate::error::DhtError;
use crate::frame::{FRAME_BITS, RawFrame, classify_bit};
use crate::pulse::{self, LineState, Pulse};
use crate::reading::{DecodedReading, Model, Reading};

/// How long the line is held high before the wake signal, in milliseconds.
pub const WAKE_HIGH_MS: u32 = 500;

/// Length of the wake signal (line driven low), in milliseconds.
pub const WAKE_LOW_MS: u32 = 20;

/// Maximum number of 1us polls to wait for the sensor to pull the line low
/// after the wake signal.
pub const RESPONSE_TIMEOUT_US: u32 = 1000;

/// Minimum width of the sensor's acknowledge HIGH pulse.
pub const ACK_MIN_WIDTH_US: u64 = 70;

/// How much diagnostic output the driver emits through `log`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Nothing is logged.
    #[default]
    Silent,
    /// Phase transitions and failures.
    Phase,
    /// Additionally every pulse width and the raw frame.
    Bit,
}

impl From<u8> for Verbosity {
    /// Maps the numeric levels 0, 1 and 2; anything higher is `Bit`.
    fn from(level: u8) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Phase,
            _ => Verbosity::Bit,
        }
    }
}

/// Driver for a DHT-family sensor on a single open-drain data pin.
///
/// Every wait is a busy-poll on the pin; the polling bound comes from a
/// one-off calibration of how many level reads fit in 100us on this host.
/// A read needs exclusive access to the handle for its whole duration.
pub struct Dht<PIN, D, C> {
    pin: PIN,
    delay: D,
    clock: C,
    max_counter: u32,
    line: LineState,
    verbosity: Verbosity,
}

impl<PIN, DELAY, CLOCK, E> Dht<PIN, DELAY, CLOCK>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
    CLOCK: MicroClock,
{
    /// Creates a driver and calibrates the polling bound.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the data line. Must support both input and output.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `clock` - A microsecond timestamp source.
    ///
    /// # Errors
    ///
    /// `DhtError::CalibrationDegenerate` if no usable bound could be derived.
    pub fn init(mut pin: PIN, delay: DELAY, mut clock: CLOCK) -> Result<Self, DhtError<E>> {
        let max_counter = calibrate(&mut pin, &mut clock)?;
        Self::with_max_counter(pin, delay, clock, max_counter)
    }

    /// Creates a driver with a polling bound from an earlier calibration.
    pub fn with_max_counter(
        pin: PIN,
        delay: DELAY,
        clock: CLOCK,
        max_counter: u32,
    ) -> Result<Self, DhtError<E>> {
        if max_counter == 0 {
            return Err(DhtError::CalibrationDegenerate);
        }
        Ok(Dht {
            pin,
            delay,
            clock,
            max_counter,
            line: LineState::default(),
            verbosity: Verbosity::Silent,
        })
    }

    /// Level reads per 100us, as calibrated.
    pub fn max_counter(&self) -> u32 {
        self.max_counter
    }

    /// Current diagnostic level.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Sets how much the driver logs.
    pub fn set_log_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Gives back the pin, delay and clock.
    pub fn release(self) -> (PIN, DELAY, CLOCK) {
        (self.pin, self.delay, self.clock)
    }

    /// Performs one complete reading: handshake, then the 40-bit frame.
    ///
    /// There are no internal retries. After a failure, wait at least a
    /// second before reading again.
    ///
    /// # Returns
    ///
    /// * `Ok(DecodedReading)` if the handshake succeeded and the checksum is valid.
    /// * `Err(DhtError)` otherwise; no frame is sampled after a failed handshake.
    pub fn read(&mut self) -> Result<DecodedReading, DhtError<E>> {
        self.begin_session()?;
        self.decode()
    }

    /// Reads and converts the payload for the given sensor model.
    pub fn read_as(&mut self, model: Model) -> Result<Reading, DhtError<E>> {
        self.read().map(|reading| reading.to_reading(model))
    }

    /// Wakes the sensor and checks its acknowledge preamble.
    ///
    /// The line is held high, pulled low for the wake signal, then released.
    /// Once the sensor pulls it low, that edge becomes the timing baseline
    /// and the acknowledge LOW and HIGH pulses are consumed. The HIGH pulse
    /// must last at least [`ACK_MIN_WIDTH_US`] and leave the line low.
    ///
    /// On `Ok(())` the handle is positioned at the start of the first data bit.
    pub fn begin_session(&mut self) -> Result<(), DhtError<E>> {
        if self.logs(Verbosity::Phase) {
            debug!("initiating read");
        }
        self.pin.set_high()?;
        self.delay.delay_ms(WAKE_HIGH_MS);
        self.pin.set_low()?;
        self.delay.delay_ms(WAKE_LOW_MS);

        // Release the line to the sensor
        self.pin.set_high()?;

        if self.logs(Verbosity::Phase) {
            debug!("waiting for response");
        }
        self.wait_for_response()?;
        self.line = LineState::new(PinState::Low, self.clock.now_us());
        if self.logs(Verbosity::Phase) {
            debug!("response received");
        }

        let mut width_us = 0;
        for _ in 0..2 {
            let pulse = self.next_pulse()?;
            if self.logs(Verbosity::Bit) {
                trace!("dropping preamble pulse {:?}, line now {:?}", pulse, self.line.level);
            }
            match pulse {
                Pulse::Measured(width) => width_us = width,
                Pulse::TimedOut => return Err(DhtError::HandshakeTimeout),
            }
        }

        if width_us < ACK_MIN_WIDTH_US || self.line.level != PinState::Low {
            if self.logs(Verbosity::Phase) {
                warn!("bad response: {}us preamble, line {:?}", width_us, self.line.level);
            }
            return Err(DhtError::HandshakeRejected {
                width_us,
                level: self.line.level,
            });
        }

        if self.logs(Verbosity::Phase) {
            debug!("ready to receive data");
        }
        Ok(())
    }

    /// Samples the 40-bit frame and validates its checksum.
    ///
    /// Must directly follow a successful [`begin_session`](Self::begin_session).
    /// Each bit is a LOW pulse followed by a HIGH pulse; see
    /// [`classify_bit`] for how the widths map to a bit.
    pub fn decode(&mut self) -> Result<DecodedReading, DhtError<E>> {
        if self.logs(Verbosity::Phase) {
            debug!("reading {} bits", FRAME_BITS);
        }

        let mut frame = RawFrame::new();
        for i in 0..FRAME_BITS {
            let low = self.next_pulse()?;
            let high = self.next_pulse()?;

            let bit = match classify_bit(low.width_us(), high.width_us()) {
                Some(bit) => bit,
                None => {
                    if self.logs(Verbosity::Bit) {
                        trace!("bad response (LOW) {:?}", low);
                    }
                    false
                }
            };
            frame.push_bit(i, bit);

            if self.logs(Verbosity::Bit) {
                trace!("#{:02}: {:?} {:?}", i, low, high);
            }
        }

        if self.logs(Verbosity::Bit) {
            let [b0, b1, b2, b3, b4] = *frame.bytes();
            trace!("{:02x} {:02x} {:02x} {:02x} {:02x}", b0, b1, b2, b3, b4);
        }

        if !frame.is_valid() {
            if self.logs(Verbosity::Phase) {
                warn!("checksum failed");
            }
            return Err(DhtError::ChecksumMismatch {
                expected: frame.checksum(),
                calculated: frame.calculated_checksum(),
            });
        }

        if self.logs(Verbosity::Phase) {
            debug!("read succeeded");
        }
        Ok(DecodedReading::new(frame.payload()))
    }

    /// Waits for the line to change level, starting from the current baseline.
    fn next_pulse(&mut self) -> Result<Pulse, DhtError<E>> {
        let pulse = pulse::measure_pulse(
            &mut self.pin,
            &mut self.clock,
            &mut self.line,
            self.max_counter,
        )?;
        if pulse.is_timeout() && self.logs(Verbosity::Phase) {
            warn!(">100us, timed out");
        }
        Ok(pulse)
    }

    /// Polls in 1us steps until the sensor pulls the released line low.
    fn wait_for_response(&mut self) -> Result<(), DhtError<E>> {
        for _ in 0..RESPONSE_TIMEOUT_US {
            if self.pin.is_low()? {
                return Ok(());
            }
            self.delay.delay_us(1);
        }
        if self.logs(Verbosity::Phase) {
            warn!("sensor never responded");
        }
        Err(DhtError::HandshakeTimeout)
    }

    fn logs(&self, tier: Verbosity) -> bool {
        self.verbosity >= tier
    }
}
