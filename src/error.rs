use embedded_hal::digital::PinState;

/// Possible errors from the DHT driver.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DhtError<E> {
    /// Calibration measured no elapsed time, or the host polls too slowly
    /// to fit a single read in 100us.
    #[error("calibration could not derive a polling bound")]
    CalibrationDegenerate,
    /// The sensor never pulled the line low after the wake signal, or a
    /// preamble pulse did not end within the calibrated bound.
    #[error("timed out waiting for the sensor to respond")]
    HandshakeTimeout,
    /// The preamble completed but had the wrong shape.
    #[error("bad handshake response ({width_us}us preamble, line {level:?})")]
    HandshakeRejected {
        /// Width of the second preamble pulse.
        width_us: u64,
        /// Line level after the preamble.
        level: PinState,
    },
    /// Checksum did not match the received data.
    #[error("checksum mismatch (expected {expected:#04x}, calculated {calculated:#04x})")]
    ChecksumMismatch {
        /// Checksum byte sent by the sensor.
        expected: u8,
        /// Sum of the four data bytes.
        calculated: u8,
    },
    /// Error from the GPIO pin (input/output).
    #[error("GPIO pin error: {0:?}")]
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}
