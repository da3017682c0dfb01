use embedded_hal::digital::{InputPin, OutputPin};

use crate::clock::MicroClock;
use crate::error::DhtError;

/// Number of level reads timed during calibration.
pub const CALIBRATION_READS: u32 = 10_000;

/// Wall-clock span the calibrated counter stands for, in microseconds.
pub const CALIBRATION_WINDOW_US: u64 = 100;

/// Measures how many level reads this host completes in 100us.
///
/// The pin is released (open-drain high) and read [`CALIBRATION_READS`]
/// times back to back. The result bounds every later busy-poll, so the
/// polling timeout tracks the host's speed instead of a fixed loop count.
///
/// # Errors
///
/// Returns `DhtError::CalibrationDegenerate` if the clock saw no time pass
/// or if a single read takes longer than 100us.
pub fn calibrate<PIN, CLOCK, E>(pin: &mut PIN, clock: &mut CLOCK) -> Result<u32, DhtError<E>>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    CLOCK: MicroClock,
{
    pin.set_high()?;

    let before = clock.now_us();
    for _ in 0..CALIBRATION_READS {
        // only the cost of the read matters
        let _ = pin.is_high()?;
    }
    let after = clock.now_us();

    let elapsed = after.saturating_sub(before);
    if elapsed == 0 {
        return Err(DhtError::CalibrationDegenerate);
    }

    let max_counter = u64::from(CALIBRATION_READS) * CALIBRATION_WINDOW_US / elapsed;
    match u32::try_from(max_counter) {
        Ok(0) | Err(_) => Err(DhtError::CalibrationDegenerate),
        Ok(max_counter) => Ok(max_counter),
    }
}
