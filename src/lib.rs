//! Bit-banged DHT sensor driver for Embedded Rust
//!
//! This crate decodes the single-wire protocol of the DHT11/DHT22 family of
//! temperature and humidity sensors, built on top of the [`embedded-hal`]
//! traits. It needs no hardware timer or interrupt: every pulse width is
//! measured by busy-polling the data pin and reading a microsecond clock.
//!
//! # How it works
//! - At [`Dht::init`] the host times 10,000 level reads to learn how many
//!   polls fit in 100us. That count bounds every later wait.
//! - A read wakes the sensor, validates its acknowledge preamble, then
//!   classifies 40 bits by the width of their LOW and HIGH pulses.
//! - The four data bytes must sum to the fifth (checksum) byte.
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for the open-drain data line
//! - [`DelayNs`] for the wake signal
//!
//! Timestamps come from a [`MicroClock`].
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` for logging support
//! - `std`: Provides [`StdClock`](clock::StdClock)
//!
//! Diagnostics go through the `log` facade, gated by [`Verbosity`].
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod calibration;
pub mod clock;
pub mod dht;
pub mod error;
pub mod frame;
pub mod pulse;
pub mod reading;

#[cfg(test)]
mod sim;

pub use calibration::calibrate;
pub use clock::MicroClock;
pub use dht::{Dht, Verbosity};
pub use error::DhtError;
pub use pulse::Pulse;
pub use reading::{DecodedReading, Model, Reading};
