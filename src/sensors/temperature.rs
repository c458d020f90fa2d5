//! Digital temperature sensor on the I2C bus (LM75-style register map).
//!
//! The temperature register is two bytes, big-endian, two's complement,
//! with the reading left-aligned in the upper bits.  One read cycle is a
//! register-select write followed by a 2-byte read.
//!
//! ## Conversion
//!
//! The register word is shifted right by 7 (arithmetic) which leaves
//! half-degree units, then halved with truncation toward zero.  Readings
//! below zero go through the same arithmetic: e.g. -0.5 °C reads as 0,
//! -25 °C as -25.  The result fits an `i8` for every possible word.

use crate::app::ports::SensorBusPort;
use crate::error::Result;

/// Bytes in one temperature register read.
pub const READING_LEN: usize = 2;

/// Raw register contents, most significant byte first.
pub type RawReading = [u8; READING_LEN];

/// Convert a raw register reading into whole degrees Celsius.
pub fn to_celsius(raw: RawReading) -> i8 {
    let word = i16::from_be_bytes(raw);
    // >> on i16 is arithmetic; `/` truncates toward zero.
    ((word >> 7) / 2) as i8
}

/// Address and register of one sensor on the bus.
#[derive(Debug, Clone, Copy)]
pub struct TemperatureSensor {
    address: u8,
    register: u8,
}

impl TemperatureSensor {
    pub fn new(address: u8, register: u8) -> Self {
        Self { address, register }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Fire-and-forget read request; completion arrives via the bus notifier.
    pub fn request(&self, bus: &mut impl SensorBusPort) -> Result<()> {
        bus.request_write_read(self.address, &[self.register], READING_LEN)
    }

    /// Convert whatever the last completed transaction left in the bus buffer.
    pub fn collect(&self, bus: &mut impl SensorBusPort) -> i8 {
        to_celsius(bus.take_reading())
    }
}
