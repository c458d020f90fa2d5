//! System configuration parameters
//!
//! All tunable parameters for the sampler. Defaults match the reference
//! board; values can be overridden through NVS.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Sampling timer input clock. 1024 Hz makes 500 ms a compare value of 512.
pub const DEFAULT_TIMER_CLOCK_HZ: u32 = 1024;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    // --- Sensor ---
    /// 7-bit I2C address of the temperature sensor
    pub sensor_address: u8,
    /// Register selected before each 2-byte read
    pub sensor_register: u8,
    /// I2C bus clock (Hz)
    pub i2c_baudrate_hz: u32,

    // --- Timing ---
    /// Sampling timer input clock (Hz)
    pub timer_clock_hz: u32,

    // --- Output ---
    /// UART baud rate for status lines
    pub uart_baudrate: u32,
    /// Send the start-up banner before the first sample (off by default)
    pub announce_start: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            // Sensor
            sensor_address: 0x4F,
            sensor_register: 0x00,
            i2c_baudrate_hz: 100_000,

            // Timing
            timer_clock_hz: DEFAULT_TIMER_CLOCK_HZ,

            // Output
            uart_baudrate: 115_200,
            announce_start: false,
        }
    }
}

impl SamplerConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sensor_address > 0x7F {
            return Err(Error::Config("sensor_address must be a 7-bit address"));
        }
        if !(10_000..=1_000_000).contains(&self.i2c_baudrate_hz) {
            return Err(Error::Config("i2c_baudrate_hz must be 10 kHz–1 MHz"));
        }
        // Slowest period (4 s) must still produce a non-zero compare value,
        // fastest must be at least one tick.
        if !(2..=1_000_000).contains(&self.timer_clock_hz) {
            return Err(Error::Config("timer_clock_hz must be 2 Hz–1 MHz"));
        }
        if !(1_200..=921_600).contains(&self.uart_baudrate) {
            return Err(Error::Config("uart_baudrate must be 1200–921600"));
        }
        Ok(())
    }
}
