//! Sensor bus over any `embedded-hal` I2C controller.
//!
//! The HAL call is blocking, so a request runs the whole write-read and
//! reports the outcome through the [`BusNotifier`] before returning.  From
//! the dispatcher's side this is indistinguishable from an interrupt-driven
//! controller whose completion fires immediately.

use embedded_hal::i2c::{Error as _, I2c};

use crate::app::ports::SensorBusPort;
use crate::error::{BusError, Result};
use crate::events::BusNotifier;
use crate::sensors::temperature::{RawReading, READING_LEN};

pub struct I2cSensorBus<'a, I> {
    i2c: I,
    rx: RawReading,
    done: BusNotifier<'a>,
}

impl<'a, I: I2c> I2cSensorBus<'a, I> {
    pub fn new(i2c: I, done: BusNotifier<'a>) -> Self {
        Self {
            i2c,
            rx: [0; READING_LEN],
            done,
        }
    }

    /// Give back the HAL driver (tests, re-initialisation).
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> SensorBusPort for I2cSensorBus<'_, I> {
    fn request_write_read(&mut self, address: u8, write: &[u8], read_len: usize) -> Result<()> {
        let len = read_len.min(READING_LEN);
        let result = self
            .i2c
            .write_read(address, write, &mut self.rx[..len])
            .map_err(|e| BusError::from(e.kind()));
        self.done.on_complete(result);
        Ok(())
    }

    fn take_reading(&mut self) -> RawReading {
        self.rx
    }
}
