//! Hardware adapter: bridges real peripherals to the port traits.
//!
//! Owns the sensor bus, the indicator, the sampling timer, the UART
//! transmitter and the probe telemetry step, exposing all of them as one
//! [`SamplerHardware`](crate::app::ports::SamplerHardware).  On non-espidf
//! targets the timer and UART drivers are cfg-gated simulations.

use embedded_hal::digital::StatefulOutputPin;
use embedded_hal::i2c::I2c;

use crate::adapters::scope::ProbeScope;
use crate::app::ports::{IndicatorPort, SensorBusPort, TelemetryPort, TimerPort, TransferPort};
use crate::drivers::hw_timer::SampleTimer;
use crate::drivers::i2c_bus::I2cSensorBus;
use crate::drivers::indicator::PinIndicator;
use crate::drivers::uart_tx::UartTx;
use crate::error::Result;
use crate::sensors::temperature::RawReading;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<'a, I, P> {
    bus: I2cSensorBus<'a, I>,
    indicator: PinIndicator<P>,
    timer: SampleTimer<'a>,
    uart: UartTx<'a>,
    scope: ProbeScope<'a>,
}

impl<'a, I: I2c, P: StatefulOutputPin> HardwareAdapter<'a, I, P> {
    pub fn new(
        bus: I2cSensorBus<'a, I>,
        indicator: PinIndicator<P>,
        timer: SampleTimer<'a>,
        uart: UartTx<'a>,
        scope: ProbeScope<'a>,
    ) -> Self {
        Self {
            bus,
            indicator,
            timer,
            uart,
            scope,
        }
    }

    pub fn timer(&self) -> &SampleTimer<'a> {
        &self.timer
    }

    pub fn uart(&self) -> &UartTx<'a> {
        &self.uart
    }

    pub fn indicator(&self) -> &PinIndicator<P> {
        &self.indicator
    }
}

// ── SensorBusPort ─────────────────────────────────────────────

impl<I: I2c, P> SensorBusPort for HardwareAdapter<'_, I, P> {
    fn request_write_read(&mut self, address: u8, write: &[u8], read_len: usize) -> Result<()> {
        self.bus.request_write_read(address, write, read_len)
    }

    fn take_reading(&mut self) -> RawReading {
        self.bus.take_reading()
    }
}

// ── TimerPort ─────────────────────────────────────────────────

impl<I, P> TimerPort for HardwareAdapter<'_, I, P> {
    fn set_compare(&mut self, value: u32) {
        self.timer.set_compare(value);
    }

    fn start(&mut self) {
        self.timer.start();
    }
}

// ── TransferPort ──────────────────────────────────────────────

impl<I, P> TransferPort for HardwareAdapter<'_, I, P> {
    fn transfer(&mut self, bytes: &[u8]) -> Result<()> {
        self.uart.transfer(bytes)
    }
}

// ── TelemetryPort ─────────────────────────────────────────────

impl<I, P> TelemetryPort for HardwareAdapter<'_, I, P> {
    fn communicate(&mut self) {
        self.scope.communicate();
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl<I, P: StatefulOutputPin> IndicatorPort for HardwareAdapter<'_, I, P> {
    fn toggle(&mut self) {
        self.indicator.toggle();
    }
}
