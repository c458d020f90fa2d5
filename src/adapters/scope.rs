//! Debug-probe telemetry.
//!
//! The probe bytes are fixed, exported symbols so an attached debugger can
//! watch them without halting the core.  [`ProbeScope`] is the per-pass
//! telemetry step: it mirrors changes of the byte to the log.

use core::sync::atomic::{AtomicU8, Ordering};

use log::trace;

use crate::app::ports::TelemetryPort;

/// Latest converted temperature, two's-complement.
#[unsafe(export_name = "temperature_probe")]
pub static TEMPERATURE_PROBE: AtomicU8 = AtomicU8::new(0);

/// Current sampling-rate index: 0 = 500 ms, 1 = 1 s, 2 = 2 s, 3 = 4 s.
#[unsafe(export_name = "sampling_rate_probe")]
pub static SAMPLING_RATE_PROBE: AtomicU8 = AtomicU8::new(0);

pub struct ProbeScope<'a> {
    probe: &'a AtomicU8,
    last: Option<u8>,
}

impl<'a> ProbeScope<'a> {
    pub fn new(probe: &'a AtomicU8) -> Self {
        Self { probe, last: None }
    }

    /// Last value seen by [`TelemetryPort::communicate`].
    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

impl TelemetryPort for ProbeScope<'_> {
    fn communicate(&mut self) {
        let value = self.probe.load(Ordering::Relaxed);
        if self.last != Some(value) {
            trace!("probe: temperature_probe = {}", value as i8);
            self.last = Some(value);
        }
    }
}
