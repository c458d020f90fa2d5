//! Sample indicator LED.
//!
//! Any `embedded-hal` stateful output pin; toggled once per published
//! sample.  A failed toggle is logged and otherwise ignored.

use embedded_hal::digital::StatefulOutputPin;
use log::warn;

use crate::app::ports::IndicatorPort;

pub struct PinIndicator<P> {
    pin: P,
    toggles: u32,
}

impl<P: StatefulOutputPin> PinIndicator<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, toggles: 0 }
    }

    /// Toggles issued since start-up (wraps).
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

impl<P: StatefulOutputPin> IndicatorPort for PinIndicator<P> {
    fn toggle(&mut self) {
        match self.pin.toggle() {
            Ok(()) => self.toggles = self.toggles.wrapping_add(1),
            Err(e) => warn!("indicator: toggle failed: {:?}", e),
        }
    }
}
