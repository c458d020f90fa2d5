//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART0 / USB-CDC in production).  Status lines for
//! the host go out on their own UART; this is the developer console.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { rate, compare } => {
                info!("START | period={} compare={}", rate.label(), compare);
            }
            AppEvent::Sample { celsius } => {
                debug!("SAMPLE | T={}\u{00b0}C", celsius);
            }
            AppEvent::RateChanged { from, to, compare } => {
                info!("RATE | {} -> {} | compare={}", from.label(), to.label(), compare);
            }
            AppEvent::Transmitted { len } => {
                debug!("TX | {} bytes", len);
            }
            AppEvent::LineSuperseded { len } => {
                debug!("TX | dropped unsent line ({} bytes)", len);
            }
            AppEvent::RequestRejected(err) => {
                warn!("SKIP | {}", err);
            }
        }
    }
}
