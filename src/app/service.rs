//! Dispatch loop: the single control thread of the firmware.
//!
//! [`Dispatcher`] polls the event flags and turns each raised flag into
//! exactly one action: start a sensor read, publish a completed read (or
//! advance the sampling period instead), and hand the resulting status
//! line to the UART.  Nothing inside a pass waits on hardware; every bus,
//! timer and transfer operation is a request whose completion shows up
//! as a flag on a later pass.
//!
//! ```text
//!  EventFlags ──▶ ┌──────────────────────────┐ ──▶ SensorBusPort
//!                 │        Dispatcher        │ ──▶ TimerPort
//!  probe byte ◀── │ Sampling · Sensor · Out  │ ──▶ TransferPort
//!                 └──────────────────────────┘ ──▶ EventSink
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use log::{debug, info, warn};

use crate::config::SamplerConfig;
use crate::error::{Error, TransferError};
use crate::events::{EventFlags, Flag, NotificationSource};
use crate::sampling::{SamplingPeriod, SamplingRate};
use crate::sensors::temperature::TemperatureSensor;

use super::events::AppEvent;
use super::ports::{EventSink, SamplerHardware, TransferPort};
use super::status::{self, StatusLine};

// ───────────────────────────────────────────────────────────────
// Outbox
// ───────────────────────────────────────────────────────────────

/// Single-slot holder for the next line to transmit.
///
/// `link_busy` is loop-local: it is set when a transfer is accepted and
/// cleared only when the `TxReady` flag is consumed, so no new transfer is
/// issued while one is in flight.
#[derive(Debug, Default)]
struct Outbox {
    pending: Option<StatusLine>,
    link_busy: bool,
}

impl Outbox {
    /// Queue `line`, replacing any line still waiting. Returns the length
    /// of the replaced line, if there was one.
    fn submit(&mut self, line: StatusLine) -> Option<usize> {
        self.pending.replace(line).map(|old| old.len())
    }
}

// ───────────────────────────────────────────────────────────────
// Dispatcher
// ───────────────────────────────────────────────────────────────

/// Owns the loop-side state: sampling period, sensor addressing, outbox.
pub struct Dispatcher<'a> {
    flags: &'a EventFlags,
    queue: Option<&'a dyn NotificationSource>,
    probe: &'a AtomicU8,
    rate_probe: Option<&'a AtomicU8>,
    sensor: TemperatureSensor,
    period: SamplingPeriod,
    outbox: Outbox,
    announce_start: bool,
    passes: u64,
}

impl<'a> Dispatcher<'a> {
    /// `probe` receives every converted temperature for the debug probe.
    pub fn new(config: &SamplerConfig, flags: &'a EventFlags, probe: &'a AtomicU8) -> Self {
        Self {
            flags,
            queue: None,
            probe,
            rate_probe: None,
            sensor: TemperatureSensor::new(config.sensor_address, config.sensor_register),
            period: SamplingPeriod::new(config.timer_clock_hz),
            outbox: Outbox::default(),
            announce_start: config.announce_start,
            passes: 0,
        }
    }

    /// Drain `queue` into the flags at the start of every pass, for
    /// producers that run as threads rather than interrupts.
    #[must_use]
    pub fn with_queue(mut self, queue: &'a dyn NotificationSource) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Also publish the sampling-rate index (0 = 500 ms .. 3 = 4 s).
    #[must_use]
    pub fn with_rate_probe(mut self, rate_probe: &'a AtomicU8) -> Self {
        self.rate_probe = Some(rate_probe);
        self
    }

    fn publish_rate(&self) {
        if let Some(p) = self.rate_probe {
            p.store(self.period.rate().index(), Ordering::Relaxed);
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Program the initial period and start the timer. Queues the banner
    /// when announcing is enabled.
    pub fn start(&mut self, hw: &mut impl SamplerHardware, sink: &mut impl EventSink) {
        self.period.program(hw);
        self.publish_rate();
        hw.start();
        sink.emit(&AppEvent::Started {
            rate: self.period.rate(),
            compare: self.period.threshold(),
        });
        info!(
            "Dispatcher started: every {} (compare={}), sensor @0x{:02X}",
            self.period.rate().label(),
            self.period.threshold(),
            self.sensor.address()
        );

        if self.announce_start {
            self.outbox.submit(status::banner());
            self.flush(hw, sink);
        }
    }

    /// Poll forever.
    pub fn run(&mut self, hw: &mut impl SamplerHardware, sink: &mut impl EventSink) -> ! {
        loop {
            self.poll_once(hw, sink);
        }
    }

    // ── One pass ──────────────────────────────────────────────

    /// Execute one pass over the flags.
    ///
    /// A timer expiry and an earlier read completion may both be handled
    /// in the same pass; no ordering is imposed between different flags.
    pub fn poll_once(&mut self, hw: &mut impl SamplerHardware, sink: &mut impl EventSink) {
        self.passes = self.passes.wrapping_add(1);

        if let Some(queue) = self.queue {
            queue.drain_into(self.flags);
        }

        // 1. Debug link housekeeping.
        hw.communicate();

        // 2. Sampling period elapsed: start a read.
        if self.flags.take(Flag::TimerExpired) {
            if let Err(e) = self.sensor.request(hw) {
                warn!("Dispatcher: read request refused: {}", e);
                sink.emit(&AppEvent::RequestRejected(e));
            }
        }

        // 3. Read finished: publish it, or spend it on a period change.
        if self.flags.take(Flag::ReadComplete) {
            let line = if self.flags.take(Flag::RateChangeRequested) {
                let from = self.period.rate();
                let line = self.period.advance(hw);
                self.publish_rate();
                sink.emit(&AppEvent::RateChanged {
                    from,
                    to: self.period.rate(),
                    compare: self.period.threshold(),
                });
                line
            } else {
                let celsius = self.sensor.collect(hw);
                self.probe.store(celsius as u8, Ordering::Relaxed);
                hw.toggle();
                debug!("Dispatcher: sample {} C", celsius);
                sink.emit(&AppEvent::Sample { celsius });
                status::temperature(celsius)
            };

            if let Some(len) = self.outbox.submit(line) {
                debug!("Dispatcher: unsent line ({} bytes) superseded", len);
                sink.emit(&AppEvent::LineSuperseded { len });
            }
        }

        // 4. Transmit whatever is pending once the link is free.
        self.flush(hw, sink);
    }

    fn flush(&mut self, hw: &mut impl TransferPort, sink: &mut impl EventSink) {
        if self.flags.take(Flag::TxReady) {
            self.outbox.link_busy = false;
            if self.flags.take(Flag::TxFailed) {
                let e = Error::Transfer(TransferError::WriteFailed);
                warn!("Dispatcher: last transfer failed: {}", e);
                sink.emit(&AppEvent::RequestRejected(e));
            }
        }
        if self.outbox.link_busy {
            return;
        }
        let Some(line) = self.outbox.pending.take() else {
            return;
        };

        match hw.transfer(line.as_bytes()) {
            Ok(()) => {
                self.outbox.link_busy = true;
                debug!("Dispatcher: transmitting {} bytes", line.len());
                sink.emit(&AppEvent::Transmitted { len: line.len() });
            }
            Err(e) => {
                warn!("Dispatcher: transfer refused, line dropped: {}", e);
                sink.emit(&AppEvent::RequestRejected(e));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current sampling period.
    pub fn rate(&self) -> SamplingRate {
        self.period.rate()
    }

    /// Compare threshold currently programmed into the timer.
    pub fn compare(&self) -> u32 {
        self.period.threshold()
    }

    /// Line waiting for the link, if any.
    pub fn pending_line(&self) -> Option<&str> {
        self.outbox.pending.as_ref().map(|l| l.as_str())
    }

    /// Whether a transfer is in flight.
    pub fn link_busy(&self) -> bool {
        self.outbox.link_busy
    }

    /// Passes executed since construction.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
