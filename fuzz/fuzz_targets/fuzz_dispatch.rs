//! Fuzz target: dispatch loop under arbitrary notification order
//!
//! Each input byte is one notification (or a bare pass) delivered between
//! loop passes. Verifies:
//! - No panics for any interleaving
//! - Exactly one read request per compare match
//! - Never a second transfer before the link reports the last one finished
//! - Every transmitted line ends in CR LF and fits one status line

#![no_main]

use core::sync::atomic::AtomicU8;

use libfuzzer_sys::fuzz_target;
use tempsampler::app::events::AppEvent;
use tempsampler::app::ports::{
    EventSink, IndicatorPort, SensorBusPort, TelemetryPort, TimerPort, TransferPort,
};
use tempsampler::app::service::Dispatcher;
use tempsampler::app::status::STATUS_LINE_CAP;
use tempsampler::config::SamplerConfig;
use tempsampler::error::{BusError, Result};
use tempsampler::events::{EventFlags, TransferEvent, TIMER_CAUSE_COMPARE0};
use tempsampler::sensors::temperature::RawReading;

struct FuzzHw {
    reading: RawReading,
    requests: usize,
    in_flight: bool,
    transfers: Vec<Vec<u8>>,
}

impl SensorBusPort for FuzzHw {
    fn request_write_read(&mut self, _: u8, _: &[u8], _: usize) -> Result<()> {
        self.requests += 1;
        Ok(())
    }

    fn take_reading(&mut self) -> RawReading {
        self.reading
    }
}

impl TimerPort for FuzzHw {
    fn set_compare(&mut self, _: u32) {}
    fn start(&mut self) {}
}

impl TransferPort for FuzzHw {
    fn transfer(&mut self, bytes: &[u8]) -> Result<()> {
        assert!(!self.in_flight, "transfer issued while link busy");
        self.in_flight = true;
        self.transfers.push(bytes.to_vec());
        Ok(())
    }
}

impl TelemetryPort for FuzzHw {
    fn communicate(&mut self) {}
}

impl IndicatorPort for FuzzHw {
    fn toggle(&mut self) {}
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let flags = EventFlags::new();
    let probe = AtomicU8::new(0);
    let config = SamplerConfig {
        announce_start: false,
        ..SamplerConfig::default()
    };
    let mut hw = FuzzHw {
        reading: [0, 0],
        requests: 0,
        in_flight: false,
        transfers: Vec::new(),
    };
    let mut d = Dispatcher::new(&config, &flags, &probe);
    d.start(&mut hw, &mut NullSink);

    let mut matches = 0;
    for &b in data {
        match b % 7 {
            0 => {
                flags.timer_notifier().on_interrupt(TIMER_CAUSE_COMPARE0);
                matches += 1;
            }
            1 => flags.trigger_notifier().on_edge(),
            2 => {
                hw.reading = [b, b.rotate_left(3)];
                flags.bus_notifier().on_complete(Ok(()));
            }
            3 => flags.bus_notifier().on_complete(Err(BusError::Bus)),
            4 => {
                hw.in_flight = false;
                flags.transfer_notifier().on_event(TransferEvent::Complete);
            }
            5 => {
                hw.in_flight = false;
                flags.transfer_notifier().on_event(TransferEvent::Error);
            }
            _ => {}
        }
        d.poll_once(&mut hw, &mut NullSink);
    }

    assert_eq!(hw.requests, matches);
    for line in &hw.transfers {
        assert!(line.ends_with(b"\r\n"));
        assert!(line.len() <= STATUS_LINE_CAP);
    }
});
