//! Mock hardware adapter for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real I2C/UART/timer registers.  Nothing here
//! completes on its own: tests raise completions through the notifier
//! handles, exactly as the interrupt handlers would.

use tempsampler::app::events::AppEvent;
use tempsampler::app::ports::{
    EventSink, IndicatorPort, SensorBusPort, TelemetryPort, TimerPort, TransferPort,
};
use tempsampler::error::{BusError, Error, Result, TransferError};
use tempsampler::sensors::temperature::RawReading;

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    Request {
        address: u8,
        write: Vec<u8>,
        read_len: usize,
    },
    SetCompare(u32),
    Start,
    Transfer(String),
    Toggle,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Bytes returned by `take_reading`.
    pub reading: RawReading,
    /// Refuse every bus request with `BusError::Busy`.
    pub refuse_requests: bool,
    /// Refuse every transfer with `TransferError::Busy`.
    pub refuse_transfers: bool,
    pub communicate_count: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            reading: [0, 0],
            refuse_requests: false,
            refuse_transfers: false,
            communicate_count: 0,
        }
    }

    pub fn with_reading(reading: RawReading) -> Self {
        Self {
            reading,
            ..Self::new()
        }
    }

    /// Lines handed to the transfer port, oldest first.
    pub fn transfers(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Transfer(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn requests(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::Request { .. }))
            .count()
    }

    pub fn toggles(&self) -> usize {
        self.calls.iter().filter(|c| **c == HwCall::Toggle).count()
    }

    pub fn last_compare(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::SetCompare(v) => Some(*v),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBusPort for MockHardware {
    fn request_write_read(&mut self, address: u8, write: &[u8], read_len: usize) -> Result<()> {
        if self.refuse_requests {
            return Err(Error::Bus(BusError::Busy));
        }
        self.calls.push(HwCall::Request {
            address,
            write: write.to_vec(),
            read_len,
        });
        Ok(())
    }

    fn take_reading(&mut self) -> RawReading {
        self.reading
    }
}

impl TimerPort for MockHardware {
    fn set_compare(&mut self, value: u32) {
        self.calls.push(HwCall::SetCompare(value));
    }

    fn start(&mut self) {
        self.calls.push(HwCall::Start);
    }
}

impl TransferPort for MockHardware {
    fn transfer(&mut self, bytes: &[u8]) -> Result<()> {
        if self.refuse_transfers {
            return Err(Error::Transfer(TransferError::Busy));
        }
        self.calls
            .push(HwCall::Transfer(String::from_utf8_lossy(bytes).into_owned()));
        Ok(())
    }
}

impl TelemetryPort for MockHardware {
    fn communicate(&mut self) {
        self.communicate_count += 1;
    }
}

impl IndicatorPort for MockHardware {
    fn toggle(&mut self) {
        self.calls.push(HwCall::Toggle);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Captures emitted events for assertion.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
