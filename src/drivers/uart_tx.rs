//! Status-line transmitter.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: a UART TX driver with a driver-side ring buffer.  A write
//! that the driver accepts in full counts as a completed transfer, so the
//! notifier fires before `transfer` returns.
//! On host/test: lines are recorded in memory and completed the same way.

use crate::app::ports::TransferPort;
use crate::error::Result;
use crate::events::{TransferEvent, TransferNotifier};

#[cfg(target_os = "espidf")]
use crate::error::TransferError;
#[cfg(target_os = "espidf")]
use esp_idf_hal::uart::UartTxDriver;

pub struct UartTx<'a> {
    notifier: TransferNotifier<'a>,
    #[cfg(target_os = "espidf")]
    driver: UartTxDriver<'static>,
    #[cfg(not(target_os = "espidf"))]
    sent: Vec<String>,
}

#[cfg(target_os = "espidf")]
impl<'a> UartTx<'a> {
    pub fn new(driver: UartTxDriver<'static>, notifier: TransferNotifier<'a>) -> Self {
        Self { notifier, driver }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        match self.driver.write(bytes) {
            Ok(n) if n == bytes.len() => Ok(()),
            Ok(n) => Err(TransferError::Underrun {
                written: n,
                requested: bytes.len(),
            }
            .into()),
            Err(e) => {
                log::warn!("uart_tx: driver write failed ({})", e);
                Err(TransferError::WriteFailed.into())
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl<'a> UartTx<'a> {
    pub fn new(notifier: TransferNotifier<'a>) -> Self {
        Self {
            notifier,
            sent: Vec::new(),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.sent.push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }

    /// Every line written so far, oldest first.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl TransferPort for UartTx<'_> {
    fn transfer(&mut self, bytes: &[u8]) -> Result<()> {
        self.write(bytes)?;
        self.notifier.on_event(TransferEvent::Complete);
        Ok(())
    }
}
