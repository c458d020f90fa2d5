//! Unified error types for the sampler firmware.
//!
//! A single `Error` enum that every port can convert into. All variants are
//! `Copy` so they can be passed through the dispatch loop without
//! allocation.
//!
//! Note that none of these ever reach the serial status line: a failed
//! sample is simply absent from the output.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible port operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The sensor bus refused a request or reported a failed transaction.
    Bus(BusError),
    /// The outbound transfer service refused a transfer.
    Transfer(TransferError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Transfer(e) => write!(f, "transfer: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// A previous transaction is still in flight.
    Busy,
    /// The target did not acknowledge its address or a data byte.
    NoAcknowledge,
    /// Another controller won arbitration.
    ArbitrationLoss,
    /// Misplaced START/STOP or other electrical bus fault.
    Bus,
    /// Receive overrun.
    Overrun,
    /// Anything the HAL could not classify.
    Other,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "transaction in flight"),
            Self::NoAcknowledge => write!(f, "no acknowledge"),
            Self::ArbitrationLoss => write!(f, "arbitration lost"),
            Self::Bus => write!(f, "bus fault"),
            Self::Overrun => write!(f, "overrun"),
            Self::Other => write!(f, "unclassified bus error"),
        }
    }
}

impl From<embedded_hal::i2c::ErrorKind> for BusError {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;
        match kind {
            ErrorKind::Bus => Self::Bus,
            ErrorKind::ArbitrationLoss => Self::ArbitrationLoss,
            ErrorKind::NoAcknowledge(_) => Self::NoAcknowledge,
            ErrorKind::Overrun => Self::Overrun,
            _ => Self::Other,
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Transfer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// The transmit path is still busy with an earlier buffer.
    Busy,
    /// The driver accepted fewer bytes than requested.
    Underrun { written: usize, requested: usize },
    /// Driver-level write failure.
    WriteFailed,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "transmitter busy"),
            Self::Underrun { written, requested } => {
                write!(f, "underrun ({written}/{requested} bytes)")
            }
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl From<TransferError> for Error {
    fn from(e: TransferError) -> Self {
        Self::Transfer(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
