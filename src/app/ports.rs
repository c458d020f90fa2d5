//! Port traits: the boundary between the dispatch core and the platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Dispatcher (core)
//! ```
//!
//! Every collaborator the dispatch loop talks to is one of these traits.
//! Completions never come back through a port: they arrive asynchronously
//! through the notifier handles in [`crate::events`].

use crate::config::SamplerConfig;
use crate::error::Result;
use crate::sensors::temperature::RawReading;

// ───────────────────────────────────────────────────────────────
// Sensor bus (I2C controller)
// ───────────────────────────────────────────────────────────────

/// Asynchronous write-then-read on the sensor bus.
pub trait SensorBusPort {
    /// Start a transaction: write `write` to `address`, then read
    /// `read_len` bytes into the adapter's receive buffer.
    ///
    /// Returns as soon as the request is accepted.  Completion is signalled
    /// later through the bus notifier; `Err` means nothing was started.
    fn request_write_read(&mut self, address: u8, write: &[u8], read_len: usize) -> Result<()>;

    /// The bytes received by the most recent completed transaction.
    fn take_reading(&mut self) -> RawReading;
}

// ───────────────────────────────────────────────────────────────
// Sampling timer
// ───────────────────────────────────────────────────────────────

/// Periodic timer whose compare match marks one sampling period.
pub trait TimerPort {
    /// Set the compare threshold in timer clock ticks.
    fn set_compare(&mut self, value: u32);

    /// Start counting.  Compare matches are signalled through the timer notifier.
    fn start(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Outbound transfer (UART)
// ───────────────────────────────────────────────────────────────

/// Buffer transfer to the serial transmitter.
pub trait TransferPort {
    /// Start sending exactly `bytes`.  The adapter must not keep the borrow
    /// past the call; completion is signalled through the transfer notifier.
    fn transfer(&mut self, bytes: &[u8]) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Debug telemetry
// ───────────────────────────────────────────────────────────────

/// Non-blocking per-iteration step of the debug/telemetry link.
pub trait TelemetryPort {
    fn communicate(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Indicator
// ───────────────────────────────────────────────────────────────

/// Visual acknowledgement of a successful sample.
pub trait IndicatorPort {
    fn toggle(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink (core → logging)
// ───────────────────────────────────────────────────────────────

/// The dispatcher emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (core ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the sampler configuration.
///
/// Implementations MUST validate before persisting; invalid values are
/// rejected with [`ConfigError::ValidationFailed`], never clamped.
pub trait ConfigPort {
    /// Returns [`SamplerConfig::default()`] if nothing is stored.
    fn load(&self) -> core::result::Result<SamplerConfig, ConfigError>;

    fn save(&self, config: &SamplerConfig) -> core::result::Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ───────────────────────────────────────────────────────────────
// Combined hardware bound
// ───────────────────────────────────────────────────────────────

/// Everything the dispatch loop drives, satisfied by one adapter.
///
/// Taking a single `&mut impl SamplerHardware` avoids juggling five
/// mutable borrows while keeping each port boundary explicit.
pub trait SamplerHardware:
    SensorBusPort + TimerPort + TransferPort + TelemetryPort + IndicatorPort
{
}

impl<T> SamplerHardware for T where
    T: SensorBusPort + TimerPort + TransferPort + TelemetryPort + IndicatorPort
{
}
