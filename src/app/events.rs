//! Outbound application events.
//!
//! The [`Dispatcher`](super::service::Dispatcher) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They are diagnostics for
//! the log, separate from the status lines sent to the UART.

use crate::error::Error;
use crate::sampling::SamplingRate;

/// Structured events emitted by the dispatch core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Timer programmed and started.
    Started { rate: SamplingRate, compare: u32 },

    /// A sample was converted and published to the probe byte.
    Sample { celsius: i8 },

    /// The sampling period advanced.
    RateChanged {
        from: SamplingRate,
        to: SamplingRate,
        compare: u32,
    },

    /// A status line was handed to the transfer service.
    Transmitted { len: usize },

    /// A pending line was replaced before the link became free.
    LineSuperseded { len: usize },

    /// A collaborator refused a request; that cycle is skipped.
    RequestRejected(Error),
}
