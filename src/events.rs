//! Interrupt-to-loop event flags.
//!
//! Independent flags hand hardware events from notification context
//! (ISRs, timer callbacks) to the dispatch loop:
//!
//! ```text
//! ┌──────────────────┐  raise   ┌──────────────┐  take   ┌──────────────┐
//! │ Timer compare    │────────▶│              │        │              │
//! │ Trigger edge     │────────▶│  EventFlags  │───────▶│  Dispatcher  │
//! │ Bus completion   │────────▶│  (atomics)   │        │  (consumer)  │
//! │ Transfer done    │────────▶│              │        │              │
//! └──────────────────┘          └──────────────┘        └──────────────┘
//! ```
//!
//! Each source only ever gets a notifier handle that can raise its own flag.
//! Clearing is crate-private and only the dispatcher does it, so every flag
//! has exactly one producer and one consumer.
//!
//! Targets that deliver notifications from threads instead of interrupts can
//! route them through a [`NotificationQueue`] and drain it once per pass.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::error::BusError;

/// Interrupt-cause bit for a compare-0 match on the sampling timer.
pub const TIMER_CAUSE_COMPARE0: u32 = 1 << 8;
/// Interrupt-cause bit for a counter overflow on the sampling timer.
pub const TIMER_CAUSE_OVERFLOW: u32 = 1 << 15;

/// Identifies one flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Sampling period elapsed; a sensor read is due.
    TimerExpired,
    /// External trigger asked for the next sampling period.
    RateChangeRequested,
    /// A sensor read finished without a bus error.
    ReadComplete,
    /// The outbound link finished its last transfer, successfully or not.
    TxReady,
    /// The last transfer ended in an error.
    TxFailed,
}

/// Outcome reported by the outbound transfer service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEvent {
    Complete,
    Error,
}

/// The process-wide event flags.
///
/// `const`-constructible so firmware can keep it in a `static` that ISRs
/// reach through a raw argument pointer.
#[derive(Debug)]
pub struct EventFlags {
    timer_expired: AtomicBool,
    rate_change_requested: AtomicBool,
    read_complete: AtomicBool,
    tx_ready: AtomicBool,
    tx_failed: AtomicBool,
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFlags {
    /// All flags clear except `TxReady`: the link starts idle.
    pub const fn new() -> Self {
        Self {
            timer_expired: AtomicBool::new(false),
            rate_change_requested: AtomicBool::new(false),
            read_complete: AtomicBool::new(false),
            tx_ready: AtomicBool::new(true),
            tx_failed: AtomicBool::new(false),
        }
    }

    fn cell(&self, flag: Flag) -> &AtomicBool {
        match flag {
            Flag::TimerExpired => &self.timer_expired,
            Flag::RateChangeRequested => &self.rate_change_requested,
            Flag::ReadComplete => &self.read_complete,
            Flag::TxReady => &self.tx_ready,
            Flag::TxFailed => &self.tx_failed,
        }
    }

    /// Observe a flag without consuming it.
    pub fn is_raised(&self, flag: Flag) -> bool {
        self.cell(flag).load(Ordering::Acquire)
    }

    /// Consume a flag: returns whether it was raised and leaves it clear.
    pub(crate) fn take(&self, flag: Flag) -> bool {
        self.cell(flag).swap(false, Ordering::AcqRel)
    }

    // ── Notifier handles ──────────────────────────────────────

    pub fn timer_notifier(&self) -> TimerNotifier<'_> {
        TimerNotifier { flag: &self.timer_expired }
    }

    pub fn trigger_notifier(&self) -> TriggerNotifier<'_> {
        TriggerNotifier { flag: &self.rate_change_requested }
    }

    pub fn bus_notifier(&self) -> BusNotifier<'_> {
        BusNotifier { flag: &self.read_complete }
    }

    pub fn transfer_notifier(&self) -> TransferNotifier<'_> {
        TransferNotifier {
            ready: &self.tx_ready,
            failed: &self.tx_failed,
        }
    }
}

// ── Notifiers (ISR side) ──────────────────────────────────────
//
// Bounded work only: one bit test and one atomic store.  No logging,
// no allocation.

/// Sampling-timer interrupt handle. Raises `TimerExpired`.
#[derive(Debug, Clone, Copy)]
pub struct TimerNotifier<'a> {
    flag: &'a AtomicBool,
}

impl TimerNotifier<'_> {
    /// Call from the timer interrupt with its cause bitmask.
    /// Only a compare-0 match counts as the sampling period elapsing.
    pub fn on_interrupt(&self, cause: u32) {
        if cause & TIMER_CAUSE_COMPARE0 != 0 {
            self.flag.store(true, Ordering::Release);
        }
    }
}

/// External trigger (pin edge) handle. Raises `RateChangeRequested`.
#[derive(Debug, Clone, Copy)]
pub struct TriggerNotifier<'a> {
    flag: &'a AtomicBool,
}

impl TriggerNotifier<'_> {
    pub fn on_edge(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

/// Sensor-bus completion handle. Raises `ReadComplete`.
#[derive(Debug, Clone, Copy)]
pub struct BusNotifier<'a> {
    flag: &'a AtomicBool,
}

impl BusNotifier<'_> {
    /// A failed transaction leaves the flag untouched, dropping that sample.
    pub fn on_complete(&self, result: Result<(), BusError>) {
        if result.is_ok() {
            self.flag.store(true, Ordering::Release);
        }
    }
}

/// Outbound transfer completion handle. Raises `TxReady` for every
/// finished transfer, plus `TxFailed` when it ended in an error.
#[derive(Debug, Clone, Copy)]
pub struct TransferNotifier<'a> {
    ready: &'a AtomicBool,
    failed: &'a AtomicBool,
}

impl TransferNotifier<'_> {
    pub fn on_event(&self, event: TransferEvent) {
        if event == TransferEvent::Error {
            self.failed.store(true, Ordering::Release);
        }
        self.ready.store(true, Ordering::Release);
    }
}

// ── Channel front-end for threaded targets ────────────────────

/// Anything the loop drains into the flags at the start of each pass.
pub trait NotificationSource {
    /// Apply every pending notification. Returns how many were applied.
    fn drain_into(&self, flags: &EventFlags) -> usize;
}

/// A hardware notification carried as a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    TimerInterrupt(u32),
    TriggerEdge,
    BusComplete(Result<(), BusError>),
    Transfer(TransferEvent),
}

/// Bounded queue of notifications for targets where producers are threads.
///
/// Producers `post` without blocking; the loop drains everything once per
/// pass with [`drain_into`](Self::drain_into), which applies exactly the
/// same per-source rules as the notifier handles.
pub struct NotificationQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, Notification, N>,
}

impl<const N: usize> Default for NotificationQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NotificationQueue<N> {
    pub const fn new() -> Self {
        Self { channel: Channel::new() }
    }

    /// Enqueue a notification. Returns `false` if the queue is full (dropped).
    pub fn post(&self, notification: Notification) -> bool {
        self.channel.try_send(notification).is_ok()
    }

    /// Apply every queued notification to `flags`. Returns how many were applied.
    pub fn drain_into(&self, flags: &EventFlags) -> usize {
        let mut applied = 0;
        while let Ok(notification) = self.channel.try_receive() {
            match notification {
                Notification::TimerInterrupt(cause) => flags.timer_notifier().on_interrupt(cause),
                Notification::TriggerEdge => flags.trigger_notifier().on_edge(),
                Notification::BusComplete(result) => flags.bus_notifier().on_complete(result),
                Notification::Transfer(event) => flags.transfer_notifier().on_event(event),
            }
            applied += 1;
        }
        applied
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> NotificationSource for NotificationQueue<N> {
    fn drain_into(&self, flags: &EventFlags) -> usize {
        NotificationQueue::drain_into(self, flags)
    }
}
