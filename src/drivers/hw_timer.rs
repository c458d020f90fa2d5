//! Sampling timer driver.
//!
//! Models a compare-match timer clocked at `clock_hz`: the compare value
//! is a tick count, and every match raises the timer flag.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: an `esp_timer` periodic timer whose period is the compare
//! value converted to microseconds.  Callbacks run in the esp_timer task,
//! not in interrupt context, so they post to a [`NotificationQueue`] that
//! the dispatcher drains each pass.
//! On host/test: tracks state in-memory; [`SampleTimer::sim_expire`]
//! stands in for the hardware match.

use core::time::Duration;

use crate::app::ports::TimerPort;
use crate::events::TimerNotifier;

#[cfg(target_os = "espidf")]
use crate::events::{Notification, NotificationQueue, TIMER_CAUSE_COMPARE0};
#[cfg(target_os = "espidf")]
use esp_idf_svc::timer::{EspTaskTimerService, EspTimer};

pub struct SampleTimer<'a> {
    clock_hz: u32,
    compare: u32,
    running: bool,
    #[cfg(target_os = "espidf")]
    timer: EspTimer<'static>,
    #[cfg(not(target_os = "espidf"))]
    notifier: TimerNotifier<'a>,
    #[cfg(target_os = "espidf")]
    _notifier: core::marker::PhantomData<TimerNotifier<'a>>,
}

impl SampleTimer<'_> {
    /// Period the current compare value represents.
    pub fn period(&self) -> Duration {
        Duration::from_micros(self.compare as u64 * 1_000_000 / self.clock_hz.max(1) as u64)
    }

    pub fn compare(&self) -> u32 {
        self.compare
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(target_os = "espidf")]
impl SampleTimer<'static> {
    /// Create the esp_timer. Not armed until [`TimerPort::start`].
    pub fn new<const N: usize>(
        clock_hz: u32,
        queue: &'static NotificationQueue<N>,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        let service = EspTaskTimerService::new()?;
        let timer = service.timer(move || {
            // Only this callback posts, so a full queue already holds a match.
            let _ = queue.post(Notification::TimerInterrupt(TIMER_CAUSE_COMPARE0));
        })?;
        Ok(Self {
            clock_hz,
            compare: 0,
            running: false,
            timer,
            _notifier: core::marker::PhantomData,
        })
    }
}

#[cfg(target_os = "espidf")]
impl SampleTimer<'_> {
    fn arm(&mut self) {
        let period = self.period();
        if let Err(e) = self.timer.cancel() {
            log::error!("hw_timer: cancel failed ({})", e);
        }
        if let Err(e) = self.timer.every(period) {
            log::error!("hw_timer: arm failed ({}); no further samples", e);
            return;
        }
        log::debug!("hw_timer: armed every {:?}", period);
    }
}

#[cfg(not(target_os = "espidf"))]
impl<'a> SampleTimer<'a> {
    pub fn new(clock_hz: u32, notifier: TimerNotifier<'a>) -> Self {
        Self {
            clock_hz,
            compare: 0,
            running: false,
            notifier,
        }
    }

    fn arm(&mut self) {
        log::debug!("hw_timer(sim): armed every {:?}", self.period());
    }

    /// Simulate a compare match.  Ignored while the timer is stopped.
    pub fn sim_expire(&self) {
        if self.running {
            self.notifier
                .on_interrupt(crate::events::TIMER_CAUSE_COMPARE0);
        }
    }
}

impl TimerPort for SampleTimer<'_> {
    fn set_compare(&mut self, value: u32) {
        self.compare = value;
        if self.running {
            self.arm();
        }
    }

    fn start(&mut self) {
        self.running = true;
        self.arm();
    }
}
