//! Sampling period state machine.
//!
//! Four periods visited in a fixed cycle, one `advance` transition:
//!
//! ```text
//!   500 ms ──▶ 1 s ──▶ 2 s ──▶ 4 s ─┐
//!     ▲                             │
//!     └─────────────────────────────┘
//! ```
//!
//! The machine owns the sampling timer's compare threshold: every
//! transition writes the new threshold through [`TimerPort`] before the
//! status line naming the new period is handed back.

use log::info;

use crate::app::ports::TimerPort;
use crate::app::status::{self, StatusLine};

/// The selectable sampling periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingRate {
    #[default]
    Ms500,
    S1,
    S2,
    S4,
}

impl SamplingRate {
    /// Every state, in cycle order.
    pub const ALL: [Self; 4] = [Self::Ms500, Self::S1, Self::S2, Self::S4];

    /// Deterministic successor; wraps from 4 s back to 500 ms.
    pub const fn next(self) -> Self {
        match self {
            Self::Ms500 => Self::S1,
            Self::S1 => Self::S2,
            Self::S2 => Self::S4,
            Self::S4 => Self::Ms500,
        }
    }

    pub const fn period_ms(self) -> u32 {
        match self {
            Self::Ms500 => 500,
            Self::S1 => 1_000,
            Self::S2 => 2_000,
            Self::S4 => 4_000,
        }
    }

    /// Timer compare value for this period at `clock_hz` ticks per second.
    /// With the default 1024 Hz clock: 512, 1024, 2048, 4096.
    pub const fn compare_value(self, clock_hz: u32) -> u32 {
        (self.period_ms() as u64 * clock_hz as u64 / 1_000) as u32
    }

    /// Position in the cycle, 0 for 500 ms through 3 for 4 s.
    pub const fn index(self) -> u8 {
        match self {
            Self::Ms500 => 0,
            Self::S1 => 1,
            Self::S2 => 2,
            Self::S4 => 3,
        }
    }

    /// Human-readable period as it appears in the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ms500 => "500 ms",
            Self::S1 => "1 second",
            Self::S2 => "2 seconds",
            Self::S4 => "4 seconds",
        }
    }
}

/// Current sampling period plus the timer clock it is expressed in.
#[derive(Debug, Clone)]
pub struct SamplingPeriod {
    rate: SamplingRate,
    clock_hz: u32,
}

impl SamplingPeriod {
    /// Starts at 500 ms.
    pub fn new(clock_hz: u32) -> Self {
        Self {
            rate: SamplingRate::default(),
            clock_hz,
        }
    }

    pub fn rate(&self) -> SamplingRate {
        self.rate
    }

    /// Compare value for the current state.
    pub fn threshold(&self) -> u32 {
        self.rate.compare_value(self.clock_hz)
    }

    /// Write the current threshold without changing state (start-up).
    pub fn program(&self, timer: &mut impl TimerPort) {
        timer.set_compare(self.threshold());
    }

    /// Move to the next period, reprogram the timer and return the status
    /// line announcing it.
    pub fn advance(&mut self, timer: &mut impl TimerPort) -> StatusLine {
        let from = self.rate;
        self.rate = from.next();
        timer.set_compare(self.threshold());
        info!(
            "Sampling: {:?} -> {:?} (compare={})",
            from,
            self.rate,
            self.threshold()
        );
        status::sampling_rate(self.rate)
    }
}
