//! Outbound status lines.
//!
//! Every line the firmware transmits is built here into a fixed-capacity
//! buffer and terminated by CR LF. The transfer length is always the
//! line's own `len()`, never the buffer capacity.

use core::fmt::Write;

use crate::sampling::SamplingRate;

/// Capacity of one status line in bytes.
pub const STATUS_LINE_CAP: usize = 100;

/// One formatted line, owned by whoever is about to send it.
pub type StatusLine = heapless::String<STATUS_LINE_CAP>;

/// Every line built here is at most 39 bytes, so formatting into a
/// [`StatusLine`] cannot overflow.
fn fits(result: Result<(), impl core::fmt::Debug>) {
    debug_assert!(result.is_ok(), "status line exceeds {} bytes", STATUS_LINE_CAP);
}

/// `Temperature = NN C\r\n`, zero-padded to two digits.
pub fn temperature(celsius: i8) -> StatusLine {
    let mut line = StatusLine::new();
    fits(write!(line, "Temperature = {:02} C\r\n", celsius));
    line
}

/// `Sampling Temperature every <period> \r\n`.
pub fn sampling_rate(rate: SamplingRate) -> StatusLine {
    let mut line = StatusLine::new();
    fits(write!(line, "Sampling Temperature every {} \r\n", rate.label()));
    line
}

/// Sent once at start-up when announcing is enabled.
pub fn banner() -> StatusLine {
    let mut line = StatusLine::new();
    fits(line.push_str("Start Of Program \r\n"));
    line
}
