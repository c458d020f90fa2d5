//! GPIO / peripheral pin assignments for the sampler board.
//!
//! `drivers::trigger` configures its pin from here through raw GPIO calls.
//! The typed esp-idf-hal pins taken in `main.rs` (`gpio11`, `gpio14`,
//! `gpio15`, `gpio17`) must carry the same numbers; change both together.

// ---------------------------------------------------------------------------
// Trigger input (push button, active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Falling edge requests the next sampling period.
pub const TRIGGER_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Sample indicator LED
// ---------------------------------------------------------------------------

pub const LED_GPIO: i32 = 11;

// ---------------------------------------------------------------------------
// I²C bus (temperature sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// UART status output
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
