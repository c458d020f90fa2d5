//! Peripheral drivers: sensor bus, sampling timer, trigger input, UART
//! transmitter and indicator LED.

pub mod hw_timer;
pub mod i2c_bus;
pub mod indicator;
pub mod trigger;
pub mod uart_tx;
