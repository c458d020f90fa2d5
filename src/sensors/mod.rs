//! Sensor drivers.
//!
//! Sensors here never touch the bus directly; they build requests for a
//! [`SensorBusPort`](crate::app::ports::SensorBusPort) and interpret what
//! it hands back.

pub mod temperature;
