//! Application layer: dispatch core, port traits and status lines.

pub mod events;
pub mod ports;
pub mod service;
pub mod status;
