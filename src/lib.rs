//! Temperature sampler firmware library.
//!
//! Exposes the dispatch core, its ports and the platform adapters for the
//! binary and for integration testing. All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod sampling;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;
