//! Potentiometer → LED dimmer firmware library.
//!
//! A three-stage pipeline (sampler, filter, actuator driver) on separate
//! threads, linked by single-slot signal handoffs.  Exposes the pure-logic
//! modules for integration testing and the host simulator.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod handoff;
pub mod pins;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
pub mod sensors;

pub use error::{Error, Result};
