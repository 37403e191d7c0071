//! Application core — the three-stage pipeline.
//!
//! Sampler, filter and actuator driver each run on their own thread and
//! talk only through [`crate::handoff`] slots.  All interaction with
//! hardware happens through the **port traits** in [`ports`], so every
//! stage is testable without real peripherals.

pub mod actuator;
pub mod events;
pub mod filter;
pub mod pipeline;
pub mod ports;
pub mod sampler;
mod stall;

pub use pipeline::{Pipeline, PipelineHandle};

pub(crate) use stall::StallWatch;
