//! Outbound pipeline events.
//!
//! Every stage reports what it did through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, count, record in tests.

use heapless::Vec;

use crate::config::HISTORY_DEPTH;
use crate::control::{DriveCommand, RawSample};
use crate::error::{ActuatorError, SensorError};
use crate::handoff::StageId;
use crate::scheduler::DeadlineMiss;

/// Structured events emitted by the pipeline stages.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A stage thread entered its loop.
    StageStarted(StageId),

    /// A stage thread left its loop after shutdown.
    StageStopped(StageId),

    /// The sampler acquired and published a valid reading.
    SampleAcquired(RawSample),

    /// The sampler discarded a reading; `retained` was published instead.
    SampleRejected { error: SensorError, retained: RawSample },

    /// The sampler's release instant was already past.
    DeadlineMissed(DeadlineMiss),

    /// The filter published a new value.
    Filtered(FilterReport),

    /// The actuator driver applied a command.
    DriveIssued { command: DriveCommand, pulse_us: u32 },

    /// The actuator driver could not apply a command; it was dropped.
    DriveFailed { command: DriveCommand, error: ActuatorError },

    /// A stage waited longer than the stall timeout for upstream data.
    StageStalled { stage: StageId, waited_ms: u32 },
}

/// What the filter saw and decided in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReport {
    /// The raw sample that triggered this cycle.
    pub sample: RawSample,
    /// Pass-1 (nonzero) average.
    pub baseline: RawSample,
    /// Pass-2 (trimmed) average: the published value.
    pub value: RawSample,
    /// History entries outside the acceptance band.
    pub rejected: Vec<RawSample, HISTORY_DEPTH>,
}
