//! Port traits — the hexagonal boundary between the pipeline and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Sampler / Filter / Actuator stage
//! ```
//!
//! Driven adapters (ADC, PWM, clock, log output) implement these traits.
//! The stages consume them via generics, so the pipeline never touches
//! hardware directly and every stage runs against mocks in tests.
//!
//! Each stage runs on its own thread and owns its adapters outright, hence
//! the `Send` bounds at the spawn site rather than shared references here.

use crate::control::{DriveCommand, RawSample};
use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → sampler)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the sampler calls this once per period.
pub trait SensorPort {
    /// Acquire one raw reading.  Range checking is the sampler's job; the
    /// adapter only reports what the converter returned.
    fn acquire(&mut self) -> Result<RawSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: actuator driver → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the actuator driver calls this once per filtered value.
pub trait ActuatorPort {
    /// Apply the command.  On error the previous output stays in effect.
    fn drive(&mut self, command: &DriveCommand) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: monotonic clock → sampler)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock used to pace the sampler.
pub trait TimePort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: stages → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The stages emit structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
