//! Unified error types for the dimmer firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the binary's
//! startup path handles failures uniformly.  All variants are `Copy` so the
//! pipeline stages can report them through events without allocation.
//!
//! None of these are fatal to a running pipeline: a stage that hits a
//! sensor or actuator error reports it and carries on with the next cycle.

use core::fmt;

use crate::handoff::StageId;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// Peripheral or task initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
    /// A stage thread panicked instead of returning after shutdown.
    StagePanicked(StageId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::StagePanicked(stage) => write!(f, "{} stage panicked", stage.name()),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Acquisition failures.  The sampler keeps its previous value on any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error code.
    AdcReadFailed(i32),
    /// ADC unit was never initialised.
    NotInitialised,
    /// Reading is outside `[0, adc_max]`.
    OutOfRange { raw: u16, max: u16 },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed(rc) => write!(f, "ADC read failed (rc={rc})"),
            Self::NotInitialised => write!(f, "ADC not initialised"),
            Self::OutOfRange { raw, max } => write!(f, "reading {raw} out of range (max {max})"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

/// Actuation failures.  The cycle's command is dropped; the next one retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_subsystem_prefix() {
        let e: Error = SensorError::OutOfRange { raw: 2000, max: 1023 }.into();
        assert_eq!(e.to_string(), "sensor: reading 2000 out of range (max 1023)");

        let e: Error = ActuatorError::PwmWriteFailed.into();
        assert_eq!(e.to_string(), "actuator: PWM write failed");
    }
}
