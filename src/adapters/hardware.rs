//! Hardware adapters — bridge real peripherals to the pipeline ports.
//!
//! [`PotSensor`] exposes the potentiometer through [`SensorPort`];
//! [`LedActuator`] exposes any PWM-backed [`LedDriver`] through
//! [`ActuatorPort`].  On non-espidf targets the underlying drivers use
//! cfg-gated simulation stubs.

use embedded_hal::pwm::{Error as _, SetDutyCycle};
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::{DriveCommand, RawSample};
use crate::drivers::led::LedDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::Potentiometer;

// ── SensorPort implementation ─────────────────────────────────

pub struct PotSensor {
    pot: Potentiometer,
}

impl PotSensor {
    pub fn new(pot: Potentiometer) -> Self {
        Self { pot }
    }
}

impl SensorPort for PotSensor {
    fn acquire(&mut self) -> Result<RawSample, SensorError> {
        self.pot.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

pub struct LedActuator<P> {
    led: LedDriver<P>,
}

impl<P: SetDutyCycle> LedActuator<P> {
    pub fn new(led: LedDriver<P>) -> Self {
        Self { led }
    }

    pub fn led(&self) -> &LedDriver<P> {
        &self.led
    }
}

impl<P: SetDutyCycle> ActuatorPort for LedActuator<P> {
    fn drive(&mut self, command: &DriveCommand) -> Result<(), ActuatorError> {
        self.led
            .set_level(command.level(), command.full_scale())
            .map_err(|e| {
                warn!("LED duty write rejected: {:?}", e.kind());
                ActuatorError::PwmWriteFailed
            })
    }
}
