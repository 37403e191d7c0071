//! Actuator driver stage — filtered value to PWM duty.
//!
//! Purely reactive: woken by the filter→actuator handoff, it maps the value
//! linearly onto the actuator's range and applies it.  A failed write drops
//! that cycle's command; the next filtered value tries again.

use std::sync::Arc;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::control::{DriveCommand, RawSample};
use crate::diagnostics::PipelineStats;
use crate::error::ActuatorError;
use crate::handoff::{Handoff, Shutdown, StageId, Wait};

use super::StallWatch;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};

pub struct ActuatorStage<A, E> {
    actuator: A,
    sink: E,
    input: Arc<Handoff<RawSample>>,
    stats: Arc<PipelineStats>,
    adc_max: RawSample,
    pwm_period_us: u32,
    stall_timeout: Option<Duration>,
}

impl<A: ActuatorPort, E: EventSink> ActuatorStage<A, E> {
    pub fn new(
        config: &PipelineConfig,
        actuator: A,
        sink: E,
        input: Arc<Handoff<RawSample>>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            actuator,
            sink,
            input,
            stats,
            adc_max: config.adc_max,
            pwm_period_us: config.pwm_period_us,
            stall_timeout: config.stall_timeout_ms.map(|ms| Duration::from_millis(ms.into())),
        }
    }

    /// Convert and apply one filtered value.
    pub fn drive(&mut self, value: RawSample) -> Result<DriveCommand, ActuatorError> {
        let command = DriveCommand::from_filtered(value, self.adc_max);

        match self.actuator.drive(&command) {
            Ok(()) => {
                PipelineStats::bump(&self.stats.commands_issued);
                self.sink.emit(&AppEvent::DriveIssued {
                    command,
                    pulse_us: command.pulse_us(self.pwm_period_us),
                });
                Ok(command)
            }
            Err(error) => {
                PipelineStats::bump(&self.stats.commands_failed);
                self.sink.emit(&AppEvent::DriveFailed { command, error });
                Err(error)
            }
        }
    }

    /// Run until shutdown.
    pub fn run(mut self, shutdown: &Shutdown) {
        self.sink.emit(&AppEvent::StageStarted(StageId::Actuator));
        let mut stall = StallWatch::new(StageId::Actuator, self.stall_timeout);

        while !shutdown.is_requested() {
            match self.input.wait(shutdown, StageId::Actuator, self.stall_timeout) {
                Wait::Received(value) => {
                    stall.reset();
                    // Failures are already reported through the sink.
                    let _ = self.drive(value);
                }
                Wait::TimedOut => stall.report(&self.stats, &mut self.sink),
                Wait::Cancelled => break,
            }
        }

        self.sink.emit(&AppEvent::StageStopped(StageId::Actuator));
    }
}
