//! Sampler stage — periodic acquisition.
//!
//! Once per period: acquire a reading, range-check it, publish the retained
//! value into the sampler→filter handoff, then sleep to the next additive
//! release instant.  A failed or out-of-range acquisition is reported and
//! the previous value is published again, so the filter still runs.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{OverrunPolicy, PipelineConfig};
use crate::control::RawSample;
use crate::diagnostics::PipelineStats;
use crate::error::SensorError;
use crate::handoff::{Handoff, Shutdown, StageId};
use crate::scheduler::ReleaseSchedule;

use super::events::AppEvent;
use super::ports::{EventSink, SensorPort, TimePort};

pub struct Sampler<S, E> {
    sensor: S,
    sink: E,
    output: Arc<Handoff<RawSample>>,
    stats: Arc<PipelineStats>,
    adc_max: RawSample,
    period_ms: u32,
    policy: OverrunPolicy,
    /// Last valid reading; starts at 0 like the filter history.
    current: RawSample,
}

impl<S: SensorPort, E: EventSink> Sampler<S, E> {
    pub fn new(
        config: &PipelineConfig,
        sensor: S,
        sink: E,
        output: Arc<Handoff<RawSample>>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            sensor,
            sink,
            output,
            stats,
            adc_max: config.adc_max,
            period_ms: config.sample_period_ms,
            policy: config.overrun_policy,
            current: 0,
        }
    }

    /// The value most recently published.
    pub fn current(&self) -> RawSample {
        self.current
    }

    /// One acquisition cycle without the sleep.  Returns the published value.
    pub fn sample_once(&mut self) -> RawSample {
        let adc_max = self.adc_max;
        let reading = self.sensor.acquire().and_then(|raw| {
            if raw > adc_max {
                Err(SensorError::OutOfRange { raw, max: adc_max })
            } else {
                Ok(raw)
            }
        });

        match reading {
            Ok(raw) => {
                self.current = raw;
                PipelineStats::bump(&self.stats.samples_acquired);
                self.sink.emit(&AppEvent::SampleAcquired(raw));
            }
            Err(error) => {
                let counter = match error {
                    SensorError::OutOfRange { .. } => &self.stats.samples_rejected,
                    _ => &self.stats.samples_failed,
                };
                PipelineStats::bump(counter);
                self.sink.emit(&AppEvent::SampleRejected {
                    error,
                    retained: self.current,
                });
            }
        }

        self.output.publish(self.current);
        self.current
    }

    /// Run until shutdown.  The first cycle starts immediately.
    pub fn run<C: TimePort>(mut self, clock: &C, shutdown: &Shutdown) {
        self.sink.emit(&AppEvent::StageStarted(StageId::Sampler));
        let mut schedule = ReleaseSchedule::new(self.period_ms, self.policy, clock.now_ms());

        while !shutdown.is_requested() {
            self.sample_once();

            let release = schedule.advance(clock.now_ms());
            if let Some(miss) = release.missed {
                self.stats.record_lateness(miss.late_by_ms);
                self.sink.emit(&AppEvent::DeadlineMissed(miss));
            }
            if !shutdown.sleep(StageId::Sampler, Duration::from_millis(release.sleep_ms)) {
                break;
            }
        }

        self.sink.emit(&AppEvent::StageStopped(StageId::Sampler));
    }
}
