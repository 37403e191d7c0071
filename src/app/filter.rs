//! Filter stage — rolling history and trimmed average.
//!
//! Woken by the sampler→filter handoff.  Each new sample is pushed into the
//! [`History`], the two-pass [`trimmed_mean`] is computed, and the result is
//! published to the filter→actuator handoff.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{HISTORY_DEPTH, PipelineConfig};
use crate::control::{History, RawSample, trimmed_mean};
use crate::diagnostics::PipelineStats;
use crate::handoff::{Handoff, Shutdown, StageId, Wait};

use super::StallWatch;
use super::events::{AppEvent, FilterReport};
use super::ports::EventSink;

pub struct FilterStage<E> {
    history: History<HISTORY_DEPTH>,
    band_percent: u8,
    sink: E,
    input: Arc<Handoff<RawSample>>,
    output: Arc<Handoff<RawSample>>,
    stats: Arc<PipelineStats>,
    stall_timeout: Option<Duration>,
}

impl<E: EventSink> FilterStage<E> {
    pub fn new(
        config: &PipelineConfig,
        sink: E,
        input: Arc<Handoff<RawSample>>,
        output: Arc<Handoff<RawSample>>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            history: History::new(),
            band_percent: config.band_percent,
            sink,
            input,
            output,
            stats,
            stall_timeout: config.stall_timeout_ms.map(|ms| Duration::from_millis(ms.into())),
        }
    }

    pub fn history(&self) -> &History<HISTORY_DEPTH> {
        &self.history
    }

    /// Fold one sample in, publish the filtered value, and return it.
    pub fn process(&mut self, sample: RawSample) -> RawSample {
        self.history.push(sample);
        let result = trimmed_mean(&self.history, self.band_percent);

        self.output.publish(result.value);
        PipelineStats::bump(&self.stats.filter_cycles);
        self.sink.emit(&AppEvent::Filtered(FilterReport {
            sample,
            baseline: result.baseline,
            value: result.value,
            rejected: result.rejected,
        }));

        result.value
    }

    /// Run until shutdown.
    pub fn run(mut self, shutdown: &Shutdown) {
        self.sink.emit(&AppEvent::StageStarted(StageId::Filter));
        let mut stall = StallWatch::new(StageId::Filter, self.stall_timeout);

        while !shutdown.is_requested() {
            match self.input.wait(shutdown, StageId::Filter, self.stall_timeout) {
                Wait::Received(sample) => {
                    stall.reset();
                    self.process(sample);
                }
                Wait::TimedOut => stall.report(&self.stats, &mut self.sink),
                Wait::Cancelled => break,
            }
        }

        self.sink.emit(&AppEvent::StageStopped(StageId::Filter));
    }
}
