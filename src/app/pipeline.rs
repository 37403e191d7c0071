//! Pipeline composition — wires the three stages and owns their threads.
//!
//! ```text
//!  SensorPort ──▶ Sampler ──[raw]──▶ Filter ──[filtered]──▶ Actuator ──▶ ActuatorPort
//!                    │                  │                      │
//!                    └──────────── EventSink / PipelineStats ──┘
//! ```
//!
//! Consumers are spawned before producers (actuator, filter, sampler), so
//! the first value the sampler publishes always has a waiting receiver.

use std::sync::Arc;
use std::thread::JoinHandle;

use log::{error, info};

use crate::config::PipelineConfig;
use crate::control::RawSample;
use crate::diagnostics::{PipelineStats, StatsSnapshot};
use crate::drivers::task_pin::{self, Core};
use crate::error::{Error, Result};
use crate::handoff::{Handoff, Shutdown, StageId};

use super::actuator::ActuatorStage;
use super::filter::FilterStage;
use super::ports::{ActuatorPort, EventSink, SensorPort, TimePort};
use super::sampler::Sampler;

/// All three stages share one priority so none starves the others.
const STAGE_PRIORITY: u8 = 5;
const STAGE_STACK_KB: usize = 8;

pub struct Pipeline;

impl Pipeline {
    /// Validate `config`, then start the actuator, filter and sampler
    /// threads in that order.
    ///
    /// If any spawn fails the already-running stages are shut down and
    /// joined before the error is returned.
    pub fn spawn<S, A, E, C>(
        config: PipelineConfig,
        sensor: S,
        actuator: A,
        sink: E,
        clock: C,
    ) -> Result<PipelineHandle>
    where
        S: SensorPort + Send + 'static,
        A: ActuatorPort + Send + 'static,
        E: EventSink + Clone + Send + 'static,
        C: TimePort + Send + 'static,
    {
        config.validate()?;

        let raw: Arc<Handoff<RawSample>> = Arc::new(Handoff::new());
        let filtered: Arc<Handoff<RawSample>> = Arc::new(Handoff::new());
        let mut handle = PipelineHandle {
            shutdown: Arc::new(Shutdown::new()),
            stats: Arc::new(PipelineStats::new()),
            threads: Vec::with_capacity(StageId::ALL.len()),
        };

        let stage = ActuatorStage::new(
            &config,
            actuator,
            sink.clone(),
            filtered.clone(),
            handle.stats.clone(),
        );
        let token = handle.shutdown.clone();
        handle.start(StageId::Actuator, "actuator\0", move || stage.run(&token))?;

        let stage = FilterStage::new(
            &config,
            sink.clone(),
            raw.clone(),
            filtered,
            handle.stats.clone(),
        );
        let token = handle.shutdown.clone();
        handle.start(StageId::Filter, "filter\0", move || stage.run(&token))?;

        let stage = Sampler::new(&config, sensor, sink, raw, handle.stats.clone());
        let token = handle.shutdown.clone();
        handle.start(StageId::Sampler, "sampler\0", move || stage.run(&clock, &token))?;

        info!(
            "Pipeline running: period={}ms band=±{}% policy={:?}",
            config.sample_period_ms, config.band_percent, config.overrun_policy
        );
        Ok(handle)
    }
}

/// Owner of the running stage threads.
///
/// Dropping the handle detaches the stages; call [`shutdown`](Self::shutdown)
/// to stop them.
pub struct PipelineHandle {
    shutdown: Arc<Shutdown>,
    stats: Arc<PipelineStats>,
    threads: Vec<(StageId, JoinHandle<()>)>,
}

impl PipelineHandle {
    fn start<F>(&mut self, stage: StageId, name: &'static str, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        match task_pin::spawn_on_core(Core::App, STAGE_PRIORITY, STAGE_STACK_KB, name, f) {
            Ok(thread) => {
                self.threads.push((stage, thread));
                Ok(())
            }
            Err(e) => {
                error!("Failed to spawn {} stage: {}", stage.name(), e);
                self.shutdown.trigger();
                // Whatever the join reports, the spawn failure is the error to surface.
                let _ = self.join_all();
                Err(Error::Init("stage thread spawn failed"))
            }
        }
    }

    /// Live counters shared with the stages.
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// A clone of the cancellation token, e.g. for a signal handler.
    pub fn shutdown_token(&self) -> Arc<Shutdown> {
        self.shutdown.clone()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.trigger();
    }

    pub fn is_running(&self) -> bool {
        self.threads.iter().any(|(_, t)| !t.is_finished())
    }

    /// Block until every stage has returned.  Does not request shutdown.
    pub fn join(mut self) -> Result<StatsSnapshot> {
        self.join_all()?;
        Ok(self.stats.snapshot())
    }

    /// Request shutdown and join.
    pub fn shutdown(self) -> Result<StatsSnapshot> {
        self.request_shutdown();
        self.join()
    }

    fn join_all(&mut self) -> Result<()> {
        let mut outcome = Ok(());
        for (stage, thread) in self.threads.drain(..) {
            if thread.join().is_err() {
                error!("{} stage panicked", stage.name());
                outcome = Err(Error::StagePanicked(stage));
            }
        }
        outcome
    }
}
