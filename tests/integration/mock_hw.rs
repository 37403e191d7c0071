//! Mock hardware adapters for integration tests.
//!
//! Every mock records into shared `Arc<Mutex<…>>` state so tests can keep a
//! handle after the adapter has been moved into its stage thread.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dimmer::app::events::AppEvent;
use dimmer::app::ports::{ActuatorPort, EventSink, SensorPort};
use dimmer::control::{DriveCommand, RawSample};
use dimmer::error::{ActuatorError, SensorError};

// ── MockSensor ────────────────────────────────────────────────

/// Plays back a script, then returns `fallback` forever.
pub struct MockSensor {
    script: VecDeque<Result<RawSample, SensorError>>,
    fallback: RawSample,
    delay: Duration,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn constant(value: RawSample) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: value,
            delay: Duration::ZERO,
        }
    }

    pub fn scripted(script: Vec<Result<RawSample, SensorError>>, fallback: RawSample) -> Self {
        Self {
            script: script.into(),
            fallback,
            delay: Duration::ZERO,
        }
    }

    /// Block inside every acquisition, as a stuck converter would.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl SensorPort for MockSensor {
    fn acquire(&mut self) -> Result<RawSample, SensorError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.script.pop_front().unwrap_or(Ok(self.fallback))
    }
}

// ── MockActuator ──────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockActuator {
    applied: Arc<Mutex<Vec<DriveCommand>>>,
    failures_left: Arc<Mutex<u32>>,
}

#[allow(dead_code)]
impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the first `n` commands.
    pub fn failing_first(n: u32) -> Self {
        let a = Self::default();
        *a.failures_left.lock().unwrap() = n;
        a
    }

    pub fn applied(&self) -> Vec<DriveCommand> {
        self.applied.lock().unwrap().clone()
    }

    pub fn applied_count(&self) -> usize {
        self.applied.lock().unwrap().len()
    }
}

impl ActuatorPort for MockActuator {
    fn drive(&mut self, command: &DriveCommand) -> Result<(), ActuatorError> {
        let mut left = self.failures_left.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.applied.lock().unwrap().push(*command);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Poll `cond` every millisecond until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}
