//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing pipeline events through the `log`
//! facade: the ESP-IDF logger on target (UART / USB-CDC), the tracing
//! subscriber on host.  It is stateless, so each stage gets its own copy.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::SensorError;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::StageStarted(stage) => {
                info!("STAGE | {} started", stage.name());
            }
            AppEvent::StageStopped(stage) => {
                info!("STAGE | {} stopped", stage.name());
            }
            AppEvent::SampleAcquired(raw) => {
                info!("SAMPLE | raw={}", raw);
            }
            AppEvent::SampleRejected {
                error: error @ SensorError::OutOfRange { .. },
                retained,
            } => {
                warn!("SAMPLE | rejected: {} | keeping {}", error, retained);
            }
            AppEvent::SampleRejected { error, retained } => {
                warn!("SAMPLE | acquisition failed: {} | keeping {}", error, retained);
            }
            AppEvent::DeadlineMissed(miss) => {
                warn!(
                    "DEADLINE | release @{}ms missed by {}ms (skipped {})",
                    miss.release_ms, miss.late_by_ms, miss.skipped
                );
            }
            AppEvent::Filtered(report) => {
                info!(
                    "FILTER | sample={} | avg={} | trimmed={} | rejected={:?}",
                    report.sample,
                    report.baseline,
                    report.value,
                    report.rejected.as_slice(),
                );
            }
            AppEvent::DriveIssued { command, pulse_us } => {
                info!(
                    "DRIVE | level={}/{} | duty={}% | pulse={}us",
                    command.level(),
                    command.full_scale(),
                    command.duty_percent(),
                    pulse_us,
                );
            }
            AppEvent::DriveFailed { command, error } => {
                warn!(
                    "DRIVE | {} | dropped level={}/{}",
                    error,
                    command.level(),
                    command.full_scale()
                );
            }
            AppEvent::StageStalled { stage, waited_ms } => {
                warn!("STAGE | {} stalled: no input for {}ms", stage.name(), waited_ms);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use log::{Level, LevelFilter, Log, Metadata, Record};

    struct Capture(Mutex<Vec<(Level, String)>>);

    impl Log for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            self.0.lock().unwrap().push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn every_stage_value_logs_at_info() {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Trace);

        let mut sink = LogEventSink::new();
        sink.emit(&AppEvent::SampleAcquired(612));

        let lines = CAPTURE.0.lock().unwrap();
        let sample = lines.iter().find(|(_, msg)| msg == "SAMPLE | raw=612");
        assert_eq!(sample.map(|(level, _)| *level), Some(Level::Info));
    }
}
