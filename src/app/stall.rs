//! Stall accounting for the two waiting stages.

use std::time::Duration;

use crate::diagnostics::PipelineStats;
use crate::handoff::StageId;

use super::events::AppEvent;
use super::ports::EventSink;

/// Tracks how long a stage has gone without upstream data.
///
/// Each timed-out wait adds one timeout's worth to the running total; a
/// received value clears it.
pub(crate) struct StallWatch {
    stage: StageId,
    timeout_ms: u32,
    waited_ms: u32,
}

impl StallWatch {
    pub(crate) fn new(stage: StageId, timeout: Option<Duration>) -> Self {
        let timeout_ms = timeout.map_or(0, |t| u32::try_from(t.as_millis()).unwrap_or(u32::MAX));
        Self {
            stage,
            timeout_ms,
            waited_ms: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.waited_ms = 0;
    }

    pub(crate) fn report<E: EventSink>(&mut self, stats: &PipelineStats, sink: &mut E) {
        self.waited_ms = self.waited_ms.saturating_add(self.timeout_ms);
        PipelineStats::bump(&stats.stalls);
        sink.emit(&AppEvent::StageStalled {
            stage: self.stage,
            waited_ms: self.waited_ms,
        });
    }
}
