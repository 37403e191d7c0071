//! Runtime pipeline counters.
//!
//! One [`PipelineStats`] is shared (via `Arc`) by all three stages.  Every
//! counter has a single writer stage, so relaxed atomics are enough; a
//! [`StatsSnapshot`] is a consistent-enough copy for logging.
//!
//! Counters are `AtomicU32`: the Xtensa cores have no 64-bit atomics.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct PipelineStats {
    // Sampler
    pub samples_acquired: AtomicU32,
    pub samples_rejected: AtomicU32,
    pub samples_failed: AtomicU32,
    pub deadline_misses: AtomicU32,
    pub worst_lateness_ms: AtomicU32,
    // Filter
    pub filter_cycles: AtomicU32,
    // Actuator
    pub commands_issued: AtomicU32,
    pub commands_failed: AtomicU32,
    // Filter + actuator waits
    pub stalls: AtomicU32,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_lateness(&self, late_by_ms: u64) {
        Self::bump(&self.deadline_misses);
        let late = late_by_ms.min(u64::from(u32::MAX)) as u32;
        self.worst_lateness_ms.fetch_max(late, Ordering::Relaxed);
    }

    /// Sampler cycles completed, whether or not the reading was valid.
    pub fn sampler_cycles(&self) -> u64 {
        u64::from(self.samples_acquired.load(Ordering::Relaxed))
            + u64::from(self.samples_rejected.load(Ordering::Relaxed))
            + u64::from(self.samples_failed.load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            samples_acquired: self.samples_acquired.load(Ordering::Relaxed),
            samples_rejected: self.samples_rejected.load(Ordering::Relaxed),
            samples_failed: self.samples_failed.load(Ordering::Relaxed),
            deadline_misses: self.deadline_misses.load(Ordering::Relaxed),
            worst_lateness_ms: self.worst_lateness_ms.load(Ordering::Relaxed),
            filter_cycles: self.filter_cycles.load(Ordering::Relaxed),
            commands_issued: self.commands_issued.load(Ordering::Relaxed),
            commands_failed: self.commands_failed.load(Ordering::Relaxed),
            stalls: self.stalls.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub samples_acquired: u32,
    pub samples_rejected: u32,
    pub samples_failed: u32,
    pub deadline_misses: u32,
    pub worst_lateness_ms: u32,
    pub filter_cycles: u32,
    pub commands_issued: u32,
    pub commands_failed: u32,
    pub stalls: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lateness_keeps_worst_case() {
        let stats = PipelineStats::new();
        stats.record_lateness(40);
        stats.record_lateness(15);
        stats.record_lateness(90);
        let snap = stats.snapshot();
        assert_eq!(snap.deadline_misses, 3);
        assert_eq!(snap.worst_lateness_ms, 90);
    }

    #[test]
    fn sampler_cycles_count_rejections() {
        let stats = PipelineStats::new();
        PipelineStats::bump(&stats.samples_acquired);
        PipelineStats::bump(&stats.samples_acquired);
        PipelineStats::bump(&stats.samples_rejected);
        PipelineStats::bump(&stats.samples_failed);
        assert_eq!(stats.sampler_cycles(), 4);
    }

    #[test]
    fn sampler_cycles_do_not_overflow_at_counter_limit() {
        let stats = PipelineStats::new();
        stats.samples_acquired.store(u32::MAX, Ordering::Relaxed);
        stats.samples_rejected.store(u32::MAX, Ordering::Relaxed);
        PipelineStats::bump(&stats.samples_failed);
        assert_eq!(stats.sampler_cycles(), 2 * u64::from(u32::MAX) + 1);
    }

    #[test]
    fn snapshot_serialises_to_json() {
        let stats = PipelineStats::new();
        PipelineStats::bump(&stats.commands_issued);
        let json = serde_json::to_string(&stats.snapshot()).unwrap();
        assert!(json.contains("\"commands_issued\":1"));
    }
}
