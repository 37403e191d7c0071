//! Periodic release schedule for the sampler.
//!
//! Release instants are computed additively from the previous release,
//! never from "now + period", so time spent sampling does not accumulate
//! as drift:
//!
//! ```text
//!   release:   t0        t0+P       t0+2P      t0+3P
//!              │          │          │          │
//!   work:      ██▌        ███▌       █▌         ██
//!              └─ sleep ──┘└─ sleep ─┘└─ sleep ─┘
//! ```
//!
//! When the sampler finishes a cycle after its next release instant has
//! already passed, the schedule reports a [`DeadlineMiss`] with the
//! lateness and applies the configured [`OverrunPolicy`].

use crate::config::OverrunPolicy;

/// A release instant found already in the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineMiss {
    /// The release instant that was missed (ms, monotonic).
    pub release_ms: u64,
    /// How far past it the sampler was when it checked.
    pub late_by_ms: u64,
    /// Releases dropped by [`OverrunPolicy::SkipMissed`] (0 for `CatchUp`).
    pub skipped: u32,
}

/// What the sampler should do before its next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Release {
    /// The release instant the next cycle belongs to.
    pub at_ms: u64,
    /// Time left until `at_ms` (0 = run immediately).
    pub sleep_ms: u64,
    /// Set when the previous cycle overran its release.
    pub missed: Option<DeadlineMiss>,
}

/// Additive fixed-period release schedule.
#[derive(Debug, Clone)]
pub struct ReleaseSchedule {
    period_ms: u64,
    next_release_ms: u64,
    policy: OverrunPolicy,
}

impl ReleaseSchedule {
    /// Start a schedule whose first cycle runs at `start_ms`; the first
    /// sleep targets `start_ms + period_ms`.
    pub fn new(period_ms: u32, policy: OverrunPolicy, start_ms: u64) -> Self {
        let period_ms = u64::from(period_ms.max(1));
        Self {
            period_ms,
            next_release_ms: start_ms + period_ms,
            policy,
        }
    }

    /// The release instant the schedule is currently waiting for.
    pub fn next_release_ms(&self) -> u64 {
        self.next_release_ms
    }

    /// Call once a cycle's work is done, with the current monotonic time.
    pub fn advance(&mut self, now_ms: u64) -> Release {
        let target = self.next_release_ms;

        if now_ms <= target {
            self.next_release_ms = target + self.period_ms;
            return Release {
                at_ms: target,
                sleep_ms: target - now_ms,
                missed: None,
            };
        }

        let late_by_ms = now_ms - target;
        match self.policy {
            OverrunPolicy::CatchUp => {
                self.next_release_ms = target + self.period_ms;
                Release {
                    at_ms: target,
                    sleep_ms: 0,
                    missed: Some(DeadlineMiss {
                        release_ms: target,
                        late_by_ms,
                        skipped: 0,
                    }),
                }
            }
            OverrunPolicy::SkipMissed => {
                // Earliest grid instant at or after `now_ms`.
                let skipped = late_by_ms.div_ceil(self.period_ms);
                let at_ms = target + skipped * self.period_ms;
                self.next_release_ms = at_ms + self.period_ms;
                Release {
                    at_ms,
                    sleep_ms: at_ms - now_ms,
                    missed: Some(DeadlineMiss {
                        release_ms: target,
                        late_by_ms,
                        skipped: skipped.min(u64::from(u32::MAX)) as u32,
                    }),
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
