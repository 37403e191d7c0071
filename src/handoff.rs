//! Inter-stage handoff signals and the shared shutdown token.
//!
//! Each handoff is an `embassy-sync` [`Signal`]: a single slot that holds
//! the latest published value.  Publishing overwrites the slot and wakes
//! the one consumer; waiting takes the value and clears the slot.  The
//! value travels inside the signal's mutex, so a consumer that wakes up
//! always sees the complete write that preceded the notification.
//!
//! ```text
//! ┌──────────┐ Handoff<RawSample> ┌──────────┐ Handoff<RawSample> ┌──────────┐
//! │ Sampler  │───────────────────▶│  Filter  │───────────────────▶│ Actuator │
//! └──────────┘                    └──────────┘                    └──────────┘
//!       ▲                               ▲                               ▲
//!       └───────────── Shutdown (one wake slot per stage) ──────────────┘
//! ```
//!
//! The signal is level-triggered, not a queue: two publishes before one
//! wait collapse into a single pending generation carrying the second
//! value.  A producer running faster than its consumer therefore loses
//! intermediate values but never the latest one.
//!
//! Blocking waits run the futures on the calling thread with
//! `futures_lite::future::block_on`; timeouts use `async-io-mini`
//! reactor timers, so nothing spins.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future;

// ───────────────────────────────────────────────────────────────
// Stage identity
// ───────────────────────────────────────────────────────────────

/// The three pipeline stages.  Each owns one shutdown wake slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StageId {
    Sampler = 0,
    Filter = 1,
    Actuator = 2,
}

impl StageId {
    pub const ALL: [StageId; 3] = [StageId::Sampler, StageId::Filter, StageId::Actuator];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sampler => "sampler",
            Self::Filter => "filter",
            Self::Actuator => "actuator",
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Shutdown token
// ───────────────────────────────────────────────────────────────

/// Cancellation token checked at every suspension point.
///
/// `trigger()` sets the flag and fires every stage's wake slot, so a
/// stage blocked in a sleep or a handoff wait returns promptly.  Each
/// stage only ever waits on its own slot.
pub struct Shutdown {
    requested: AtomicBool,
    wake: [Signal<CriticalSectionRawMutex, ()>; 3],
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
            wake: [Signal::new(), Signal::new(), Signal::new()],
        }
    }

    /// Request shutdown.  Idempotent.
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::Release);
        for slot in &self.wake {
            slot.signal(());
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Resolves once shutdown has been requested.
    pub async fn cancelled(&self, stage: StageId) {
        if self.is_requested() {
            return;
        }
        self.wake[stage as usize].wait().await;
    }

    /// Sleep for `duration` unless shutdown arrives first.
    ///
    /// Returns `true` if the full duration elapsed, `false` if cancelled.
    pub fn sleep(&self, stage: StageId, duration: Duration) -> bool {
        if self.is_requested() {
            return false;
        }
        if duration.is_zero() {
            return true;
        }
        future::block_on(future::or(
            async {
                self.cancelled(stage).await;
                false
            },
            async {
                async_io_mini::Timer::after(duration).await;
                true
            },
        ))
    }
}

// ───────────────────────────────────────────────────────────────
// Handoff
// ───────────────────────────────────────────────────────────────

/// Outcome of a blocking [`Handoff::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait<T> {
    /// A new value was published.
    Received(T),
    /// Nothing arrived within the timeout.  The caller may wait again.
    TimedOut,
    /// Shutdown was requested.
    Cancelled,
}

/// Single-slot, level-triggered producer→consumer handoff.
pub struct Handoff<T> {
    slot: Signal<CriticalSectionRawMutex, T>,
}

impl<T: Send> Default for Handoff<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> Handoff<T> {
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Store `value` and wake the consumer.  Overwrites any value the
    /// consumer has not taken yet.
    pub fn publish(&self, value: T) {
        self.slot.signal(value);
    }

    /// Whether a published value is waiting to be taken.
    pub fn is_pending(&self) -> bool {
        self.slot.signaled()
    }

    /// Take the pending value without blocking.
    pub fn try_take(&self) -> Option<T> {
        self.slot.try_take()
    }

    /// Block until a value is published, the timeout elapses, or
    /// shutdown is requested.
    ///
    /// A pending value is returned even if shutdown was requested in the
    /// meantime; callers check [`Shutdown::is_requested`] at the top of
    /// their loop.
    pub fn wait(&self, shutdown: &Shutdown, stage: StageId, timeout: Option<Duration>) -> Wait<T> {
        if let Some(value) = self.slot.try_take() {
            return Wait::Received(value);
        }
        if shutdown.is_requested() {
            return Wait::Cancelled;
        }

        future::block_on(future::or(
            async { Wait::Received(self.slot.wait().await) },
            future::or(
                async {
                    shutdown.cancelled(stage).await;
                    Wait::Cancelled
                },
                async {
                    match timeout {
                        Some(t) => {
                            async_io_mini::Timer::after(t).await;
                            Wait::TimedOut
                        }
                        None => core::future::pending().await,
                    }
                },
            ),
        ))
    }
}
