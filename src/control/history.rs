//! Fixed-depth rolling history of raw samples.

use super::RawSample;

/// The last `N` samples, newest at index 0.
///
/// Always exactly `N` long: it starts zero-filled, and a push rotates the
/// whole array right by one slot before overwriting slot 0, so the entry
/// that was in the last slot is the one discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<const N: usize> {
    samples: [RawSample; N],
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> History<N> {
    pub const fn new() -> Self {
        Self { samples: [0; N] }
    }

    /// Insert the newest sample at the front.
    pub fn push(&mut self, sample: RawSample) {
        if N == 0 {
            return;
        }
        self.samples.rotate_right(1);
        self.samples[0] = sample;
    }

    /// Most-recent-first view of every slot.
    pub fn as_array(&self) -> &[RawSample; N] {
        &self.samples
    }

    pub fn newest(&self) -> Option<RawSample> {
        self.samples.first().copied()
    }

    pub const fn depth(&self) -> usize {
        N
    }
}
