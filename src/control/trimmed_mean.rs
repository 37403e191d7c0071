//! Two-pass outlier-trimmed average.
//!
//! Pass 1 averages every nonzero entry, so the zero-filled slots of a
//! freshly started history do not drag the result toward zero.  Pass 2
//! averages only the entries inside `avg1 ± band_percent %` of that
//! baseline, rejecting spikes.  Entries exactly on a band edge are kept.
//!
//! Both passes use truncating integer division, and an empty pass yields 0
//! rather than an error.  The band test is done in integer arithmetic
//! (`v * 100` against `avg1 * (100 ± band)`) so the edges are exact.

use heapless::Vec;

use super::RawSample;
use super::history::History;

/// Result of one filter computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedMean<const N: usize> {
    /// Pass-1 average over nonzero entries.
    pub baseline: RawSample,
    /// Pass-2 average over entries inside the band: the filtered value.
    pub value: RawSample,
    /// Number of entries that contributed to `value`.
    pub kept: usize,
    /// Entries that fell outside the band, most recent first.
    pub rejected: Vec<RawSample, N>,
}

/// Compute the trimmed average of `history`.
///
/// Pure function of its inputs: calling it twice on the same history gives
/// the same result.
pub fn trimmed_mean<const N: usize>(history: &History<N>, band_percent: u8) -> TrimmedMean<N> {
    let samples = history.as_array();

    // Pass 1: ignore exact zeros (cold-start slots).
    let (sum, count) = samples
        .iter()
        .filter(|&&s| s != 0)
        .fold((0u32, 0u32), |(sum, count), &s| (sum + u32::from(s), count + 1));
    let baseline = average(sum, count);

    // Pass 2: keep entries on or inside the band around the baseline.
    let band = u32::from(band_percent.min(100));
    let low = u32::from(baseline) * (100 - band);
    let high = u32::from(baseline) * (100 + band);

    let mut sum = 0u32;
    let mut count = 0u32;
    let mut rejected = Vec::new();
    for &s in samples {
        let scaled = u32::from(s) * 100;
        if scaled < low || scaled > high {
            // Capacity equals the history depth, so this cannot overflow.
            let _ = rejected.push(s);
        } else {
            sum += u32::from(s);
            count += 1;
        }
    }

    TrimmedMean {
        baseline,
        value: average(sum, count),
        kept: count as usize,
        rejected,
    }
}

fn average(sum: u32, count: u32) -> RawSample {
    if count == 0 {
        0
    } else {
        (sum / count) as RawSample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of<const N: usize>(newest_first: [RawSample; N]) -> History<N> {
        let mut h = History::new();
        for &s in newest_first.iter().rev() {
            h.push(s);
        }
        h
    }

    #[test]
    fn all_zero_history_yields_zero() {
        let h: History<10> = History::new();
        let t = trimmed_mean(&h, 10);
        assert_eq!(t.baseline, 0);
        assert_eq!(t.value, 0);
        assert!(t.rejected.is_empty());
    }

    #[test]
    fn cold_start_zeros_do_not_drag_average() {
        let mut h: History<10> = History::new();
        h.push(500);
        let t = trimmed_mean(&h, 10);
        assert_eq!(t.baseline, 500);
        assert_eq!(t.value, 500);
        assert_eq!(t.kept, 1);
        assert_eq!(t.rejected.len(), 9);
    }

    #[test]
    fn single_spike_can_push_band_past_every_entry() {
        let h = history_of([100, 100, 100, 100, 100, 100, 100, 100, 100, 1000]);
        let t = trimmed_mean(&h, 10);
        // (900 + 1000) / 10 = 190, band [171, 209] holds nothing.
        assert_eq!(t.baseline, 190);
        assert_eq!(t.value, 0);
        assert_eq!(t.kept, 0);
        assert_eq!(t.rejected.len(), 10);
    }

    #[test]
    fn moderate_spike_is_rejected() {
        let h = history_of([500, 500, 500, 500, 500, 500, 500, 500, 500, 600]);
        let t = trimmed_mean(&h, 10);
        // baseline 510, band [459, 561]: the 600 is out, the 500s are in.
        assert_eq!(t.baseline, 510);
        assert_eq!(t.value, 500);
        assert_eq!(t.rejected.as_slice(), &[600]);
    }

    #[test]
    fn band_edges_are_inclusive() {
        // baseline (90 + 110 + 100) / 3 = 100, band [90, 110].
        let h = history_of([90, 110, 100]);
        let t = trimmed_mean(&h, 10);
        assert_eq!(t.baseline, 100);
        assert_eq!(t.kept, 3);
        assert_eq!(t.value, 100);

        // Just outside each edge: baseline (89 + 111 + 100) / 3 = 100.
        let h = history_of([89, 111, 100]);
        let t = trimmed_mean(&h, 10);
        assert_eq!(t.baseline, 100);
        assert_eq!(t.kept, 1);
        assert_eq!(t.rejected.as_slice(), &[89, 111]);
    }

    #[test]
    fn truncating_division() {
        let h = history_of([101, 100, 100]);
        let t = trimmed_mean(&h, 10);
        assert_eq!(t.baseline, 100);
        assert_eq!(t.value, 100);
    }

    #[test]
    fn repeated_computation_is_stable() {
        let h = history_of([512, 0, 498, 900, 505, 0, 0, 510, 1, 499]);
        let first = trimmed_mean(&h, 10);
        let second = trimmed_mean(&h, 10);
        assert_eq!(first, second);
    }
}
