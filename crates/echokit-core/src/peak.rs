//! Peak picking over sampled signals and correlation vectors.
//!
//! [`find_one_peak`] returns the global maximum. [`find_peaks`] returns every
//! local maximum above a threshold, thinned so that within any `interval`
//! samples only the strongest peak survives. It runs in four stages:
//!
//! 1. **Derivative** – the slope of every adjacent pair (only its sign
//!    matters, so it is stored as a [`Slope`]).
//! 2. **Plateau repair** – each interior run of flat slopes is split at its
//!    midpoint: the lower half takes the slope just before the run, the upper
//!    half the slope just after. A flat top between a rise and a fall then
//!    registers as one peak at its centre. Runs touching either end of the
//!    slope array cannot hold an interior peak and are left flat.
//! 3. **Candidate scan** – a rise immediately followed by a fall, at a sample
//!    strictly above the threshold.
//! 4. **Suppression** – candidates are visited strongest first (ties in scan
//!    order). Each still-active candidate deactivates every neighbour closer
//!    than `interval`, walking outwards in position order and stopping at the
//!    first neighbour that is far enough away. A deactivated candidate never
//!    suppresses anything.
//!
//! Suppression is greedy in magnitude order, not position order, so two
//! survivors can still sit closer than `interval` when the candidate between
//! them that would have linked them was itself suppressed first.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::cmp::Ordering;

/// Sample types the peak detector can run over.
///
/// Implemented for PCM (`i16`), correlation output (`i64`) and the common
/// integer and float widths in between.
pub trait PeakValue: Copy + PartialOrd {
    /// Value used for the threshold comparison.
    fn to_f64(self) -> f64;
}

macro_rules! impl_peak_value {
    ($($t:ty),*) => {
        $(impl PeakValue for $t {
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

impl_peak_value!(i16, i32, i64, f32, f64);

/// Sign of the difference `samples[i + 1] - samples[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slope {
    /// The next sample is larger.
    Rising,
    /// The next sample is equal (or unordered, for NaN).
    Flat,
    /// The next sample is smaller.
    Falling,
}

/// Threshold and spacing for repeated peak picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDetector {
    /// Peaks must be strictly above this value.
    pub threshold: f64,
    /// Minimum spacing in samples enforced by suppression. Zero or negative
    /// disables suppression.
    pub interval: i64,
}

impl PeakDetector {
    /// Creates a detector.
    pub fn new(threshold: f64, interval: i64) -> Self {
        Self {
            threshold,
            interval,
        }
    }

    /// See [`find_peaks`].
    pub fn find<T: PeakValue>(&self, samples: &[T]) -> Vec<usize> {
        find_peaks(samples, self.threshold, self.interval)
    }

    /// See [`find_one_peak`].
    pub fn find_one<T: PeakValue>(&self, samples: &[T]) -> Option<usize> {
        find_one_peak(samples, self.threshold)
    }
}

/// Index of the global maximum if it is strictly above `threshold`.
///
/// Ties resolve to the lowest index.
///
/// # Example
///
/// ```rust
/// use echokit_core::peak::find_one_peak;
///
/// assert_eq!(find_one_peak(&[1i16, 9, 3, 9], 5.0), Some(1));
/// assert_eq!(find_one_peak(&[1i16, 9, 3, 9], 9.0), None);
/// ```
pub fn find_one_peak<T: PeakValue>(samples: &[T], threshold: f64) -> Option<usize> {
    let (first, rest) = samples.split_first()?;
    let mut peak = 0;
    let mut max = *first;
    for (i, &v) in rest.iter().enumerate() {
        if v > max {
            max = v;
            peak = i + 1;
        }
    }
    (max.to_f64() > threshold).then_some(peak)
}

/// Local maxima above `threshold`, thinned to one per `interval` samples.
///
/// Returns positions in ascending order. Empty or single-sample input, or no
/// candidate above the threshold, yields an empty vector.
///
/// # Example
///
/// ```rust
/// use echokit_core::peak::find_peaks;
///
/// let ramp = [1i16, 2, 3, 4, 5, 6, 7, 6, 5, 4, 3, 2, 1];
/// assert_eq!(find_peaks(&ramp, 1.0, 10), vec![6]);
/// ```
pub fn find_peaks<T: PeakValue>(samples: &[T], threshold: f64, interval: i64) -> Vec<usize> {
    let slopes = repaired_slopes(samples);
    let candidates = scan_candidates(samples, &slopes, threshold);
    let peaks = suppress(samples, &candidates, interval);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        samples = samples.len(),
        candidates = candidates.len(),
        survivors = peaks.len(),
        "find_peaks"
    );

    peaks
}

/// Slopes of `samples` after plateau repair (stages 1 and 2).
pub fn repaired_slopes<T: PeakValue>(samples: &[T]) -> Vec<Slope> {
    let mut slopes: Vec<Slope> = samples
        .windows(2)
        .map(|pair| match pair[1].partial_cmp(&pair[0]) {
            Some(Ordering::Greater) => Slope::Rising,
            Some(Ordering::Less) => Slope::Falling,
            _ => Slope::Flat,
        })
        .collect();
    repair_plateaus(&mut slopes);
    slopes
}

fn repair_plateaus(slopes: &mut [Slope]) {
    let n = slopes.len();
    let mut i = 0;
    while i < n {
        if slopes[i] != Slope::Flat {
            i += 1;
            continue;
        }
        let lo = i;
        while i < n && slopes[i] == Slope::Flat {
            i += 1;
        }
        let hi = i - 1;

        if lo == 0 || hi == n - 1 {
            continue;
        }
        // Neighbours of a maximal run are never flat, and earlier runs only
        // rewrite their own entries.
        let before = slopes[lo - 1];
        let after = slopes[hi + 1];
        let mid = (lo + hi) / 2;
        slopes[lo..=mid].fill(before);
        slopes[mid + 1..=hi].fill(after);
    }
}

fn scan_candidates<T: PeakValue>(samples: &[T], slopes: &[Slope], threshold: f64) -> Vec<usize> {
    slopes
        .windows(2)
        .enumerate()
        .filter(|&(i, pair)| {
            pair[0] == Slope::Rising
                && pair[1] == Slope::Falling
                && samples[i + 1].to_f64() > threshold
        })
        .map(|(i, _)| i + 1)
        .collect()
}

/// `candidates` holds positions in ascending order.
fn suppress<T: PeakValue>(samples: &[T], candidates: &[usize], interval: i64) -> Vec<usize> {
    let n = candidates.len();

    // Stable sort: equal magnitudes keep scan order.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        samples[candidates[b]]
            .partial_cmp(&samples[candidates[a]])
            .unwrap_or(Ordering::Equal)
    });

    let too_close = |a: usize, b: usize| ((candidates[b] - candidates[a]) as i64) < interval;

    let mut active = vec![true; n];
    for &cur in &order {
        if !active[cur] {
            continue;
        }
        for left in (0..cur).rev() {
            if !too_close(left, cur) {
                break;
            }
            active[left] = false;
        }
        for right in cur + 1..n {
            if !too_close(cur, right) {
                break;
            }
            active[right] = false;
        }
    }

    candidates
        .iter()
        .zip(&active)
        .filter_map(|(&pos, &keep)| keep.then_some(pos))
        .collect()
}
