//! Sliding matched filter between a recording and a known reference.
//!
//! ```text
//! cof[i] = Σ_j target[j] · origin[i + j],   i ∈ [0, len(origin) - len(target)]
//! ```
//!
//! The sum is unnormalised: its magnitude grows with signal energy, so
//! callers comparing segments of different energy normalise externally.
//! Products of two `i16` fit comfortably in `i64`; accumulation saturates so
//! that a pathological input can never wrap into a phantom peak.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use libm::round;

use crate::error::{Error, Result};

/// Computes the sliding dot product of `target` over `origin`.
///
/// The result has `origin.len() - target.len() + 1` entries; entry `i` is the
/// alignment score with the reference starting at sample `i`.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `target` is empty or longer than `origin`.
///
/// # Example
///
/// ```rust
/// use echokit_core::xcorr::correlate;
///
/// assert_eq!(correlate(&[1, 2, 3], &[1, 2, 3]).unwrap(), vec![14]);
/// ```
pub fn correlate(origin: &[i16], target: &[i16]) -> Result<Vec<i64>> {
    if target.is_empty() {
        return Err(Error::InvalidInput("correlation target is empty"));
    }
    if target.len() > origin.len() {
        return Err(Error::InvalidInput(
            "correlation target is longer than the origin",
        ));
    }

    Ok(origin
        .windows(target.len())
        .map(|window| dot(window, target))
        .collect())
}

/// Returns the first lag attaining the maximum correlation, with its score.
pub fn best_lag(correlation: &[i64]) -> Option<(usize, i64)> {
    let mut best: Option<(usize, i64)> = None;
    for (i, &v) in correlation.iter().enumerate() {
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best
}

/// Rounds to the nearest integer and saturates at the `i16` bounds.
///
/// NaN maps to zero.
#[inline]
pub fn saturate_i16(value: f64) -> i16 {
    // `as` on floats saturates and sends NaN to 0
    round(value) as i16
}

#[inline]
fn dot(window: &[i16], target: &[i16]) -> i64 {
    window
        .iter()
        .zip(target)
        .fold(0i64, |acc, (&o, &t)| {
            acc.saturating_add(i64::from(o) * i64::from(t))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_short_sequences() {
        assert_eq!(correlate(&[1, 2, 3], &[1, 2, 3]).unwrap(), vec![14]);
    }

    #[test]
    fn output_length() {
        let origin = [0i16; 100];
        let target = [1i16; 10];
        assert_eq!(correlate(&origin, &target).unwrap().len(), 91);
    }

    #[test]
    fn target_longer_than_origin_is_rejected() {
        assert!(matches!(
            correlate(&[1, 2], &[1, 2, 3]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_target_is_rejected() {
        assert!(matches!(correlate(&[1, 2], &[]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn finds_embedded_template() {
        let template = [3i16, -7, 12, -4, 9];
        let mut origin = vec![0i16; 64];
        origin[40..45].copy_from_slice(&template);

        let cof = correlate(&origin, &template).unwrap();
        let (lag, score) = best_lag(&cof).unwrap();
        assert_eq!(lag, 40);
        assert_eq!(score, 9 + 49 + 144 + 16 + 81);
    }

    #[test]
    fn full_scale_does_not_overflow() {
        let origin = vec![i16::MIN; 4096];
        let target = vec![i16::MIN; 4096];
        let cof = correlate(&origin, &target).unwrap();
        assert_eq!(cof, vec![4096 * (1i64 << 30)]);
    }

    #[test]
    fn best_lag_prefers_first_maximum() {
        assert_eq!(best_lag(&[1, 5, 3, 5]), Some((1, 5)));
        assert_eq!(best_lag(&[]), None);
        assert_eq!(best_lag(&[-4, -2, -9]), Some((1, -2)));
    }

    #[test]
    fn saturation_instead_of_wrapping() {
        assert_eq!(saturate_i16(40_000.0), i16::MAX);
        assert_eq!(saturate_i16(-40_000.0), i16::MIN);
        assert_eq!(saturate_i16(1.5), 2);
        assert_eq!(saturate_i16(-1.5), -2);
        assert_eq!(saturate_i16(f64::NAN), 0);
    }
}
