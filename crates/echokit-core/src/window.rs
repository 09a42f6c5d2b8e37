//! Window functions for 16-bit PCM segments.
//!
//! Both windows return a new `f64` buffer; the input samples are never
//! modified.
//!
//! | Window    | Weight                                  | Denominator |
//! |-----------|-----------------------------------------|-------------|
//! | Hann      | `0.5 * (1 - cos(2πj / size))`           | `size`      |
//! | Hamming   | `0.54 - 0.46 * cos(2πi / (size - 1))`   | `size - 1`  |
//!
//! The Hann window is periodic (its denominator is the window length), the
//! Hamming window is symmetric.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::f64::consts::PI;
use libm::cos;

use crate::error::{Error, Result};

/// Applies a Hann window to `signal[pos..pos + size]`.
///
/// The output has the same length as `signal`. Entries outside the window
/// are zero.
///
/// # Errors
///
/// [`Error::OutOfRange`] if `pos + size` exceeds `signal.len()`.
///
/// # Example
///
/// ```rust
/// use echokit_core::window::hann;
///
/// let signal = [100i16; 8];
/// let out = hann(&signal, 2, 4).unwrap();
/// assert_eq!(out.len(), 8);
/// assert_eq!(out[0], 0.0);
/// assert!((out[4] - 100.0).abs() < 1e-9);
/// ```
pub fn hann(signal: &[i16], pos: usize, size: usize) -> Result<Vec<f64>> {
    let end = pos.checked_add(size).ok_or(Error::OutOfRange {
        end: usize::MAX,
        len: signal.len(),
    })?;
    if end > signal.len() {
        return Err(Error::OutOfRange {
            end,
            len: signal.len(),
        });
    }

    let mut out = vec![0.0; signal.len()];
    for (j, i) in (pos..end).enumerate() {
        out[i] = f64::from(signal[i]) * hann_weight(j, size);
    }
    Ok(out)
}

/// Applies a symmetric Hamming window to the whole of `signal`.
///
/// `size` must equal `signal.len()`; the weight array is built for exactly
/// the segment that is passed in.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `size != signal.len()`.
pub fn hamming(signal: &[i16], size: usize) -> Result<Vec<f64>> {
    if size != signal.len() {
        return Err(Error::InvalidInput(
            "hamming window size must equal the segment length",
        ));
    }

    Ok(signal
        .iter()
        .zip(hamming_coefficients(size))
        .map(|(&s, w)| f64::from(s) * w)
        .collect())
}

/// Periodic Hann weights of length `size`.
pub fn hann_coefficients(size: usize) -> Vec<f64> {
    (0..size).map(|j| hann_weight(j, size)).collect()
}

/// Symmetric Hamming weights of length `size`.
///
/// A single-point window has weight 1.0 (the formula divides by zero there)
/// and an empty window has no weights.
pub fn hamming_coefficients(size: usize) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0; size];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|i| 0.54 - 0.46 * cos(2.0 * PI * i as f64 / denom))
        .collect()
}

#[inline]
fn hann_weight(j: usize, size: usize) -> f64 {
    0.5 * (1.0 - cos(2.0 * PI * j as f64 / size as f64))
}
