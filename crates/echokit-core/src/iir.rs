//! Recursive (IIR) filtering in Direct Form I.
//!
//! The filter keeps two histories, newest first:
//!
//! ```text
//! x[0..len(b)]     raw inputs
//! y[0..len(a)-1]   previous outputs
//!
//! y[n] = Σ_j b[j]·x[j] - Σ_j a[j+1]·y[j]
//! ```
//!
//! Coefficients come from a [`FilterDesign`] implementation; this module
//! never designs filters itself. History lives in a [`DirectFormI`] value
//! that the caller owns, so independent filtering calls (including calls on
//! different threads) cannot interfere. The free functions [`filter`],
//! [`band_pass`], [`high_pass`] and [`low_pass`] build a fresh state for each
//! call and drop it on return.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::{Error, Result};
use crate::xcorr::saturate_i16;

/// Response shape requested from a [`FilterDesign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassType {
    /// Pass between two cutoffs.
    Bandpass,
    /// Pass above the cutoff.
    Highpass,
    /// Pass below the cutoff.
    Lowpass,
}

/// Transfer function coefficients.
///
/// `a` holds the feedback side (`a[0]` is conventionally 1 and is not used by
/// the recurrence), `b` the feedforward side.
#[derive(Debug, Clone, PartialEq)]
pub struct IirCoefficients {
    /// Feedback coefficients.
    pub a: Vec<f64>,
    /// Feedforward coefficients.
    pub b: Vec<f64>,
}

impl IirCoefficients {
    /// Wraps a coefficient pair after checking it can drive a filter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if either side is empty or holds a non-finite
    /// value.
    pub fn new(a: Vec<f64>, b: Vec<f64>) -> Result<Self> {
        let coeffs = Self { a, b };
        coeffs.validate()?;
        Ok(coeffs)
    }

    /// Number of feedback taps that reach back into the output history.
    pub fn order(&self) -> usize {
        self.a.len().saturating_sub(1)
    }

    fn validate(&self) -> Result<()> {
        if self.a.is_empty() || self.b.is_empty() {
            return Err(Error::InvalidInput("filter coefficients must be non-empty"));
        }
        if !self.a.iter().chain(&self.b).all(|c| c.is_finite()) {
            return Err(Error::InvalidInput("filter coefficients must be finite"));
        }
        Ok(())
    }
}

/// Source of filter coefficients.
///
/// `low` and `high` are cutoffs already divided by the sample rate, so they
/// lie in `(0, 0.5)`. Single-cutoff designs receive the same value twice and
/// are expected to read `low`.
pub trait FilterDesign {
    /// Designs a filter of the given pass type and order.
    fn design(&self, pass: PassType, order: usize, low: f64, high: f64) -> Result<IirCoefficients>;
}

impl<D: FilterDesign + ?Sized> FilterDesign for &D {
    fn design(&self, pass: PassType, order: usize, low: f64, high: f64) -> Result<IirCoefficients> {
        (**self).design(pass, order, low, high)
    }
}

/// Direct Form I filter state.
#[derive(Debug, Clone)]
pub struct DirectFormI {
    coeffs: IirCoefficients,
    /// Input history, newest first.
    x: Vec<f64>,
    /// Output history, newest first.
    y: Vec<f64>,
}

impl DirectFormI {
    /// Creates a filter with zeroed history.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the coefficients are empty or non-finite.
    pub fn new(coeffs: IirCoefficients) -> Result<Self> {
        coeffs.validate()?;
        let x = vec![0.0; coeffs.b.len()];
        let y = vec![0.0; coeffs.order()];
        Ok(Self { coeffs, x, y })
    }

    /// The coefficients driving this filter.
    pub fn coefficients(&self) -> &IirCoefficients {
        &self.coeffs
    }

    /// Feeds one sample and returns the unrounded output.
    #[inline]
    pub fn process(&mut self, sample: f64) -> f64 {
        self.x.rotate_right(1);
        self.x[0] = sample;

        let feedforward: f64 = self.coeffs.b.iter().zip(&self.x).map(|(b, x)| b * x).sum();
        let feedback: f64 = self.coeffs.a[1..]
            .iter()
            .zip(&self.y)
            .map(|(a, y)| a * y)
            .sum();
        let out = feedforward - feedback;

        if !self.y.is_empty() {
            self.y.rotate_right(1);
            self.y[0] = out;
        }
        out
    }

    /// Filters a PCM block, rounding and saturating each output to `i16`.
    ///
    /// History carries over between blocks; call [`Self::reset`] to start
    /// from silence.
    pub fn process_pcm(&mut self, samples: &[i16]) -> Vec<i16> {
        samples
            .iter()
            .map(|&s| saturate_i16(self.process(f64::from(s))))
            .collect()
    }

    /// Zeroes both histories.
    pub fn reset(&mut self) {
        self.x.fill(0.0);
        self.y.fill(0.0);
    }
}

/// Filters `samples` with a fresh, zeroed state.
pub fn filter(samples: &[i16], coeffs: &IirCoefficients) -> Result<Vec<i16>> {
    let mut state = DirectFormI::new(coeffs.clone())?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        samples = samples.len(),
        order = coeffs.order(),
        "iir filter"
    );

    Ok(state.process_pcm(samples))
}

/// Band-pass filters PCM between `fmin` and `fmax` Hz.
///
/// # Errors
///
/// [`Error::InvalidInput`] for a zero sample rate or order, cutoffs that do
/// not normalise into `(0, 0.5)`, or `fmin > fmax`; plus anything the
/// designer reports.
pub fn band_pass<D: FilterDesign + ?Sized>(
    samples: &[i16],
    designer: &D,
    order: usize,
    fmin: f64,
    fmax: f64,
    sample_rate: u32,
) -> Result<Vec<i16>> {
    design_and_filter(samples, designer, PassType::Bandpass, order, fmin, fmax, sample_rate)
}

/// High-pass filters PCM above `fmin` Hz.
///
/// The cutoff is passed to the designer as both bounds.
pub fn high_pass<D: FilterDesign + ?Sized>(
    samples: &[i16],
    designer: &D,
    order: usize,
    fmin: f64,
    sample_rate: u32,
) -> Result<Vec<i16>> {
    design_and_filter(samples, designer, PassType::Highpass, order, fmin, fmin, sample_rate)
}

/// Low-pass filters PCM below `fmax` Hz.
///
/// The cutoff is passed to the designer as both bounds.
pub fn low_pass<D: FilterDesign + ?Sized>(
    samples: &[i16],
    designer: &D,
    order: usize,
    fmax: f64,
    sample_rate: u32,
) -> Result<Vec<i16>> {
    design_and_filter(samples, designer, PassType::Lowpass, order, fmax, fmax, sample_rate)
}

/// Checks the request and normalises both cutoffs by the sample rate.
pub fn normalized_cutoffs(
    order: usize,
    fmin: f64,
    fmax: f64,
    sample_rate: u32,
) -> Result<(f64, f64)> {
    if sample_rate == 0 {
        return Err(Error::InvalidInput("sample rate must be positive"));
    }
    if order == 0 {
        return Err(Error::InvalidInput("filter order must be positive"));
    }
    let fs = f64::from(sample_rate);
    let (low, high) = (fmin / fs, fmax / fs);
    let in_band = |f: f64| f > 0.0 && f < 0.5;
    if !(in_band(low) && in_band(high)) {
        return Err(Error::InvalidInput(
            "cutoff must lie strictly between 0 Hz and Nyquist",
        ));
    }
    if low > high {
        return Err(Error::InvalidInput("lower cutoff exceeds upper cutoff"));
    }
    Ok((low, high))
}

fn design_and_filter<D: FilterDesign + ?Sized>(
    samples: &[i16],
    designer: &D,
    pass: PassType,
    order: usize,
    fmin: f64,
    fmax: f64,
    sample_rate: u32,
) -> Result<Vec<i16>> {
    let (low, high) = normalized_cutoffs(order, fmin, fmax, sample_rate)?;
    let coeffs = designer.design(pass, order, low, high)?;
    filter(samples, &coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    /// Records the last request and returns fixed coefficients.
    struct Recorder {
        coeffs: IirCoefficients,
        last: RefCell<Option<(PassType, usize, f64, f64)>>,
    }

    impl Recorder {
        fn new(a: Vec<f64>, b: Vec<f64>) -> Self {
            Self {
                coeffs: IirCoefficients { a, b },
                last: RefCell::new(None),
            }
        }
    }

    impl FilterDesign for Recorder {
        fn design(
            &self,
            pass: PassType,
            order: usize,
            low: f64,
            high: f64,
        ) -> Result<IirCoefficients> {
            *self.last.borrow_mut() = Some((pass, order, low, high));
            Ok(self.coeffs.clone())
        }
    }

    #[test]
    fn identity_coefficients_pass_through() {
        let coeffs = IirCoefficients::new(vec![1.0], vec![1.0]).unwrap();
        let input = [0i16, 100, -250, i16::MAX, i16::MIN];
        assert_eq!(filter(&input, &coeffs).unwrap(), input.to_vec());
    }

    #[test]
    fn fir_moving_sum() {
        let coeffs = IirCoefficients::new(vec![1.0], vec![0.5, 0.5]).unwrap();
        let out = filter(&[2, 4, 6, 8], &coeffs).unwrap();
        assert_eq!(out, vec![1, 3, 5, 7]);
    }

    #[test]
    fn recursive_accumulator() {
        // y[n] = x[n] + y[n-1]
        let coeffs = IirCoefficients::new(vec![1.0, -1.0], vec![1.0]).unwrap();
        let out = filter(&[1, 1, 1, 1, 1], &coeffs).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn output_saturates_instead_of_wrapping() {
        let coeffs = IirCoefficients::new(vec![1.0], vec![4.0]).unwrap();
        let out = filter(&[20_000, -20_000], &coeffs).unwrap();
        assert_eq!(out, vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn silence_in_silence_out() {
        let coeffs =
            IirCoefficients::new(vec![1.0, -1.2, 0.5, 0.1], vec![0.3, 0.2, -0.1]).unwrap();
        let out = filter(&[0i16; 64], &coeffs).unwrap();
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn every_call_starts_from_zero_history() {
        let coeffs = IirCoefficients::new(vec![1.0, -0.9], vec![1.0]).unwrap();
        let first = filter(&[1000, 0, 0, 0], &coeffs).unwrap();
        let second = filter(&[1000, 0, 0, 0], &coeffs).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn state_carries_over_until_reset() {
        let coeffs = IirCoefficients::new(vec![1.0, -0.5], vec![1.0]).unwrap();
        let mut dfi = DirectFormI::new(coeffs).unwrap();
        assert_eq!(dfi.process_pcm(&[1000]), vec![1000]);
        assert_eq!(dfi.process_pcm(&[0]), vec![500]);
        dfi.reset();
        assert_eq!(dfi.process_pcm(&[0]), vec![0]);
    }

    #[test]
    fn order_counts_feedback_taps() {
        let fir = IirCoefficients::new(vec![1.0], vec![0.5, 0.5]).unwrap();
        assert_eq!(fir.order(), 0);
        let second = IirCoefficients::new(vec![1.0, -0.5, 0.25], vec![1.0, 2.0, 1.0]).unwrap();
        assert_eq!(second.order(), 2);
    }

    #[test]
    fn rejects_empty_coefficients() {
        assert!(IirCoefficients::new(vec![], vec![1.0]).is_err());
        assert!(IirCoefficients::new(vec![1.0], vec![]).is_err());
        assert!(IirCoefficients::new(vec![1.0, f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn band_pass_normalises_cutoffs() {
        let designer = Recorder::new(vec![1.0], vec![1.0]);
        band_pass(&[1, 2, 3], &designer, 5, 16_000.0, 23_000.0, 48_000).unwrap();
        let (pass, order, low, high) = designer.last.borrow().unwrap();
        assert_eq!(pass, PassType::Bandpass);
        assert_eq!(order, 5);
        assert!((low - 16_000.0 / 48_000.0).abs() < 1e-12);
        assert!((high - 23_000.0 / 48_000.0).abs() < 1e-12);
    }

    #[test]
    fn single_cutoff_passed_twice() {
        let designer = Recorder::new(vec![1.0], vec![1.0]);

        high_pass(&[1], &designer, 2, 1000.0, 8000).unwrap();
        let (pass, _, low, high) = designer.last.borrow().unwrap();
        assert_eq!(pass, PassType::Highpass);
        assert_eq!(low, high);

        low_pass(&[1], &designer, 2, 2000.0, 8000).unwrap();
        let (pass, _, low, high) = designer.last.borrow().unwrap();
        assert_eq!(pass, PassType::Lowpass);
        assert_eq!((low, high), (0.25, 0.25));
    }

    #[test]
    fn rejects_bad_requests() {
        let designer = Recorder::new(vec![1.0], vec![1.0]);
        assert!(band_pass(&[1], &designer, 5, 100.0, 200.0, 0).is_err());
        assert!(band_pass(&[1], &designer, 0, 100.0, 200.0, 8000).is_err());
        assert!(band_pass(&[1], &designer, 2, 300.0, 200.0, 8000).is_err());
        assert!(band_pass(&[1], &designer, 2, 100.0, 4000.0, 8000).is_err());
        assert!(high_pass(&[1], &designer, 2, 0.0, 8000).is_err());
        assert!(designer.last.borrow().is_none());
    }
}
