//! Butterworth-style IIR design from cascaded RBJ second-order sections.
//!
//! Each design is built as a cascade of RBJ cookbook biquads (plus one
//! first-order bilinear section for odd orders), and the cascade is then
//! multiplied out into a single `(a, b)` transfer function so that it can
//! drive [`echokit_core::DirectFormI`].
//!
//! | Pass type | Sections                                                   |
//! |-----------|------------------------------------------------------------|
//! | Lowpass   | order-`n` Butterworth low-pass at `low`                    |
//! | Highpass  | order-`n` Butterworth high-pass at `low`                   |
//! | Bandpass  | order-`n` high-pass at `low` followed by low-pass at `high`|
//!
//! A band-pass of order `n` therefore has `2n` poles. The Butterworth Q of
//! section `k` is `1 / (2 sin(π(2k + 1) / 2n))`, so an order-4 cascade uses
//! Q = 1.307 and 0.541, and an order-3 cascade one Q = 1 section plus the
//! real pole.
//!
//! Cutoffs are normalised (Hz divided by the sample rate). Single-cutoff
//! pass types read `low` and ignore `high`.

use std::f64::consts::PI;

use echokit_core::{Error, FilterDesign, IirCoefficients, PassType, Result};
use rustfft::num_complex::Complex;

/// Second-order section as `(b0, b1, b2, a0, a1, a2)`.
type Section = (f64, f64, f64, f64, f64, f64);

/// Cascaded-biquad filter designer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeDesign;

impl CascadeDesign {
    /// Creates the designer.
    pub fn new() -> Self {
        Self
    }
}

impl FilterDesign for CascadeDesign {
    fn design(&self, pass: PassType, order: usize, low: f64, high: f64) -> Result<IirCoefficients> {
        if order == 0 {
            return Err(Error::InvalidInput("filter order must be positive"));
        }
        let in_band = |f: f64| f > 0.0 && f < 0.5;
        if !in_band(low) {
            return Err(Error::InvalidInput("normalised cutoff must lie in (0, 0.5)"));
        }

        let (a, b) = match pass {
            PassType::Lowpass => butterworth(order, low, Shape::Low),
            PassType::Highpass => butterworth(order, low, Shape::High),
            PassType::Bandpass => {
                if !in_band(high) || high < low {
                    return Err(Error::InvalidInput(
                        "band-pass cutoffs must satisfy low <= high < 0.5",
                    ));
                }
                let (ha, hb) = butterworth(order, low, Shape::High);
                let (la, lb) = butterworth(order, high, Shape::Low);
                (convolve(&ha, &la), convolve(&hb, &lb))
            }
        };

        tracing::debug!(?pass, order, low, high, taps = a.len(), "designed IIR filter");
        IirCoefficients::new(a, b)
    }
}

#[derive(Clone, Copy)]
enum Shape {
    Low,
    High,
}

/// Order-`n` Butterworth response as a multiplied-out `(a, b)` pair.
fn butterworth(order: usize, cutoff: f64, shape: Shape) -> (Vec<f64>, Vec<f64>) {
    let mut a = vec![1.0];
    let mut b = vec![1.0];

    for k in 0..order / 2 {
        let q = 1.0 / (2.0 * (PI * (2 * k + 1) as f64 / (2 * order) as f64).sin());
        let (b0, b1, b2, a0, a1, a2) = match shape {
            Shape::Low => lowpass_section(cutoff, q),
            Shape::High => highpass_section(cutoff, q),
        };
        a = convolve(&a, &[1.0, a1 / a0, a2 / a0]);
        b = convolve(&b, &[b0 / a0, b1 / a0, b2 / a0]);
    }

    if order % 2 == 1 {
        let (sa, sb) = first_order_section(cutoff, shape);
        a = convolve(&a, &sa);
        b = convolve(&b, &sb);
    }

    (a, b)
}

/// RBJ cookbook low-pass at normalised `cutoff`.
fn lowpass_section(cutoff: f64, q: f64) -> Section {
    let omega = 2.0 * PI * cutoff;
    let cos_omega = omega.cos();
    let alpha = omega.sin() / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// RBJ cookbook high-pass at normalised `cutoff`.
fn highpass_section(cutoff: f64, q: f64) -> Section {
    let omega = 2.0 * PI * cutoff;
    let cos_omega = omega.cos();
    let alpha = omega.sin() / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Bilinear-transform one-pole section, already normalised by `a0`.
fn first_order_section(cutoff: f64, shape: Shape) -> ([f64; 2], [f64; 2]) {
    let k = (PI * cutoff).tan();
    let a = [1.0, (k - 1.0) / (k + 1.0)];
    let b = match shape {
        Shape::Low => [k / (1.0 + k), k / (1.0 + k)],
        Shape::High => [1.0 / (1.0 + k), -1.0 / (1.0 + k)],
    };
    (a, b)
}

/// Polynomial product of two coefficient sequences.
fn convolve(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; x.len() + y.len() - 1];
    for (i, &xi) in x.iter().enumerate() {
        for (j, &yj) in y.iter().enumerate() {
            out[i + j] += xi * yj;
        }
    }
    out
}

/// Gain of a transfer function at normalised frequency `f` (cycles/sample).
///
/// ```text
/// |H(e^{jω})| = |Σ b[k] e^{-jωk}| / |Σ a[k] e^{-jωk}|,   ω = 2πf
/// ```
pub fn magnitude_response(coeffs: &IirCoefficients, f: f64) -> f64 {
    let omega = 2.0 * PI * f;
    let eval = |poly: &[f64]| -> Complex<f64> {
        poly.iter()
            .enumerate()
            .map(|(k, &c)| Complex::from_polar(c, -omega * k as f64))
            .sum()
    };
    eval(&coeffs.b).norm() / eval(&coeffs.a).norm()
}
