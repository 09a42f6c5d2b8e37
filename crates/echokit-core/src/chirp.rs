//! Linear chirp synthesis.
//!
//! A linear up-chirp sweeps its instantaneous frequency from `fmin` to
//! `fmax` over `duration` seconds. Its phase is the closed form
//!
//! ```text
//! φ(t) = 2π·fmin·t + π·k·t²,   k = (fmax - fmin) / duration
//! ```
//!
//! and each sample is `round(sin(φ(n / fs)) · 32767)` as 16-bit PCM. The
//! generated signal is the reference template the correlator slides over a
//! recording.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::f64::consts::PI;
use libm::{round, sin};

use crate::error::{Error, Result};
use crate::xcorr::saturate_i16;

/// Peak amplitude of a generated chirp.
pub const FULL_SCALE: f64 = 32767.0;

/// Parameters of a linear up-chirp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChirpParams {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Start frequency in Hz.
    pub fmin: f64,
    /// End frequency in Hz.
    pub fmax: f64,
    /// Sweep duration in seconds.
    pub duration: f64,
}

impl ChirpParams {
    /// Creates a new parameter set. Validation happens in [`Self::generate`].
    pub fn new(sample_rate: u32, fmin: f64, fmax: f64, duration: f64) -> Self {
        Self {
            sample_rate,
            fmin,
            fmax,
            duration,
        }
    }

    /// Sweep rate `k` in Hz per second.
    pub fn sweep_rate(&self) -> f64 {
        (self.fmax - self.fmin) / self.duration
    }

    /// Number of samples the chirp spans: `round(duration * sample_rate)`.
    pub fn num_samples(&self) -> usize {
        round(self.duration * f64::from(self.sample_rate)).max(0.0) as usize
    }

    /// Phase in radians at time `t` seconds.
    #[inline]
    pub fn phase(&self, t: f64) -> f64 {
        2.0 * PI * self.fmin * t + PI * self.sweep_rate() * t * t
    }

    /// Synthesises the chirp.
    pub fn generate(&self) -> Result<Vec<i16>> {
        self.validate()?;

        let fs = f64::from(self.sample_rate);
        Ok((0..self.num_samples())
            .map(|n| saturate_i16(sin(self.phase(n as f64 / fs)) * FULL_SCALE))
            .collect())
    }

    fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be positive"));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(Error::InvalidInput("chirp duration must be positive"));
        }
        if !(self.fmin.is_finite() && self.fmax.is_finite()) {
            return Err(Error::InvalidInput("chirp frequencies must be finite"));
        }
        Ok(())
    }
}

/// Generates a linear up-chirp as 16-bit PCM.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `sample_rate` is zero or `duration` is not a
/// positive finite number.
///
/// # Example
///
/// ```rust
/// use echokit_core::chirp::up_chirp;
///
/// let chirp = up_chirp(48_000, 16_000.0, 23_000.0, 0.05).unwrap();
/// assert_eq!(chirp.len(), 2400);
/// assert_eq!(chirp[0], 0);
/// ```
pub fn up_chirp(sample_rate: u32, fmin: f64, fmax: f64, duration: f64) -> Result<Vec<i16>> {
    ChirpParams::new(sample_rate, fmin, fmax, duration).generate()
}

/// Instantaneous frequency in Hz at time `t`: `fmin + k·t`.
pub fn instantaneous_frequency(params: &ChirpParams, t: f64) -> f64 {
    params.fmin + params.sweep_rate() * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_tone_when_band_collapses() {
        let chirp = up_chirp(8, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(chirp.len(), 8);

        let expected: Vec<i16> = (0..8)
            .map(|n| round(sin(2.0 * PI * n as f64 / 8.0) * 32767.0) as i16)
            .collect();
        assert_eq!(chirp, expected);
        assert_eq!(chirp[2], 32767);
        assert_eq!(chirp[6], -32767);
    }

    #[test]
    fn length_is_rounded_product() {
        // 0.05 * 44100 = 2205 exactly, 0.0333 * 1000 = 33.3 -> 33
        assert_eq!(up_chirp(44_100, 1000.0, 2000.0, 0.05).unwrap().len(), 2205);
        assert_eq!(up_chirp(1000, 10.0, 100.0, 0.0333).unwrap().len(), 33);
        assert_eq!(up_chirp(1000, 10.0, 100.0, 0.0336).unwrap().len(), 34);
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert!(matches!(
            up_chirp(48_000, 100.0, 200.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            up_chirp(48_000, 100.0, 200.0, -1.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            up_chirp(48_000, 100.0, 200.0, f64::NAN),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert!(matches!(
            up_chirp(0, 100.0, 200.0, 1.0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn frequency_sweeps_linearly() {
        let params = ChirpParams::new(48_000, 16_000.0, 23_000.0, 0.05);
        assert!((instantaneous_frequency(&params, 0.0) - 16_000.0).abs() < 1e-9);
        assert!((instantaneous_frequency(&params, 0.025) - 19_500.0).abs() < 1e-6);
        assert!((instantaneous_frequency(&params, 0.05) - 23_000.0).abs() < 1e-6);
    }

    #[test]
    fn phase_steps_are_bounded() {
        // The phase advance between consecutive samples is 2π·f(t)/fs, which
        // never exceeds 2π·fmax/fs for an up-chirp.
        let params = ChirpParams::new(48_000, 16_000.0, 23_000.0, 0.05);
        let fs = 48_000.0;
        let max_step = 2.0 * PI * params.fmax / fs + 1e-9;
        let mut prev = params.phase(0.0);
        for n in 1..params.num_samples() {
            let cur = params.phase(n as f64 / fs);
            assert!(cur - prev > 0.0);
            assert!(cur - prev <= max_step, "jump at sample {n}");
            prev = cur;
        }
    }

    #[test]
    fn amplitude_stays_within_full_scale() {
        let chirp = up_chirp(48_000, 16_000.0, 23_000.0, 0.05).unwrap();
        assert!(chirp.iter().all(|&s| s.unsigned_abs() <= 32767));
        assert!(chirp.iter().any(|&s| s > 30_000));
    }
}
