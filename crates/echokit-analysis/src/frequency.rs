//! Dominant-frequency extraction from a PCM segment.
//!
//! The segment is Hamming-windowed, zero-padded to 21 times its length and
//! transformed with a [`RealFft`]. The strongest packed bin wins; its
//! frequency is reported only when its magnitude clears a detection
//! threshold, otherwise the segment is treated as having no confident
//! dominant tone and `0.0` is returned.
//!
//! Zero padding does not add resolution, it interpolates the spectrum so the
//! strongest bin lands within `sample_rate / (21·len)` Hz of the true tone.

use echokit_core::{Error, Result, hamming};

use crate::fft::{RealFft, RustFftReal, packed_magnitudes};

/// Padded transform length as a multiple of the segment length.
pub const ZERO_PAD_FACTOR: usize = 21;

/// Minimum bin magnitude for a frequency to be reported.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 6000.0;

/// Strongest bin of an analysed segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantBin {
    /// Bin index in the padded transform.
    pub index: usize,
    /// Unnormalised magnitude of that bin.
    pub magnitude: f64,
    /// Frequency of the bin in Hz.
    pub frequency: f64,
}

/// Finds the dominant frequency of PCM segments.
///
/// # Example
///
/// ```rust
/// use echokit_analysis::frequency::FrequencyExtractor;
///
/// let tone: Vec<i16> = (0..400)
///     .map(|n| ((2.0 * std::f64::consts::PI * 1000.0 * n as f64 / 8000.0).sin() * 8000.0) as i16)
///     .collect();
///
/// let mut extractor = FrequencyExtractor::new();
/// let hz = extractor.extract(&tone, 8000).unwrap();
/// assert!((hz - 1000.0).abs() < 1.0);
/// ```
pub struct FrequencyExtractor<F = RustFftReal> {
    fft: F,
    threshold: f64,
}

impl FrequencyExtractor<RustFftReal> {
    /// Creates an extractor backed by `rustfft`.
    pub fn new() -> Self {
        Self::with_fft(RustFftReal::default())
    }
}

impl Default for FrequencyExtractor<RustFftReal> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: RealFft> FrequencyExtractor<F> {
    /// Creates an extractor around any [`RealFft`].
    pub fn with_fft(fft: F) -> Self {
        Self {
            fft,
            threshold: DEFAULT_DETECTION_THRESHOLD,
        }
    }

    /// Sets the detection threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Current detection threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Dominant frequency in Hz, or `0.0` if the strongest bin does not
    /// exceed the threshold.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for an empty segment or a zero sample rate.
    pub fn extract(&mut self, segment: &[i16], sample_rate: u32) -> Result<f64> {
        let bin = self.dominant_bin(segment, sample_rate)?;
        if bin.magnitude > self.threshold {
            Ok(bin.frequency)
        } else {
            tracing::debug!(
                magnitude = bin.magnitude,
                threshold = self.threshold,
                "no dominant frequency above threshold"
            );
            Ok(0.0)
        }
    }

    /// Strongest bin of the windowed, padded transform, regardless of the
    /// threshold. Ties resolve to the lowest bin.
    pub fn dominant_bin(&mut self, segment: &[i16], sample_rate: u32) -> Result<DominantBin> {
        if segment.is_empty() {
            return Err(Error::InvalidInput("segment is empty"));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be positive"));
        }

        let padded_len = segment.len() * ZERO_PAD_FACTOR;
        let mut buffer = hamming(segment, segment.len())?;
        buffer.resize(padded_len, 0.0);
        self.fft.forward_packed(&mut buffer);

        let mut index = 0;
        let mut magnitude = f64::NEG_INFINITY;
        for (i, m) in packed_magnitudes(&buffer).enumerate() {
            if m > magnitude {
                magnitude = m;
                index = i;
            }
        }

        Ok(DominantBin {
            index,
            magnitude,
            frequency: f64::from(sample_rate) * index as f64 / padded_len as f64,
        })
    }
}
