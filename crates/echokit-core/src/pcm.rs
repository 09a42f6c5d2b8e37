//! 16-bit PCM source contract.
//!
//! Whatever decodes a container (see `echokit-io` for WAV) hands the core a
//! sample rate, a channel count and the interleaved samples. Splitting the
//! channels apart is the caller's job; [`deinterleave`] and
//! [`PcmSource::channel`] do it.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Provider of interleaved 16-bit PCM.
pub trait PcmSource {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Number of interleaved channels.
    fn channels(&self) -> u16;

    /// All samples, interleaved by channel.
    fn samples(&self) -> &[i16];

    /// Number of frames (samples per channel).
    fn num_frames(&self) -> usize {
        match self.channels() {
            0 => 0,
            c => self.samples().len() / usize::from(c),
        }
    }

    /// Extracts one channel.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if `index` is not a channel of this source.
    fn channel(&self, index: u16) -> Result<Vec<i16>> {
        let channels = self.channels();
        if index >= channels {
            return Err(Error::OutOfRange {
                end: usize::from(index) + 1,
                len: usize::from(channels),
            });
        }
        Ok(self
            .samples()
            .iter()
            .skip(usize::from(index))
            .step_by(usize::from(channels))
            .copied()
            .collect())
    }
}

/// An owned, immutable PCM buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmRecording {
    sample_rate: u32,
    channels: u16,
    samples: Vec<i16>,
}

impl PcmRecording {
    /// Wraps interleaved samples.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the sample rate or channel count is zero,
    /// or the sample count is not a whole number of frames.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<i16>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be positive"));
        }
        if channels == 0 {
            return Err(Error::InvalidInput("channel count must be positive"));
        }
        if samples.len() % usize::from(channels) != 0 {
            return Err(Error::InvalidInput(
                "sample count is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Single-channel recording.
    pub fn mono(sample_rate: u32, samples: Vec<i16>) -> Result<Self> {
        Self::new(sample_rate, 1, samples)
    }

    /// Consumes the recording, returning its interleaved samples.
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / f64::from(self.sample_rate)
    }
}

impl PcmSource for PcmRecording {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn samples(&self) -> &[i16] {
        &self.samples
    }
}

/// Splits interleaved samples into one buffer per channel.
///
/// A trailing partial frame is dropped.
pub fn deinterleave(samples: &[i16], channels: u16) -> Result<Vec<Vec<i16>>> {
    if channels == 0 {
        return Err(Error::InvalidInput("channel count must be positive"));
    }
    let c = usize::from(channels);
    let frames = samples.len() / c;
    let mut out: Vec<Vec<i16>> = (0..c).map(|_| Vec::with_capacity(frames)).collect();
    for frame in samples.chunks_exact(c) {
        for (channel, &s) in out.iter_mut().zip(frame) {
            channel.push(s);
        }
    }
    Ok(out)
}
