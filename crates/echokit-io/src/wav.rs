//! WAV file reading and writing.

use crate::{Error, Result};
use echokit_core::{PcmRecording, PcmSource};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Whether samples are IEEE floats rather than integers.
    pub is_float: bool,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

impl WavInfo {
    /// True for the 16-bit integer PCM [`read_wav`] accepts.
    pub fn is_pcm16(&self) -> bool {
        !self.is_float && self.bits_per_sample == 16
    }
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        is_float: spec.sample_format == SampleFormat::Float,
        num_frames,
        duration_secs,
    })
}

/// Read a 16-bit PCM WAV file.
///
/// Channels stay interleaved; use [`PcmSource::channel`] or
/// [`crate::deinterleave`] to split them. A trailing partial frame is
/// dropped.
///
/// # Errors
///
/// [`Error::UnsupportedFormat`] for float or non-16-bit files, plus any
/// decoding error from `hound`.
///
/// # Example
/// ```ignore
/// let recording = read_wav("input.wav")?;
/// println!("Loaded {} frames at {} Hz", recording.num_frames(), recording.sample_rate());
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<PcmRecording> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        let kind = match spec.sample_format {
            SampleFormat::Float => "float",
            SampleFormat::Int => "integer",
        };
        return Err(Error::UnsupportedFormat(format!(
            "{}-bit {kind}, expected 16-bit integer PCM",
            spec.bits_per_sample
        )));
    }

    let mut samples = reader
        .into_samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let channels = usize::from(spec.channels.max(1));
    let partial = samples.len() % channels;
    if partial != 0 {
        tracing::debug!(dropped = partial, "dropping trailing partial frame");
        samples.truncate(samples.len() - partial);
    }

    let recording = PcmRecording::new(spec.sample_rate, spec.channels, samples)?;
    tracing::info!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        frames = recording.num_frames(),
        "loaded WAV recording"
    );
    Ok(recording)
}

/// Write a recording to a 16-bit PCM WAV file.
///
/// # Example
/// ```ignore
/// let recording = PcmRecording::mono(48000, vec![0; 48000])?; // 1 second of silence
/// write_wav("output.wav", &recording)?;
/// ```
pub fn write_wav<P: AsRef<Path>, S: PcmSource + ?Sized>(path: P, source: &S) -> Result<()> {
    let path = path.as_ref();
    let spec = hound::WavSpec {
        channels: source.channels(),
        sample_rate: source.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;

    for &sample in source.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        channels = source.channels(),
        frames = source.num_frames(),
        "wrote WAV recording"
    );
    Ok(())
}
