//! WAV input/output for echokit.
//!
//! This crate turns WAV files into [`PcmRecording`]s for the detection
//! pipeline and writes them back out:
//!
//! - [`read_wav`] - Load a 16-bit PCM file, all channels interleaved
//! - [`read_wav_info`] - Header only: channels, rate, frame count
//! - [`write_wav`] - Save a recording as 16-bit PCM
//! - [`deinterleave`] - Split interleaved samples per channel
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use echokit_io::read_wav;
//! use echokit_core::PcmSource;
//!
//! let recording = read_wav("capture.wav")?;
//! let left = recording.channel(0)?;
//! println!("{} frames at {} Hz", recording.num_frames(), recording.sample_rate());
//! ```

mod wav;

pub use echokit_core::{PcmRecording, deinterleave};
pub use wav::{WavInfo, read_wav, read_wav_info, write_wav};

/// Error types for WAV I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file holds something other than 16-bit integer PCM.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The decoded samples do not form a valid recording.
    #[error("Invalid recording: {0}")]
    Core(#[from] echokit_core::Error),
}

/// Convenience result type for WAV I/O.
pub type Result<T> = std::result::Result<T, Error>;
