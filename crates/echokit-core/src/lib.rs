//! echokit Core - matched-filter primitives for acoustic chirp detection
//!
//! This crate holds the numeric building blocks for locating a known chirp
//! inside a noisy 16-bit PCM recording (acoustic time-of-flight ranging and
//! synchronisation).
//!
//! # Primitives
//!
//! - [`window`] - Hann and Hamming weighting of PCM segments
//! - [`chirp`] - Linear up-chirp synthesis ([`up_chirp`], [`ChirpParams`])
//! - [`xcorr`] - Sliding dot-product matched filter ([`correlate`])
//! - [`peak`] - Global maximum and thinned local maxima ([`find_peaks`])
//! - [`iir`] - Direct Form I recursive filter ([`DirectFormI`])
//! - [`pcm`] - PCM source contract ([`PcmSource`], [`PcmRecording`])
//!
//! Filter design and the FFT are collaborators: this crate defines the
//! [`FilterDesign`] seam and leaves implementations to `echokit-analysis`.
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (with `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! echokit-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use echokit_core::{correlate, find_peaks, up_chirp};
//!
//! let chirp = up_chirp(8000, 500.0, 1500.0, 0.01).unwrap();
//!
//! // A recording with the chirp arriving at sample 300
//! let mut recording = vec![0i16; 1000];
//! recording[300..300 + chirp.len()].copy_from_slice(&chirp);
//!
//! let cof = correlate(&recording, &chirp).unwrap();
//! let peaks = find_peaks(&cof, 0.0, chirp.len() as i64);
//! assert_eq!(peaks, vec![300]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chirp;
pub mod error;
pub mod iir;
pub mod pcm;
pub mod peak;
pub mod window;
pub mod xcorr;

// Re-export main types at crate root
pub use chirp::{ChirpParams, up_chirp};
pub use error::{Error, Result};
pub use iir::{
    DirectFormI, FilterDesign, IirCoefficients, PassType, band_pass, filter, high_pass, low_pass,
};
pub use pcm::{PcmRecording, PcmSource, deinterleave};
pub use peak::{PeakDetector, PeakValue, find_one_peak, find_peaks};
pub use window::{hamming, hann};
pub use xcorr::{best_lag, correlate, saturate_i16};
