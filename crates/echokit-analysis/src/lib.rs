//! echokit Analysis - spectral tools and the chirp locator
//!
//! This crate supplies the collaborators `echokit-core` leaves open and
//! builds the detection pipeline on top of them:
//!
//! - [`fft`] - Forward real FFT in the packed layout ([`RealFft`], [`RustFftReal`])
//! - [`design`] - Butterworth-style filter design from cascaded biquads ([`CascadeDesign`])
//! - [`frequency`] - Dominant-frequency extraction ([`FrequencyExtractor`])
//! - [`locate`] - Band-limit, correlate and pick peaks ([`ChirpLocator`])
//!
//! ## Locating Chirps
//!
//! ```rust
//! use echokit_analysis::{BandLimit, ChirpLocator};
//! use echokit_core::ChirpParams;
//!
//! let locator = ChirpLocator::new(ChirpParams::new(48000, 16000.0, 20000.0, 0.005))
//!     .unwrap()
//!     .with_band(BandLimit { order: 4, low_hz: 14000.0, high_hz: 22000.0 })
//!     .with_relative_threshold(0.2);
//!
//! let mut recording = vec![0i16; 4800];
//! for offset in [600, 3000] {
//!     recording[offset..offset + locator.reference().len()]
//!         .copy_from_slice(locator.reference());
//! }
//!
//! let lags = locator.locate(&recording).unwrap();
//! assert_eq!(lags.len(), 2);
//! ```
//!
//! ## Dominant Frequency
//!
//! ```rust,ignore
//! use echokit_analysis::FrequencyExtractor;
//!
//! let mut extractor = FrequencyExtractor::new();
//! let hz = extractor.extract(&segment, 48000)?;
//! ```

pub mod design;
pub mod fft;
pub mod frequency;
pub mod locate;

pub use design::{CascadeDesign, magnitude_response};
pub use fft::{RealFft, RustFftReal, packed_magnitudes};
pub use frequency::{
    DEFAULT_DETECTION_THRESHOLD, DominantBin, FrequencyExtractor, ZERO_PAD_FACTOR,
};
pub use locate::{BandLimit, ChirpLocator};
