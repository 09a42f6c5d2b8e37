//! Detection profiles for echokit.
//!
//! A [`DetectionProfile`] is a TOML file describing the chirp to look for,
//! the band-pass to apply first and how to pick arrivals from the
//! correlation. Profiles load, validate and turn into a ready
//! [`echokit_analysis::ChirpLocator`].
//!
//! # Example
//!
//! ```rust,no_run
//! use echokit_config::{BandSection, DetectionProfile};
//!
//! // Load a profile from file
//! let profile = DetectionProfile::load("ranging.toml").unwrap();
//!
//! // Or start from the 48 kHz, 16-23 kHz defaults and narrow the band
//! let profile = DetectionProfile::new("Narrow")
//!     .with_description("Tighter band-pass for noisy rooms")
//!     .with_band(Some(BandSection { order: 6, low_hz: 17000.0, high_hz: 22000.0 }));
//!
//! let locator = profile.to_locator().unwrap();
//! profile.save("narrow.toml").unwrap();
//! ```

mod error;
mod profile;

pub use error::ConfigError;
pub use profile::{BandSection, ChirpSection, DetectionProfile, PeakSection};
