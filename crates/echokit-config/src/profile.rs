//! Detection profile file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use echokit_analysis::{BandLimit, ChirpLocator, FrequencyExtractor};
use echokit_core::{ChirpParams, PeakDetector};

use crate::error::ConfigError;

/// Everything needed to search a recording for a chirp.
///
/// # TOML Format
///
/// ```toml
/// name = "Ultrasonic ranging"
/// description = "Near-ultrasonic sweep for phone-to-phone ranging"
/// sample_rate = 48000
/// frequency_threshold = 6000.0
///
/// [chirp]
/// fmin = 16000.0
/// fmax = 23000.0
/// duration = 0.05
///
/// [band]
/// order = 5
/// low_hz = 16000.0
/// high_hz = 23000.0
///
/// [peaks]
/// relative_threshold = 0.5
/// interval = 2400
/// ```
///
/// `[band]` is optional; without it recordings are correlated unfiltered.
/// `peaks.interval` defaults to the chirp length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionProfile {
    /// Name of the profile.
    pub name: String,

    /// Optional description of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate of the recordings this profile applies to.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Minimum spectral magnitude for a dominant frequency to count.
    #[serde(default = "default_frequency_threshold")]
    pub frequency_threshold: f64,

    /// Reference chirp.
    #[serde(default)]
    pub chirp: ChirpSection,

    /// Band-pass applied before correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<BandSection>,

    /// Peak picking over the correlation.
    #[serde(default)]
    pub peaks: PeakSection,
}

/// `[chirp]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChirpSection {
    /// Start frequency in Hz.
    pub fmin: f64,
    /// End frequency in Hz.
    pub fmax: f64,
    /// Sweep duration in seconds.
    pub duration: f64,
}

impl Default for ChirpSection {
    fn default() -> Self {
        Self {
            fmin: 16000.0,
            fmax: 23000.0,
            duration: 0.05,
        }
    }
}

/// `[band]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BandSection {
    /// Designer order.
    pub order: usize,
    /// Lower edge in Hz.
    pub low_hz: f64,
    /// Upper edge in Hz.
    pub high_hz: f64,
}

impl Default for BandSection {
    fn default() -> Self {
        Self {
            order: 5,
            low_hz: 16000.0,
            high_hz: 23000.0,
        }
    }
}

impl From<BandSection> for BandLimit {
    fn from(band: BandSection) -> Self {
        BandLimit {
            order: band.order,
            low_hz: band.low_hz,
            high_hz: band.high_hz,
        }
    }
}

/// `[peaks]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PeakSection {
    /// Threshold as a fraction of the reference chirp's energy.
    #[serde(default = "default_relative_threshold")]
    pub relative_threshold: f64,

    /// Minimum spacing between arrivals in samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
}

impl Default for PeakSection {
    fn default() -> Self {
        Self {
            relative_threshold: default_relative_threshold(),
            interval: None,
        }
    }
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_frequency_threshold() -> f64 {
    echokit_analysis::DEFAULT_DETECTION_THRESHOLD
}

fn default_relative_threshold() -> f64 {
    0.5
}

fn finite_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is not a positive number")))
    }
}

impl DetectionProfile {
    /// Create a profile with the reference deployment's settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            frequency_threshold: default_frequency_threshold(),
            chirp: ChirpSection::default(),
            band: Some(BandSection::default()),
            peaks: PeakSection::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the chirp.
    pub fn with_chirp(mut self, chirp: ChirpSection) -> Self {
        self.chirp = chirp;
        self
    }

    /// Set or clear the band-pass.
    pub fn with_band(mut self, band: Option<BandSection>) -> Self {
        self.band = band;
        self
    }

    /// Set the peak picking.
    pub fn with_peaks(mut self, peaks: PeakSection) -> Self {
        self.peaks = peaks;
        self
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the profile to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field against what the pipeline can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::invalid("sample_rate", "must be positive"));
        }
        let nyquist = f64::from(self.sample_rate) / 2.0;

        finite_positive("chirp.duration", self.chirp.duration)?;
        for (field, hz) in [("chirp.fmin", self.chirp.fmin), ("chirp.fmax", self.chirp.fmax)] {
            if !(hz.is_finite() && (0.0..=nyquist).contains(&hz)) {
                return Err(ConfigError::invalid(
                    field,
                    format!("{hz} Hz is outside 0..={nyquist} Hz"),
                ));
            }
        }

        if let Some(band) = &self.band {
            if band.order == 0 {
                return Err(ConfigError::invalid("band.order", "must be positive"));
            }
            for (field, hz) in [("band.low_hz", band.low_hz), ("band.high_hz", band.high_hz)] {
                if !(hz.is_finite() && hz > 0.0 && hz < nyquist) {
                    return Err(ConfigError::invalid(
                        field,
                        format!("{hz} Hz is outside (0, {nyquist}) Hz"),
                    ));
                }
            }
            if band.low_hz > band.high_hz {
                return Err(ConfigError::invalid("band.low_hz", "exceeds band.high_hz"));
            }
        }

        if !(self.peaks.relative_threshold.is_finite() && self.peaks.relative_threshold >= 0.0) {
            return Err(ConfigError::invalid(
                "peaks.relative_threshold",
                "must be a non-negative number",
            ));
        }
        if !(self.frequency_threshold.is_finite() && self.frequency_threshold >= 0.0) {
            return Err(ConfigError::invalid(
                "frequency_threshold",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }

    /// Chirp parameters at the profile's sample rate.
    pub fn chirp_params(&self) -> ChirpParams {
        ChirpParams::new(
            self.sample_rate,
            self.chirp.fmin,
            self.chirp.fmax,
            self.chirp.duration,
        )
    }

    /// Validate and build a configured [`ChirpLocator`].
    pub fn to_locator(&self) -> Result<ChirpLocator, ConfigError> {
        self.validate()?;

        let mut locator = ChirpLocator::new(self.chirp_params())?;
        if let Some(band) = self.band {
            locator = locator.with_band(band.into());
        }

        let threshold = locator.reference_energy() as f64 * self.peaks.relative_threshold;
        let interval = match self.peaks.interval {
            Some(interval) => interval,
            None => locator.detector().interval,
        };
        Ok(locator.with_detector(PeakDetector::new(threshold, interval)))
    }

    /// Frequency extractor using the profile's threshold.
    pub fn frequency_extractor(&self) -> FrequencyExtractor {
        FrequencyExtractor::new().with_threshold(self.frequency_threshold)
    }
}

impl Default for DetectionProfile {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
