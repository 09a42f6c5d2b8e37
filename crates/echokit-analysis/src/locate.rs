//! End-to-end chirp location: band-limit, correlate, pick peaks.
//!
//! A [`ChirpLocator`] owns the reference chirp it searches for. Each call
//! optionally band-passes the recording with a fresh filter, correlates it
//! against the reference and runs the peak detector over the correlation.
//! The returned indices are lags: sample offsets at which a chirp starts.

use echokit_core::{
    ChirpParams, Error, FilterDesign, PcmSource, PeakDetector, Result, band_pass, correlate,
};

use crate::design::CascadeDesign;

/// Band-pass applied to a recording before correlation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLimit {
    /// Order handed to the filter designer.
    pub order: usize,
    /// Lower edge in Hz.
    pub low_hz: f64,
    /// Upper edge in Hz.
    pub high_hz: f64,
}

/// Matched-filter chirp locator.
///
/// # Example
///
/// ```rust
/// use echokit_analysis::ChirpLocator;
/// use echokit_core::ChirpParams;
///
/// let params = ChirpParams::new(8000, 500.0, 1500.0, 0.01);
/// let locator = ChirpLocator::new(params).unwrap();
///
/// let mut recording = vec![0i16; 1000];
/// recording[250..250 + locator.reference().len()].copy_from_slice(locator.reference());
///
/// assert_eq!(locator.locate(&recording).unwrap(), vec![250]);
/// ```
#[derive(Debug, Clone)]
pub struct ChirpLocator<D = CascadeDesign> {
    params: ChirpParams,
    reference: Vec<i16>,
    band: Option<BandLimit>,
    detector: PeakDetector,
    designer: D,
}

impl ChirpLocator<CascadeDesign> {
    /// Synthesises the reference chirp and sets up a detector with a zero
    /// threshold and a spacing of one chirp length.
    ///
    /// # Errors
    ///
    /// Whatever [`ChirpParams::generate`] rejects, and
    /// [`Error::InvalidInput`] if the chirp has no samples.
    pub fn new(params: ChirpParams) -> Result<Self> {
        let reference = params.generate()?;
        if reference.is_empty() {
            return Err(Error::InvalidInput("chirp is shorter than one sample"));
        }
        let interval = i64::try_from(reference.len()).map_err(|_| Error::NumericOverflow)?;
        Ok(Self {
            params,
            reference,
            band: None,
            detector: PeakDetector::new(0.0, interval),
            designer: CascadeDesign,
        })
    }
}

impl<D: FilterDesign> ChirpLocator<D> {
    /// Band-passes recordings before correlating.
    #[must_use]
    pub fn with_band(mut self, band: BandLimit) -> Self {
        self.band = Some(band);
        self
    }

    /// Replaces the peak detector.
    #[must_use]
    pub fn with_detector(mut self, detector: PeakDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Sets the detector threshold to `fraction` of the reference energy.
    ///
    /// A clean, unattenuated arrival correlates to exactly the reference
    /// energy, so `0.5` accepts arrivals at roughly half amplitude or more.
    #[must_use]
    pub fn with_relative_threshold(mut self, fraction: f64) -> Self {
        self.detector.threshold = self.reference_energy() as f64 * fraction;
        self
    }

    /// Swaps in another filter designer.
    pub fn with_designer<E: FilterDesign>(self, designer: E) -> ChirpLocator<E> {
        ChirpLocator {
            params: self.params,
            reference: self.reference,
            band: self.band,
            detector: self.detector,
            designer,
        }
    }

    /// Chirp parameters.
    pub fn params(&self) -> &ChirpParams {
        &self.params
    }

    /// Reference chirp samples.
    pub fn reference(&self) -> &[i16] {
        &self.reference
    }

    /// Band-pass settings, if any.
    pub fn band(&self) -> Option<&BandLimit> {
        self.band.as_ref()
    }

    /// Peak detector settings.
    pub fn detector(&self) -> &PeakDetector {
        &self.detector
    }

    /// Sum of squares of the reference, saturating.
    pub fn reference_energy(&self) -> i64 {
        self.reference
            .iter()
            .map(|&s| i64::from(s) * i64::from(s))
            .fold(0i64, i64::saturating_add)
    }

    /// Applies the band-pass, if configured. Filter state starts from rest
    /// on every call.
    pub fn condition(&self, samples: &[i16]) -> Result<Vec<i16>> {
        match &self.band {
            Some(band) => band_pass(
                samples,
                &self.designer,
                band.order,
                band.low_hz,
                band.high_hz,
                self.params.sample_rate,
            ),
            None => Ok(samples.to_vec()),
        }
    }

    /// Correlation of the conditioned recording against the reference.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the recording is shorter than the chirp,
    /// plus anything the band-pass reports.
    pub fn correlation(&self, samples: &[i16]) -> Result<Vec<i64>> {
        let conditioned = self.condition(samples)?;
        correlate(&conditioned, &self.reference)
    }

    /// Lags of every chirp arrival the detector accepts, ascending.
    pub fn locate(&self, samples: &[i16]) -> Result<Vec<usize>> {
        let cof = self.correlation(samples)?;
        let lags = self.detector.find(&cof);
        tracing::debug!(
            samples = samples.len(),
            chirp = self.reference.len(),
            threshold = self.detector.threshold,
            found = lags.len(),
            "located chirps"
        );
        Ok(lags)
    }

    /// Lag of the strongest arrival, if it clears the threshold.
    pub fn locate_one(&self, samples: &[i16]) -> Result<Option<usize>> {
        let cof = self.correlation(samples)?;
        let lag = self.detector.find_one(&cof);
        tracing::debug!(?lag, threshold = self.detector.threshold, "best chirp lag");
        Ok(lag)
    }

    /// [`Self::locate`] on one channel of a PCM source.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if the source's sample rate differs from the
    /// chirp's, [`Error::OutOfRange`] for a channel the source lacks.
    pub fn locate_in<S: PcmSource + ?Sized>(&self, source: &S, channel: u16) -> Result<Vec<usize>> {
        if source.sample_rate() != self.params.sample_rate {
            return Err(Error::InvalidInput(
                "recording sample rate differs from the chirp's",
            ));
        }
        self.locate(&source.channel(channel)?)
    }
}
