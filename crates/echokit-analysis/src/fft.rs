//! Forward real FFT with a packed output layout.

use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Forward transform of a real buffer, in place.
///
/// On return, for every `k < N / 2`, `buffer[2k]` and `buffer[2k + 1]` hold
/// the real and imaginary parts of bin `k`. When `N` is odd the trailing
/// slot holds the real part of bin `(N - 1) / 2`. The transform is
/// unnormalised.
pub trait RealFft {
    /// Transforms `buffer` into the packed layout.
    fn forward_packed(&mut self, buffer: &mut [f64]);
}

/// [`RealFft`] backed by `rustfft`, caching the plan for the last size used.
pub struct RustFftReal {
    planner: FftPlanner<f64>,
    fft: Arc<dyn Fft<f64>>,
    size: usize,
    scratch: Vec<Complex<f64>>,
}

impl RustFftReal {
    /// Creates a transform planned for `size` points.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self {
            planner,
            fft,
            size,
            scratch: Vec::with_capacity(size),
        }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Resize the FFT (creates new plan if needed)
    pub fn resize(&mut self, size: usize) {
        if size != self.size {
            self.fft = self.planner.plan_fft_forward(size);
            self.size = size;
        }
    }

    /// Full complex spectrum of a real input (all `N` bins).
    pub fn spectrum(&mut self, input: &[f64]) -> Vec<Complex<f64>> {
        self.resize(input.len());
        let mut buffer: Vec<Complex<f64>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.fft.process(&mut buffer);
        buffer
    }
}

impl Default for RustFftReal {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl RealFft for RustFftReal {
    fn forward_packed(&mut self, buffer: &mut [f64]) {
        let n = buffer.len();
        if n == 0 {
            return;
        }
        self.resize(n);

        self.scratch.clear();
        self.scratch
            .extend(buffer.iter().map(|&x| Complex::new(x, 0.0)));
        self.fft.process(&mut self.scratch);

        for (k, bin) in self.scratch.iter().take(n / 2).enumerate() {
            buffer[2 * k] = bin.re;
            buffer[2 * k + 1] = bin.im;
        }
        if n % 2 == 1 {
            buffer[n - 1] = self.scratch[n / 2].re;
        }
    }
}

/// Magnitude of each packed bin.
pub fn packed_magnitudes(packed: &[f64]) -> impl Iterator<Item = f64> + '_ {
    packed.chunks_exact(2).map(|pair| pair[0].hypot(pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn dc_lands_in_bin_zero() {
        let mut fft = RustFftReal::new(8);
        let mut buffer = vec![1.0; 8];
        fft.forward_packed(&mut buffer);
        assert!((buffer[0] - 8.0).abs() < 1e-9);
        assert!(buffer[1].abs() < 1e-9);
        for &v in &buffer[2..] {
            assert!(v.abs() < 1e-9);
        }
    }

    #[test]
    fn cosine_pair_layout() {
        // cos at bin 3 of 16: X[3] = 8 (real)
        let n = 16;
        let mut buffer: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 3.0 * i as f64 / n as f64).cos())
            .collect();
        let mut fft = RustFftReal::default();
        fft.forward_packed(&mut buffer);
        assert_eq!(fft.size(), 16);

        let mags: Vec<f64> = packed_magnitudes(&buffer).collect();
        assert_eq!(mags.len(), 8);
        assert!((buffer[6] - 8.0).abs() < 1e-9);
        assert!(buffer[7].abs() < 1e-9);
        for (k, &m) in mags.iter().enumerate() {
            if k != 3 {
                assert!(m < 1e-9, "bin {k} should be empty, got {m}");
            }
        }
    }

    #[test]
    fn sine_shows_up_imaginary() {
        // sin at bin 2 of 8: X[2] = -4j
        let n = 8;
        let mut buffer: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 2.0 * i as f64 / n as f64).sin())
            .collect();
        RustFftReal::new(n).forward_packed(&mut buffer);
        assert!(buffer[4].abs() < 1e-9);
        assert!((buffer[5] + 4.0).abs() < 1e-9);
    }

    #[test]
    fn odd_length_trailing_slot() {
        let mut buffer = vec![1.0, 0.0, 0.0, 0.0, 0.0];
        RustFftReal::new(5).forward_packed(&mut buffer);
        // Impulse: every bin is 1 + 0j
        let expected = [1.0, 0.0, 1.0, 0.0, 1.0];
        for (got, want) in buffer.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_buffer_is_noop() {
        let mut buffer: Vec<f64> = Vec::new();
        RustFftReal::new(4).forward_packed(&mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn replans_on_size_change() {
        let mut fft = RustFftReal::new(4);
        let spectrum = fft.spectrum(&[1.0; 12]);
        assert_eq!(spectrum.len(), 12);
        assert_eq!(fft.size(), 12);
        assert!((spectrum[0].re - 12.0).abs() < 1e-9);
    }
}
