//! Spectrum - magnitude spectra of a single analysis frame.
//!
//! Two spectral sources feed the fast recognition path:
//!
//! - **DCT** (default): a magnitude-only DCT-II,
//!   `mag[m] = |Σₖ x[k]·cos(π/N · m · (k + 0.5))|`. O(N²), which is
//!   acceptable for windows up to a few thousand samples analyzed once
//!   per frame. The vowel threshold tables are calibrated against this
//!   transform combined with a bin width of `sample_rate / N`.
//! - **FFT**: `|X[k]|` for `k = 0..=N/2` of the forward FFT (via rustfft).
//!   Bin k sits exactly at `k · sample_rate / N`. The bins above N/2 mirror
//!   the lower half of a real frame and are dropped.
//!
//! Peak positions from either source convert to frequency through the same
//! bin width.

use num_complex::Complex64;
use rustfft::FftPlanner;

/// Spectral transform used by the fast recognition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectralTransform {
    /// Magnitude-only DCT-II (O(N²)).
    #[default]
    Dct,
    /// One-sided magnitude of the complex FFT.
    Fft,
}

impl SpectralTransform {
    /// Compute the magnitude spectrum of a frame with this transform.
    pub fn magnitudes(self, frame: &[f64]) -> Vec<f64> {
        match self {
            SpectralTransform::Dct => discrete_cosine_transform(frame),
            SpectralTransform::Fft => fft_magnitude(frame),
        }
    }
}

/// Magnitude-only discrete cosine transform (DCT-II variant).
///
/// # Arguments
///
/// * `frame` - Windowed samples
///
/// # Returns
///
/// One non-negative magnitude per input sample.
pub fn discrete_cosine_transform(frame: &[f64]) -> Vec<f64> {
    let n = frame.len();
    if n == 0 {
        return Vec::new();
    }

    let step = std::f64::consts::PI / n as f64;

    (0..n)
        .map(|m| {
            let sum: f64 = frame
                .iter()
                .enumerate()
                .map(|(k, &x)| x * (step * m as f64 * (k as f64 + 0.5)).cos())
                .sum();
            sum.abs()
        })
        .collect()
}

/// One-sided magnitude of the forward FFT.
///
/// The FFT computes X[k] = Σ x[n] × e^(-2πikn/N); only |X[k]| is kept, for
/// bins `0..=N/2`. For real input `|X[N−k]| == |X[k]|` up to rounding, so
/// the upper half carries no information and would put a second copy of
/// every peak in front of the peak finder.
pub fn fft_magnitude(frame: &[f64]) -> Vec<f64> {
    let n = frame.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex64> = frame.iter().map(|&x| Complex64::new(x, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    buffer[..=n / 2].iter().map(|c| c.norm()).collect()
}

/// Total spectral energy proxy: the plain sum of magnitudes.
///
/// This is what the amplitude gate of the fast path compares against.
#[inline]
pub fn spectral_energy(spectrum: &[f64]) -> f64 {
    spectrum.iter().sum()
}

/// Frequency covered by one spectrum bin: `sample_rate / window_size`.
#[inline]
pub fn frequency_unit(sample_rate: u32, window_size: usize) -> f64 {
    sample_rate as f64 / window_size as f64
}
