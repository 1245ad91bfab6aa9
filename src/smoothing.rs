//! Smoothing and peak detection over a magnitude spectrum.
//!
//! The fast recognition path smooths the spectrum with a small Gaussian
//! kernel and then looks for the first "locally largest" peak, whose bin
//! position becomes the formant estimate.

use crate::error::{Error, Result};

/// How out-of-range reads are answered during convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Reads outside the data are zero.
    Zero,
    /// Reads clamp to the nearest edge value.
    #[default]
    Repeat,
    /// Reads wrap around circularly.
    Loop,
}

/// Read `data[index]`, substituting out-of-range reads according to `policy`.
///
/// Empty data reads as zero under every policy.
pub fn value_at(data: &[f64], index: isize, policy: BoundaryPolicy) -> f64 {
    let len = data.len() as isize;
    if len == 0 {
        return 0.0;
    }
    if (0..len).contains(&index) {
        return data[index as usize];
    }

    match policy {
        BoundaryPolicy::Zero => 0.0,
        BoundaryPolicy::Repeat => {
            if index < 0 {
                data[0]
            } else {
                data[data.len() - 1]
            }
        }
        BoundaryPolicy::Loop => data[index.rem_euclid(len) as usize],
    }
}

/// Generate a normalized Gaussian smoothing kernel.
///
/// `w[i] = exp(−(i − μ)² / (2·variance))` with `μ = (size − 1) / 2`,
/// scaled so the weights sum to 1.
///
/// # Errors
///
/// `InvalidConfiguration` if `size` is even or zero, or `variance` is not
/// a positive finite number.
pub fn gaussian_kernel(size: usize, variance: f64) -> Result<Vec<f64>> {
    if size == 0 || size % 2 == 0 {
        return Err(Error::InvalidConfiguration(format!(
            "Gaussian kernel size must be odd, got {}",
            size
        )));
    }
    if !(variance.is_finite() && variance > 0.0) {
        return Err(Error::InvalidConfiguration(format!(
            "Gaussian kernel variance must be positive, got {}",
            variance
        )));
    }

    let mu = (size - 1) as f64 / 2.0;
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - mu;
            (-(d * d) / (2.0 * variance)).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();

    Ok(raw.into_iter().map(|w| w / sum).collect())
}

/// Convolve `data` with `kernel`, keeping the length of `data`.
///
/// The kernel is applied time-reversed and centered:
///
/// ```text
/// out[n] = Σₘ data[n − K/2 + m] · kernel[K − 1 − m]
/// ```
///
/// with out-of-range reads handled by `policy`.
pub fn convolve(data: &[f64], kernel: &[f64], policy: BoundaryPolicy) -> Vec<f64> {
    let k = kernel.len();
    let middle = (k / 2) as isize;

    (0..data.len())
        .map(|n| {
            kernel
                .iter()
                .rev()
                .enumerate()
                .map(|(m, &w)| value_at(data, n as isize - middle + m as isize, policy) * w)
                .sum()
        })
        .collect()
}

/// Peaks found by [`find_local_peaks`], in scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks {
    /// Peak magnitudes.
    pub values: Vec<f64>,
    /// Peak bin positions.
    pub positions: Vec<usize>,
}

impl Peaks {
    /// Number of peaks actually found.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no peak was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The first peak as `(value, position)`.
    pub fn first(&self) -> Option<(f64, usize)> {
        Some((*self.values.first()?, *self.positions.first()?))
    }

    fn push(&mut self, value: f64, position: usize) {
        self.values.push(value);
        self.positions.push(position);
    }
}

/// Find up to `max_count` locally largest peaks.
///
/// A sample is a candidate peak when the data ascends into it and then stops
/// ascending. Candidates form their own sequence; a candidate is reported
/// once the candidate sequence has risen to it and the next candidate is not
/// larger. Scanning stops once `max_count` peaks are collected.
///
/// This is a strict local-maxima filter with early termination. A candidate
/// is confirmed by a later, smaller candidate; when the data ends while the
/// candidates are still rising, the last (largest) candidate is reported
/// too. Callers needing more peaks must ask for a larger `max_count`.
pub fn find_local_peaks(data: &[f64], max_count: usize) -> Peaks {
    let mut peaks = Peaks::default();
    if max_count == 0 || data.len() < 2 {
        return peaks;
    }

    let mut last_peak = 0.0;
    let mut last_position = 0;
    let mut ascending = false;
    let mut peaks_ascending = false;

    for i in 0..data.len() - 1 {
        if data[i] < data[i + 1] {
            ascending = true;
            continue;
        }

        if ascending {
            if last_peak < data[i] {
                peaks_ascending = true;
            } else {
                if peaks_ascending {
                    peaks.push(last_peak, last_position);
                    if peaks.len() >= max_count {
                        break;
                    }
                }
                peaks_ascending = false;
            }
            last_peak = data[i];
            last_position = i;
        }
        ascending = false;
    }

    // Nothing after the final rising candidate can confirm it
    if peaks_ascending && peaks.len() < max_count {
        peaks.push(last_peak, last_position);
    }

    peaks
}
