//! Formant - resonance frequencies from LPC polynomial roots.
//!
//! Documentation sources:
//! - Markel & Gray (1976): root-to-formant conversion
//!
//! For a root z = r·e^(iθ) of the LPC polynomial at sample rate fs:
//!
//! - Frequency = θ · fs / (2π)
//! - Bandwidth = −ln(r) · fs / π
//!
//! Only roots with a non-negative imaginary part are kept, so each
//! complex-conjugate pair contributes one formant. Real positive roots map
//! to 0 Hz and real negative roots to the Nyquist frequency; they are kept
//! too, since the F1/F2 index convention below counts them.

use ndarray::Array1;

use crate::complex::Complex;

/// Indices into the ascending frequency list that are reported as F1 and F2.
///
/// The lowest entry is skipped: with the default LPC order it is usually a
/// near-DC real root rather than a vocal-tract resonance. The vowel
/// thresholds of the accurate path are calibrated against this choice.
pub const FORMANT_INDICES: [usize; 2] = [1, 2];

/// A single formant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormantPoint {
    /// Frequency in Hz.
    pub frequency: f64,
    /// Bandwidth in Hz.
    pub bandwidth: f64,
}

impl FormantPoint {
    /// Create a new FormantPoint.
    pub fn new(frequency: f64, bandwidth: f64) -> Self {
        Self {
            frequency,
            bandwidth,
        }
    }
}

/// Convert polynomial roots to formants sorted by ascending frequency.
///
/// Only roots with a non-negative imaginary part count, so each conjugate
/// pair gives one formant. Roots at the origin carry no resonance and are
/// skipped.
///
/// # Arguments
///
/// * `roots` - Roots of the LPC polynomial
/// * `sample_rate` - Sample rate of the analyzed frame in Hz
pub fn roots_to_formants(roots: &[Complex], sample_rate: f64) -> Vec<FormantPoint> {
    let mut formants: Vec<FormantPoint> = roots
        .iter()
        .filter(|root| root.im >= 0.0 && root.abs() > 0.0)
        .map(|root| {
            let frequency = root.arg() * sample_rate / (2.0 * std::f64::consts::PI);
            let bandwidth = -root.abs().ln() * sample_rate / std::f64::consts::PI;
            FormantPoint::new(frequency, bandwidth)
        })
        .collect();

    formants.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
    formants
}

/// Pick F1 and F2 from an ascending formant list by [`FORMANT_INDICES`].
///
/// Returns `None` when there are too few formants.
pub fn select_formants(formants: &[FormantPoint]) -> Option<(f64, f64)> {
    let [i1, i2] = FORMANT_INDICES;
    Some((formants.get(i1)?.frequency, formants.get(i2)?.frequency))
}

/// Interpolation method for querying a track between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Value of the nearest frame.
    Nearest,
    /// Linear interpolation between the two surrounding frames.
    #[default]
    Linear,
}

/// Formant analysis results for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FormantFrame {
    /// Frame start time in seconds.
    pub time: f64,
    /// All formants, ascending by frequency.
    pub formants: Vec<FormantPoint>,
}

impl FormantFrame {
    /// Create a new FormantFrame.
    pub fn new(time: f64, formants: Vec<FormantPoint>) -> Self {
        Self { time, formants }
    }

    /// Number of formants in this frame.
    #[inline]
    pub fn n_formants(&self) -> usize {
        self.formants.len()
    }

    /// Get formant n (1-based: 1 = F1, 2 = F2), using [`FORMANT_INDICES`]
    /// for the first two and consecutive entries after them.
    pub fn get_formant(&self, n: usize) -> Option<&FormantPoint> {
        if n == 0 {
            return None;
        }
        self.formants.get(FORMANT_INDICES[0] + n - 1)
    }
}

/// Formant tracks over time, one frame per analysis window.
#[derive(Debug, Clone, PartialEq)]
pub struct FormantTrack {
    frames: Vec<FormantFrame>,
    time_step: f64,
}

impl FormantTrack {
    /// Create a new FormantTrack.
    pub fn new(frames: Vec<FormantFrame>, time_step: f64) -> Self {
        Self { frames, time_step }
    }

    /// Get the formant frames.
    #[inline]
    pub fn frames(&self) -> &[FormantFrame] {
        &self.frames
    }

    /// Get the number of frames.
    #[inline]
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Get the time step between frames.
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Get array of frame times.
    pub fn times(&self) -> Array1<f64> {
        Array1::from_iter(self.frames.iter().map(|f| f.time))
    }

    /// Get array of frequencies for formant n (1 = F1).
    ///
    /// NaN where the frame has no such formant.
    pub fn formant_values(&self, formant_number: usize) -> Array1<f64> {
        Array1::from_iter(self.frames.iter().map(|frame| {
            frame
                .get_formant(formant_number)
                .map(|fp| fp.frequency)
                .unwrap_or(f64::NAN)
        }))
    }

    /// Get formant frequency at a specific time.
    ///
    /// Returns `None` outside the track (more than half a step beyond the
    /// first or last frame) or when neither neighbouring frame has the
    /// formant.
    pub fn get_value_at_time(
        &self,
        formant_number: usize,
        time: f64,
        interpolation: Interpolation,
    ) -> Option<f64> {
        if self.n_frames() == 0 || self.time_step <= 0.0 {
            return None;
        }

        let t0 = self.frames[0].time;
        let idx_float = (time - t0) / self.time_step;

        if idx_float < -0.5 || idx_float > self.n_frames() as f64 - 0.5 {
            return None;
        }

        let value = |i: usize| {
            self.frames[i]
                .get_formant(formant_number)
                .map(|fp| fp.frequency)
        };

        match interpolation {
            Interpolation::Nearest => {
                let idx = (idx_float.round().max(0.0) as usize).min(self.n_frames() - 1);
                value(idx)
            }
            Interpolation::Linear => {
                let idx = idx_float.floor() as isize;
                let frac = idx_float - idx as f64;

                let last = self.n_frames() as isize - 1;
                let i1 = idx.clamp(0, last) as usize;
                let i2 = (idx + 1).clamp(0, last) as usize;

                match (value(i1), value(i2)) {
                    (None, None) => None,
                    (None, Some(f)) | (Some(f), None) => Some(f),
                    (Some(f1), Some(f2)) => Some(f1 * (1.0 - frac) + f2 * frac),
                }
            }
        }
    }
}
