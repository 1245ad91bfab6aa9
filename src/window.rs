//! Window - analysis window functions.
//!
//! Windows taper a frame towards its edges before spectral or LPC analysis
//! to reduce leakage from the frame boundaries. All windows here are the
//! symmetric form (period `N − 1`), matching the conventions of common
//! analysis tools:
//!
//! | Window          | w[i], x = 2πi/(N−1)                                   |
//! |-----------------|-------------------------------------------------------|
//! | Rectangular     | 1                                                     |
//! | Triangular      | 1 − \|2i/(N−1) − 1\|                                  |
//! | Hamming         | 0.54 − 0.46·cos(x)                                    |
//! | Hanning         | 0.5 − 0.5·cos(x)                                      |
//! | Blackman        | 0.42 − 0.5·cos(x) + 0.08·cos(2x)                      |
//! | Blackman-Harris | 0.35875 − 0.48829·cos(x) + 0.14128·cos(2x) − 0.01168·cos(3x) |
//!
//! Windows are computed once per recognizer configuration and reused for
//! every frame.

use std::f64::consts::PI;

/// Window function selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// No tapering.
    Rectangular,
    /// Triangular (Bartlett) window.
    Triangular,
    /// Hamming window; the default for both recognition paths.
    #[default]
    Hamming,
    /// Hanning (Hann) window.
    Hanning,
    /// Three-term Blackman window.
    Blackman,
    /// Four-term Blackman-Harris window.
    BlackmanHarris,
}

/// Generate window coefficients.
///
/// Deterministic and total: `size == 0` gives an empty vector and
/// `size == 1` gives `[1.0]` for every window type.
///
/// # Arguments
///
/// * `size` - Number of coefficients
/// * `window_type` - Window function
///
/// # Example
///
/// ```
/// use vowelsync::window::{generate_window, WindowType};
///
/// let w = generate_window(5, WindowType::Hanning);
/// assert_eq!(w[2], 1.0);
/// ```
pub fn generate_window(size: usize, window_type: WindowType) -> Vec<f64> {
    if size <= 1 {
        return vec![1.0; size];
    }

    let span = (size - 1) as f64;

    (0..size)
        .map(|i| {
            let x = 2.0 * PI * i as f64 / span;
            match window_type {
                WindowType::Rectangular => 1.0,
                WindowType::Triangular => 1.0 - (2.0 * i as f64 / span - 1.0).abs(),
                WindowType::Hamming => 0.54 - 0.46 * x.cos(),
                WindowType::Hanning => 0.5 - 0.5 * x.cos(),
                WindowType::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                WindowType::BlackmanHarris => {
                    0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos()
                        - 0.01168 * (3.0 * x).cos()
                }
            }
        })
        .collect()
}

/// Multiply a frame by window coefficients.
///
/// The output has the length of the shorter input.
pub fn apply_window(frame: &[f64], window: &[f64]) -> Vec<f64> {
    frame
        .iter()
        .zip(window.iter())
        .map(|(&s, &w)| s * w)
        .collect()
}
