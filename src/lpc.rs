//! LPC - linear predictive coding coefficients.
//!
//! An order-p LPC model predicts each sample from the p previous ones:
//!
//! ```text
//! x[n] ≈ −(a[1]·x[n−1] + a[2]·x[n−2] + … + a[p]·x[n−p])
//! ```
//!
//! The returned vector is `[1.0, a[1], …, a[p]]`; the roots of the
//! corresponding polynomial `z^p + a[1]·z^(p−1) + … + a[p]` carry the
//! resonance (formant) frequencies.
//!
//! Two estimation strategies are provided and selected by [`LpcMethod`]:
//!
//! - **Levinson-Durbin**: O(p²) recursion on the autocorrelation sequence.
//! - **Normal equations**: builds the p×p autocorrelation Toeplitz matrix,
//!   inverts it and solves for the coefficients directly. Fails with
//!   `Singular` on a silent frame, in which case the Levinson-Durbin
//!   method is the natural fallback.
//!
//! Both agree on well-conditioned input.

use crate::error::{Error, Result};
use crate::toeplitz::{dense_dot, ToeplitzMatrix};

/// LPC estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LpcMethod {
    /// Levinson-Durbin recursion on the autocorrelation.
    #[default]
    LevinsonDurbin,
    /// Toeplitz-inverse solution of the normal equations.
    NormalEquations,
}

/// Estimate LPC coefficients of a (windowed) frame.
///
/// # Arguments
///
/// * `frame` - Windowed samples
/// * `order` - Model order p
/// * `method` - Estimation strategy
///
/// # Returns
///
/// `order + 1` coefficients with `coefficients[0] == 1.0`. A frame no
/// longer than `order` cannot support the model; it yields
/// `vec![1.0; order + 1]` for either method.
///
/// # Errors
///
/// - `InvalidConfiguration` if `order == 0`
/// - `Singular` from the normal-equations method on a degenerate frame
pub fn estimate(frame: &[f64], order: usize, method: LpcMethod) -> Result<Vec<f64>> {
    if order == 0 {
        return Err(Error::InvalidConfiguration(
            "LPC order must be greater than 0".into(),
        ));
    }
    if frame.len() <= order {
        return Ok(vec![1.0; order + 1]);
    }

    match method {
        LpcMethod::LevinsonDurbin => Ok(levinson_durbin(frame, order)),
        LpcMethod::NormalEquations => normal_equations(frame, order),
    }
}

/// Autocorrelation `R[d] = Σₙ x[n]·x[n+d]` for `d = 0..=max_lag`.
///
/// Lags beyond the frame length are zero.
pub fn autocorrelate(frame: &[f64], max_lag: usize) -> Vec<f64> {
    (0..=max_lag)
        .map(|lag| {
            frame
                .iter()
                .zip(frame.iter().skip(lag))
                .map(|(&a, &b)| a * b)
                .sum()
        })
        .collect()
}

/// Full linear cross-correlation of `a` and `v`.
///
/// Output length is `a.len() + v.len() − 1`; element `i` corresponds to
/// shifting `v` by `i − (v.len() − 1)` samples against `a`:
///
/// ```text
/// out[i] = Σⱼ a[j + i − (|v| − 1)] · v[j]
/// ```
///
/// For `correlate(x, x)` the zero lag sits at index `x.len() − 1`.
///
/// # Errors
///
/// `DimensionMismatch` if `a` is shorter than `v`.
pub fn correlate(a: &[f64], v: &[f64]) -> Result<Vec<f64>> {
    if a.len() < v.len() {
        return Err(Error::DimensionMismatch {
            expected: v.len(),
            actual: a.len(),
        });
    }
    if v.is_empty() {
        return Ok(Vec::new());
    }

    let n = a.len() + v.len() - 1;
    let offset = v.len() as isize - 1;

    Ok((0..n)
        .map(|i| {
            let shift = i as isize - offset;
            v.iter()
                .enumerate()
                .filter_map(|(j, &vj)| {
                    let k = j as isize + shift;
                    (0..a.len() as isize)
                        .contains(&k)
                        .then(|| a[k as usize] * vj)
                })
                .sum()
        })
        .collect())
}

/// Pre-emphasis filter `y[0] = x[0]`, `y[n] = x[n] − a·x[n−1]`.
///
/// Boosts high frequencies to offset the spectral tilt of the glottal
/// source before LPC analysis.
pub fn pre_emphasis(frame: &[f64], a: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(frame.len());
    if let Some(&first) = frame.first() {
        out.push(first);
    }
    for w in frame.windows(2) {
        out.push(w[1] - a * w[0]);
    }
    out
}

/// Levinson-Durbin recursion.
///
/// The recursion stops early when the prediction error energy reaches
/// zero (a silent or perfectly predictable frame); coefficients computed up
/// to that point are returned and the rest stay zero.
fn levinson_durbin(frame: &[f64], order: usize) -> Vec<f64> {
    let r = autocorrelate(frame, order);

    let mut a = vec![0.0; order + 1];
    a[0] = 1.0;
    let mut error = r[0];

    for i in 1..=order {
        if error <= 0.0 {
            break;
        }

        // Reflection coefficient
        let acc: f64 = (0..i).map(|j| a[j] * r[i - j]).sum();
        let k = -acc / error;

        // Symmetric in-place update of a[1..i]
        for j in 1..=(i / 2) {
            let lo = a[j] + k * a[i - j];
            let hi = a[i - j] + k * a[j];
            a[j] = lo;
            a[i - j] = hi;
        }
        a[i] = k;

        error *= 1.0 - k * k;
    }

    a
}

/// Normal-equations solution via the inverse autocorrelation matrix.
fn normal_equations(frame: &[f64], order: usize) -> Result<Vec<f64>> {
    let x = correlate(frame, frame)?;
    let zero_lag = frame.len() - 1;

    // r[0..=order] from the non-negative lags
    let r = &x[zero_lag..=zero_lag + order];

    let matrix = ToeplitzMatrix::symmetric(&r[..order])?;
    let inverse = matrix.inverse()?;
    let rhs: Vec<f64> = r[1..].iter().map(|&v| -v).collect();
    let phi = dense_dot(&inverse, &rhs)?;

    let mut coefficients = Vec::with_capacity(order + 1);
    coefficients.push(1.0);
    coefficients.extend(phi);
    Ok(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Second-order AR process x[n] = 1.2·x[n−1] − 0.6·x[n−2] + e[n]
    /// driven by a deterministic pseudo-noise sequence.
    fn ar2_frame(n: usize) -> Vec<f64> {
        let mut state: u32 = 12345;
        let mut x = vec![0.0; n];
        for i in 0..n {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let e = ((state >> 16) & 0x7fff) as f64 / 32768.0 - 0.5;
            let x1 = if i >= 1 { x[i - 1] } else { 0.0 };
            let x2 = if i >= 2 { x[i - 2] } else { 0.0 };
            x[i] = 1.2 * x1 - 0.6 * x2 + e;
        }
        x
    }

    #[test]
    fn short_frame_falls_back_to_ones() {
        for method in [LpcMethod::LevinsonDurbin, LpcMethod::NormalEquations] {
            assert_eq!(estimate(&[0.3, 0.1], 4, method).unwrap(), vec![1.0; 5]);
            assert_eq!(estimate(&[0.3, 0.1, 0.2, 0.5], 4, method).unwrap(), vec![1.0; 5]);
        }
    }

    #[test]
    fn zero_order_is_rejected() {
        assert!(matches!(
            estimate(&[1.0, 2.0], 0, LpcMethod::LevinsonDurbin),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn leading_coefficient_is_one() {
        let frame = ar2_frame(400);
        for method in [LpcMethod::LevinsonDurbin, LpcMethod::NormalEquations] {
            for order in 1..8 {
                let a = estimate(&frame, order, method).unwrap();
                assert_eq!(a.len(), order + 1);
                assert_eq!(a[0], 1.0);
            }
        }
    }

    #[test]
    fn recovers_ar2_model() {
        let frame = ar2_frame(4000);
        let a = estimate(&frame, 2, LpcMethod::LevinsonDurbin).unwrap();
        assert_abs_diff_eq!(a[1], -1.2, epsilon = 0.05);
        assert_abs_diff_eq!(a[2], 0.6, epsilon = 0.05);
    }

    #[test]
    fn methods_agree() {
        let frame = ar2_frame(1000);
        for order in [2, 4, 10] {
            let ld = estimate(&frame, order, LpcMethod::LevinsonDurbin).unwrap();
            let ne = estimate(&frame, order, LpcMethod::NormalEquations).unwrap();
            for (a, b) in ld.iter().zip(ne.iter()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn silent_frame() {
        let silent = [0.0; 64];
        assert_eq!(
            estimate(&silent, 4, LpcMethod::LevinsonDurbin).unwrap(),
            vec![1.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert!(matches!(
            estimate(&silent, 4, LpcMethod::NormalEquations),
            Err(Error::Singular)
        ));
    }

    #[test]
    fn correlate_full_mode() {
        // numpy.correlate([1, 2, 3], [0, 1, 0.5], "full") == [0.5, 2, 3.5, 3, 0]
        let out = correlate(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]).unwrap();
        assert_eq!(out, vec![0.5, 2.0, 3.5, 3.0, 0.0]);

        let x = [1.0, -2.0, 0.5, 4.0];
        let full = correlate(&x, &x).unwrap();
        let r = autocorrelate(&x, 3);
        assert_eq!(full.len(), 7);
        for d in 0..=3 {
            assert_abs_diff_eq!(full[3 + d], r[d], epsilon = 1e-12);
            assert_abs_diff_eq!(full[3 - d], r[d], epsilon = 1e-12);
        }

        assert!(matches!(
            correlate(&[1.0], &[1.0, 2.0]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn pre_emphasis_filter() {
        let y = pre_emphasis(&[1.0, 1.0, 2.0], 0.5);
        assert_eq!(y, vec![1.0, 0.5, 1.5]);
        assert!(pre_emphasis(&[], 0.67).is_empty());
    }
}
