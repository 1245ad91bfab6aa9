//! Roots - complex roots of real polynomials.
//!
//! Documentation sources:
//! - Numerical Recipes Ch. 9.5 (Laguerre's method, deflation, polishing)
//! - Numerical Recipes Ch. 11.6 (eigenvalues of the companion matrix)
//!
//! Polynomial coefficients are ordered from the constant term to the
//! leading term: `[c0, c1, …, cn]` encodes `c0 + c1·x + … + cn·xⁿ`.
//! An LPC vector `[1, a1, …, ap]` therefore has to be reversed before its
//! roots are taken (see [`lpc_polynomial`]).
//!
//! Two interchangeable [`RootFinder`] implementations are provided:
//!
//! - [`LaguerreSolver`]: the portable reference. Laguerre iteration from a
//!   fixed seed, forward deflation, optional polishing against the original
//!   polynomial.
//! - [`CompanionMatrixSolver`]: eigenvalues of the companion matrix by QR
//!   iteration, each polished with Newton-Raphson.

use std::fmt;

use ndarray::Array2;

use crate::complex::Complex;
use crate::error::{Error, Result};

/// Relative threshold below which an imaginary part is snapped to zero.
const EPS: f64 = 2.0e-6;

/// Iterations between fractional (limit-cycle breaking) steps.
const STEPS_PER_FRACTION: usize = 10;

/// Fractional step sizes taken every `STEPS_PER_FRACTION` iterations.
const FRACTIONS: [f64; 8] = [0.5, 0.25, 0.75, 0.13, 0.38, 0.62, 0.88, 1.0];

/// Roots of one polynomial, plus how many failed to converge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootSet {
    /// One root per degree, in extraction order.
    pub roots: Vec<Complex>,
    /// Number of roots whose iteration hit the cap. These are still the
    /// best available estimates.
    pub unconverged: usize,
}

impl RootSet {
    /// True when every root converged.
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.unconverged == 0
    }

    /// The roots, or `RootFindingNonConvergence` if any root failed.
    pub fn require_converged(&self) -> Result<&[Complex]> {
        if self.is_converged() {
            Ok(&self.roots)
        } else {
            Err(Error::RootFindingNonConvergence {
                roots: self.unconverged,
            })
        }
    }
}

/// Strategy for extracting all complex roots of a real polynomial.
///
/// Implementations must be deterministic: the same coefficients always
/// give the same roots.
pub trait RootFinder: fmt::Debug + Send + Sync {
    /// Find all roots of `coefficients` (constant term first).
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for an empty, all-zero or non-finite
    /// polynomial. Non-convergence is reported through
    /// [`RootSet::unconverged`], not as an error.
    fn find_roots(&self, coefficients: &[f64]) -> Result<RootSet>;
}

/// Reverse an LPC vector `[1, a1, …, ap]` into constant-first order.
///
/// The result encodes `zᵖ + a1·zᵖ⁻¹ + … + ap`.
pub fn lpc_polynomial(lpc: &[f64]) -> Vec<f64> {
    lpc.iter().rev().copied().collect()
}

/// Validate coefficients and drop zero leading terms.
fn normalize_coefficients(coefficients: &[f64]) -> Result<&[f64]> {
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(Error::InvalidConfiguration(
            "polynomial coefficients must be finite".into(),
        ));
    }
    let degree_end = coefficients
        .iter()
        .rposition(|&c| c != 0.0)
        .ok_or_else(|| {
            Error::InvalidConfiguration("polynomial has no non-zero coefficient".into())
        })?;
    Ok(&coefficients[..=degree_end])
}

/// Evaluate p(x), p'(x) and p''(x)/2 by Horner's scheme.
fn evaluate(a: &[Complex], x: Complex) -> (Complex, Complex, Complex) {
    let n = a.len() - 1;
    let mut p = a[n];
    let mut dp = Complex::ZERO;
    let mut half_ddp = Complex::ZERO;
    for j in (0..n).rev() {
        half_ddp = x * half_ddp + dp;
        dp = x * dp + p;
        p = x * p + a[j];
    }
    (p, dp, half_ddp)
}

/// Snap a root to the real axis when its imaginary part is negligible.
fn snap_to_real(x: Complex) -> Complex {
    if x.im.abs() <= 2.0 * EPS * x.re.abs() {
        Complex::real(x.re)
    } else {
        x
    }
}

/// Laguerre's method with deflation.
///
/// Each iteration evaluates the polynomial and its first two derivatives,
/// then steps by
///
/// ```text
/// G = p'/p,  H = G² − p''/p
/// Δx = n / (G ± sqrt((n−1)(nH − G²)))     (sign maximizing |denominator|)
/// ```
///
/// Every tenth iteration only a fraction of the step is taken, which breaks
/// the rare limit cycles of the plain iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct LaguerreSolver {
    /// Convergence tolerance on `|p(x)|` and `|Δx|`.
    pub tolerance: f64,
    /// Iteration cap per root.
    pub max_iterations: usize,
    /// Re-run each root against the undeflated polynomial.
    pub polish: bool,
    /// Starting point for every root.
    pub seed: Complex,
}

impl Default for LaguerreSolver {
    fn default() -> Self {
        Self::accurate()
    }
}

impl LaguerreSolver {
    /// High-accuracy preset (tolerance 1e-13) used for offline analysis.
    pub fn accurate() -> Self {
        Self {
            tolerance: 1e-13,
            max_iterations: 80,
            polish: true,
            seed: Complex::real(0.5),
        }
    }

    /// Fast preset (tolerance 1e-7).
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-7,
            ..Self::accurate()
        }
    }

    /// Iterate towards one root of `a` from `x`.
    ///
    /// Returns the final estimate and whether it converged.
    fn laguerre(&self, a: &[Complex], mut x: Complex) -> (Complex, bool) {
        let n = (a.len() - 1) as f64;

        for iter in 1..=self.max_iterations {
            let (p, dp, half_ddp) = evaluate(a, x);
            if p.abs() < self.tolerance {
                return (x, true);
            }

            // p is non-zero past the check above
            let g = dp / p;
            let h = g * g - half_ddp.scale(2.0) / p;
            let sq = ((h * n - g * g) * (n - 1.0)).sqrt();
            let gp = g + sq;
            let gm = g - sq;
            let denominator = if gp.abs() >= gm.abs() { gp } else { gm };

            let dx = match Complex::real(n).checked_div(denominator) {
                Ok(step) => step,
                // p' = p'' = 0: take a bounded step around the current point
                Err(_) => Complex::new((iter as f64).cos(), (iter as f64).sin())
                    .scale(1.0 + x.abs()),
            };

            let next = x - dx;
            if next == x {
                return (x, true);
            }

            x = if iter % STEPS_PER_FRACTION != 0 {
                next
            } else {
                let fraction = FRACTIONS[(iter / STEPS_PER_FRACTION - 1) % FRACTIONS.len()];
                x - dx.scale(fraction)
            };

            if dx.abs() < self.tolerance {
                return (x, true);
            }
        }

        (x, false)
    }
}

impl RootFinder for LaguerreSolver {
    fn find_roots(&self, coefficients: &[f64]) -> Result<RootSet> {
        let coefficients = normalize_coefficients(coefficients)?;
        let degree = coefficients.len() - 1;
        let original: Vec<Complex> = coefficients.iter().map(|&c| Complex::real(c)).collect();

        let mut deflated = original.clone();
        let mut roots = Vec::with_capacity(degree);
        let mut converged = Vec::with_capacity(degree);

        // Extract one root at a time from the shrinking polynomial
        for j in (1..=degree).rev() {
            let (x, ok) = self.laguerre(&deflated[..=j], self.seed);
            roots.push(x);
            converged.push(ok);

            // Synthetic division by (x - root)
            let mut b = deflated[j];
            for jj in (0..j).rev() {
                let c = deflated[jj];
                deflated[jj] = b;
                b = x * b + c;
            }
        }

        if self.polish {
            for (root, ok) in roots.iter_mut().zip(converged.iter_mut()) {
                let (polished, polished_ok) = self.laguerre(&original, *root);
                if polished_ok || !*ok {
                    *root = polished;
                    *ok = polished_ok;
                }
            }
        }

        let unconverged = converged.iter().filter(|&&ok| !ok).count();
        if unconverged > 0 {
            tracing::warn!(
                degree,
                unconverged,
                max_iterations = self.max_iterations,
                "Laguerre iteration did not converge; keeping best estimates"
            );
        }

        Ok(RootSet {
            roots: roots.into_iter().map(snap_to_real).collect(),
            unconverged,
        })
    }
}

/// Eigenvalues of the companion matrix.
///
/// The companion matrix of the monic polynomial
/// `xⁿ + c[n−1]/c[n]·xⁿ⁻¹ + … + c[0]/c[n]` has those coefficients, negated,
/// in its first row and ones on the subdiagonal; its eigenvalues are the
/// polynomial's roots. They are found by unshifted QR iteration and then
/// polished with Newton-Raphson on the original polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionMatrixSolver {
    /// Maximum QR iterations.
    pub max_iterations: usize,
    /// Subdiagonal magnitude treated as zero.
    pub tolerance: f64,
    /// Newton-Raphson polishing iterations per root.
    pub polish_iterations: usize,
}

impl Default for CompanionMatrixSolver {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
            polish_iterations: 20,
        }
    }
}

impl CompanionMatrixSolver {
    /// Polish a root using Newton-Raphson iteration.
    ///
    /// Returns the root and whether the step size dropped below the
    /// tolerance (or the residual vanished) within the iteration budget.
    fn polish_root(&self, a: &[Complex], mut z: Complex) -> (Complex, bool) {
        for _ in 0..self.polish_iterations {
            let (p, dp, _) = evaluate(a, z);
            if p.abs() == 0.0 {
                return (z, true);
            }
            let delta = match p.checked_div(dp) {
                Ok(d) => d,
                Err(_) => return (z, false),
            };
            z = z - delta;
            if delta.abs() <= self.tolerance * z.abs().max(1.0) {
                return (z, true);
            }
        }
        (z, false)
    }
}

impl RootFinder for CompanionMatrixSolver {
    fn find_roots(&self, coefficients: &[f64]) -> Result<RootSet> {
        let coefficients = normalize_coefficients(coefficients)?;
        let n = coefficients.len() - 1;
        if n == 0 {
            return Ok(RootSet::default());
        }

        // Build companion matrix
        let lead = coefficients[n];
        let mut companion = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            companion[[0, i]] = -coefficients[n - 1 - i] / lead;
        }
        for i in 1..n {
            companion[[i, i - 1]] = 1.0;
        }

        let eigenvalues = compute_eigenvalues(&companion, self.max_iterations, self.tolerance);

        let original: Vec<Complex> = coefficients.iter().map(|&c| Complex::real(c)).collect();
        let mut roots = Vec::with_capacity(n);
        let mut unconverged = 0;
        for eig in eigenvalues {
            let (root, ok) = self.polish_root(&original, eig);
            if !ok {
                unconverged += 1;
            }
            roots.push(snap_to_real(root));
        }

        if unconverged > 0 {
            tracing::warn!(degree = n, unconverged, "companion-matrix roots did not polish");
        }

        Ok(RootSet { roots, unconverged })
    }
}

/// Compute eigenvalues of a real matrix.
///
/// Runs QR iterations until no two consecutive subdiagonal entries are
/// significant, i.e. the matrix is quasi-triangular with 1×1 blocks for
/// real eigenvalues and 2×2 blocks for complex-conjugate pairs.
fn compute_eigenvalues(matrix: &Array2<f64>, max_iter: usize, tol: f64) -> Vec<Complex> {
    let n = matrix.nrows();
    if n == 0 {
        return Vec::new();
    }

    let mut h = matrix.clone();
    let significant = |h: &Array2<f64>, i: usize| h[[i, i - 1]].abs() > tol;

    for _ in 0..max_iter {
        let (q, r) = qr_decomposition(&h);

        // H = R * Q
        h = r.dot(&q);

        let quasi_triangular = (2..n).all(|i| !(significant(&h, i) && significant(&h, i - 1)));
        if quasi_triangular {
            break;
        }
    }

    // Extract eigenvalues from the diagonal blocks
    let mut eigenvalues = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        if i == n - 1 || h[[i + 1, i]].abs() <= tol {
            // Real eigenvalue
            eigenvalues.push(Complex::real(h[[i, i]]));
            i += 1;
        } else {
            // Complex conjugate pair (or two reals) from a 2×2 block
            let a = h[[i, i]];
            let b = h[[i, i + 1]];
            let c = h[[i + 1, i]];
            let d = h[[i + 1, i + 1]];

            let trace = a + d;
            let det = a * d - b * c;
            let disc = trace * trace - 4.0 * det;

            if disc < 0.0 {
                let real = trace / 2.0;
                let imag = (-disc).sqrt() / 2.0;
                eigenvalues.push(Complex::new(real, imag));
                eigenvalues.push(Complex::new(real, -imag));
            } else {
                let sqrt_disc = disc.sqrt();
                eigenvalues.push(Complex::real((trace + sqrt_disc) / 2.0));
                eigenvalues.push(Complex::real((trace - sqrt_disc) / 2.0));
            }
            i += 2;
        }
    }

    eigenvalues
}

/// QR decomposition using Householder reflections.
fn qr_decomposition(a: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut q = Array2::<f64>::eye(n);
    let mut r = a.clone();

    for k in 0..n.saturating_sub(1) {
        let mut v: Vec<f64> = (k..n).map(|i| r[[i, k]]).collect();

        let norm_x = v.iter().map(|&x| x * x).sum::<f64>().sqrt();
        if norm_x < 1e-30 {
            continue;
        }
        v[0] += if v[0] >= 0.0 { norm_x } else { -norm_x };

        let norm_v = v.iter().map(|&x| x * x).sum::<f64>().sqrt();
        if norm_v < 1e-30 {
            continue;
        }
        v.iter_mut().for_each(|x| *x /= norm_v);

        // R <- (I - 2vvᵀ) R
        for j in k..n {
            let dot: f64 = v.iter().enumerate().map(|(i, &vi)| vi * r[[k + i, j]]).sum();
            for (i, &vi) in v.iter().enumerate() {
                r[[k + i, j]] -= 2.0 * dot * vi;
            }
        }

        // Q <- Q (I - 2vvᵀ)
        for j in 0..n {
            let dot: f64 = v.iter().enumerate().map(|(i, &vi)| vi * q[[j, k + i]]).sum();
            for (i, &vi) in v.iter().enumerate() {
                q[[j, k + i]] -= 2.0 * dot * vi;
            }
        }
    }

    (q, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_has_root(roots: &[Complex], expected: Complex, tol: f64) {
        assert!(
            roots.iter().any(|r| (*r - expected).abs() < tol),
            "{} not among {:?}",
            expected,
            roots
        );
    }

    #[test]
    fn triple_root() {
        // x³ − 6x² + 12x − 8 = (x − 2)³
        let set = LaguerreSolver::default().find_roots(&[-8.0, 12.0, -6.0, 1.0]).unwrap();
        assert_eq!(set.roots.len(), 3);
        assert!(set.is_converged());
        for r in &set.roots {
            assert_abs_diff_eq!(r.re, 2.0, epsilon = 1e-6);
            assert_abs_diff_eq!(r.im, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn complex_conjugate_pair() {
        // x² + 1
        let set = LaguerreSolver::default().find_roots(&[1.0, 0.0, 1.0]).unwrap();
        assert_has_root(&set.roots, Complex::new(0.0, 1.0), 1e-10);
        assert_has_root(&set.roots, Complex::new(0.0, -1.0), 1e-10);
    }

    #[test]
    fn mixed_roots_and_deterministic() {
        // (x − 0.5)(x + 0.25)(x² − 1.2x + 0.72): roots 0.5, −0.25, 0.6 ± 0.6i
        let p = [-0.09, -0.03, 0.895, -1.45, 1.0];
        let solver = LaguerreSolver::fast();
        let a = solver.find_roots(&p).unwrap();
        let b = solver.find_roots(&p).unwrap();
        assert_eq!(a, b);
        assert_has_root(&a.roots, Complex::real(0.5), 1e-6);
        assert_has_root(&a.roots, Complex::real(-0.25), 1e-6);
        assert_has_root(&a.roots, Complex::new(0.6, 0.6), 1e-6);
        assert_has_root(&a.roots, Complex::new(0.6, -0.6), 1e-6);
    }

    #[test]
    fn leading_zeros_are_trimmed() {
        let set = LaguerreSolver::default().find_roots(&[-3.0, 1.0, 0.0, 0.0]).unwrap();
        assert_eq!(set.roots.len(), 1);
        assert_abs_diff_eq!(set.roots[0].re, 3.0, epsilon = 1e-12);

        let set = LaguerreSolver::default().find_roots(&[5.0]).unwrap();
        assert!(set.roots.is_empty());
    }

    #[test]
    fn degenerate_polynomials_are_rejected() {
        let solver = LaguerreSolver::default();
        assert!(matches!(solver.find_roots(&[]), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(solver.find_roots(&[0.0, 0.0]), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(
            solver.find_roots(&[1.0, f64::NAN]),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn iteration_cap_keeps_estimate() {
        let solver = LaguerreSolver {
            max_iterations: 1,
            polish: false,
            ..LaguerreSolver::accurate()
        };
        let set = solver.find_roots(&[-2.0, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(set.roots.len(), 5);
        assert!(set.unconverged > 0);
        assert!(set.roots.iter().all(|r| r.is_finite()));
        assert!(matches!(
            set.require_converged(),
            Err(Error::RootFindingNonConvergence { .. })
        ));
    }

    #[test]
    fn zero_roots_of_monomial() {
        let set = LaguerreSolver::default().find_roots(&[0.0, 0.0, 0.0, 1.0]).unwrap();
        assert!(set.is_converged());
        for r in &set.roots {
            assert!(r.abs() < 1e-12);
        }
    }

    #[test]
    fn companion_matrix_agrees() {
        // (x − 1)(x − 2)(x + 3) = x³ − 7x + 6
        let set = CompanionMatrixSolver::default().find_roots(&[6.0, -7.0, 0.0, 1.0]).unwrap();
        assert!(set.is_converged());
        for expected in [1.0, 2.0, -3.0] {
            assert_has_root(&set.roots, Complex::real(expected), 1e-9);
        }

        let set = CompanionMatrixSolver::default().find_roots(&[1.0, 0.0, 1.0]).unwrap();
        assert_has_root(&set.roots, Complex::new(0.0, 1.0), 1e-9);
        assert_has_root(&set.roots, Complex::new(0.0, -1.0), 1e-9);
    }

    #[test]
    fn nearly_real_roots_snap_to_the_axis() {
        assert_eq!(snap_to_real(Complex::new(3.0, 1e-5)), Complex::real(3.0));
        assert_eq!(snap_to_real(Complex::new(-3.0, -1e-5)), Complex::real(-3.0));
        assert_eq!(snap_to_real(Complex::new(3.0, 2e-5)).im, 2e-5);
        assert_eq!(snap_to_real(Complex::ZERO), Complex::ZERO);

        // x² − 4x + 4 + 1e-12: roots 2 ± 1e-6i, within 2·EPS·|re|
        let set = LaguerreSolver::default().find_roots(&[4.0 + 1e-12, -4.0, 1.0]).unwrap();
        assert_eq!(set.roots.len(), 2);
        for r in &set.roots {
            assert_eq!(r.im, 0.0);
            assert_abs_diff_eq!(r.re, 2.0, epsilon = 1e-9);
        }

        // 2 ± 1e-4i is well outside and stays complex
        let set = LaguerreSolver::default().find_roots(&[4.0 + 1e-8, -4.0, 1.0]).unwrap();
        assert_has_root(&set.roots, Complex::new(2.0, 1e-4), 1e-8);
        assert_has_root(&set.roots, Complex::new(2.0, -1e-4), 1e-8);
    }

    #[test]
    fn lpc_vector_is_reversed() {
        assert_eq!(lpc_polynomial(&[1.0, -1.2, 0.6]), vec![0.6, -1.2, 1.0]);
    }
}
