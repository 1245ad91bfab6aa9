//! Toeplitz - implicit Toeplitz matrices and dense Gauss-Jordan helpers.
//!
//! A Toeplitz matrix is constant along each diagonal, so it is fully
//! described by a short generating vector:
//!
//! - **Symmetric** form, generator `c` of length N:
//!   `M[i, j] = c[|i − j|]` (autocorrelation matrices).
//! - **General** form, generator `c` of length 2N − 1 holding every
//!   diagonal: `M[i, j] = c[(N − 1 − j) + i]`.
//!
//! The matrix is only materialized when inversion or elimination needs it.
//! Inversion is Gauss-Jordan on the augmented matrix `[M | I]` with partial
//! pivoting; the inverse of a Toeplitz matrix is not Toeplitz in general, so
//! inverses are returned as dense `Array2<f64>`.

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Layout {
    Symmetric,
    General,
}

/// An implicit N×N Toeplitz matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ToeplitzMatrix {
    coefficients: Vec<f64>,
    size: usize,
    layout: Layout,
}

impl ToeplitzMatrix {
    /// Symmetric Toeplitz matrix `M[i, j] = c[|i − j|]`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `coefficients` is empty.
    pub fn symmetric(coefficients: &[f64]) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::InvalidConfiguration(
                "Toeplitz generator must not be empty".into(),
            ));
        }
        Ok(Self {
            coefficients: coefficients.to_vec(),
            size: coefficients.len(),
            layout: Layout::Symmetric,
        })
    }

    /// General Toeplitz matrix from its 2N − 1 diagonals.
    ///
    /// `coefficients[N − 1]` is the main diagonal; lower indices run along
    /// the first row from right to left, higher indices down the first
    /// column.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the length is not odd.
    pub fn general(coefficients: &[f64]) -> Result<Self> {
        if coefficients.len() % 2 == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "General Toeplitz generator needs 2N-1 values, got {}",
                coefficients.len()
            )));
        }
        Ok(Self {
            coefficients: coefficients.to_vec(),
            size: (coefficients.len() + 1) / 2,
            layout: Layout::General,
        })
    }

    /// Matrix dimension N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Element `M[i, j]`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below `size()`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index out of bounds");
        match self.layout {
            Layout::Symmetric => self.coefficients[i.abs_diff(j)],
            Layout::General => self.coefficients[(self.size - 1 - j) + i],
        }
    }

    /// Materialize the matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.size, self.size), |(i, j)| self.get(i, j))
    }

    /// Determinant by Gaussian elimination; 0 for a singular matrix.
    pub fn determinant(&self) -> f64 {
        dense_determinant(&self.to_dense())
    }

    /// Dense inverse by Gauss-Jordan elimination.
    ///
    /// # Errors
    ///
    /// `Singular` when the determinant is zero.
    pub fn inverse(&self) -> Result<Array2<f64>> {
        dense_inverse(&self.to_dense())
    }

    /// Matrix-vector product `M · v`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `v.len() != size()`.
    pub fn dot(&self, v: &[f64]) -> Result<Vec<f64>> {
        if v.len() != self.size {
            return Err(Error::DimensionMismatch {
                expected: self.size,
                actual: v.len(),
            });
        }
        Ok((0..self.size)
            .map(|i| (0..self.size).map(|j| self.get(i, j) * v[j]).sum())
            .collect())
    }
}

fn require_square(m: &Array2<f64>) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(Error::DimensionMismatch {
            expected: rows,
            actual: cols,
        });
    }
    Ok(rows)
}

/// Row index of the largest-magnitude entry in `col` at or below `from`,
/// or `None` if that part of the column is entirely zero.
fn find_pivot(a: &Array2<f64>, col: usize, from: usize) -> Option<usize> {
    let mut best = None;
    let mut best_abs = 0.0;
    for r in from..a.nrows() {
        let v = a[[r, col]].abs();
        if v > best_abs {
            best_abs = v;
            best = Some(r);
        }
    }
    best
}

fn swap_rows(a: &mut Array2<f64>, r1: usize, r2: usize) {
    if r1 == r2 {
        return;
    }
    for c in 0..a.ncols() {
        a.swap([r1, c], [r2, c]);
    }
}

/// Determinant of a square matrix by Gaussian elimination with row swaps.
///
/// Returns 0 when a pivot column has no non-zero entry on or below the
/// diagonal, and also for a non-square input.
pub fn dense_determinant(m: &Array2<f64>) -> f64 {
    let n = match require_square(m) {
        Ok(n) => n,
        Err(_) => return 0.0,
    };

    let mut a = m.clone();
    let mut det = 1.0;

    for k in 0..n {
        let pivot = match find_pivot(&a, k, k) {
            Some(p) => p,
            None => return 0.0,
        };
        if pivot != k {
            swap_rows(&mut a, pivot, k);
            det = -det;
        }

        let p = a[[k, k]];
        det *= p;

        for r in (k + 1)..n {
            let factor = a[[r, k]] / p;
            if factor == 0.0 {
                continue;
            }
            for c in k..n {
                a[[r, c]] -= factor * a[[k, c]];
            }
        }
    }

    det
}

/// Inverse of a square matrix by Gauss-Jordan elimination on `[M | I]`.
///
/// # Errors
///
/// - `DimensionMismatch` for a non-square matrix
/// - `Singular` when the determinant is zero
pub fn dense_inverse(m: &Array2<f64>) -> Result<Array2<f64>> {
    let n = require_square(m)?;
    if dense_determinant(m) == 0.0 {
        return Err(Error::Singular);
    }

    // Augmented [M | I]
    let mut aug = Array2::<f64>::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for k in 0..n {
        let pivot = find_pivot(&aug, k, k).ok_or(Error::Singular)?;
        swap_rows(&mut aug, pivot, k);

        // Normalize the pivot row
        let p = aug[[k, k]];
        for c in 0..2 * n {
            aug[[k, c]] /= p;
        }

        // Eliminate column k from every other row
        for r in 0..n {
            if r == k {
                continue;
            }
            let factor = aug[[r, k]];
            if factor == 0.0 {
                continue;
            }
            for c in 0..2 * n {
                aug[[r, c]] -= factor * aug[[k, c]];
            }
        }
    }

    let mut inv = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inv[[i, j]] = aug[[i, n + j]];
        }
    }
    Ok(inv)
}

/// Dense matrix-vector product.
///
/// # Errors
///
/// `DimensionMismatch` if `v.len()` differs from the column count.
pub fn dense_dot(m: &Array2<f64>, v: &[f64]) -> Result<Vec<f64>> {
    if v.len() != m.ncols() {
        return Err(Error::DimensionMismatch {
            expected: m.ncols(),
            actual: v.len(),
        });
    }
    Ok(m.dot(&Array1::from_vec(v.to_vec())).to_vec())
}
