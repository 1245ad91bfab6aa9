//! Complex - minimal complex arithmetic for root finding.
//!
//! A small `Copy` value type with exactly the operations the LPC and
//! root-finding code needs. Arithmetic operators follow IEEE-754 double
//! semantics; `checked_div` is the guarded form used wherever a divisor can
//! legitimately be zero.
//!
//! The principal square root picks the branch with non-negative real part:
//!
//! ```text
//! d = |z|
//! re(√z) = sqrt((re + d) / 2)
//! im(√z) = sign(im) · sqrt((−re + d) / 2)     (non-negative when im == 0)
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_complex::Complex64;

use crate::error::{Error, Result};

/// A complex number with `f64` parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// Zero.
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    /// One.
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    /// Create a complex number from its parts.
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Create a purely real complex number.
    #[inline]
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Modulus `sqrt(re² + im²)`.
    #[inline]
    pub fn abs(self) -> f64 {
        self.norm().sqrt()
    }

    /// Squared modulus `re² + im²`.
    #[inline]
    pub fn norm(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Argument in `(−π, π]`.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Principal square root (non-negative real part).
    pub fn sqrt(self) -> Self {
        let d = self.abs();
        let re = ((self.re + d) / 2.0).max(0.0).sqrt();
        let im = ((-self.re + d) / 2.0).max(0.0).sqrt();
        if self.im < 0.0 {
            Self::new(re, -im)
        } else {
            Self::new(re, im)
        }
    }

    /// Multiply by a real scalar.
    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    /// Division that fails on a zero divisor instead of producing NaN.
    pub fn checked_div(self, rhs: Complex) -> Result<Complex> {
        let den = rhs.norm();
        if den == 0.0 {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::new(
            (self.re * rhs.re + self.im * rhs.im) / den,
            (self.im * rhs.re - self.re * rhs.im) / den,
        ))
    }

    /// True when both parts are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Add for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Add<f64> for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: f64) -> Complex {
        Complex::new(self.re + rhs, self.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Sub<f64> for Complex {
    type Output = Complex;

    #[inline]
    fn sub(self, rhs: f64) -> Complex {
        Complex::new(self.re - rhs, self.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: f64) -> Complex {
        self.scale(rhs)
    }
}

impl Mul<Complex> for f64 {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        rhs.scale(self)
    }
}

/// IEEE division; a zero divisor yields non-finite parts.
/// Use [`Complex::checked_div`] when the divisor may be zero.
impl Div for Complex {
    type Output = Complex;

    #[inline]
    fn div(self, rhs: Complex) -> Complex {
        let den = rhs.norm();
        Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / den,
            (self.im * rhs.re - self.re * rhs.im) / den,
        )
    }
}

impl Div<f64> for Complex {
    type Output = Complex;

    #[inline]
    fn div(self, rhs: f64) -> Complex {
        Complex::new(self.re / rhs, self.im / rhs)
    }
}

impl Neg for Complex {
    type Output = Complex;

    #[inline]
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex::real(re)
    }
}

impl From<Complex64> for Complex {
    fn from(c: Complex64) -> Self {
        Complex::new(c.re, c.im)
    }
}

impl From<Complex> for Complex64 {
    fn from(c: Complex) -> Self {
        Complex64::new(c.re, c.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im < 0.0 {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn arithmetic() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);
        assert_eq!(a + b, Complex::new(4.0, 1.0));
        assert_eq!(a - b, Complex::new(-2.0, 3.0));
        assert_eq!(a * b, Complex::new(5.0, 5.0));
        let q = a / b;
        assert_abs_diff_eq!(q.re, 0.1, epsilon = 1e-15);
        assert_abs_diff_eq!(q.im, 0.7, epsilon = 1e-15);
        assert_eq!(a.conj(), Complex::new(1.0, -2.0));
    }

    #[test]
    fn modulus_and_argument() {
        let z = Complex::new(3.0, 4.0);
        assert_eq!(z.abs(), 5.0);
        assert_eq!(z.norm(), 25.0);
        assert_abs_diff_eq!(Complex::new(-1.0, 0.0).arg(), std::f64::consts::PI);
        assert_abs_diff_eq!(Complex::new(0.0, -1.0).arg(), -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn sqrt_takes_principal_branch() {
        let r = Complex::new(-4.0, 0.0).sqrt();
        assert_eq!(r, Complex::new(0.0, 2.0));

        let r = Complex::new(3.0, -4.0).sqrt();
        assert_abs_diff_eq!(r.re, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.im, -1.0, epsilon = 1e-12);

        for z in [Complex::new(0.3, 1.7), Complex::new(-2.5, -0.1), Complex::new(9.0, 0.0)] {
            let s = z.sqrt();
            assert!(s.re >= 0.0);
            let back = s * s;
            assert_abs_diff_eq!(back.re, z.re, epsilon = 1e-12);
            assert_abs_diff_eq!(back.im, z.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn checked_div_rejects_zero() {
        let a = Complex::new(1.0, 1.0);
        assert!(matches!(a.checked_div(Complex::ZERO), Err(Error::DivisionByZero)));
        let q = a.checked_div(Complex::new(0.0, 1.0)).unwrap();
        assert_eq!(q, Complex::new(1.0, -1.0));
    }

    #[test]
    fn converts_to_num_complex() {
        let c: Complex64 = Complex::new(1.5, -0.5).into();
        assert_eq!(Complex::from(c), Complex::new(1.5, -0.5));
    }
}
