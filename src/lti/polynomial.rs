//! Real polynomials in descending powers of s
//!
//! `p(s) = c[0]*s^n + c[1]*s^(n-1) + ... + c[n]`
//!
//! Arithmetic is exact coefficient arithmetic: addition aligns by degree
//! (the shorter operand is padded with leading zeros), multiplication is
//! discrete convolution. Roots come from the eigenvalues of the companion
//! matrix, followed by a few guarded Newton polishing passes.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::utils::constants::ROOT_POLISH_ITERATIONS;

/// Polynomial with real coefficients, highest degree first
///
/// Leading zeros are stripped on construction, so `coeffs()[0]` is non-zero
/// unless the polynomial is identically zero (stored as `[0.0]`).
///
/// ```rust
/// use thermal_pid::lti::Polynomial;
///
/// let p = Polynomial::new(&[1.0, 1.0]); // s + 1
/// let q = Polynomial::new(&[1.0, 2.0]); // s + 2
/// assert_eq!((&p * &q).coeffs(), &[1.0, 3.0, 2.0]);
/// assert_eq!((&p + &Polynomial::constant(3.0)).coeffs(), &[1.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create a polynomial from coefficients in descending powers
    pub fn new(coeffs: &[f64]) -> Self {
        Self::from_vec(coeffs.to_vec())
    }

    /// Create a polynomial taking ownership of the coefficient vector
    pub fn from_vec(mut coeffs: Vec<f64>) -> Self {
        let first = coeffs.iter().position(|&c| c != 0.0);
        match first {
            Some(0) => {}
            Some(i) => {
                coeffs.drain(..i);
            }
            None => coeffs = vec![0.0],
        }
        Self { coeffs }
    }

    /// Constant polynomial
    pub fn constant(value: f64) -> Self {
        Self::from_vec(vec![value])
    }

    /// The monomial `s`
    pub fn s() -> Self {
        Self {
            coeffs: vec![1.0, 0.0],
        }
    }

    pub fn zero() -> Self {
        Self { coeffs: vec![0.0] }
    }

    /// Coefficients in descending powers
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Degree; the zero polynomial reports 0
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0] == 0.0
    }

    /// Leading (highest power) coefficient
    pub fn leading(&self) -> f64 {
        self.coeffs[0]
    }

    /// Constant term
    pub fn constant_term(&self) -> f64 {
        self.coeffs[self.coeffs.len() - 1]
    }

    /// True when every coefficient is finite
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }

    /// Evaluate at a real point (Horner)
    pub fn eval(&self, s: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * s + c)
    }

    /// Evaluate at a complex point (Horner)
    pub fn eval_complex(&self, s: Complex64) -> Complex64 {
        self.coeffs
            .iter()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * s + c)
    }

    /// First derivative with respect to s
    pub fn derivative(&self) -> Self {
        let n = self.degree();
        if n == 0 {
            return Self::zero();
        }
        let coeffs = self.coeffs[..n]
            .iter()
            .enumerate()
            .map(|(i, &c)| c * (n - i) as f64)
            .collect();
        Self::from_vec(coeffs)
    }

    /// Multiply every coefficient by `k`
    pub fn scale(&self, k: f64) -> Self {
        Self::from_vec(self.coeffs.iter().map(|&c| c * k).collect())
    }

    /// Coefficients left-padded with zeros to `len` entries
    ///
    /// Returns the coefficients unchanged if they are already longer.
    pub fn padded(&self, len: usize) -> Vec<f64> {
        let pad = len.saturating_sub(self.coeffs.len());
        let mut out = vec![0.0; pad];
        out.extend_from_slice(&self.coeffs);
        out
    }

    /// All complex roots, multiplicities preserved
    ///
    /// Exact zero roots (trailing zero coefficients) are split off before
    /// the eigenvalue solve and reported as exact zeros. Constant
    /// polynomials have no roots.
    pub fn roots(&self) -> Vec<Complex64> {
        let trailing = self.coeffs.iter().rev().take_while(|&&c| c == 0.0).count();
        if self.is_zero() || self.degree() == 0 {
            return Vec::new();
        }

        let reduced = &self.coeffs[..self.coeffs.len() - trailing];
        let mut roots = companion_eigenvalues(reduced);
        for root in roots.iter_mut() {
            *root = self.polish(*root);
        }
        roots.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(trailing));
        roots
    }

    /// Guarded Newton refinement: a step is kept only if it reduces |p|
    fn polish(&self, mut z: Complex64) -> Complex64 {
        let dp = self.derivative();
        let mut residual = self.eval_complex(z).norm();
        for _ in 0..ROOT_POLISH_ITERATIONS {
            let slope = dp.eval_complex(z);
            if slope.norm() == 0.0 || residual == 0.0 {
                break;
            }
            let candidate = z - self.eval_complex(z) / slope;
            let candidate_residual = self.eval_complex(candidate).norm();
            if !candidate_residual.is_finite() || candidate_residual >= residual {
                break;
            }
            z = candidate;
            residual = candidate_residual;
        }
        z
    }
}

/// Eigenvalues of the companion matrix of `coeffs` (leading entry non-zero)
fn companion_eigenvalues(coeffs: &[f64]) -> Vec<Complex64> {
    let n = coeffs.len() - 1;
    if n == 0 {
        return Vec::new();
    }
    let lead = coeffs[0];

    // First row: -a_1/a_0 ... -a_n/a_0, ones on the subdiagonal
    let mut companion = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        companion[(0, j)] = -coeffs[j + 1] / lead;
    }
    for i in 1..n {
        companion[(i, i - 1)] = 1.0;
    }

    companion.complex_eigenvalues().iter().copied().collect()
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.degree();
        let mut first = true;
        for (i, &c) in self.coeffs.iter().enumerate() {
            if c == 0.0 && !(first && i == n) {
                continue;
            }
            let power = n - i;
            if first {
                write!(f, "{}", c)?;
            } else if c < 0.0 {
                write!(f, " - {}", -c)?;
            } else {
                write!(f, " + {}", c)?;
            }
            match power {
                0 => {}
                1 => write!(f, " s")?,
                p => write!(f, " s^{}", p)?,
            }
            first = false;
        }
        Ok(())
    }
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &'a Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(rhs.coeffs.len());
        let lhs = self.padded(len);
        let rhs = rhs.padded(len);
        Polynomial::from_vec(lhs.iter().zip(&rhs).map(|(a, b)| a + b).collect())
    }
}

impl<'a> Sub<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &'a Polynomial) -> Polynomial {
        self + &(-rhs)
    }
}

impl<'a> Mul<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &'a Polynomial) -> Polynomial {
        let mut out = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial::from_vec(out)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial {
        &self + &rhs
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial {
        &self - &rhs
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        &self * &rhs
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -&self
    }
}
