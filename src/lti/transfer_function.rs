//! SISO transfer functions as ratios of real polynomials
//!
//!   H(s) = B(s) / A(s) = (b_n s^n + ... + b_0) / (a_m s^m + ... + a_0)
//!
//! Transfer functions are plain values. Series composition is polynomial
//! multiplication of numerators and denominators; feedback composes the
//! numerator and denominator algebraically without pole-zero cancellation.
//!
//! References:
//! - Ogata, K. (2010). Modern Control Engineering (5th ed.). Section 2.3
//! - Chen, C.T. (1999). Linear System Theory and Design (3rd ed.). Section 4.4

use std::fmt;
use std::ops::Mul;

use log::debug;
use nalgebra::{DMatrix, DVector, RowDVector};
use num_complex::Complex64;

use super::{Polynomial, StateSpace};
use crate::error::{Error, Result};

/// Rational transfer function `num(s) / den(s)`
///
/// The denominator is never the zero polynomial and both polynomials have
/// finite coefficients.
///
/// # Example (plant in series with a sensor)
///
/// ```rust
/// use thermal_pid::lti::TransferFunction;
///
/// // G(s) = 90 / (10s + 1), H(s) = 1 / (s + 1)
/// let g = TransferFunction::new(&[90.0], &[10.0, 1.0]).unwrap();
/// let h = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
///
/// let gh = &g * &h;
/// assert_eq!(gh.denominator().coeffs(), &[10.0, 11.0, 1.0]);
/// assert_eq!(gh.dc_gain(), 90.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Polynomial,
    den: Polynomial,
}

impl TransferFunction {
    /// Create a transfer function from coefficients in descending powers
    ///
    /// Fails with `InvalidModel` if the denominator is identically zero or
    /// any coefficient is not finite.
    pub fn new(num: &[f64], den: &[f64]) -> Result<Self> {
        Self::from_polynomials(Polynomial::new(num), Polynomial::new(den))
    }

    pub fn from_polynomials(num: Polynomial, den: Polynomial) -> Result<Self> {
        if den.is_zero() {
            return Err(Error::model("denominator polynomial is identically zero"));
        }
        if !num.is_finite() || !den.is_finite() {
            return Err(Error::model(format!(
                "non-finite coefficient in ({}) / ({})",
                num, den
            )));
        }
        Ok(Self { num, den })
    }

    /// Static gain `k`
    pub fn gain(k: f64) -> Result<Self> {
        Self::new(&[k], &[1.0])
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.num
    }

    pub fn denominator(&self) -> &Polynomial {
        &self.den
    }

    /// System order (denominator degree)
    pub fn order(&self) -> usize {
        self.den.degree()
    }

    /// `deg(num) <= deg(den)`
    pub fn is_proper(&self) -> bool {
        self.num.is_zero() || self.num.degree() <= self.den.degree()
    }

    /// `deg(num) < deg(den)`
    pub fn is_strictly_proper(&self) -> bool {
        self.num.is_zero() || self.num.degree() < self.den.degree()
    }

    /// Series connection `self * other`, validated
    pub fn series(&self, other: &TransferFunction) -> Result<Self> {
        let product = self * other;
        Self::from_polynomials(product.num, product.den)
    }

    /// Negative feedback of `self` (forward path) around `other` (return path)
    ///
    /// For `G = n1/d1` and `H = n2/d2`:
    ///   G / (1 + G H) = n1 d2 / (d1 d2 + n1 n2)
    pub fn feedback(&self, other: &TransferFunction) -> Result<Self> {
        let num = &self.num * &other.den;
        let den = &(&self.den * &other.den) + &(&self.num * &other.num);
        debug!("feedback: ({}) / ({})", num, den);
        Self::from_polynomials(num, den)
    }

    /// Unity negative feedback: for `L = N/D`, returns `N / (N + D)`
    pub fn unity_feedback(&self) -> Result<Self> {
        let den = &self.num + &self.den;
        Self::from_polynomials(self.num.clone(), den)
    }

    /// Roots of the denominator
    pub fn poles(&self) -> Vec<Complex64> {
        self.den.roots()
    }

    /// Roots of the numerator
    pub fn zeros(&self) -> Vec<Complex64> {
        self.num.roots()
    }

    /// Value at `s = 0`; infinite when the system has a pole at the origin
    pub fn dc_gain(&self) -> f64 {
        self.num.constant_term() / self.den.constant_term()
    }

    /// Evaluate `H(s)` at a complex frequency
    pub fn eval(&self, s: Complex64) -> Complex64 {
        self.num.eval_complex(s) / self.den.eval_complex(s)
    }

    /// State-space realization in observable canonical form
    ///
    /// For the normalized
    ///   H(s) = (b_n s^n + ... + b_0) / (s^n + a_{n-1} s^{n-1} + ... + a_0)
    /// the realization is
    ///   A = [-a_{n-1}  -a_{n-2}  ...  -a_0]
    ///       [   1         0      ...   0  ]
    ///       [   ⋮         ⋱            ⋮  ]
    ///       [   0        ...      1    0  ]
    ///   B = [1, 0, ..., 0]^T
    ///   C = strictly proper numerator after removing D
    ///   D = b_n  (zero unless the degrees match)
    ///
    /// Improper transfer functions have no realization and fail with
    /// `InvalidModel`.
    pub fn to_state_space(&self) -> Result<StateSpace> {
        if !self.is_proper() {
            return Err(Error::model(format!(
                "improper transfer function (numerator degree {} > denominator degree {})",
                self.num.degree(),
                self.den.degree()
            )));
        }

        let lead = self.den.leading();
        let den: Vec<f64> = self.den.coeffs().iter().map(|&a| a / lead).collect();
        let num: Vec<f64> = self
            .num
            .padded(den.len())
            .iter()
            .map(|&b| b / lead)
            .collect();
        let n = den.len() - 1;

        // Direct feedthrough, then the strictly proper remainder num - D*den
        let d = num[0];
        let remainder: Vec<f64> = num.iter().zip(&den).map(|(b, a)| b - d * a).collect();

        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut b = DVector::<f64>::zeros(n);
        let mut c = RowDVector::<f64>::zeros(n);

        if n > 0 {
            for j in 0..n {
                a[(0, j)] = -den[j + 1];
            }
            for i in 0..n - 1 {
                a[(i + 1, i)] = 1.0;
            }
            b[0] = 1.0;
            for j in 0..n {
                c[j] = remainder[j + 1];
            }
        }

        Ok(StateSpace::new(a, b, c, d))
    }
}

impl<'a> Mul<&'a TransferFunction> for &'a TransferFunction {
    type Output = TransferFunction;

    /// Series connection (no cancellation)
    fn mul(self, rhs: &'a TransferFunction) -> TransferFunction {
        TransferFunction {
            num: &self.num * &rhs.num,
            den: &self.den * &rhs.den,
        }
    }
}

impl Mul for TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: TransferFunction) -> TransferFunction {
        &self * &rhs
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) / ({})", self.num, self.den)
    }
}
