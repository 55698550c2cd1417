//! State-space realization of a SISO linear time-invariant system
//!
//!   dx/dt = Ax + Bu
//!   y = Cx + Du
//!
//! where:
//!   - A: n×n state matrix
//!   - B: n×1 input vector
//!   - C: 1×n output vector
//!   - D: scalar feedthrough

use nalgebra::{DMatrix, DVector, RowDVector};

/// SISO state-space model
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: RowDVector<f64>,
    d: f64,
}

impl StateSpace {
    /// Create a state-space model
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of `a`, `b` and `c` disagree.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>, c: RowDVector<f64>, d: f64) -> Self {
        let n = a.nrows();
        assert_eq!(a.ncols(), n, "State matrix must be square");
        assert_eq!(b.len(), n, "Input vector length must match state dimension");
        assert_eq!(c.len(), n, "Output vector length must match state dimension");
        Self { a, b, c, d }
    }

    /// Number of states
    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &RowDVector<f64> {
        &self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// Returns true if there is direct feedthrough (D != 0)
    pub fn has_passthrough(&self) -> bool {
        self.d != 0.0
    }

    /// y = Cx + Du
    pub fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        if self.order() == 0 {
            return self.d * u;
        }
        (&self.c * x)[0] + self.d * u
    }

    /// Zero-order-hold discretization over a step `dt`
    ///
    /// Returns `(Φ, Γ)` with `x[k+1] = Φ x[k] + Γ u[k]` exact for an input
    /// held constant over the step. Both come from one exponential of the
    /// augmented matrix `[[A, B], [0, 0]] dt`.
    pub fn discretize(&self, dt: f64) -> (DMatrix<f64>, DVector<f64>) {
        let n = self.order();
        let mut augmented = DMatrix::<f64>::zeros(n + 1, n + 1);
        augmented.view_mut((0, 0), (n, n)).copy_from(&(&self.a * dt));
        augmented.view_mut((0, n), (n, 1)).copy_from(&(&self.b * dt));

        let e = augmented.exp();
        let phi = e.view((0, 0), (n, n)).into_owned();
        let gamma = e.view((0, n), (n, 1)).column(0).into_owned();
        (phi, gamma)
    }
}
