//! Damping ratio from a desired overshoot
//!
//! For an underdamped second-order pair the fractional overshoot is
//!
//! ```text
//! Mp = exp(-π ζ / sqrt(1 - ζ²))
//! ```
//!
//! which falls strictly from 1 at ζ = 0 to 0 as ζ → 1, so every
//! `Mp ∈ (0, 1)` has exactly one root in `(0, 1)`. The solve works on the
//! logarithmic form
//!
//! ```text
//! g(ζ) = π ζ / sqrt(1 - ζ²) + ln(Mp) = 0
//! ```
//!
//! with Newton steps from ζ = 0.5, falling back to bisection whenever a
//! Newton step would leave the current bracket.

use std::f64::consts::PI;

use log::debug;

use crate::error::{Error, Result};
use crate::utils::constants::{
    DAMPING_GUESS, DAMPING_ITERATIONS_MAX, DAMPING_TOLERANCE_RESIDUAL, DAMPING_TOLERANCE_STEP,
};

/// Overshoot of a second-order pair with damping ratio `zeta ∈ [0, 1)`
pub fn overshoot_from_damping(zeta: f64) -> f64 {
    (-PI * zeta / (1.0 - zeta * zeta).sqrt()).exp()
}

/// Solve `exp(-π ζ / sqrt(1 - ζ²)) = overshoot` for `ζ ∈ (0, 1)`
///
/// # Errors
///
/// `InvalidSpec` if `overshoot` is not strictly inside `(0, 1)` or the
/// iteration budget runs out.
///
/// ```rust
/// use thermal_pid::design::damping_ratio;
///
/// let zeta = damping_ratio(0.10).unwrap();
/// assert!((zeta - 0.5912).abs() < 1e-4);
/// ```
pub fn damping_ratio(overshoot: f64) -> Result<f64> {
    if !(overshoot > 0.0 && overshoot < 1.0) {
        return Err(Error::spec(format!(
            "overshoot must lie strictly between 0 and 1, got {}",
            overshoot
        )));
    }

    let log_mp = overshoot.ln();
    let g = |z: f64| PI * z / (1.0 - z * z).sqrt() + log_mp;
    let dg = |z: f64| PI / (1.0 - z * z).powf(1.5);

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut zeta = DAMPING_GUESS;

    for iteration in 0..DAMPING_ITERATIONS_MAX {
        let residual = g(zeta);
        if residual.abs() < DAMPING_TOLERANCE_RESIDUAL {
            debug!("damping ratio {} for Mp={} after {} iterations", zeta, overshoot, iteration);
            return Ok(zeta);
        }

        if residual < 0.0 {
            lo = zeta;
        } else {
            hi = zeta;
        }

        let newton = zeta - residual / dg(zeta);
        let next = if newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        let step = (next - zeta).abs();
        zeta = next;
        if step < DAMPING_TOLERANCE_STEP || hi - lo < DAMPING_TOLERANCE_STEP {
            debug!("damping ratio {} for Mp={} after {} iterations", zeta, overshoot, iteration + 1);
            return Ok(zeta);
        }
    }

    Err(Error::spec(format!(
        "damping ratio for overshoot {} did not converge in {} iterations",
        overshoot, DAMPING_ITERATIONS_MAX
    )))
}
