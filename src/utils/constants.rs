//! Design and simulation constants and defaults

/// Default simulation horizon for step responses
pub const SIM_HORIZON: f64 = 50.0;

/// Default number of evenly spaced response samples (endpoints included)
pub const SIM_SAMPLES: usize = 1000;

/// Default non-dominant pole multiplier
pub const POLE_MULTIPLIER: f64 = 7.0;

/// Numerator of the 2% settling-time approximation `ts = 4 / (zeta * wn)`
pub const SETTLING_FACTOR: f64 = 4.0;

/// 2% settling band
pub const BAND_2_PERCENT: f64 = 0.02;

/// 5% settling band
pub const BAND_5_PERCENT: f64 = 0.05;

/// Initial guess for the damping-ratio solve
pub const DAMPING_GUESS: f64 = 0.5;

/// Iteration budget for the damping-ratio solve
pub const DAMPING_ITERATIONS_MAX: usize = 100;

/// Step-size convergence tolerance for the damping-ratio solve
pub const DAMPING_TOLERANCE_STEP: f64 = 1e-14;

/// Residual convergence tolerance for the damping-ratio solve
pub const DAMPING_TOLERANCE_RESIDUAL: f64 = 1e-13;

/// Absolute tolerance under which a steady-state value counts as zero
pub const ZERO_TOLERANCE: f64 = 1e-8;

/// Newton polishing passes applied to each eigenvalue-based root
pub const ROOT_POLISH_ITERATIONS: usize = 3;

/// Lower end of the gain scaling range offered by front ends
pub const VARIATION_FACTOR_MIN: f64 = 0.2;

/// Upper end of the gain scaling range offered by front ends
pub const VARIATION_FACTOR_MAX: f64 = 2.0;
