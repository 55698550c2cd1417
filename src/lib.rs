//! thermal-pid - PID temperature controller design by pole placement
//!
//! Designs PID gains for a heated thermal mass measured through a
//! first-order sensor, so that the closed loop meets a percent overshoot and
//! settling time target, then checks the design by simulating the step
//! response of the closed loop.
//!
//! # Architecture
//!
//! - [`design`]: damping ratio from overshoot, gains from pole placement
//! - [`plant`]: plant, sensor and controller transfer functions, loop closing
//! - [`lti`]: polynomials, transfer functions and their state-space realization
//! - [`simulation`]: step response on a uniform grid (zero-order-hold stepping)
//! - [`metrics`]: steady state, overshoot and settling time
//! - [`study`] and [`config`]: named cases, gain variations, parallel comparison
//!
//! # Example
//!
//! ```rust
//! use thermal_pid::prelude::*;
//!
//! let params = PhysicalParameters::default();
//! let design = solve_design(&DesignSpec::new(0.10, 8.0), &params).unwrap();
//! let system = build_closed_loop(&params, &design.gains).unwrap();
//! let response = simulate_step(&system, 50.0, 1000);
//! let metrics = response.metrics(0.02);
//!
//! assert!((metrics.steady_state - 1.0).abs() < 1e-3);
//! assert_eq!(get_poles(&system).len(), 3);
//! ```

pub mod config;
pub mod design;
pub mod error;
pub mod export;
pub mod lti;
pub mod metrics;
pub mod plant;
pub mod simulation;
pub mod study;
pub mod utils;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::StudyConfig;
    pub use crate::design::{damping_ratio, solve_design, DesignResult, DesignSpec, Gain, PidGains};
    pub use crate::error::{Error, Result};
    pub use crate::metrics::{compute_metrics, ResponseMetrics};
    pub use crate::plant::{build_closed_loop, ClosedLoopSystem, PhysicalParameters};
    pub use crate::simulation::{get_poles, simulate_step, simulate_step_with, PoleSet, SimulationOptions, StepResponse};
    pub use crate::study::{compare_cases, run_case, CaseReport, DesignCase, GainVariation};
}
