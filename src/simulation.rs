//! Closed-loop step response and pole extraction
//!
//! The step response is computed on the state-space realization by exact
//! zero-order-hold stepping: the input is constant between samples, so
//! `x[k+1] = Φ x[k] + Γ u` with `Φ, Γ` from one matrix exponential per
//! grid. Stiff but stable loops stay bounded regardless of how fast their
//! fastest pole is. The result depends only on the system, horizon and
//! sample count.
//!
//! Unstable systems are simulated like any other: their output simply
//! grows. Metrics extraction copes with responses that never settle.

use log::{debug, warn};
use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lti::{StateSpace, TransferFunction};
use crate::plant::ClosedLoopSystem;
use crate::utils::constants::{SIM_HORIZON, SIM_SAMPLES};

/// Closed-loop poles, multiplicities preserved, order not significant
pub type PoleSet = Vec<Complex64>;

/// Time grid of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Final time (inclusive)
    pub horizon: f64,
    /// Number of evenly spaced samples from 0 to `horizon`
    pub samples: usize,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            horizon: SIM_HORIZON,
            samples: SIM_SAMPLES,
        }
    }
}

impl SimulationOptions {
    pub fn new(horizon: f64, samples: usize) -> Self {
        Self { horizon, samples }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.horizon > 0.0 && self.horizon.is_finite()) {
            return Err(Error::spec(format!(
                "simulation horizon must be positive, got {}",
                self.horizon
            )));
        }
        if self.samples < 2 {
            return Err(Error::spec(format!(
                "at least two samples are required, got {}",
                self.samples
            )));
        }
        Ok(())
    }
}

/// Sampled unit-step response
///
/// Time and output always have the same length, also when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StepResponseData")]
pub struct StepResponse {
    time: Vec<f64>,
    output: Vec<f64>,
}

#[derive(Deserialize)]
struct StepResponseData {
    time: Vec<f64>,
    output: Vec<f64>,
}

impl TryFrom<StepResponseData> for StepResponse {
    type Error = String;

    fn try_from(data: StepResponseData) -> std::result::Result<Self, Self::Error> {
        if data.time.len() != data.output.len() {
            return Err(format!(
                "time has {} samples but output has {}",
                data.time.len(),
                data.output.len()
            ));
        }
        Ok(Self {
            time: data.time,
            output: data.output,
        })
    }
}

impl StepResponse {
    /// Pair time and output samples
    ///
    /// # Panics
    ///
    /// Panics if the sequences differ in length.
    pub fn new(time: Vec<f64>, output: Vec<f64>) -> Self {
        assert_eq!(
            time.len(),
            output.len(),
            "time and output must have the same number of samples"
        );
        Self { time, output }
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn output(&self) -> &[f64] {
        &self.output
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `(t, y)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.output.iter().copied())
    }

    /// Split into `(t, y)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.time, self.output)
    }
}

/// `samples` evenly spaced points from 0 to `horizon`, both included
pub fn time_grid(horizon: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = horizon / (n - 1) as f64;
            let mut grid: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
            grid[n - 1] = horizon;
            grid
        }
    }
}

/// Unit-step response of a closed-loop system
///
/// A negative or non-finite `horizon` is treated as zero, so every sample
/// sits at `t = 0`; use [`simulate_step_with`] to reject it instead.
pub fn simulate_step(system: &ClosedLoopSystem, horizon: f64, samples: usize) -> StepResponse {
    simulate_realization(system.realization(), horizon, samples)
}

/// Unit-step response with validated [`SimulationOptions`]
///
/// # Errors
///
/// `InvalidSpec` if the options fail [`SimulationOptions::validate`].
pub fn simulate_step_with(system: &ClosedLoopSystem, options: &SimulationOptions) -> Result<StepResponse> {
    options.validate()?;
    Ok(simulate_step(system, options.horizon, options.samples))
}

/// Unit-step response of an arbitrary proper transfer function
///
/// # Errors
///
/// `InvalidModel` if the transfer function is improper.
pub fn step_response(tf: &TransferFunction, horizon: f64, samples: usize) -> Result<StepResponse> {
    Ok(simulate_realization(&tf.to_state_space()?, horizon, samples))
}

/// Roots of the closed-loop denominator
pub fn get_poles(system: &ClosedLoopSystem) -> PoleSet {
    system.poles()
}

fn simulate_realization(ss: &StateSpace, horizon: f64, samples: usize) -> StepResponse {
    const U: f64 = 1.0;

    let horizon = if horizon.is_finite() && horizon >= 0.0 {
        horizon
    } else {
        warn!("simulation horizon {} is not a non-negative time, using 0", horizon);
        0.0
    };

    let time = time_grid(horizon, samples);
    let mut output = Vec::with_capacity(time.len());
    if time.is_empty() {
        return StepResponse::new(time, output);
    }

    // The grid is uniform; forcing the last stamp to `horizon` only moves it by rounding
    let dt = if samples > 1 {
        horizon / (samples - 1) as f64
    } else {
        0.0
    };
    let (phi, gamma) = ss.discretize(dt);
    let forced = gamma * U;
    debug!(
        "simulating order-{} system: horizon={}, samples={}, dt={}",
        ss.order(),
        horizon,
        samples,
        dt
    );

    let mut x = DVector::zeros(ss.order());
    output.push(ss.output(&x, U));
    for _ in 1..time.len() {
        x = &phi * &x + &forced;
        output.push(ss.output(&x, U));
    }

    if let Some(i) = output.iter().position(|y| !y.is_finite()) {
        warn!("step response left the finite range at t={}", time[i]);
    }

    StepResponse::new(time, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_grid() {
        let t = time_grid(50.0, 1000);
        assert_eq!(t.len(), 1000);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[999], 50.0);
        assert_relative_eq!(t[1], 50.0 / 999.0);

        assert!(time_grid(10.0, 0).is_empty());
        assert_eq!(time_grid(10.0, 1), vec![0.0]);
        assert_eq!(time_grid(10.0, 2), vec![0.0, 10.0]);
    }

    #[test]
    fn test_first_order_step() {
        // 1/(s+1): y = 1 - exp(-t)
        let tf = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
        let r = step_response(&tf, 5.0, 101).unwrap();
        for (t, y) in r.iter() {
            assert_relative_eq!(y, 1.0 - (-t).exp(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_feedthrough_step() {
        // s/(s+1): y = exp(-t), y(0) = 1
        let tf = TransferFunction::new(&[1.0, 0.0], &[1.0, 1.0]).unwrap();
        let r = step_response(&tf, 3.0, 31).unwrap();
        assert_eq!(r.output()[0], 1.0);
        for (t, y) in r.iter() {
            assert_relative_eq!(y, (-t).exp(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_static_gain_step() {
        let tf = TransferFunction::gain(2.5).unwrap();
        let r = step_response(&tf, 1.0, 5).unwrap();
        assert!(r.output().iter().all(|&y| y == 2.5));
    }

    #[test]
    fn test_unstable_diverges_without_error() {
        // 1/(s-1): y = exp(t) - 1
        let tf = TransferFunction::new(&[1.0], &[1.0, -1.0]).unwrap();
        let r = step_response(&tf, 10.0, 11).unwrap();
        assert_relative_eq!(r.output()[10], 10.0_f64.exp() - 1.0, max_relative = 1e-4);
    }

    #[test]
    fn test_improper_rejected() {
        let tf = TransferFunction::new(&[1.0, 0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert!(matches!(step_response(&tf, 1.0, 10), Err(Error::InvalidModel(_))));
    }

    #[test]
    fn test_stiff_stable_step() {
        // 1e6 / ((s + 1)(s + 1e6)): the fast pole is far beyond any explicit step size
        let tf = TransferFunction::new(&[1e6], &[1.0, 1e6 + 1.0, 1e6]).unwrap();
        let r = step_response(&tf, 5.0, 100).unwrap();
        assert_eq!(r.output()[0], 0.0);
        for (t, y) in r.iter().skip(1) {
            let exact = 1.0 - (1e6 * (-t).exp() - (-1e6 * t).exp()) / (1e6 - 1.0);
            assert_relative_eq!(y, exact, epsilon = 1e-3);
        }
        assert_relative_eq!(r.output()[99], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_invalid_horizon_clamped() {
        let tf = TransferFunction::new(&[1.0], &[1.0, 1.0]).unwrap();
        for horizon in [-5.0, f64::NAN, f64::INFINITY] {
            let r = step_response(&tf, horizon, 10).unwrap();
            assert_eq!(r.len(), 10);
            assert!(r.time().iter().all(|&t| t == 0.0));
            assert!(r.output().iter().all(|&y| y == 0.0));
        }
    }

    #[test]
    fn test_deserialize_checks_lengths() {
        let r: StepResponse = serde_json::from_str(r#"{"time":[0.0,1.0],"output":[0.0,0.5]}"#).unwrap();
        assert_eq!(r.output(), &[0.0, 0.5]);

        let err = serde_json::from_str::<StepResponse>(r#"{"time":[0.0,1.0],"output":[0.0]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_options_validation() {
        assert!(SimulationOptions::default().validate().is_ok());
        assert!(SimulationOptions::new(0.0, 100).validate().is_err());
        assert!(SimulationOptions::new(10.0, 1).validate().is_err());
    }
}
