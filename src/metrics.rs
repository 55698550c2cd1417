//! Steady-state value, overshoot and settling time of a sampled response

use serde::{Deserialize, Serialize};

use crate::simulation::StepResponse;
use crate::utils::constants::ZERO_TOLERANCE;

/// Scalar characteristics of a step response
///
/// `None` marks an undefined metric: both are undefined when the steady
/// state is zero, and the settling time is undefined when the response is
/// still outside the band at the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetrics {
    /// Last output sample
    pub steady_state: f64,
    /// `max(0, (max(y) - y∞) / |y∞|)`
    pub overshoot: Option<f64>,
    /// Time of the first sample after the last excursion from the band
    pub settling_time: Option<f64>,
}

/// Metrics of `(time, output)` with a relative settling band `tolerance`
///
/// The settling time anchors on the last sample outside
/// `|y - y∞| <= tolerance * |y∞|`:
/// - no sample outside: `time[0]`
/// - last outside sample followed by another sample: that next sample's time
/// - last outside sample is the final sample: undefined
///
/// Sequences of different lengths are truncated to the shorter one; empty
/// input has a NaN steady state. A NaN anywhere in the output makes the
/// overshoot 0.
///
/// ```rust
/// use thermal_pid::metrics::compute_metrics;
///
/// let t = [0.0, 1.0, 2.0, 3.0];
/// let y = [0.0, 1.2, 0.99, 1.0];
/// let m = compute_metrics(&t, &y, 0.02);
/// assert_eq!(m.steady_state, 1.0);
/// assert!((m.overshoot.unwrap() - 0.2).abs() < 1e-12);
/// assert_eq!(m.settling_time, Some(2.0));
/// ```
pub fn compute_metrics(time: &[f64], output: &[f64], tolerance: f64) -> ResponseMetrics {
    let n = time.len().min(output.len());
    let (time, output) = (&time[..n], &output[..n]);

    let steady_state = match output.last() {
        Some(&y) => y,
        None => {
            return ResponseMetrics {
                steady_state: f64::NAN,
                overshoot: None,
                settling_time: None,
            }
        }
    };

    if steady_state.abs() <= ZERO_TOLERANCE {
        return ResponseMetrics {
            steady_state,
            overshoot: None,
            settling_time: None,
        };
    }

    // A NaN sample makes the peak NaN, and the clamp below then gives 0
    let peak = output.iter().copied().fold(f64::NEG_INFINITY, |peak, y| {
        if peak.is_nan() || y.is_nan() {
            f64::NAN
        } else {
            peak.max(y)
        }
    });
    let overshoot = ((peak - steady_state) / steady_state.abs()).max(0.0);

    let band = tolerance * steady_state.abs();
    let inside = |y: f64| (y - steady_state).abs() <= band;
    let last_outside = output.iter().rposition(|&y| !inside(y));
    let settling_time = match last_outside {
        None => Some(time[0]),
        Some(i) => time.get(i + 1).copied(),
    };

    ResponseMetrics {
        steady_state,
        overshoot: Some(overshoot),
        settling_time,
    }
}

impl StepResponse {
    /// Metrics of this response; see [`compute_metrics`]
    pub fn metrics(&self, tolerance: f64) -> ResponseMetrics {
        compute_metrics(self.time(), self.output(), tolerance)
    }
}
