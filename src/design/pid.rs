//! Dominant-pole PID design for the thermal loop
//!
//! The closed-loop characteristic polynomial of controller·plant·sensor
//! under unity feedback is
//!
//! ```text
//! C τ s³ + (C + k τ + K K_D) s² + (k + K K_P) s + K K_I,    K = K_s η P_max
//! ```
//!
//! Dividing by `C τ` and matching coefficients against
//! `(s + p₃)(s² + 2ζωₙ s + ωₙ²)` gives the gains in closed form.

use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::damping::damping_ratio;
use crate::error::{Error, Result};
use crate::lti::Polynomial;
use crate::plant::PhysicalParameters;
use crate::utils::constants::{POLE_MULTIPLIER, SETTLING_FACTOR};

fn default_pole_multiplier() -> f64 {
    POLE_MULTIPLIER
}

/// Desired closed-loop behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignSpec {
    /// Fractional overshoot, strictly inside (0, 1)
    pub overshoot: f64,
    /// 2% settling time, > 0
    pub settling_time: f64,
    /// Non-dominant pole placement factor `m` in `p₃ = m ζ ωₙ`
    #[serde(default = "default_pole_multiplier")]
    pub pole_multiplier: f64,
}

impl DesignSpec {
    /// Spec with the default pole multiplier
    pub fn new(overshoot: f64, settling_time: f64) -> Self {
        Self {
            overshoot,
            settling_time,
            pole_multiplier: POLE_MULTIPLIER,
        }
    }

    pub fn with_pole_multiplier(mut self, multiplier: f64) -> Self {
        self.pole_multiplier = multiplier;
        self
    }

    /// Range checks; the overshoot range is checked by the damping solve
    pub fn validate(&self) -> Result<()> {
        if !(self.settling_time > 0.0 && self.settling_time.is_finite()) {
            return Err(Error::spec(format!(
                "settling time must be positive, got {}",
                self.settling_time
            )));
        }
        if !(self.pole_multiplier > 0.0 && self.pole_multiplier.is_finite()) {
            return Err(Error::spec(format!(
                "pole multiplier must be positive, got {}",
                self.pole_multiplier
            )));
        }
        Ok(())
    }
}

/// Selects one of the three PID gains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gain {
    Proportional,
    Integral,
    Derivative,
}

impl Gain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gain::Proportional => "K_P",
            Gain::Integral => "K_I",
            Gain::Derivative => "K_D",
        }
    }
}

/// PID gains for `C(s) = (K_D s² + K_P s + K_I) / s`
///
/// Gains are real and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    pub fn get(&self, gain: Gain) -> f64 {
        match gain {
            Gain::Proportional => self.kp,
            Gain::Integral => self.ki,
            Gain::Derivative => self.kd,
        }
    }

    /// Copy with exactly one gain multiplied by `factor`
    pub fn scaled(&self, gain: Gain, factor: f64) -> Self {
        let mut out = *self;
        match gain {
            Gain::Proportional => out.kp *= factor,
            Gain::Integral => out.ki *= factor,
            Gain::Derivative => out.kd *= factor,
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()
    }
}

/// Outcome of the pole-placement design
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    /// ζ
    pub damping_ratio: f64,
    /// ωₙ
    pub natural_frequency: f64,
    /// p₃ (the non-dominant pole sits at `-p₃`)
    pub third_pole: f64,
    pub gains: PidGains,
}

impl DesignResult {
    /// Monic target polynomial `(s + p₃)(s² + 2ζωₙ s + ωₙ²)`
    pub fn target_polynomial(&self) -> Polynomial {
        let wn = self.natural_frequency;
        let pair = Polynomial::new(&[1.0, 2.0 * self.damping_ratio * wn, wn * wn]);
        &Polynomial::new(&[1.0, self.third_pole]) * &pair
    }

    /// Target pole locations: the dominant pair then the real pole
    pub fn target_poles(&self) -> Vec<Complex64> {
        let sigma = self.damping_ratio * self.natural_frequency;
        let wd = self.natural_frequency * (1.0 - self.damping_ratio.powi(2)).max(0.0).sqrt();
        vec![
            Complex64::new(-sigma, wd),
            Complex64::new(-sigma, -wd),
            Complex64::new(-self.third_pole, 0.0),
        ]
    }
}

/// Pole-placement PID design
///
/// 1. ζ from the overshoot
/// 2. ωₙ = 4 / (ζ ts)
/// 3. p₃ = m ζ ωₙ
/// 4. gains by coefficient matching
///
/// # Errors
///
/// `InvalidSpec` for an out-of-range spec or physical parameter.
///
/// ```rust
/// use thermal_pid::design::{solve_design, DesignSpec};
/// use thermal_pid::plant::PhysicalParameters;
///
/// let result = solve_design(&DesignSpec::new(0.10, 8.0), &PhysicalParameters::default()).unwrap();
/// assert!((result.third_pole - 3.5).abs() < 1e-12);
/// ```
pub fn solve_design(spec: &DesignSpec, params: &PhysicalParameters) -> Result<DesignResult> {
    spec.validate()?;
    params.validate()?;

    let zeta = damping_ratio(spec.overshoot)?;
    let wn = SETTLING_FACTOR / (zeta * spec.settling_time);
    let p3 = spec.pole_multiplier * zeta * wn;

    let c = params.thermal_capacity;
    let k = params.loss_coefficient;
    let tau = params.sensor_time_constant;
    let loop_gain = params.loop_gain();

    let kd = (c * tau * (2.0 * zeta * wn + p3) - (c + k * tau)) / loop_gain;
    let kp = (c * tau * (wn * wn + 2.0 * zeta * wn * p3) - k) / loop_gain;
    let ki = (c * tau * (wn * wn * p3)) / loop_gain;

    let result = DesignResult {
        damping_ratio: zeta,
        natural_frequency: wn,
        third_pole: p3,
        gains: PidGains::new(kp, ki, kd),
    };
    debug!("design for {:?}: {:?}", spec, result);
    Ok(result)
}
