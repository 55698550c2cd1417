//! Thermal plant, sensor and PID controller as transfer functions
//!
//! ```text
//!   r ──(+)──> C(s) ──> G(s) ──> H(s) ──┬──> y_m
//!        ^-                              │
//!        └───────────────────────────────┘
//!
//!   G(s) = η P_max / (C_th s + k_p)      heater + thermal mass
//!   H(s) = K_s / (τ_m s + 1)             temperature sensor
//!   C(s) = (K_D s² + K_P s + K_I) / s    PID
//! ```
//!
//! The loop is closed around the measured temperature `y_m`, so the
//! closed-loop transfer function is `L / (1 + L)` with `L = C G H`.

use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::design::PidGains;
use crate::error::{Error, Result};
use crate::lti::{Polynomial, StateSpace, TransferFunction};

/// Physical description of the heater, thermal mass and sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalParameters {
    /// C_th
    pub thermal_capacity: f64,
    /// k_p
    pub loss_coefficient: f64,
    /// P_max
    pub max_power: f64,
    /// η, in (0, 1]
    pub efficiency: f64,
    /// K_s
    pub sensor_gain: f64,
    /// τ_m
    pub sensor_time_constant: f64,
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            thermal_capacity: 10.0,
            loss_coefficient: 1.0,
            max_power: 100.0,
            efficiency: 0.9,
            sensor_gain: 1.0,
            sensor_time_constant: 1.0,
        }
    }
}

impl PhysicalParameters {
    /// Every parameter finite and positive, efficiency at most 1
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("thermal capacity", self.thermal_capacity),
            ("thermal loss coefficient", self.loss_coefficient),
            ("maximum power", self.max_power),
            ("efficiency", self.efficiency),
            ("sensor gain", self.sensor_gain),
            ("sensor time constant", self.sensor_time_constant),
        ];
        for (name, value) in fields {
            if !(value > 0.0 && value.is_finite()) {
                return Err(Error::spec(format!("{} must be positive, got {}", name, value)));
            }
        }
        if self.efficiency > 1.0 {
            return Err(Error::spec(format!(
                "efficiency must not exceed 1, got {}",
                self.efficiency
            )));
        }
        Ok(())
    }

    /// `K_s η P_max`, the static gain of actuator and sensor together
    pub fn loop_gain(&self) -> f64 {
        self.sensor_gain * self.efficiency * self.max_power
    }
}

/// G(s) = η P_max / (C_th s + k_p)
pub fn plant(params: &PhysicalParameters) -> Result<TransferFunction> {
    TransferFunction::new(
        &[params.efficiency * params.max_power],
        &[params.thermal_capacity, params.loss_coefficient],
    )
}

/// H(s) = K_s / (τ_m s + 1)
pub fn sensor(params: &PhysicalParameters) -> Result<TransferFunction> {
    TransferFunction::new(&[params.sensor_gain], &[params.sensor_time_constant, 1.0])
}

/// C(s) = (K_D s² + K_P s + K_I) / s
pub fn controller(gains: &PidGains) -> Result<TransferFunction> {
    TransferFunction::from_polynomials(
        Polynomial::new(&[gains.kd, gains.kp, gains.ki]),
        Polynomial::s(),
    )
}

/// L(s) = C(s) G(s) H(s)
pub fn open_loop(params: &PhysicalParameters, gains: &PidGains) -> Result<TransferFunction> {
    controller(gains)?
        .series(&plant(params)?)?
        .series(&sensor(params)?)
}

/// Unity negative feedback loop around an open-loop transfer function
///
/// Holds the closed-loop transfer function together with its state-space
/// realization, so a constructed system can always be simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedLoopSystem {
    transfer_function: TransferFunction,
    realization: StateSpace,
}

impl ClosedLoopSystem {
    /// Close the loop `L / (1 + L)`
    ///
    /// # Errors
    ///
    /// `InvalidModel` if `1 + L` has an identically zero numerator or the
    /// result is improper.
    pub fn from_open_loop(open_loop: &TransferFunction) -> Result<Self> {
        let transfer_function = open_loop.unity_feedback()?;
        let realization = transfer_function.to_state_space()?;
        Ok(Self {
            transfer_function,
            realization,
        })
    }

    pub fn transfer_function(&self) -> &TransferFunction {
        &self.transfer_function
    }

    pub fn realization(&self) -> &StateSpace {
        &self.realization
    }

    pub fn numerator(&self) -> &Polynomial {
        self.transfer_function.numerator()
    }

    pub fn denominator(&self) -> &Polynomial {
        self.transfer_function.denominator()
    }

    /// Degree of the closed-loop denominator
    pub fn order(&self) -> usize {
        self.transfer_function.order()
    }

    pub fn poles(&self) -> Vec<Complex64> {
        self.transfer_function.poles()
    }
}

/// Build `T_cl = L / (1 + L)` for the given plant and gains
///
/// # Errors
///
/// `InvalidModel` for non-finite gains or a degenerate denominator.
pub fn build_closed_loop(params: &PhysicalParameters, gains: &PidGains) -> Result<ClosedLoopSystem> {
    if !gains.is_finite() {
        return Err(Error::model(format!("non-finite PID gains {:?}", gains)));
    }
    let system = ClosedLoopSystem::from_open_loop(&open_loop(params, gains)?)?;
    debug!("closed loop: {}", system.transfer_function());
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_elements() {
        let params = PhysicalParameters::default();
        let g = plant(&params).unwrap();
        assert_eq!(g.numerator().coeffs(), &[90.0]);
        assert_eq!(g.denominator().coeffs(), &[10.0, 1.0]);

        let h = sensor(&params).unwrap();
        assert_eq!(h.denominator().coeffs(), &[1.0, 1.0]);

        let c = controller(&PidGains::new(2.0, 3.0, 1.0)).unwrap();
        assert_eq!(c.numerator().coeffs(), &[1.0, 2.0, 3.0]);
        assert_eq!(c.denominator().coeffs(), &[1.0, 0.0]);
    }

    #[test]
    fn test_closed_loop_polynomials() {
        // N = 90 (s^2 + 2s + 3), D = s (10s + 1)(s + 1) = 10s^3 + 11s^2 + s
        let t = build_closed_loop(&PhysicalParameters::default(), &PidGains::new(2.0, 3.0, 1.0)).unwrap();
        assert_eq!(t.numerator().coeffs(), &[90.0, 180.0, 270.0]);
        assert_eq!(t.denominator().coeffs(), &[10.0, 101.0, 181.0, 270.0]);
        assert_eq!(t.order(), 3);
        assert!(t.transfer_function().is_strictly_proper());
        assert_eq!(t.realization().order(), 3);
        assert_relative_eq!(t.transfer_function().dc_gain(), 1.0);
    }

    #[test]
    fn test_closed_loop_zero_gains() {
        let t = build_closed_loop(&PhysicalParameters::default(), &PidGains::new(0.0, 0.0, 0.0)).unwrap();
        assert!(t.numerator().is_zero());
        assert_eq!(t.order(), 3);
    }

    #[test]
    fn test_closed_loop_non_finite_gains() {
        let err = build_closed_loop(
            &PhysicalParameters::default(),
            &PidGains::new(f64::INFINITY, 0.0, 0.0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidModel(_)));
    }

    #[test]
    fn test_closed_loop_degenerate_plant() {
        let params = PhysicalParameters {
            thermal_capacity: 0.0,
            loss_coefficient: 0.0,
            ..PhysicalParameters::default()
        };
        let err = build_closed_loop(&params, &PidGains::new(1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidModel(_)));
    }

    #[test]
    fn test_physical_validation() {
        assert!(PhysicalParameters::default().validate().is_ok());
        let bad = PhysicalParameters {
            efficiency: 1.2,
            ..PhysicalParameters::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidSpec(_))));
        let bad = PhysicalParameters {
            sensor_time_constant: f64::NAN,
            ..PhysicalParameters::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidSpec(_))));
        assert_eq!(PhysicalParameters::default().loop_gain(), 90.0);
    }
}
