//! Design cases: design, closed loop, response, poles and metrics in one go
//!
//! A case optionally carries a gain variation, which rescales a single
//! designed gain and re-evaluates the loop next to the nominal design.
//! Cases share nothing, so a set of them is evaluated in parallel.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::StudyConfig;
use crate::design::{solve_design, DesignResult, DesignSpec, Gain, PidGains};
use crate::error::{Error, Result};
use crate::metrics::ResponseMetrics;
use crate::plant::{build_closed_loop, ClosedLoopSystem, PhysicalParameters};
use crate::simulation::{get_poles, simulate_step_with, PoleSet, SimulationOptions, StepResponse};
use crate::utils::constants::{VARIATION_FACTOR_MAX, VARIATION_FACTOR_MIN};

/// Scale one designed gain by `factor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainVariation {
    pub gain: Gain,
    pub factor: f64,
}

impl GainVariation {
    pub fn new(gain: Gain, factor: f64) -> Self {
        Self { gain, factor }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.factor > 0.0 && self.factor.is_finite()) {
            return Err(Error::spec(format!(
                "gain scale factor must be positive, got {}",
                self.factor
            )));
        }
        if !(VARIATION_FACTOR_MIN..=VARIATION_FACTOR_MAX).contains(&self.factor) {
            warn!(
                "{} scale factor {} is outside the usual range [{}, {}]",
                self.gain.as_str(),
                self.factor,
                VARIATION_FACTOR_MIN,
                VARIATION_FACTOR_MAX
            );
        }
        Ok(())
    }

    pub fn apply(&self, gains: &PidGains) -> PidGains {
        gains.scaled(self.gain, self.factor)
    }
}

/// A named design target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCase {
    pub name: String,
    #[serde(flatten)]
    pub spec: DesignSpec,
    #[serde(default)]
    pub variation: Option<GainVariation>,
}

impl DesignCase {
    pub fn new(name: impl Into<String>, spec: DesignSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            variation: None,
        }
    }

    pub fn with_variation(mut self, variation: GainVariation) -> Self {
        self.variation = Some(variation);
        self
    }
}

/// Everything computed for one set of gains
#[derive(Debug, Clone)]
pub struct LoopAnalysis {
    pub gains: PidGains,
    pub system: ClosedLoopSystem,
    pub response: StepResponse,
    pub poles: PoleSet,
    pub metrics: ResponseMetrics,
}

/// Close the loop for `gains`, simulate it and measure the response
pub fn analyze_loop(
    params: &PhysicalParameters,
    gains: &PidGains,
    options: &SimulationOptions,
    tolerance: f64,
) -> Result<LoopAnalysis> {
    let system = build_closed_loop(params, gains)?;
    let response = simulate_step_with(&system, options)?;
    let poles = get_poles(&system);
    let metrics = response.metrics(tolerance);
    Ok(LoopAnalysis {
        gains: *gains,
        system,
        response,
        poles,
        metrics,
    })
}

/// Result of one design case
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    pub spec: DesignSpec,
    pub design: DesignResult,
    pub nominal: LoopAnalysis,
    pub variation: Option<(GainVariation, LoopAnalysis)>,
}

/// Design, close and evaluate one case
pub fn run_case(
    params: &PhysicalParameters,
    case: &DesignCase,
    options: &SimulationOptions,
    tolerance: f64,
) -> Result<CaseReport> {
    let design = solve_design(&case.spec, params)?;
    let nominal = analyze_loop(params, &design.gains, options, tolerance)?;

    let variation = match case.variation {
        Some(v) => {
            v.validate()?;
            let scaled = v.apply(&design.gains);
            debug!("{}: {} scaled by {}", case.name, v.gain.as_str(), v.factor);
            Some((v, analyze_loop(params, &scaled, options, tolerance)?))
        }
        None => None,
    };

    info!(
        "{}: zeta={:.3} wn={:.3} p3={:.3} Mp={:?} ts={:?}",
        case.name,
        design.damping_ratio,
        design.natural_frequency,
        design.third_pole,
        nominal.metrics.overshoot,
        nominal.metrics.settling_time
    );

    Ok(CaseReport {
        name: case.name.clone(),
        spec: case.spec,
        design,
        nominal,
        variation,
    })
}

/// Evaluate every case of a configuration, preserving case order
///
/// The configuration is validated first; any failing case fails the study.
pub fn compare_cases(config: &StudyConfig) -> Result<Vec<CaseReport>> {
    config.validate()?;
    config
        .cases
        .par_iter()
        .map(|case| run_case(&config.physical, case, &config.simulation, config.tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_case_with_variation() {
        let case = DesignCase::new("case", DesignSpec::new(0.10, 8.0))
            .with_variation(GainVariation::new(Gain::Integral, 0.5));
        let report = run_case(
            &PhysicalParameters::default(),
            &case,
            &SimulationOptions::new(20.0, 201),
            0.02,
        )
        .unwrap();

        let (variation, scaled) = report.variation.unwrap();
        assert_eq!(variation.gain, Gain::Integral);
        assert_eq!(scaled.gains.ki, 0.5 * report.design.gains.ki);
        assert_eq!(scaled.gains.kp, report.design.gains.kp);
        assert_ne!(scaled.poles, report.nominal.poles);
        assert_eq!(report.nominal.response.len(), 201);
    }

    #[test]
    fn test_invalid_variation() {
        let case = DesignCase::new("case", DesignSpec::new(0.10, 8.0))
            .with_variation(GainVariation::new(Gain::Derivative, f64::NAN));
        let err = run_case(
            &PhysicalParameters::default(),
            &case,
            &SimulationOptions::default(),
            0.02,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(_)));
    }
}
