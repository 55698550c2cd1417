//! Study configuration
//!
//! A study is a set of design cases evaluated on one physical setup with a
//! common time grid and settling band. Every field has a default, so a
//! JSON file only needs the entries it changes:
//!
//! ```json
//! {
//!   "physical": { "thermal_capacity": 12.0 },
//!   "tolerance": 0.05,
//!   "cases": [
//!     { "name": "fast", "overshoot": 0.05, "settling_time": 5.0,
//!       "variation": { "gain": "derivative", "factor": 1.5 } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::design::DesignSpec;
use crate::error::{Error, Result};
use crate::plant::PhysicalParameters;
use crate::simulation::SimulationOptions;
use crate::study::DesignCase;
use crate::utils::constants::BAND_2_PERCENT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub physical: PhysicalParameters,
    /// Relative settling band, e.g. 0.02 or 0.05
    pub tolerance: f64,
    pub simulation: SimulationOptions,
    pub cases: Vec<DesignCase>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            physical: PhysicalParameters::default(),
            tolerance: BAND_2_PERCENT,
            simulation: SimulationOptions::default(),
            cases: vec![
                DesignCase::new("Case 1: Mp = 10%, ts = 8 s", DesignSpec::new(0.10, 8.0)),
                DesignCase::new("Case 2: Mp = 5%, ts = 5 s", DesignSpec::new(0.05, 5.0)),
            ],
        }
    }
}

impl StudyConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Range checks that do not need a design solve
    pub fn validate(&self) -> Result<()> {
        self.physical.validate()?;
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(Error::spec(format!(
                "settling band must lie strictly between 0 and 1, got {}",
                self.tolerance
            )));
        }
        self.simulation.validate()?;
        if self.cases.is_empty() {
            return Err(Error::spec("no design cases configured"));
        }
        for case in &self.cases {
            case.spec.validate()?;
            if let Some(v) = &case.variation {
                v.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Gain;
    use crate::utils::constants::POLE_MULTIPLIER;

    #[test]
    fn test_default_config() {
        let config = StudyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cases.len(), 2);
        assert_eq!(config.cases[1].spec, DesignSpec::new(0.05, 5.0));
        assert_eq!(config.simulation.samples, 1000);
    }

    #[test]
    fn test_partial_json() {
        let config = StudyConfig::from_json(
            r#"{
                "physical": { "thermal_capacity": 12.0 },
                "tolerance": 0.05,
                "cases": [
                    { "name": "fast", "overshoot": 0.05, "settling_time": 5.0,
                      "variation": { "gain": "derivative", "factor": 1.5 } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.physical.thermal_capacity, 12.0);
        assert_eq!(config.physical.max_power, 100.0);
        assert_eq!(config.tolerance, 0.05);
        assert_eq!(config.cases[0].spec.pole_multiplier, POLE_MULTIPLIER);
        assert_eq!(config.cases[0].variation.unwrap().gain, Gain::Derivative);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = StudyConfig::default();
        let text = config.to_json().unwrap();
        assert_eq!(StudyConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(StudyConfig::from_json("{ \"tolerance\": "), Err(Error::Config(_))));

        let config = StudyConfig {
            tolerance: 0.0,
            ..StudyConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidSpec(_))));

        let config = StudyConfig {
            cases: Vec::new(),
            ..StudyConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidSpec(_))));
    }
}
