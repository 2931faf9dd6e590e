use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

/// Treatment of long range electrostatics requested from the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectrostaticsMethod {
    /// No cutoff, every pair interacts
    None,
    /// Reaction field beyond the cutoff, periodic
    Cutoff,
    /// Particle mesh Ewald
    Pme,
}

impl ElectrostaticsMethod {
    pub fn requires_periodic_box(&self) -> bool {
        !matches!(self, ElectrostaticsMethod::None)
    }
}

/// Which internal coordinates are held rigid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintPolicy {
    None,
    HBonds,
    AllBonds,
    HAngles,
}

/// Numerical options of a run. Lengths in nm, times in ps, temperature in K.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationOptions {
    pub electrostatics_method: ElectrostaticsMethod,
    pub cutoff_distance: f64,
    pub constraint_policy: ConstraintPolicy,
    /// Hold water molecules fully rigid whatever the constraint policy
    pub rigid_water: bool,
    pub temperature: f64,
    pub friction_coefficient: f64,
    pub timestep: f64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            electrostatics_method: ElectrostaticsMethod::Pme,
            cutoff_distance: 1.0,
            constraint_policy: ConstraintPolicy::HBonds,
            rigid_water: true,
            temperature: 300.0,
            friction_coefficient: 1.0,
            timestep: 0.004,
        }
    }
}

impl SimulationOptions {
    /// Check that every value is in its allowed range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mdrive_core::SimulationOptions;
    /// let mut options = SimulationOptions::default();
    /// assert!(options.validate().is_ok());
    /// options.timestep = 0.0;
    /// assert!(options.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !(self.cutoff_distance > 0.0) || !self.cutoff_distance.is_finite() {
            return Err(Error::configuration(format!(
                "cutoff distance must be positive, got {}", self.cutoff_distance)));
        }
        if !(self.temperature > 0.0) || !self.temperature.is_finite() {
            return Err(Error::configuration(format!(
                "temperature must be positive, got {}", self.temperature)));
        }
        if !(self.friction_coefficient >= 0.0) || !self.friction_coefficient.is_finite() {
            return Err(Error::configuration(format!(
                "friction coefficient must be non-negative, got {}", self.friction_coefficient)));
        }
        if !(self.timestep > 0.0) || !self.timestep.is_finite() {
            return Err(Error::configuration(format!(
                "timestep must be positive, got {}", self.timestep)));
        }
        Ok(())
    }

    /// Read options from JSON. Absent fields take their default values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::FileNotFound { path: path.to_path_buf() },
            _ => Error::from(e),
        })?;
        let options: SimulationOptions = serde_json::de::from_reader(BufReader::new(file))
            .map_err(|e| Error::file_format(path, e.line(), e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
