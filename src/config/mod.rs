//! # Solver Configuration
//!
//! Iteration counts, tolerances and angular margins used by the outline and
//! path solvers. The defaults reproduce the values used for published
//! eclipse maps; a JSON file may override any subset of them:
//!
//! ```json
//! { "outline": { "angle_step_deg": 0.5 }, "path": { "max_iterations": 30 } }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{EclipseError, Result};

/// Complete solver configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Local shadow outline settings
    pub outline: OutlineConfig,
    /// Global path limit settings
    pub path: PathConfig,
}

/// Settings for tracing a shadow outline at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Step between boundary angles Q, degrees
    pub angle_step_deg: f64,
    /// Fixed number of cone-correction passes per boundary point
    pub boundary_iterations: usize,
    /// Amount the valid angle range is shrunk at each end, degrees
    pub range_margin_deg: f64,
    /// Step used when nudging an invalid range endpoint inward, degrees
    pub salvage_step_deg: f64,
    /// Largest nudge tried before giving up on a range endpoint, degrees
    pub salvage_max_deg: f64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        OutlineConfig {
            angle_step_deg: 1.0,
            boundary_iterations: 3,
            range_margin_deg: 0.4,
            salvage_step_deg: 0.001,
            salvage_max_deg: 0.3,
        }
    }
}

/// Settings for the northern/southern limit line solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Step between sampled longitudes, degrees
    pub longitude_step_deg: f64,
    /// Newton iteration cap per longitude
    pub max_iterations: usize,
    /// Convergence threshold on both |Δt| (hours) and |Δφ| (degrees)
    pub tolerance: f64,
    /// Absolute latitude of the second, near-polar Newton seed, degrees
    pub polar_seed_lat_deg: f64,
    /// Seeds converging closer than this are treated as one solution, degrees
    pub duplicate_lat_tolerance_deg: f64,
    /// Relative shadow speed below which the Newton step is undefined, Earth radii per hour
    pub min_relative_speed: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            longitude_step_deg: 0.5,
            max_iterations: 20,
            tolerance: 1e-4,
            polar_seed_lat_deg: 89.9,
            duplicate_lat_tolerance_deg: 0.1,
            min_relative_speed: 1e-9,
        }
    }
}

impl SolverConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)?;
        Self::from_json_str(&contents)
    }

    /// Reject settings that would make a solver loop forever or do nothing
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("outline.angle_step_deg", self.outline.angle_step_deg),
            ("outline.salvage_step_deg", self.outline.salvage_step_deg),
            ("path.longitude_step_deg", self.path.longitude_step_deg),
            ("path.tolerance", self.path.tolerance),
        ];
        for (name, value) in positive {
            if !is_valid_step(value) {
                return Err(EclipseError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("outline.range_margin_deg", self.outline.range_margin_deg),
            ("outline.salvage_max_deg", self.outline.salvage_max_deg),
            ("path.duplicate_lat_tolerance_deg", self.path.duplicate_lat_tolerance_deg),
            ("path.min_relative_speed", self.path.min_relative_speed),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(EclipseError::Config(format!(
                    "{} must be zero or positive, got {}",
                    name, value
                )));
            }
        }

        if !self.path.polar_seed_lat_deg.is_finite() {
            return Err(EclipseError::Config(format!(
                "path.polar_seed_lat_deg must be finite, got {}",
                self.path.polar_seed_lat_deg
            )));
        }

        if self.outline.boundary_iterations == 0 {
            return Err(EclipseError::Config(
                "outline.boundary_iterations must be at least 1".to_string(),
            ));
        }
        if self.path.max_iterations == 0 {
            return Err(EclipseError::Config(
                "path.max_iterations must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Whether a sweep can advance by `step`
pub(crate) fn is_valid_step(step: f64) -> bool {
    step > 0.0 && step.is_finite()
}
