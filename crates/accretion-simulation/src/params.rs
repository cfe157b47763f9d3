//! Simulation parameters

use std::path::Path;

use accretion_physics::constants;
use serde::{Deserialize, Serialize};

use crate::collisions::BroadPhase;
use crate::error::SimulationError;

/// Everything a simulation needs at construction.
///
/// Missing fields in a parameter file fall back to the defaults below.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Total particle slots, fixed for the run
    pub particle_count: usize,
    /// Gravitational constant
    pub g: f64,
    /// Mass of the fixed body at the origin
    pub central_mass: f64,
    /// Integration step
    pub time_step: f64,
    /// Merge threshold
    pub collision_distance: f64,
    /// Radius of the initial cloud
    pub max_radius: f64,
    /// Fraction of slots pre-collapsed into the protostar
    pub protostar_fraction: f64,

    // Display sizes
    pub protostar_size: f64,
    pub disk_size: f64,
    pub size_cap: f64,

    /// Seed for the initial distribution; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub broad_phase: BroadPhase,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            particle_count: constants::PARTICLE_COUNT,
            g: constants::G,
            central_mass: constants::CENTRAL_MASS,
            time_step: constants::TIME_STEP,
            collision_distance: constants::COLLISION_DISTANCE,
            max_radius: constants::MAX_RADIUS,
            protostar_fraction: constants::PROTOSTAR_FRACTION,
            protostar_size: constants::PROTOSTAR_SIZE,
            disk_size: constants::DISK_SIZE,
            size_cap: constants::SIZE_CAP,
            seed: None,
            broad_phase: BroadPhase::default(),
        }
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(field, format!("must be finite, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), SimulationError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(SimulationError::invalid(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> Result<(), SimulationError> {
    require_finite(field, value)?;
    if value <= 0.0 {
        return Err(SimulationError::invalid(
            field,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}

impl SimulationParams {
    /// Check every field, reporting the first one out of range
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.particle_count == 0 {
            return Err(SimulationError::invalid("particle_count", "must be at least 1"));
        }
        // Mass units are u32 and their sum is conserved at particle_count
        if u32::try_from(self.particle_count).is_err() {
            return Err(SimulationError::invalid(
                "particle_count",
                format!("must fit in u32, got {}", self.particle_count),
            ));
        }

        require_non_negative("g", self.g)?;
        require_non_negative("central_mass", self.central_mass)?;
        require_positive("time_step", self.time_step)?;
        require_non_negative("collision_distance", self.collision_distance)?;
        require_positive("max_radius", self.max_radius)?;

        require_finite("protostar_fraction", self.protostar_fraction)?;
        if !(0.0..=1.0).contains(&self.protostar_fraction) {
            return Err(SimulationError::invalid(
                "protostar_fraction",
                format!("must be within [0, 1], got {}", self.protostar_fraction),
            ));
        }

        require_non_negative("protostar_size", self.protostar_size)?;
        require_non_negative("disk_size", self.disk_size)?;
        require_non_negative("size_cap", self.size_cap)?;

        Ok(())
    }

    /// Number of slots collapsed into the protostar: floor(N * fraction)
    pub fn protostar_count(&self) -> usize {
        let count = (self.particle_count as f64 * self.protostar_fraction).floor() as usize;
        count.min(self.particle_count)
    }

    /// Parse and validate parameters from JSON
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a JSON parameter file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Pretty-printed JSON, in the format `from_json_str` reads
    pub fn to_json_string(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: SimulationError) -> &'static str {
        match err {
            SimulationError::InvalidConfig { field, .. } => field,
            other => panic!("expected InvalidConfig, got {other}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let params = SimulationParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.particle_count, 9000);
        assert_eq!(params.protostar_count(), 450);
    }

    #[test]
    fn test_protostar_count_floors() {
        let params = SimulationParams {
            particle_count: 99,
            protostar_fraction: 0.05,
            ..Default::default()
        };
        assert_eq!(params.protostar_count(), 4);
    }

    #[test]
    fn test_rejects_zero_particles() {
        let params = SimulationParams {
            particle_count: 0,
            ..Default::default()
        };
        assert_eq!(field_of(params.validate().unwrap_err()), "particle_count");
    }

    #[test]
    fn test_rejects_fraction_above_one() {
        let params = SimulationParams {
            protostar_fraction: 1.5,
            ..Default::default()
        };
        assert_eq!(field_of(params.validate().unwrap_err()), "protostar_fraction");
    }

    #[test]
    fn test_rejects_non_positive_time_step() {
        for dt in [0.0, -0.1, f64::NAN] {
            let params = SimulationParams {
                time_step: dt,
                ..Default::default()
            };
            assert_eq!(field_of(params.validate().unwrap_err()), "time_step");
        }
    }

    #[test]
    fn test_rejects_negative_collision_distance() {
        let params = SimulationParams {
            collision_distance: -1.0,
            ..Default::default()
        };
        assert_eq!(field_of(params.validate().unwrap_err()), "collision_distance");
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let params = SimulationParams::from_json_str(
            r#"{ "particle_count": 500, "seed": 7, "broad_phase": "uniform_grid" }"#,
        )
        .unwrap();

        assert_eq!(params.particle_count, 500);
        assert_eq!(params.seed, Some(7));
        assert_eq!(params.broad_phase, BroadPhase::UniformGrid);
        assert_eq!(params.g, 10.0);
        assert_eq!(params.collision_distance, 7.0);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        let err = SimulationParams::from_json_str(r#"{ "max_radius": 0.0 }"#).unwrap_err();
        assert_eq!(field_of(err), "max_radius");
    }

    #[test]
    fn test_json_syntax_error() {
        let err = SimulationParams::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimulationError::Parse(_)));
    }

    #[test]
    fn test_written_json_loads_back() {
        let params = SimulationParams {
            particle_count: 1234,
            seed: Some(99),
            broad_phase: BroadPhase::UniformGrid,
            ..Default::default()
        };
        let json = params.to_json_string().unwrap();
        assert!(json.contains("\"broad_phase\": \"uniform_grid\""));
        assert_eq!(SimulationParams::from_json_str(&json).unwrap(), params);
    }
}
