//! Shared configuration for differential growth
//!
//! This crate provides the single source of truth for the parameters a host
//! feeds into the growth engine before each step: growth switch and vertex
//! cap, constraint weights, collision distance, spatial-index toggle and
//! repeller zones.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default maximum vertex count
pub const DEFAULT_MAX_VERTEX_COUNT: usize = 2000;

/// Default collision distance (also the target edge length)
pub const DEFAULT_COLLISION_DISTANCE: f32 = 1.0;

/// Default weight of the collision constraint
pub const DEFAULT_COLLISION_WEIGHT: f32 = 1.0;

/// Default weight of the edge-length constraint
pub const DEFAULT_EDGE_LENGTH_WEIGHT: f32 = 1.0;

/// Default weight of the bending-resistance constraint
pub const DEFAULT_BENDING_RESISTANCE_WEIGHT: f32 = 0.2;

/// Edges longer than this fraction of the collision distance are split while growing
pub const SPLIT_LENGTH_RATIO: f32 = 0.99;

/// Errors produced while loading or validating a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("collision distance must be positive and finite, got {0}")]
    InvalidCollisionDistance(f32),
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidWeight { name: &'static str, value: f32 },
    #[error("repeller {index} has invalid radius {radius}")]
    InvalidRepellerRadius { index: usize, radius: f32 },
    #[error("repeller {index} has a non-finite center")]
    InvalidRepellerCenter { index: usize },
    #[error("subiterations must be at least 1")]
    ZeroSubiterations,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A spherical zone that pushes vertices out of it.
///
/// The radius doubles as the weight of the push, so larger repellers dominate
/// the other constraints acting on the vertices they contain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Repeller {
    pub center: Vec3,
    pub radius: f32,
}

impl Repeller {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies strictly inside the zone.
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance(self.center) < self.radius
    }
}

/// Simulation parameters applied before each step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Split long edges at the start of each step
    pub grow: bool,
    /// Growth stops once the mesh reaches this many vertices
    pub max_vertex_count: usize,
    /// Weight pulling over-stretched edge endpoints together
    pub edge_length_weight: f32,
    /// Minimum separation between any two vertices
    pub collision_distance: f32,
    /// Weight pushing too-close vertices apart
    pub collision_weight: f32,
    /// Weight flattening the two triangles around each interior edge
    pub bending_resistance_weight: f32,
    /// Discover collision pairs with a spatial index instead of all-pairs
    pub use_spatial_index: bool,
    /// Repeller zones
    pub repellers: Vec<Repeller>,
    /// Steps run per host solve
    pub subiterations: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grow: true,
            max_vertex_count: DEFAULT_MAX_VERTEX_COUNT,
            edge_length_weight: DEFAULT_EDGE_LENGTH_WEIGHT,
            collision_distance: DEFAULT_COLLISION_DISTANCE,
            collision_weight: DEFAULT_COLLISION_WEIGHT,
            bending_resistance_weight: DEFAULT_BENDING_RESISTANCE_WEIGHT,
            use_spatial_index: true,
            repellers: Vec::new(),
            subiterations: 1,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Edge length above which the growth phase splits an edge.
    pub fn split_threshold(&self) -> f32 {
        SPLIT_LENGTH_RATIO * self.collision_distance
    }

    /// Check every parameter is in its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.collision_distance.is_finite() && self.collision_distance > 0.0) {
            return Err(ConfigError::InvalidCollisionDistance(self.collision_distance));
        }

        for (name, value) in [
            ("edge_length_weight", self.edge_length_weight),
            ("collision_weight", self.collision_weight),
            ("bending_resistance_weight", self.bending_resistance_weight),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        for (index, repeller) in self.repellers.iter().enumerate() {
            if !repeller.center.is_finite() {
                return Err(ConfigError::InvalidRepellerCenter { index });
            }
            if !(repeller.radius.is_finite() && repeller.radius >= 0.0) {
                return Err(ConfigError::InvalidRepellerRadius {
                    index,
                    radius: repeller.radius,
                });
            }
        }

        if self.subiterations == 0 {
            return Err(ConfigError::ZeroSubiterations);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collision_distance, DEFAULT_COLLISION_DISTANCE);
        assert_eq!(config.max_vertex_count, DEFAULT_MAX_VERTEX_COUNT);
        assert!(config.repellers.is_empty());
    }

    #[test]
    fn test_split_threshold() {
        let config = SimulationConfig {
            collision_distance: 0.5,
            ..Default::default()
        };
        assert!((config.split_threshold() - 0.495).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "collision_distance": 0.25, "repellers": [{ "center": [1.0, 2.0, 3.0], "radius": 0.5 }] }"#,
        )
        .unwrap();

        assert_eq!(config.collision_distance, 0.25);
        assert_eq!(config.collision_weight, DEFAULT_COLLISION_WEIGHT);
        assert_eq!(config.repellers.len(), 1);
        assert_eq!(config.repellers[0].center, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rejects_non_positive_collision_distance() {
        let config = SimulationConfig {
            collision_distance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCollisionDistance(_))
        ));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let config = SimulationConfig {
            bending_resistance_weight: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight {
                name: "bending_resistance_weight",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_repeller() {
        let config = SimulationConfig {
            repellers: vec![Repeller::new(Vec3::ZERO, 1.0), Repeller::new(Vec3::ZERO, -2.0)],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRepellerRadius { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_zero_subiterations() {
        let config = SimulationConfig {
            subiterations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSubiterations)));
    }

    #[test]
    fn test_repeller_contains_is_strict() {
        let repeller = Repeller::new(Vec3::ZERO, 1.0);
        assert!(repeller.contains(Vec3::new(0.5, 0.0, 0.0)));
        assert!(!repeller.contains(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimulationConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
