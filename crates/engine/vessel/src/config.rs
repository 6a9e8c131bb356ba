//! Vessel engine configuration
//!
//! Loaded from a TOML file; every field is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! max_vessel_size = 5000
//! max_velocity = 10
//! apply_physics = true
//! relocate_entities = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Hard cap on the number of voxels a single vessel may contain
pub const MAX_VESSEL_SZ: usize = 5000;

/// Largest size cap a config may request
pub const VESSEL_SIZE_CEILING: usize = 1_000_000;

/// Highest engine velocity, in voxels per forward move
pub const MAX_VELOCITY: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables shared by every vessel in a registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    /// Discovery stops once a hull reaches this many voxels
    pub max_vessel_size: usize,
    /// Upper clamp for engine velocity (lower clamp is always 1)
    pub max_velocity: u32,
    /// Ask the host to propagate physics when writing relocated voxels
    pub apply_physics: bool,
    /// Move entities standing in the hull's chunk columns along with it
    pub relocate_entities: bool,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            max_vessel_size: MAX_VESSEL_SZ,
            max_velocity: MAX_VELOCITY,
            apply_physics: true,
            relocate_entities: true,
        }
    }
}

impl VesselConfig {
    /// Parse and validate config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: VesselConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_vessel_size == 0 {
            return Err(ConfigError::Invalid("max_vessel_size must be >= 1".into()));
        }
        if self.max_vessel_size > VESSEL_SIZE_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_vessel_size must be <= {}",
                VESSEL_SIZE_CEILING
            )));
        }
        if self.max_velocity == 0 {
            return Err(ConfigError::Invalid("max_velocity must be >= 1".into()));
        }
        Ok(())
    }
}
