//! Serializable scene record.
//!
//! A [`SceneConfig`] captures everything needed to recreate a scene: the
//! ordered source list, blend mode, map mode, and particle parameters. Ids
//! are not stored; loading assigns fresh ones in list order.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::blend::{BlendMode, MapMode};
use crate::error::WaveError;
use crate::particle::ParticleParams;
use crate::source::{Source, SourceSpec};

/// One source as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub x: f32,
    pub y: f32,
    pub frequency: f32,
    pub amplitude: f32,
    #[serde(default)]
    pub phase: f32,
    #[serde(default)]
    pub phase_speed: f32,
}

impl From<&Source> for SourceConfig {
    fn from(source: &Source) -> Self {
        Self {
            x: source.position.x,
            y: source.position.y,
            frequency: source.frequency,
            amplitude: source.amplitude,
            phase: source.phase,
            phase_speed: source.phase_speed,
        }
    }
}

impl From<SourceConfig> for SourceSpec {
    fn from(config: SourceConfig) -> Self {
        Self {
            position: Vec2::new(config.x, config.y),
            frequency: config.frequency,
            amplitude: config.amplitude,
            phase: config.phase,
            phase_speed: config.phase_speed,
        }
    }
}

/// Persisted scene state. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub map_mode: MapMode,
    #[serde(default)]
    pub particle_params: ParticleParams,
}

impl SceneConfig {
    /// Checks that the record can back a scene: at least one source.
    pub fn validate(&self) -> Result<(), WaveError> {
        if self.sources.is_empty() {
            return Err(WaveError::InvalidConfig("no sources".into()));
        }
        Ok(())
    }

    /// Parses and validates a JSON record.
    pub fn from_json(json: &str) -> Result<Self, WaveError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| WaveError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, WaveError> {
        serde_json::to_string_pretty(self).map_err(|e| WaveError::InvalidConfig(e.to_string()))
    }

    /// Reads and validates a record from `path`.
    pub fn load(path: &Path) -> Result<Self, WaveError> {
        let json = fs::read_to_string(path)
            .map_err(|e| WaveError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Writes the record to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), WaveError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| WaveError::Io(format!("{}: {e}", path.display())))
    }
}
