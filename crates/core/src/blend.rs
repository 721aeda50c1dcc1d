//! Blend and map modes: how per-source waves combine, and how the result is
//! presented.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WaveError;

/// Aggregation rule that combines per-source wave contributions.
///
/// One mode is active for the whole scene. The numeric [`code`](Self::code)
/// is what the generated fragment program branches on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Add,
    Subtract,
    Multiply,
    Normalize,
    Min,
    Max,
    Average,
}

impl BlendMode {
    /// Every mode, ordered by code.
    pub const ALL: [BlendMode; 7] = [
        BlendMode::Add,
        BlendMode::Subtract,
        BlendMode::Multiply,
        BlendMode::Normalize,
        BlendMode::Min,
        BlendMode::Max,
        BlendMode::Average,
    ];

    /// Lowercase name used by the command language and config files.
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Add => "add",
            BlendMode::Subtract => "subtract",
            BlendMode::Multiply => "multiply",
            BlendMode::Normalize => "normalize",
            BlendMode::Min => "min",
            BlendMode::Max => "max",
            BlendMode::Average => "average",
        }
    }

    /// Integer selector uploaded to the fragment program.
    pub fn code(self) -> i32 {
        match self {
            BlendMode::Add => 0,
            BlendMode::Subtract => 1,
            BlendMode::Multiply => 2,
            BlendMode::Normalize => 3,
            BlendMode::Min => 4,
            BlendMode::Max => 5,
            BlendMode::Average => 6,
        }
    }

    /// Names of all modes, in code order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.name()).collect()
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = WaveError;

    /// Parses a mode name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or(WaveError::UnknownBlendMode(wanted))
    }
}

/// Final presentation stage applied after blending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapMode {
    /// Leave the value as is; the renderer clips it.
    #[default]
    Clip,
    /// Map [-1, 1] onto [0, 1] via `v * 0.5 + 0.5`.
    Remap,
}

impl MapMode {
    pub fn name(self) -> &'static str {
        match self {
            MapMode::Clip => "clip",
            MapMode::Remap => "remap",
        }
    }

    pub fn code(self) -> i32 {
        match self {
            MapMode::Clip => 0,
            MapMode::Remap => 1,
        }
    }

    pub(crate) fn apply(self, value: f32) -> f32 {
        match self {
            MapMode::Clip => value,
            MapMode::Remap => value * 0.5 + 0.5,
        }
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapMode {
    type Err = WaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clip" => Ok(MapMode::Clip),
            "remap" => Ok(MapMode::Remap),
            other => Err(WaveError::UnknownMapMode(other.to_string())),
        }
    }
}
